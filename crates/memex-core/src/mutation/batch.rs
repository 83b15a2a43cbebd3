//! Write batches and the unit of work that commits them

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::error::{DomainError, DomainResult};
use crate::traits::DocumentStore;
use crate::value_objects::DocumentKey;

/// Field transform applied by an update
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Set(Value),
    /// Relative change; a missing or non-numeric field counts as 0
    Increment(i64),
    /// Append the value unless already present
    ArrayUnion(Value),
    /// Remove every element equal to the value
    ArrayRemove(Value),
}

impl FieldUpdate {
    pub fn set(value: impl Into<Value>) -> Self {
        Self::Set(value.into())
    }

    /// Apply this transform to `field` of `data`
    pub fn apply(&self, data: &mut Map<String, Value>, field: &str) {
        match self {
            Self::Set(value) => {
                data.insert(field.to_string(), value.clone());
            }
            Self::Increment(by) => {
                let current = data.get(field).and_then(Value::as_i64).unwrap_or(0);
                data.insert(field.to_string(), Value::from(current + by));
            }
            Self::ArrayUnion(value) => {
                let entry = data
                    .entry(field.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if !entry.is_array() {
                    *entry = Value::Array(Vec::new());
                }
                if let Value::Array(items) = entry {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
            }
            Self::ArrayRemove(value) => {
                if let Some(Value::Array(items)) = data.get_mut(field) {
                    items.retain(|item| item != value);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    Exists,
    NotExists,
    /// Document exists at exactly this version
    Version(u64),
}

impl Precondition {
    /// Check against the current version of the target, `None` when absent
    pub fn holds(self, current: Option<u64>) -> bool {
        match self {
            Self::Exists => current.is_some(),
            Self::NotExists => current.is_none(),
            Self::Version(expected) => current == Some(expected),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Replace the whole payload, creating the document if needed
    Set(Value),
    /// Apply field transforms to an existing document
    Update(Vec<(String, FieldUpdate)>),
    Delete,
}

/// One write of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct Write {
    pub key: DocumentKey,
    pub op: WriteOp,
    pub precondition: Option<Precondition>,
}

impl Write {
    /// Verify the precondition against the target's current version.
    ///
    /// Updates implicitly require the document to exist.
    pub fn check(&self, current: Option<u64>) -> DomainResult<()> {
        let explicit = self.precondition.map_or(true, |p| p.holds(current));
        let implicit = !matches!(self.op, WriteOp::Update(_)) || current.is_some();
        if explicit && implicit {
            Ok(())
        } else {
            Err(DomainError::PreconditionFailed(self.key.clone()))
        }
    }

    /// Compute the new payload from the current one, `None` meaning deleted
    pub fn apply(&self, current: Option<&Value>) -> Option<Value> {
        match &self.op {
            WriteOp::Set(value) => Some(value.clone()),
            WriteOp::Update(updates) => {
                let mut data = match current {
                    Some(Value::Object(map)) => map.clone(),
                    _ => Map::new(),
                };
                for (field, update) in updates {
                    update.apply(&mut data, field);
                }
                Some(Value::Object(data))
            }
            WriteOp::Delete => None,
        }
    }
}

/// Ordered list of writes committed all-or-nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, write: Write) -> Self {
        self.writes.push(write);
        self
    }

    /// Create a document that must not exist yet
    pub fn create<T: Serialize>(self, key: DocumentKey, document: &T) -> DomainResult<Self> {
        let data = to_payload(&key, document)?;
        Ok(self.push(Write {
            key,
            op: WriteOp::Set(data),
            precondition: Some(Precondition::NotExists),
        }))
    }

    /// Create or replace a document
    pub fn set<T: Serialize>(self, key: DocumentKey, document: &T) -> DomainResult<Self> {
        let data = to_payload(&key, document)?;
        Ok(self.push(Write {
            key,
            op: WriteOp::Set(data),
            precondition: None,
        }))
    }

    pub fn update(self, key: DocumentKey, updates: Vec<(String, FieldUpdate)>) -> Self {
        self.push(Write {
            key,
            op: WriteOp::Update(updates),
            precondition: None,
        })
    }

    /// Update guarded by the version the caller read
    pub fn update_at_version(self, key: DocumentKey, version: u64, updates: Vec<(String, FieldUpdate)>) -> Self {
        self.push(Write {
            key,
            op: WriteOp::Update(updates),
            precondition: Some(Precondition::Version(version)),
        })
    }

    pub fn delete(self, key: DocumentKey) -> Self {
        self.push(Write {
            key,
            op: WriteOp::Delete,
            precondition: None,
        })
    }

    /// Delete a document that must still exist
    pub fn delete_existing(self, key: DocumentKey) -> Self {
        self.push(Write {
            key,
            op: WriteOp::Delete,
            precondition: Some(Precondition::Exists),
        })
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

fn to_payload<T: Serialize>(key: &DocumentKey, document: &T) -> DomainResult<Value> {
    let value = serde_json::to_value(document)
        .map_err(|e| DomainError::InternalError(format!("failed to encode {key}: {e}")))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(DomainError::InternalError(format!("document {key} is not an object")))
    }
}

/// Unit of work over a document store.
///
/// Commits a batch once; it never retries. [`commit`](Self::commit) passes
/// precondition failures through so optimistic callers can re-read and try again
/// or map them to a domain error. [`commit_or_abort`](Self::commit_or_abort)
/// reports them as `BatchCommitFailed` like any other store failure.
pub struct BatchedMutation<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> BatchedMutation<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub async fn commit(&self, batch: WriteBatch) -> DomainResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let writes = batch.len();
        match self.store.commit(batch).await {
            Ok(()) => {
                debug!(writes, "Batch committed");
                Ok(())
            }
            Err(e @ DomainError::PreconditionFailed(_)) => {
                debug!(writes, error = %e, "Batch precondition failed");
                Err(e)
            }
            Err(e) => {
                error!(writes, error = %e, "Batch commit failed");
                Err(DomainError::BatchCommitFailed(e.to_string()))
            }
        }
    }

    /// Commit for flows that neither retry nor give a lost race its own error
    pub async fn commit_or_abort(&self, batch: WriteBatch) -> DomainResult<()> {
        match self.commit(batch).await {
            Err(DomainError::PreconditionFailed(key)) => {
                error!(%key, "Batch aborted on a concurrent change");
                Err(DomainError::BatchCommitFailed(format!("concurrent change to {key}")))
            }
            result => result,
        }
    }
}
