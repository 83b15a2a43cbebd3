//! Document store port
//!
//! Every entity of the site lives in a schemaless document keyed by
//! `(collection, id)`. The store offers point reads, simple filtered queries and an
//! all-or-nothing batch commit; that is everything the services need.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DomainError;
use crate::mutation::WriteBatch;
use crate::value_objects::{Collection, DocumentKey};

/// Result type for store operations
pub type RepoResult<T> = Result<T, DomainError>;

/// A stored document and its write version
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: DocumentKey,
    pub data: Value,
    /// Starts at 1 and increments on every committed write
    pub version: u64,
}

impl Document {
    pub fn new(key: DocumentKey, data: Value, version: u64) -> Self {
        Self { key, data, version }
    }

    pub fn id(&self) -> &str {
        &self.key.id
    }

    /// Deserialize the payload into an entity
    pub fn decode<T: DeserializeOwned>(&self) -> RepoResult<T> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            DomainError::StoreError(format!("malformed document {}: {e}", self.key))
        })
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

// ============================================================================
// Queries
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the value
    Eq { field: String, value: Value },
    /// String field starts with the prefix
    Prefix { field: String, prefix: String },
}

impl Filter {
    pub fn field(&self) -> &str {
        match self {
            Self::Eq { field, .. } | Self::Prefix { field, .. } => field,
        }
    }

    /// Evaluate the filter against a document payload
    pub fn matches(&self, data: &Value) -> bool {
        match self {
            Self::Eq { field, value } => data.get(field).unwrap_or(&Value::Null) == value,
            Self::Prefix { field, prefix } => data
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.starts_with(prefix.as_str())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    /// Compare two payloads on this field.
    ///
    /// Missing fields sort before any present value; numbers compare numerically,
    /// strings lexicographically and booleans false < true.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = compare_values(a.get(&self.field), b.get(&self.field));
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Query over a single collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: Collection,
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
            offset: 0,
            limit: None,
        }
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn prefix(mut self, field: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.filters.push(Filter::Prefix {
            field: field.into(),
            prefix: prefix.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Offset/limit from a 1-based page number
    pub fn page(self, page: u32, limit: u32) -> Self {
        let page = page.max(1) as usize;
        let limit = limit as usize;
        self.offset((page - 1) * limit).limit(limit)
    }

    pub fn matches(&self, data: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(data))
    }
}

// ============================================================================
// Store
// ============================================================================

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a single document
    async fn get(&self, key: &DocumentKey) -> RepoResult<Option<Document>>;

    /// Read several documents, preserving order
    async fn get_many(&self, keys: &[DocumentKey]) -> RepoResult<Vec<Option<Document>>> {
        let mut documents = Vec::with_capacity(keys.len());
        for key in keys {
            documents.push(self.get(key).await?);
        }
        Ok(documents)
    }

    /// Run a filtered, ordered and paginated query.
    ///
    /// Ties on the order field are broken by document id ascending.
    async fn query(&self, query: &Query) -> RepoResult<Vec<Document>>;

    /// Count documents matching the query filters, ignoring order and pagination
    async fn count(&self, query: &Query) -> RepoResult<u64>;

    /// Apply every write of the batch or none of them.
    ///
    /// A violated precondition fails the batch with `DomainError::PreconditionFailed`.
    async fn commit(&self, batch: WriteBatch) -> RepoResult<()>;
}
