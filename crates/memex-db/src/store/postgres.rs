//! PostgreSQL implementation of DocumentStore
//!
//! One `documents` table holds every collection. A batch runs inside a single SQL
//! transaction: each target row is locked with `SELECT ... FOR UPDATE`, its
//! precondition checked, and the new payload written. Returning early on a violated
//! precondition drops the transaction, which rolls everything back.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::Postgres;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, QueryBuilder, Transaction};
use tracing::instrument;

use memex_core::error::DomainError;
use memex_core::mutation::{Write, WriteBatch};
use memex_core::traits::{Direction, Document, DocumentStore, Filter, Query, RepoResult};
use memex_core::value_objects::{Collection, DocumentKey};

use super::error::map_db_error;

/// Database row of the documents table
#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
    version: i64,
}

impl DocumentRow {
    fn into_document(self, collection: Collection) -> Document {
        Document::new(
            DocumentKey::new(collection, self.id),
            self.data.0,
            self.version as u64,
        )
    }
}

/// PostgreSQL implementation of DocumentStore
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn push_filters<'q>(builder: &mut QueryBuilder<'q, Postgres>, query: &'q Query) {
        builder.push(" WHERE collection = ");
        builder.push_bind(query.collection.as_str());

        for filter in &query.filters {
            match filter {
                Filter::Eq { field, value } => {
                    builder.push(" AND COALESCE(data -> ");
                    builder.push_bind(field.as_str());
                    builder.push(", 'null'::jsonb) = ");
                    builder.push_bind(Json(value));
                }
                Filter::Prefix { field, prefix } => {
                    builder.push(" AND starts_with(data ->> ");
                    builder.push_bind(field.as_str());
                    builder.push(", ");
                    builder.push_bind(prefix.as_str());
                    builder.push(")");
                }
            }
        }
    }

    async fn apply_write(tx: &mut Transaction<'_, Postgres>, write: &Write) -> RepoResult<()> {
        let collection = write.key.collection.as_str();
        let id = write.key.id.as_str();

        let current: Option<(Json<Value>, i64)> = sqlx::query_as(
            r#"
            SELECT data, version
            FROM documents
            WHERE collection = $1 AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_error)?;

        write.check(current.as_ref().map(|(_, version)| *version as u64))?;

        match (write.apply(current.as_ref().map(|(data, _)| &data.0)), current) {
            (Some(data), Some(_)) => {
                sqlx::query(
                    r#"
                    UPDATE documents
                    SET data = $3, version = version + 1, updated_at = NOW()
                    WHERE collection = $1 AND id = $2
                    "#,
                )
                .bind(collection)
                .bind(id)
                .bind(Json(data))
                .execute(&mut **tx)
                .await
                .map_err(map_db_error)?;
            }
            (Some(data), None) => {
                // A concurrent transaction may have created the row since our read
                let inserted = sqlx::query(
                    r#"
                    INSERT INTO documents (collection, id, data, version, updated_at)
                    VALUES ($1, $2, $3, 1, NOW())
                    ON CONFLICT (collection, id) DO NOTHING
                    "#,
                )
                .bind(collection)
                .bind(id)
                .bind(Json(data))
                .execute(&mut **tx)
                .await
                .map_err(map_db_error)?;

                if inserted.rows_affected() == 0 {
                    return Err(DomainError::PreconditionFailed(write.key.clone()));
                }
            }
            (None, Some(_)) => {
                sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                    .bind(collection)
                    .bind(id)
                    .execute(&mut **tx)
                    .await
                    .map_err(map_db_error)?;
            }
            (None, None) => {}
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &DocumentKey) -> RepoResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, version
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(key.collection.as_str())
        .bind(key.id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(|r| r.into_document(key.collection)))
    }

    #[instrument(skip(self, keys), fields(count = keys.len()))]
    async fn get_many(&self, keys: &[DocumentKey]) -> RepoResult<Vec<Option<Document>>> {
        let Some(first) = keys.first() else {
            return Ok(Vec::new());
        };
        if keys.iter().any(|k| k.collection != first.collection) {
            let mut documents = Vec::with_capacity(keys.len());
            for key in keys {
                documents.push(self.get(key).await?);
            }
            return Ok(documents);
        }

        let ids: Vec<String> = keys.iter().map(|k| k.id.clone()).collect();
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, version
            FROM documents
            WHERE collection = $1 AND id = ANY($2)
            "#,
        )
        .bind(first.collection.as_str())
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut documents: Vec<Option<Document>> = vec![None; keys.len()];
        for row in rows {
            for (slot, key) in documents.iter_mut().zip(keys) {
                if key.id == row.id && slot.is_none() {
                    *slot = Some(Document::new(key.clone(), row.data.0.clone(), row.version as u64));
                }
            }
        }
        Ok(documents)
    }

    #[instrument(skip(self), fields(collection = %query.collection))]
    async fn query(&self, query: &Query) -> RepoResult<Vec<Document>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, data, version FROM documents");
        Self::push_filters(&mut builder, query);

        builder.push(" ORDER BY ");
        if let Some(order) = &query.order_by {
            let nulls = match order.direction {
                Direction::Asc => "NULLS FIRST",
                Direction::Desc => "NULLS LAST",
            };
            builder.push("data -> ");
            builder.push_bind(order.field.as_str());
            builder.push(format!(" {} {nulls}, ", order.direction.as_sql()));
        }
        builder.push("id ASC");

        builder.push(" OFFSET ");
        builder.push_bind(query.offset as i64);
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit as i64);
        }

        let rows = builder
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|r| r.into_document(query.collection)).collect())
    }

    #[instrument(skip(self), fields(collection = %query.collection))]
    async fn count(&self, query: &Query) -> RepoResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents");
        Self::push_filters(&mut builder, query);

        let (count,): (i64,) = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count as u64)
    }

    #[instrument(skip(self, batch), fields(writes = batch.len()))]
    async fn commit(&self, batch: WriteBatch) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for write in batch.writes() {
            Self::apply_write(&mut tx, write).await?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgDocumentStore>();
    }

    #[test]
    fn test_filter_sql() {
        let query = Query::new(Collection::Posts)
            .eq("community", "memes")
            .prefix("title", "Hel");
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents");
        PgDocumentStore::push_filters(&mut builder, &query);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM documents WHERE collection = $1 \
             AND COALESCE(data -> $2, 'null'::jsonb) = $3 \
             AND starts_with(data ->> $4, $5)"
        );
    }
}
