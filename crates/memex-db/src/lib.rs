//! # memex-db
//!
//! Infrastructure implementing the `memex-core` ports.
//!
//! - [`PgDocumentStore`]: documents as JSONB rows in PostgreSQL, one SQL transaction per batch
//! - [`MemoryDocumentStore`]: process-local store used in degraded mode and in tests
//! - [`LocalMediaHost`]: uploads written to a local directory and served statically
//!
//! ## Usage
//!
//! ```rust,ignore
//! use memex_db::{create_pool, ensure_schema, PgDocumentStore, PoolConfig};
//!
//! async fn example(url: String) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig { url, ..Default::default() }).await?;
//!     ensure_schema(&pool).await?;
//!     let store = PgDocumentStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod media;
pub mod pool;
pub mod store;

// Re-export commonly used types
pub use media::LocalMediaHost;
pub use pool::{create_pool, ensure_schema, PgPool, PoolConfig};
pub use store::{MemoryDocumentStore, PgDocumentStore};
