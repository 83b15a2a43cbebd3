//! Ports - interfaces the domain needs from infrastructure

mod media;
mod store;

pub use media::{MediaHost, MediaType, UploadedMedia};
pub use store::{Direction, Document, DocumentStore, Filter, OrderBy, Query, RepoResult};
