//! Media host implementations

mod local;

pub use local::LocalMediaHost;
