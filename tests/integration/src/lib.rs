//! Integration test utilities for the MemeX API
//!
//! Spawns the full router on an ephemeral port with the in-memory document
//! store and mints identity tokens the server accepts.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
