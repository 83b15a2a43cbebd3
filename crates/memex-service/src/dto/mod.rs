//! Data Transfer Objects
//!
//! Request and response shapes of the HTTP API, plus entity-to-response mappers.

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
