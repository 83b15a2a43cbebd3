//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod comments;
pub mod communities;
pub mod health;
pub mod media;
pub mod posts;
pub mod users;
