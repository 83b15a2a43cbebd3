//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of one
//! request and orchestrates reads, checks and batched writes against the
//! document store.

pub mod admin;
pub mod comment;
pub mod community;
pub mod context;
pub mod error;
pub mod media;
pub mod permission;
pub mod post;
pub mod user;
pub mod vote;

pub use admin::AdminService;
pub use comment::CommentService;
pub use community::CommunityService;
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use media::MediaService;
pub use permission::PermissionService;
pub use post::PostService;
pub use user::UserService;
pub use vote::VoteService;
