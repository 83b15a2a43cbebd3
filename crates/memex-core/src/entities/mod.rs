//! Domain entities - documents stored by the site
//!
//! Field names serialize in camelCase; timestamps are stored as epoch milliseconds so
//! that stores can order them numerically.

mod comment;
mod community;
mod post;
mod user;
mod vote;

pub use comment::Comment;
pub use community::{Community, Membership, MembershipRole};
pub use post::Post;
pub use user::{AuthorSummary, UserProfile, ANONYMOUS_DISPLAY_NAME};
pub use vote::{Vote, VoteCounters};
