//! Value objects - identifiers, document keys, and vote vocabulary

mod document;
mod ids;
mod vote;

pub use document::{Collection, DocumentKey};
pub use ids::{Snowflake, SnowflakeGenerator, SnowflakeParseError, UserId};
pub use vote::{SubjectKind, VoteChoice, VoteType};
