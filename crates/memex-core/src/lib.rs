//! # memex-core
//!
//! Domain layer containing entities, identifiers, the document-store and media ports,
//! and the vote/score/batch logic that keeps denormalized counters consistent.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod mutation;
pub mod traits;
pub mod value_objects;
pub mod voting;

// Re-export commonly used types at crate root
pub use entities::{
    AuthorSummary, Comment, Community, Membership, MembershipRole, Post, UserProfile, Vote,
    VoteCounters, ANONYMOUS_DISPLAY_NAME,
};
pub use error::{DomainError, DomainResult};
pub use mutation::{
    BatchedMutation, CounterEffect, FieldUpdate, MutationPlan, Precondition, Write, WriteBatch,
    WriteOp,
};
pub use traits::{
    Direction, Document, DocumentStore, Filter, MediaHost, MediaType, OrderBy, Query, RepoResult,
    UploadedMedia,
};
pub use value_objects::{
    Collection, DocumentKey, Snowflake, SnowflakeGenerator, SnowflakeParseError, SubjectKind,
    UserId, VoteChoice, VoteType,
};
pub use voting::{CastVote, ScoreAggregator, ScoredSubject, VoteDelta, VoteLedger, VoteTransition};
