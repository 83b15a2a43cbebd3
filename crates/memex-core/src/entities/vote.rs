//! Vote record and the counters votes act on

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{UserId, VoteType};

/// A single user's vote on a post or comment
///
/// Stored under the composite key `{subjectId}_{userId}`, so a user holds at most one
/// vote per subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub subject_id: String,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub vote_type: VoteType,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(subject_id: impl Into<String>, user_id: UserId, vote_type: VoteType, now: DateTime<Utc>) -> Self {
        Self {
            subject_id: subject_id.into(),
            user_id,
            vote_type,
            created_at: now,
        }
    }
}

/// Denormalized vote counters carried by every subject
///
/// `score` always equals `upvotes - downvotes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCounters {
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

impl VoteCounters {
    pub const UPVOTES: &'static str = "upvotes";
    pub const DOWNVOTES: &'static str = "downvotes";
    pub const SCORE: &'static str = "score";

    pub fn new(upvotes: i64, downvotes: i64) -> Self {
        Self {
            upvotes,
            downvotes,
            score: upvotes - downvotes,
        }
    }

    /// Counters of freshly created content: the author's implicit upvote
    pub fn authored() -> Self {
        Self::new(1, 0)
    }
}

impl Default for VoteCounters {
    fn default() -> Self {
        Self::authored()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authored_counters() {
        let counters = VoteCounters::authored();
        assert_eq!((counters.upvotes, counters.downvotes, counters.score), (1, 0, 1));
    }

    #[test]
    fn test_vote_serializes_type_field() {
        let vote = Vote::new("p1", UserId::new("u1"), VoteType::Upvote, Utc::now());
        let json = serde_json::to_value(&vote).unwrap();
        assert_eq!(json["type"], "upvote");
        assert_eq!(json["subjectId"], "p1");
        assert_eq!(json["userId"], "u1");
        assert!(json["createdAt"].is_i64());
    }
}
