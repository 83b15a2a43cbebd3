//! Vote vocabulary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::document::Collection;
use crate::error::DomainError;

/// Kind of entity a vote is cast against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    Post,
    Comment,
}

impl SubjectKind {
    pub fn collection(self) -> Collection {
        match self {
            Self::Post => Collection::Posts,
            Self::Comment => Collection::Comments,
        }
    }

    pub fn vote_collection(self) -> Collection {
        match self {
            Self::Post => Collection::Votes,
            Self::Comment => Collection::CommentVotes,
        }
    }

    /// Only posts carry a hot score
    pub fn is_ranked(self) -> bool {
        matches!(self, Self::Post)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Post => "Post",
            Self::Comment => "Comment",
        }
    }
}

/// Type stored on a vote record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
        }
    }
}

/// What a user asked for: a vote of some type, or removal of their vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteChoice {
    Cast(VoteType),
    Remove,
}

impl FromStr for VoteChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(Self::Cast(VoteType::Upvote)),
            "downvote" => Ok(Self::Cast(VoteType::Downvote)),
            "remove" => Ok(Self::Remove),
            other => Err(DomainError::InvalidVoteType(other.to_string())),
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cast(vote_type) => f.write_str(vote_type.as_str()),
            Self::Remove => f.write_str("remove"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vote_choice() {
        assert_eq!("upvote".parse::<VoteChoice>().unwrap(), VoteChoice::Cast(VoteType::Upvote));
        assert_eq!("downvote".parse::<VoteChoice>().unwrap(), VoteChoice::Cast(VoteType::Downvote));
        assert_eq!("remove".parse::<VoteChoice>().unwrap(), VoteChoice::Remove);
    }

    #[test]
    fn test_parse_rejects_unknown_literal() {
        let err = "UPVOTE".parse::<VoteChoice>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidVoteType(ref s) if s == "UPVOTE"));
        assert!("".parse::<VoteChoice>().is_err());
    }

    #[test]
    fn test_vote_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&VoteType::Downvote).unwrap(), "\"downvote\"");
    }
}
