//! Document addressing

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::UserId;
use super::vote::SubjectKind;

/// Top-level document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Users,
    Posts,
    Comments,
    /// Post votes
    Votes,
    CommentVotes,
    Communities,
    Memberships,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Self::Users,
        Self::Posts,
        Self::Comments,
        Self::Votes,
        Self::CommentVotes,
        Self::Communities,
        Self::Memberships,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Posts => "posts",
            Self::Comments => "comments",
            Self::Votes => "votes",
            Self::CommentVotes => "commentVotes",
            Self::Communities => "communities",
            Self::Memberships => "memberships",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary key of a document: collection plus document id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    pub collection: Collection,
    pub id: String,
}

impl DocumentKey {
    pub fn new(collection: Collection, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }

    pub fn user(uid: &UserId) -> Self {
        Self::new(Collection::Users, uid.as_str())
    }

    pub fn post(id: impl Into<String>) -> Self {
        Self::new(Collection::Posts, id)
    }

    pub fn comment(id: impl Into<String>) -> Self {
        Self::new(Collection::Comments, id)
    }

    pub fn community(id: impl Into<String>) -> Self {
        Self::new(Collection::Communities, id)
    }

    /// Key of a subject (post or comment)
    pub fn subject(kind: SubjectKind, id: impl Into<String>) -> Self {
        Self::new(kind.collection(), id)
    }

    /// Composite `{subjectId}_{userId}` key: one vote document per (subject, user)
    pub fn vote(kind: SubjectKind, subject_id: &str, user_id: &UserId) -> Self {
        Self::new(kind.vote_collection(), format!("{subject_id}_{user_id}"))
    }

    /// Composite `{communityId}_{userId}` key: one membership per (community, user)
    pub fn membership(community_id: &str, user_id: &UserId) -> Self {
        Self::new(Collection::Memberships, format!("{community_id}_{user_id}"))
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}
