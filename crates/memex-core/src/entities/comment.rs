//! Comment entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vote::VoteCounters;
use crate::value_objects::UserId;

/// A comment on a post, optionally replying to another comment of the same post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub author_id: UserId,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub counters: VoteCounters,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_edited: bool,
}

impl Comment {
    pub const POST_ID: &'static str = "postId";
    pub const AUTHOR_ID: &'static str = "authorId";
    pub const CONTENT: &'static str = "content";
    pub const REPLY_COUNT: &'static str = "replyCount";
    pub const CREATED_AT: &'static str = "createdAt";
    pub const UPDATED_AT: &'static str = "updatedAt";
    pub const IS_DELETED: &'static str = "isDeleted";
    pub const IS_EDITED: &'static str = "isEdited";

    pub fn new(
        id: impl Into<String>,
        post_id: impl Into<String>,
        author_id: UserId,
        content: String,
        parent_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            post_id: post_id.into(),
            content,
            author_id,
            parent_id,
            counters: VoteCounters::authored(),
            reply_count: 0,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            is_edited: false,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        &self.author_id == user_id
    }
}
