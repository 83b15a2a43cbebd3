//! Post entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vote::VoteCounters;
use crate::value_objects::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub community: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: UserId,
    #[serde(default)]
    pub media_url: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(flatten)]
    pub counters: VoteCounters,
    pub hot_score: f64,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Post {
    pub const HOT_SCORE: &'static str = "hotScore";
    pub const COMMENT_COUNT: &'static str = "commentCount";
    pub const COMMUNITY: &'static str = "community";
    pub const AUTHOR_ID: &'static str = "authorId";
    pub const CREATED_AT: &'static str = "createdAt";
    pub const UPDATED_AT: &'static str = "updatedAt";
    pub const IS_FEATURED: &'static str = "isFeatured";
    pub const IS_DELETED: &'static str = "isDeleted";

    /// Create a post with the author's implicit upvote and no comments
    pub fn new(
        id: impl Into<String>,
        author_id: UserId,
        title: String,
        community: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title,
            content: String::new(),
            community,
            tags: Vec::new(),
            author_id,
            media_url: String::new(),
            media_type: String::new(),
            counters: VoteCounters::authored(),
            hot_score: 0.0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
            is_featured: false,
            is_deleted: false,
        }
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        &self.author_id == user_id
    }
}
