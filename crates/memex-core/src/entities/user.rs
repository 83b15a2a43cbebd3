//! User profile entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Display name used when neither the request nor the identity provider supplies one
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    #[serde(default)]
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    #[serde(default)]
    pub karma: i64,
    #[serde(default)]
    pub joined_communities: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_by: Option<UserId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub banned_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub const KARMA: &'static str = "karma";
    pub const JOINED_COMMUNITIES: &'static str = "joinedCommunities";
    pub const DISPLAY_NAME: &'static str = "displayName";
    pub const BIO: &'static str = "bio";
    pub const PHOTO_URL: &'static str = "photoURL";
    pub const UPDATED_AT: &'static str = "updatedAt";
    pub const IS_ADMIN: &'static str = "isAdmin";
    pub const IS_BANNED: &'static str = "isBanned";
    pub const BAN_REASON: &'static str = "banReason";
    pub const BANNED_BY: &'static str = "bannedBy";
    pub const BANNED_AT: &'static str = "bannedAt";
    pub const CREATED_AT: &'static str = "createdAt";

    pub fn new(uid: UserId, email: String, display_name: String, now: DateTime<Utc>) -> Self {
        Self {
            uid,
            email,
            display_name,
            bio: String::new(),
            photo_url: String::new(),
            karma: 0,
            joined_communities: Vec::new(),
            created_at: now,
            updated_at: now,
            is_admin: false,
            is_banned: false,
            ban_reason: None,
            banned_by: None,
            banned_at: None,
        }
    }

    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            uid: self.uid.clone(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }

    pub fn has_joined(&self, community_id: &str) -> bool {
        self.joined_communities.iter().any(|c| c == community_id)
    }
}

/// Author information embedded in post and comment responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub uid: UserId,
    pub display_name: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

impl AuthorSummary {
    /// Placeholder for authors whose profile no longer exists
    pub fn unknown(uid: UserId) -> Self {
        Self {
            uid,
            display_name: ANONYMOUS_DISPLAY_NAME.to_string(),
            photo_url: String::new(),
        }
    }
}
