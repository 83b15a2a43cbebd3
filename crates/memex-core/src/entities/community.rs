//! Community and membership entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    /// Unique lowercase handle, `^[a-z0-9_]{3,21}$`
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<String>,
    pub creator_id: UserId,
    #[serde(default)]
    pub moderators: Vec<UserId>,
    #[serde(default)]
    pub member_count: i64,
    #[serde(default)]
    pub post_count: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(rename = "isNSFW", default)]
    pub is_nsfw: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Community {
    pub const NAME: &'static str = "name";
    pub const MEMBER_COUNT: &'static str = "memberCount";
    pub const POST_COUNT: &'static str = "postCount";
    pub const IS_ACTIVE: &'static str = "isActive";
    pub const UPDATED_AT: &'static str = "updatedAt";

    /// Create a community whose creator is its first member and moderator
    pub fn new(id: impl Into<String>, name: String, display_name: String, creator_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name,
            display_name,
            description: String::new(),
            rules: Vec::new(),
            moderators: vec![creator_id.clone()],
            creator_id,
            member_count: 1,
            post_count: 0,
            is_active: true,
            is_nsfw: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_moderator(&self, user_id: &UserId) -> bool {
        self.moderators.contains(user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Moderator,
    Member,
}

/// A user's membership in a community, keyed `{communityId}_{userId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub community_id: String,
    pub user_id: UserId,
    pub role: MembershipRole,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub const USER_ID: &'static str = "userId";

    pub fn new(community_id: impl Into<String>, user_id: UserId, role: MembershipRole, now: DateTime<Utc>) -> Self {
        Self {
            community_id: community_id.into(),
            user_id,
            role,
            joined_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_is_first_moderator() {
        let creator = UserId::new("u1");
        let community = Community::new("c1", "memes".into(), "Memes".into(), creator.clone(), Utc::now());
        assert_eq!(community.member_count, 1);
        assert!(community.is_moderator(&creator));
        assert!(community.is_active);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_value(MembershipRole::Moderator).unwrap(), "moderator");
        assert_eq!(serde_json::to_value(MembershipRole::Member).unwrap(), "member");
    }
}
