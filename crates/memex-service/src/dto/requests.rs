//! Request DTOs for API endpoints
//!
//! Bodies implement `Deserialize` and `Validate`. Required text fields default to
//! empty so a missing field and a blank one fail with the same message.

use serde::Deserialize;
use validator::Validate;

use memex_core::MediaType;

/// Default page size for comment trees, community listings and admin listings
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Default page size for the post feed
pub const DEFAULT_FEED_LIMIT: u32 = 10;

/// Default page size for per-user listings
pub const DEFAULT_USER_PAGE_LIMIT: u32 = 10;

/// Largest page a caller may ask for
pub const MAX_PAGE_LIMIT: u32 = 100;

// ============================================================================
// Pagination
// ============================================================================

/// 1-based page number and page size, already clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn first(limit: u32) -> Self {
        Self::new(None, Some(limit), limit)
    }
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Profile creation after the first sign-in
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(max = 50, message = "Display name must be at most 50 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 50, message = "Display name must be at most 50 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

/// `GET /api/users?q=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSearchQuery {
    pub q: Option<String>,
}

// ============================================================================
// Post Requests
// ============================================================================

/// Feed ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSort {
    #[default]
    Hot,
    New,
    Top,
}

impl PostSort {
    /// Unknown values fall back to `Hot`
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("new") => Self::New,
            Some("top") => Self::Top,
            _ => Self::Hot,
        }
    }
}

/// `GET /api/posts` filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub sort: Option<String>,
    pub community: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(max = 300, message = "Title must be at most 300 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 40000, message = "Content must be at most 40000 characters"))]
    pub content: String,

    #[serde(default)]
    pub community: String,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 tags are allowed"))]
    pub tags: Vec<String>,

    pub media_url: Option<String>,

    pub media_type: Option<MediaType>,
}

/// Body of both vote endpoints
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default)]
    pub vote_type: String,
}

// ============================================================================
// Comment Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub post_id: String,

    #[serde(default)]
    #[validate(length(max = 10000, message = "Comment must be at most 10000 characters"))]
    pub content: String,

    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    #[validate(length(max = 10000, message = "Comment must be at most 10000 characters"))]
    pub content: String,
}

// ============================================================================
// Community Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,

    #[serde(default)]
    pub rules: Vec<String>,

    #[serde(default, rename = "isNSFW")]
    pub is_nsfw: bool,
}

/// `GET /api/communities` filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommunityListQuery {
    pub search: Option<String>,
}

// ============================================================================
// Admin Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BanUserRequest {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

/// `GET /api/admin/users` filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUsersQuery {
    pub search: Option<String>,
    /// `true`, `false` or `all`
    pub banned: Option<String>,
}
