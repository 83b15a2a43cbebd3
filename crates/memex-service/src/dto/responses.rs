//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize`. Timestamps go out as RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use memex_core::{AuthorSummary, MediaType, MembershipRole, UserId, VoteCounters};

// ============================================================================
// Common Responses
// ============================================================================

/// Bare acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    /// A full page came back, so another may follow
    pub has_more: bool,
}

// ============================================================================
// Profile Responses
// ============================================================================

/// Full profile, visible to its owner and to admins
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub uid: UserId,
    pub email: String,
    pub display_name: String,
    pub bio: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub karma: i64,
    pub joined_communities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_admin: bool,
    pub is_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfileResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfileResponse,
}

/// Profile as anyone may see it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub uid: UserId,
    pub display_name: String,
    pub bio: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub karma: i64,
    pub created_at: DateTime<Utc>,
    pub joined_communities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicProfileEnvelope {
    pub user: PublicProfileResponse,
}

/// Search hit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub uid: UserId,
    pub display_name: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub karma: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSearchResponse {
    pub users: Vec<UserSummaryResponse>,
    pub pagination: PaginationMeta,
}

/// Subset of the token echoed back by `/api/auth/verify`
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedUserResponse {
    pub uid: UserId,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: VerifiedUserResponse,
}

// ============================================================================
// Post Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub community: String,
    pub tags: Vec<String>,
    pub author_id: UserId,
    pub media_url: String,
    pub media_type: String,
    #[serde(flatten)]
    pub counters: VoteCounters,
    pub hot_score: f64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_featured: bool,
    pub is_deleted: bool,
    /// `null` when the author profile is gone
    pub author: Option<AuthorSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPostResponse {
    pub message: String,
    pub post_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub message: String,
    pub new_score: i64,
}

// ============================================================================
// Comment Responses
// ============================================================================

/// One node of a comment tree, or one entry of a user's comment history
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub author_id: UserId,
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub counters: VoteCounters,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub is_edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<CommentResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCommentResponse {
    pub message: String,
    pub comment_id: String,
}

// ============================================================================
// Community Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityResponse {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub rules: Vec<String>,
    pub creator_id: UserId,
    pub moderators: Vec<UserId>,
    pub member_count: i64,
    pub post_count: i64,
    pub is_active: bool,
    #[serde(rename = "isNSFW")]
    pub is_nsfw: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityListResponse {
    pub communities: Vec<CommunityResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityDetailResponse {
    pub community: CommunityResponse,
}

/// A joined community together with the caller's role in it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedCommunityResponse {
    #[serde(flatten)]
    pub community: CommunityResponse,
    pub role: MembershipRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinedCommunitiesResponse {
    pub communities: Vec<JoinedCommunityResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCommunityResponse {
    pub message: String,
    pub community_id: String,
    pub name: String,
}

// ============================================================================
// Admin Responses
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: u64,
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_communities: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub stats: PlatformStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminUserListResponse {
    pub users: Vec<UserProfileResponse>,
    pub pagination: PaginationMeta,
}

// ============================================================================
// Media Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MediaUploadResponse {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

// ============================================================================
// Health Check
// ============================================================================

/// Liveness response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness response with dependency checks
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessChecks {
    pub store: bool,
}

impl ReadinessResponse {
    pub fn from_checks(store: bool) -> Self {
        Self {
            status: if store { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: ReadinessChecks { store },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.checks.store
    }
}
