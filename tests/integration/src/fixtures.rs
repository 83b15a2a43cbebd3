//! Test fixtures and data generators
//!
//! Request bodies and the response shapes the tests read back.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique uid for a test user
pub fn unique_uid() -> String {
    format!("user{}", unique_suffix())
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl RegisterRequest {
    pub fn named(display_name: &str) -> Self {
        Self {
            display_name: Some(display_name.to_string()),
            bio: Some("Here for the memes".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: ProfileBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    pub uid: String,
    pub display_name: String,
    pub karma: i64,
    pub joined_communities: Vec<String>,
    pub is_admin: bool,
    pub is_banned: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub community: String,
    pub tags: Vec<String>,
}

impl CreatePostRequest {
    pub fn in_community(community: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            title: format!("Meme {suffix}"),
            content: "when the build passes first try".to_string(),
            community: community.to_string(),
            tags: vec!["relatable".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPostResponse {
    pub message: String,
    pub post_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    pub id: String,
    pub title: String,
    pub community: String,
    pub author_id: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
    pub comment_count: i64,
    pub is_deleted: bool,
    pub author: Option<AuthorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorBody {
    pub uid: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostBody>,
    pub pagination: PaginationBody,
}

#[derive(Debug, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationBody {
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub vote_type: String,
}

impl VoteRequest {
    pub fn new(vote_type: &str) -> Self {
        Self {
            vote_type: vote_type.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub message: String,
    pub new_score: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCommentResponse {
    pub comment_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub id: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub reply_count: i64,
    pub is_edited: bool,
    #[serde(default)]
    pub replies: Option<Vec<CommentBody>>,
    #[serde(default)]
    pub post_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    pub name: String,
    pub description: String,
    pub rules: Vec<String>,
}

impl CreateCommunityRequest {
    pub fn unique() -> Self {
        Self {
            name: format!("memes_{}", unique_suffix()),
            description: "Fresh memes only".to_string(),
            rules: vec!["No reposts".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCommunityResponse {
    pub community_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityBody {
    pub id: String,
    pub name: String,
    pub member_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct CommunityDetailResponse {
    pub community: CommunityBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedCommunityBody {
    pub id: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinedCommunitiesResponse {
    pub communities: Vec<JoinedCommunityBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadResponse {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
}
