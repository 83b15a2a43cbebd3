//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use memex_core::{Comment, Community, Membership, Post, UserProfile};

use super::requests::PageRequest;
use super::responses::{
    CommentResponse, CommunityResponse, JoinedCommunityResponse, PaginationMeta, PostResponse,
    PublicProfileResponse, UserProfileResponse, UserSummaryResponse,
};

impl PaginationMeta {
    pub fn for_page(page: PageRequest, returned: usize) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            has_more: returned == page.limit as usize,
        }
    }
}

// ============================================================================
// Profile Mappers
// ============================================================================

impl From<&UserProfile> for UserProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            uid: profile.uid.clone(),
            email: profile.email.clone(),
            display_name: profile.display_name.clone(),
            bio: profile.bio.clone(),
            photo_url: profile.photo_url.clone(),
            karma: profile.karma,
            joined_communities: profile.joined_communities.clone(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            is_admin: profile.is_admin,
            is_banned: profile.is_banned,
            ban_reason: profile.ban_reason.clone(),
            banned_at: profile.banned_at,
        }
    }
}

impl From<&UserProfile> for PublicProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            uid: profile.uid.clone(),
            display_name: profile.display_name.clone(),
            bio: profile.bio.clone(),
            photo_url: profile.photo_url.clone(),
            karma: profile.karma,
            created_at: profile.created_at,
            joined_communities: profile.joined_communities.clone(),
        }
    }
}

impl From<&UserProfile> for UserSummaryResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            uid: profile.uid.clone(),
            display_name: profile.display_name.clone(),
            photo_url: profile.photo_url.clone(),
            karma: profile.karma,
            created_at: profile.created_at,
        }
    }
}

// ============================================================================
// Post Mappers
// ============================================================================

/// Author is attached separately by the caller
impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            community: post.community,
            tags: post.tags,
            author_id: post.author_id,
            media_url: post.media_url,
            media_type: post.media_type,
            counters: post.counters,
            hot_score: post.hot_score,
            comment_count: post.comment_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
            is_featured: post.is_featured,
            is_deleted: post.is_deleted,
            author: None,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            content: comment.content,
            author_id: comment.author_id,
            parent_id: comment.parent_id,
            counters: comment.counters,
            reply_count: comment.reply_count,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            is_deleted: comment.is_deleted,
            is_edited: comment.is_edited,
            author: None,
            replies: None,
            post_title: None,
        }
    }
}

// ============================================================================
// Community Mappers
// ============================================================================

impl From<Community> for CommunityResponse {
    fn from(community: Community) -> Self {
        Self {
            id: community.id,
            name: community.name,
            display_name: community.display_name,
            description: community.description,
            rules: community.rules,
            creator_id: community.creator_id,
            moderators: community.moderators,
            member_count: community.member_count,
            post_count: community.post_count,
            is_active: community.is_active,
            is_nsfw: community.is_nsfw,
            created_at: community.created_at,
            updated_at: community.updated_at,
        }
    }
}

impl JoinedCommunityResponse {
    pub fn new(community: Community, membership: &Membership) -> Self {
        Self {
            community: community.into(),
            role: membership.role,
            joined_at: membership.joined_at,
        }
    }
}
