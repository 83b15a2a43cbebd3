//! Admin service
//!
//! Platform statistics, the user directory, bans, admin grants, and post
//! moderation. Callers must already have passed `PermissionService::require_admin`.

use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument, warn};
use validator::Validate;

use memex_common::VerifiedIdentity;
use memex_core::{
    BatchedMutation, Collection, Comment, Community, Direction, Document, DocumentKey, FieldUpdate,
    Post, Query, RepoResult, UserId, UserProfile, WriteBatch,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;
use super::post::PostService;
use crate::dto::{
    AdminUserListResponse, AdminUsersQuery, BanUserRequest, MessageResponse, PageRequest,
    PaginationMeta, PlatformStats, StatsResponse, UserProfileResponse,
};

/// Ban reason recorded when the admin gives none
pub const DEFAULT_BAN_REASON: &str = "Violation of community guidelines";

pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> ServiceResult<StatsResponse> {
        let store = self.ctx.store();
        let total_users = store.count(&Query::new(Collection::Users)).await?;
        let total_posts = store
            .count(&Query::new(Collection::Posts).eq(Post::IS_DELETED, false))
            .await?;
        let total_comments = store
            .count(&Query::new(Collection::Comments).eq(Comment::IS_DELETED, false))
            .await?;
        let total_communities = store
            .count(&Query::new(Collection::Communities).eq(Community::IS_ACTIVE, true))
            .await?;

        Ok(StatsResponse {
            stats: PlatformStats {
                total_users,
                total_posts,
                total_comments,
                total_communities,
                generated_at: Utc::now(),
            },
        })
    }

    /// Newest users first.
    ///
    /// The ban filter runs in the store; the free-text search only filters the
    /// fetched page, matching display name or email case-insensitively.
    #[instrument(skip(self))]
    pub async fn list_users(&self, query: AdminUsersQuery, page: PageRequest) -> ServiceResult<AdminUserListResponse> {
        let mut store_query = Query::new(Collection::Users);
        match query.banned.as_deref() {
            Some("true") => store_query = store_query.eq(UserProfile::IS_BANNED, true),
            Some("false") => store_query = store_query.eq(UserProfile::IS_BANNED, false),
            _ => {}
        }
        let store_query = store_query
            .order_by(UserProfile::CREATED_AT, Direction::Desc)
            .page(page.page, page.limit);

        let profiles: Vec<UserProfile> = self
            .ctx
            .store()
            .query(&store_query)
            .await?
            .iter()
            .map(Document::decode)
            .collect::<RepoResult<_>>()?;
        let fetched = profiles.len();

        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let users = profiles
            .iter()
            .filter(|p| match &needle {
                Some(needle) => {
                    p.display_name.to_lowercase().contains(needle.as_str())
                        || p.email.to_lowercase().contains(needle.as_str())
                }
                None => true,
            })
            .map(UserProfileResponse::from)
            .collect();

        Ok(AdminUserListResponse {
            users,
            pagination: PaginationMeta::for_page(page, fetched),
        })
    }

    #[instrument(skip(self, admin, request), fields(admin = %admin.uid))]
    pub async fn ban_user(
        &self,
        admin: &VerifiedIdentity,
        uid: &UserId,
        request: BanUserRequest,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;
        PermissionService::new(self.ctx).require_profile(uid).await?;

        let reason = request
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_BAN_REASON);
        let now = Utc::now().timestamp_millis();
        self.update_user(
            uid,
            vec![
                (UserProfile::IS_BANNED, FieldUpdate::set(true)),
                (UserProfile::BAN_REASON, FieldUpdate::set(reason)),
                (UserProfile::BANNED_BY, FieldUpdate::set(admin.uid.as_str())),
                (UserProfile::BANNED_AT, FieldUpdate::set(now)),
                (UserProfile::UPDATED_AT, FieldUpdate::set(now)),
            ],
        )
        .await?;

        warn!(uid = %uid, reason, "User banned");
        Ok(MessageResponse::new("User banned successfully"))
    }

    #[instrument(skip(self))]
    pub async fn unban_user(&self, uid: &UserId) -> ServiceResult<MessageResponse> {
        PermissionService::new(self.ctx).require_profile(uid).await?;
        self.update_user(
            uid,
            vec![
                (UserProfile::IS_BANNED, FieldUpdate::set(false)),
                (UserProfile::BAN_REASON, FieldUpdate::Set(Value::Null)),
                (UserProfile::BANNED_BY, FieldUpdate::Set(Value::Null)),
                (UserProfile::BANNED_AT, FieldUpdate::Set(Value::Null)),
                (UserProfile::UPDATED_AT, FieldUpdate::set(Utc::now().timestamp_millis())),
            ],
        )
        .await?;

        info!(uid = %uid, "User unbanned");
        Ok(MessageResponse::new("User unbanned successfully"))
    }

    /// Grant or revoke the stored admin flag
    #[instrument(skip(self))]
    pub async fn set_admin(&self, uid: &UserId, is_admin: bool) -> ServiceResult<MessageResponse> {
        PermissionService::new(self.ctx).require_profile(uid).await?;
        self.update_user(
            uid,
            vec![
                (UserProfile::IS_ADMIN, FieldUpdate::set(is_admin)),
                (UserProfile::UPDATED_AT, FieldUpdate::set(Utc::now().timestamp_millis())),
            ],
        )
        .await?;

        info!(uid = %uid, is_admin, "Admin flag changed");
        Ok(MessageResponse::new(if is_admin {
            "User promoted to admin successfully"
        } else {
            "Admin privileges removed successfully"
        }))
    }

    #[instrument(skip(self, admin), fields(admin = %admin.uid))]
    pub async fn delete_post(&self, admin: &VerifiedIdentity, post_id: &str) -> ServiceResult<MessageResponse> {
        PostService::new(self.ctx).mark_deleted(post_id).await?;
        warn!(post_id, "Post removed by admin");
        Ok(MessageResponse::new("Post deleted successfully"))
    }

    #[instrument(skip(self))]
    pub async fn set_featured(&self, post_id: &str, featured: bool) -> ServiceResult<MessageResponse> {
        PostService::new(self.ctx).set_featured(post_id, featured).await?;
        Ok(MessageResponse::new(if featured {
            "Post featured successfully"
        } else {
            "Post unfeatured successfully"
        }))
    }

    async fn update_user(&self, uid: &UserId, updates: Vec<(&str, FieldUpdate)>) -> ServiceResult<()> {
        let updates = updates
            .into_iter()
            .map(|(field, update)| (field.to_string(), update))
            .collect();
        let batch = WriteBatch::new().update(DocumentKey::user(uid), updates);
        BatchedMutation::new(self.ctx.store()).commit_or_abort(batch).await?;
        Ok(())
    }
}
