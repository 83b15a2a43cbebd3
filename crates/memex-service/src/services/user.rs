//! User service
//!
//! Profile lifecycle for the signed-in caller, public profile views, user
//! search, and the author lookups other services embed in their responses.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use memex_common::VerifiedIdentity;
use memex_core::{
    AuthorSummary, BatchedMutation, Collection, Direction, DocumentKey, DomainError, FieldUpdate,
    Query, RepoResult, UserId, UserProfile, WriteBatch, ANONYMOUS_DISPLAY_NAME,
};

use super::comment::CommentService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;
use super::post::PostService;
use crate::dto::{
    CommentListResponse, MessageResponse, PageRequest, PaginationMeta, PostListResponse,
    ProfileResponse, PublicProfileEnvelope, PublicProfileResponse, RegisterRequest,
    RegisterResponse, UpdateProfileRequest, UserProfileResponse, UserSearchQuery,
    UserSearchResponse, UserSummaryResponse, VerifiedUserResponse, VerifyResponse,
};

/// Shortest accepted search term, in characters
pub const MIN_SEARCH_LENGTH: usize = 2;

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create the caller's profile after their first sign-in
    #[instrument(skip(self, identity, request), fields(uid = %identity.uid))]
    pub async fn register(
        &self,
        identity: &VerifiedIdentity,
        request: RegisterRequest,
    ) -> ServiceResult<RegisterResponse> {
        request.validate()?;

        let display_name = request
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or(identity.name.as_deref())
            .unwrap_or(ANONYMOUS_DISPLAY_NAME)
            .to_string();

        let mut profile = UserProfile::new(identity.uid.clone(), identity.email.clone(), display_name, Utc::now());
        profile.bio = request.bio.map(|bio| bio.trim().to_string()).unwrap_or_default();
        profile.photo_url = identity.picture.clone().unwrap_or_default();

        // NotExists precondition turns a concurrent or repeated registration into ProfileExists
        let batch = WriteBatch::new().create(DocumentKey::user(&profile.uid), &profile)?;
        match BatchedMutation::new(self.ctx.store()).commit(batch).await {
            Ok(()) => {}
            Err(DomainError::PreconditionFailed(_)) => {
                return Err(DomainError::ProfileExists.into());
            }
            Err(e) => return Err(e.into()),
        }

        info!(display_name = %profile.display_name, "User profile created");

        Ok(RegisterResponse {
            message: "User profile created successfully".to_string(),
            user: UserProfileResponse::from(&profile),
        })
    }

    /// The caller's own profile
    #[instrument(skip(self))]
    pub async fn profile(&self, uid: &UserId) -> ServiceResult<ProfileResponse> {
        let profile = PermissionService::new(self.ctx).require_profile(uid).await?;
        Ok(ProfileResponse {
            user: UserProfileResponse::from(&profile),
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        uid: &UserId,
        request: UpdateProfileRequest,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;
        PermissionService::new(self.ctx).require_profile(uid).await?;

        let mut updates = Vec::new();
        if let Some(name) = request.display_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            updates.push((UserProfile::DISPLAY_NAME.to_string(), FieldUpdate::set(name)));
        }
        if let Some(bio) = request.bio.as_deref() {
            updates.push((UserProfile::BIO.to_string(), FieldUpdate::set(bio.trim())));
        }
        updates.push((
            UserProfile::UPDATED_AT.to_string(),
            FieldUpdate::set(Utc::now().timestamp_millis()),
        ));

        let batch = WriteBatch::new().update(DocumentKey::user(uid), updates);
        BatchedMutation::new(self.ctx.store()).commit_or_abort(batch).await?;

        info!(uid = %uid, "Profile updated");
        Ok(MessageResponse::new("Profile updated successfully"))
    }

    /// Echo of the verified token
    pub fn verify(&self, identity: &VerifiedIdentity) -> VerifyResponse {
        VerifyResponse {
            valid: true,
            user: VerifiedUserResponse {
                uid: identity.uid.clone(),
                email: identity.email.clone(),
                name: identity.name.clone(),
            },
        }
    }

    #[instrument(skip(self))]
    pub async fn public_profile(&self, uid: &UserId) -> ServiceResult<PublicProfileEnvelope> {
        let profile = PermissionService::new(self.ctx).require_profile(uid).await?;
        Ok(PublicProfileEnvelope {
            user: PublicProfileResponse::from(&profile),
        })
    }

    pub async fn posts(&self, uid: &UserId, page: PageRequest) -> ServiceResult<PostListResponse> {
        PostService::new(self.ctx).list_by_author(uid, page).await
    }

    pub async fn comments(&self, uid: &UserId, page: PageRequest) -> ServiceResult<CommentListResponse> {
        CommentService::new(self.ctx).list_by_author(uid, page).await
    }

    /// Display-name prefix search over non-banned users
    #[instrument(skip(self))]
    pub async fn search(&self, query: UserSearchQuery, page: PageRequest) -> ServiceResult<UserSearchResponse> {
        let term = query.q.as_deref().map(str::trim).unwrap_or_default();
        if term.chars().count() < MIN_SEARCH_LENGTH {
            return Err(ServiceError::validation("Search query must be at least 2 characters"));
        }

        let store_query = Query::new(Collection::Users)
            .prefix(UserProfile::DISPLAY_NAME, term)
            .eq(UserProfile::IS_BANNED, false)
            .order_by(UserProfile::DISPLAY_NAME, Direction::Asc)
            .page(page.page, page.limit);

        let users: Vec<UserSummaryResponse> = self
            .ctx
            .store()
            .query(&store_query)
            .await?
            .iter()
            .map(|doc| doc.decode::<UserProfile>().map(|p| UserSummaryResponse::from(&p)))
            .collect::<RepoResult<_>>()?;

        Ok(UserSearchResponse {
            pagination: PaginationMeta::for_page(page, users.len()),
            users,
        })
    }

    /// Author summaries for a set of user ids; ids without a profile are left out
    pub async fn author_summaries<'u>(
        &self,
        ids: impl IntoIterator<Item = &'u UserId>,
    ) -> ServiceResult<HashMap<UserId, AuthorSummary>> {
        let unique: HashSet<&UserId> = ids.into_iter().collect();
        let keys: Vec<DocumentKey> = unique.into_iter().map(DocumentKey::user).collect();
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut authors = HashMap::with_capacity(keys.len());
        for doc in self.ctx.store().get_many(&keys).await?.into_iter().flatten() {
            let profile: UserProfile = doc.decode()?;
            authors.insert(profile.uid.clone(), profile.summary());
        }
        Ok(authors)
    }
}
