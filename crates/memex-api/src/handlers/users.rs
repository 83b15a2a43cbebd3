//! User handlers
//!
//! Public profiles and per-user listings. None of these require a token.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use memex_core::UserId;
use memex_service::dto::{
    CommentListResponse, PostListResponse, PublicProfileEnvelope, UserSearchQuery, UserSearchResponse,
    DEFAULT_USER_PAGE_LIMIT,
};
use memex_service::services::UserService;

use crate::extractors::Pagination;
use crate::response::ApiResult;
use crate::state::AppState;

/// Search by display-name prefix
///
/// GET /api/users?q=
pub async fn search_users(
    State(state): State<AppState>,
    pagination: Pagination,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<Json<UserSearchResponse>> {
    let service = UserService::new(state.service_context());
    let response = service
        .search(query, pagination.with_default(DEFAULT_USER_PAGE_LIMIT))
        .await?;
    Ok(Json(response))
}

/// GET /api/users/{uid}
pub async fn get_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<PublicProfileEnvelope>> {
    let service = UserService::new(state.service_context());
    let response = service.public_profile(&UserId::new(uid)).await?;
    Ok(Json(response))
}

/// GET /api/users/{uid}/posts
pub async fn get_user_posts(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    pagination: Pagination,
) -> ApiResult<Json<PostListResponse>> {
    let service = UserService::new(state.service_context());
    let response = service
        .posts(&UserId::new(uid), pagination.with_default(DEFAULT_USER_PAGE_LIMIT))
        .await?;
    Ok(Json(response))
}

/// GET /api/users/{uid}/comments
pub async fn get_user_comments(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    pagination: Pagination,
) -> ApiResult<Json<CommentListResponse>> {
    let service = UserService::new(state.service_context());
    let response = service
        .comments(&UserId::new(uid), pagination.with_default(DEFAULT_USER_PAGE_LIMIT))
        .await?;
    Ok(Json(response))
}
