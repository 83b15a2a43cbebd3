//! Post handlers
//!
//! Feed, post detail, creation, voting and deletion.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use memex_core::SubjectKind;
use memex_service::dto::{
    CreatePostRequest, CreatedPostResponse, ListPostsQuery, MessageResponse, PostDetailResponse,
    PostListResponse, VoteRequest, VoteResponse, DEFAULT_FEED_LIMIT,
};
use memex_service::services::{PostService, VoteService};

use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List posts in feed order
///
/// GET /api/posts?sort=hot|new|top&community=
pub async fn list_posts(
    State(state): State<AppState>,
    pagination: Pagination,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Json<PostListResponse>> {
    let service = PostService::new(state.service_context());
    let response = service.list(query, pagination.with_default(DEFAULT_FEED_LIMIT)).await?;
    Ok(Json(response))
}

/// GET /api/posts/{id}
pub async fn get_post(State(state): State<AppState>, Path(post_id): Path<String>) -> ApiResult<Json<PostDetailResponse>> {
    let service = PostService::new(state.service_context());
    let response = service.get(&post_id).await?;
    Ok(Json(response))
}

/// Create a post and credit the author
///
/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<Json<CreatedPostResponse>>> {
    let service = PostService::new(state.service_context());
    let response = service.create(&auth.identity, request).await?;
    Ok(Created(Json(response)))
}

/// POST /api/posts/{id}/vote
pub async fn vote_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<String>,
    ValidatedJson(request): ValidatedJson<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let service = VoteService::new(state.service_context());
    let response = service.vote(&auth.identity, SubjectKind::Post, &post_id, request).await?;
    Ok(Json(response))
}

/// Soft delete; author or admin only
///
/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = PostService::new(state.service_context());
    let response = service.delete(&auth.identity, &post_id).await?;
    Ok(Json(response))
}
