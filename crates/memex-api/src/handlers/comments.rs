//! Comment handlers

use axum::{
    extract::{Path, State},
    Json,
};
use memex_core::SubjectKind;
use memex_service::dto::{
    CommentListResponse, CreateCommentRequest, CreatedCommentResponse, MessageResponse, UpdateCommentRequest,
    VoteRequest, VoteResponse, DEFAULT_PAGE_LIMIT,
};
use memex_service::services::{CommentService, VoteService};

use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Threaded comments of a post, newest first
///
/// GET /api/comments/post/{post_id}
pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    pagination: Pagination,
) -> ApiResult<Json<CommentListResponse>> {
    let service = CommentService::new(state.service_context());
    let response = service
        .list_for_post(&post_id, pagination.with_default(DEFAULT_PAGE_LIMIT))
        .await?;
    Ok(Json(response))
}

/// POST /api/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CreatedCommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let response = service.create(&auth.identity, request).await?;
    Ok(Created(Json(response)))
}

/// POST /api/comments/{id}/vote
pub async fn vote_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<String>,
    ValidatedJson(request): ValidatedJson<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let service = VoteService::new(state.service_context());
    let response = service
        .vote(&auth.identity, SubjectKind::Comment, &comment_id, request)
        .await?;
    Ok(Json(response))
}

/// Edit content; author only
///
/// PUT /api/comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let service = CommentService::new(state.service_context());
    let response = service.edit(&auth.identity, &comment_id, request).await?;
    Ok(Json(response))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = CommentService::new(state.service_context());
    let response = service.delete(&auth.identity, &comment_id).await?;
    Ok(Json(response))
}
