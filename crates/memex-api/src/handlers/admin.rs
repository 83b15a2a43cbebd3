//! Admin handlers
//!
//! Every handler takes an [`AdminUser`], so non-admin callers are refused
//! before any of these run.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use memex_core::UserId;
use memex_service::dto::{
    AdminUserListResponse, AdminUsersQuery, BanUserRequest, MessageResponse, StatsResponse, DEFAULT_PAGE_LIMIT,
};
use memex_service::services::AdminService;

use crate::extractors::{AdminUser, Pagination, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /api/admin/stats
pub async fn stats(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<StatsResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.stats().await?))
}

/// GET /api/admin/users?search=&banned=
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    pagination: Pagination,
    Query(query): Query<AdminUsersQuery>,
) -> ApiResult<Json<AdminUserListResponse>> {
    let service = AdminService::new(state.service_context());
    let response = service
        .list_users(query, pagination.with_default(DEFAULT_PAGE_LIMIT))
        .await?;
    Ok(Json(response))
}

/// POST /api/admin/users/{uid}/ban
///
/// The body is optional; an empty request bans with the default reason.
pub async fn ban_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(uid): Path<String>,
    request: Option<ValidatedJson<BanUserRequest>>,
) -> ApiResult<Json<MessageResponse>> {
    let request = request.map(|ValidatedJson(r)| r).unwrap_or_default();
    let service = AdminService::new(state.service_context());
    let response = service.ban_user(&admin.identity, &UserId::new(uid), request).await?;
    Ok(Json(response))
}

/// POST /api/admin/users/{uid}/unban
pub async fn unban_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(uid): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.unban_user(&UserId::new(uid)).await?))
}

/// POST /api/admin/users/{uid}/make-admin
pub async fn make_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(uid): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.set_admin(&UserId::new(uid), true).await?))
}

/// POST /api/admin/users/{uid}/remove-admin
pub async fn remove_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(uid): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.set_admin(&UserId::new(uid), false).await?))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(post_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.delete_post(&admin.identity, &post_id).await?))
}

/// POST /api/admin/posts/{id}/feature
pub async fn feature_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(post_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.set_featured(&post_id, true).await?))
}

/// POST /api/admin/posts/{id}/unfeature
pub async fn unfeature_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(post_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.set_featured(&post_id, false).await?))
}
