//! Community handlers
//!
//! The router shares one `{id}` segment between lookup and membership
//! routes: `GET` reads it as the community name, join and leave as the
//! community id.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use memex_service::dto::{
    CommunityDetailResponse, CommunityListQuery, CommunityListResponse, CreateCommunityRequest,
    CreatedCommunityResponse, JoinedCommunitiesResponse, MessageResponse, DEFAULT_PAGE_LIMIT,
};
use memex_service::services::CommunityService;

use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// GET /api/communities?search=
pub async fn list_communities(
    State(state): State<AppState>,
    pagination: Pagination,
    Query(query): Query<CommunityListQuery>,
) -> ApiResult<Json<CommunityListResponse>> {
    let service = CommunityService::new(state.service_context());
    let response = service.list(query, pagination.with_default(DEFAULT_PAGE_LIMIT)).await?;
    Ok(Json(response))
}

/// GET /api/communities/{name}
pub async fn get_community(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<CommunityDetailResponse>> {
    let service = CommunityService::new(state.service_context());
    let response = service.get_by_name(&name).await?;
    Ok(Json(response))
}

/// Create a community with the caller as moderator
///
/// POST /api/communities
pub async fn create_community(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCommunityRequest>,
) -> ApiResult<Created<Json<CreatedCommunityResponse>>> {
    let service = CommunityService::new(state.service_context());
    let response = service.create(&auth.identity, request).await?;
    Ok(Created(Json(response)))
}

/// POST /api/communities/{id}/join
pub async fn join_community(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(community_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = CommunityService::new(state.service_context());
    let response = service.join(&auth.identity, &community_id).await?;
    Ok(Json(response))
}

/// POST /api/communities/{id}/leave
pub async fn leave_community(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(community_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = CommunityService::new(state.service_context());
    let response = service.leave(&auth.identity, &community_id).await?;
    Ok(Json(response))
}

/// Communities the caller belongs to
///
/// GET /api/communities/user/joined
pub async fn joined_communities(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<JoinedCommunitiesResponse>> {
    let service = CommunityService::new(state.service_context());
    let response = service.joined(auth.uid()).await?;
    Ok(Json(response))
}
