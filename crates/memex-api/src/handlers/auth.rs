//! Auth handlers
//!
//! Profile registration and token verification. Sign-in itself happens at
//! the identity provider; these endpoints only see the resulting bearer token.

use axum::{extract::State, Json};
use memex_service::dto::{
    MessageResponse, ProfileResponse, RegisterRequest, RegisterResponse, UpdateProfileRequest, VerifyResponse,
};
use memex_service::services::UserService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create the caller's profile
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<RegisterResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.register(&auth.identity, request).await?;
    Ok(Created(Json(response)))
}

/// GET /api/auth/profile
pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ProfileResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.profile(auth.uid()).await?;
    Ok(Json(response))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_profile(auth.uid(), request).await?;
    Ok(Json(response))
}

/// Echo back the identity behind a valid token
///
/// POST /api/auth/verify
pub async fn verify(State(state): State<AppState>, auth: AuthUser) -> Json<VerifyResponse> {
    Json(UserService::new(state.service_context()).verify(&auth.identity))
}
