//! Media upload handler

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use memex_service::dto::MediaUploadResponse;
use memex_service::services::MediaService;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Store an image or video and return its public URL
///
/// POST /api/media with the file as the raw body
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<MediaUploadResponse>> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let service = MediaService::new(state.service_context());
    let response = service.upload(&auth.identity, &body, content_type).await?;
    Ok(Json(response))
}
