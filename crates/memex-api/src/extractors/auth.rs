//! Authentication extractors
//!
//! Verify the bearer token through the configured `TokenVerifier`.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use memex_common::{AppError, VerifiedIdentity};
use memex_core::UserId;
use memex_service::services::PermissionService;

use crate::response::ApiError;
use crate::state::AppState;

/// Caller identified by a valid bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: VerifiedIdentity,
}

impl AuthUser {
    pub fn uid(&self) -> &UserId {
        &self.identity.uid
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::App(AppError::MissingAuth))?;

        let app_state = AppState::from_ref(state);
        let identity = app_state
            .service_context()
            .token_verifier()
            .verify(bearer.token())
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Token rejected");
                ApiError::App(e)
            })?;

        Ok(AuthUser { identity })
    }
}

/// Authenticated caller with admin rights, from the token claim or the profile flag
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub identity: VerifiedIdentity,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser { identity } = AuthUser::from_request_parts(parts, state).await?;

        let app_state = AppState::from_ref(state);
        PermissionService::new(app_state.service_context())
            .require_admin(&identity)
            .await
            .map_err(|e| {
                tracing::warn!(uid = %identity.uid, "Admin route refused");
                ApiError::Service(e)
            })?;

        Ok(AdminUser { identity })
    }
}
