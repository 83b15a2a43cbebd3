//! Pagination extractor
//!
//! Extracts 1-based `page` and `limit` query parameters. The page size default
//! differs per endpoint, so handlers resolve it with [`Pagination::with_default`].

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use memex_service::dto::PageRequest;
use serde::Deserialize;

use crate::response::ApiError;

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    page: Option<u32>,
    limit: Option<u32>,
}

impl Pagination {
    /// Clamp into a page request, falling back to `default_limit`
    pub fn with_default(self, default_limit: u32) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit)
    }
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self {
            page: params.page,
            limit: params.limit,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(params.into())
    }
}
