//! Media service
//!
//! Validates an upload and hands it to the configured media host.

use tracing::{info, instrument};

use memex_common::VerifiedIdentity;
use memex_core::MediaType;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;
use crate::dto::MediaUploadResponse;

pub struct MediaService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MediaService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Only images and videos up to the configured size are accepted
    #[instrument(skip(self, identity, bytes), fields(uid = %identity.uid, size = bytes.len()))]
    pub async fn upload(
        &self,
        identity: &VerifiedIdentity,
        bytes: &[u8],
        content_type: &str,
    ) -> ServiceResult<MediaUploadResponse> {
        if bytes.is_empty() {
            return Err(ServiceError::validation("No file uploaded"));
        }
        let media_type = MediaType::from_content_type(content_type)
            .ok_or_else(|| ServiceError::validation("Only image and video files are allowed"))?;
        let max = self.ctx.settings().max_upload_bytes;
        if bytes.len() > max {
            return Err(ServiceError::validation(format!(
                "File too large (max {} MB)",
                max / (1024 * 1024)
            )));
        }

        PermissionService::new(self.ctx)
            .ensure_not_banned(&identity.uid)
            .await?;

        let uploaded = self
            .ctx
            .media_host()
            .upload(bytes, content_type, media_type)
            .await?;

        info!(url = %uploaded.url, media_type = %media_type, "Media uploaded");
        Ok(MediaUploadResponse {
            url: uploaded.url,
            media_type: uploaded.media_type,
        })
    }
}
