//! Media host writing uploads to a local directory
//!
//! Files are named `{uuid}.{ext}` and exposed under a public base URL; the API
//! serves that directory statically.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{error, info, instrument};
use uuid::Uuid;

use memex_core::error::DomainError;
use memex_core::traits::{MediaHost, MediaType, RepoResult, UploadedMedia};

#[derive(Debug, Clone)]
pub struct LocalMediaHost {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaHost {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File extension for a MIME type: the subtype up to any `+suffix`
    fn extension(content_type: &str) -> String {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        let subtype = essence.split_once('/').map_or("", |(_, sub)| sub);
        let subtype = subtype.split('+').next().unwrap_or_default().to_ascii_lowercase();
        match subtype.as_str() {
            "jpeg" => "jpg".to_string(),
            "quicktime" => "mov".to_string(),
            other => {
                let cleaned: String = other.chars().filter(char::is_ascii_alphanumeric).collect();
                if cleaned.is_empty() {
                    "bin".to_string()
                } else {
                    cleaned
                }
            }
        }
    }
}

#[async_trait]
impl MediaHost for LocalMediaHost {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, bytes: &[u8], content_type: &str, media_type: MediaType) -> RepoResult<UploadedMedia> {
        let file_name = format!("{}.{}", Uuid::new_v4(), Self::extension(content_type));
        let path = self.root.join(&file_name);

        let write = async {
            tokio::fs::create_dir_all(&self.root).await?;
            tokio::fs::write(&path, bytes).await
        };
        if let Err(e) = write.await {
            error!(path = %path.display(), error = %e, "Failed to store upload");
            return Err(DomainError::UpstreamUnavailable(format!("media storage failed: {e}")));
        }

        info!(file = %file_name, %media_type, "Media stored");

        Ok(UploadedMedia {
            url: format!("{}/{file_name}", self.public_base_url),
            media_type,
        })
    }
}
