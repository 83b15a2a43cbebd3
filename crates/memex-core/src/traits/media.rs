//! Media host port

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::store::RepoResult;

/// Kind of media a post may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classify a MIME type; anything that is not an image or a video is rejected
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        let (top, sub) = essence.split_once('/')?;
        if sub.is_empty() {
            return None;
        }
        match top.to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Store the bytes and return their public URL.
    ///
    /// Failures of the host surface as `DomainError::UpstreamUnavailable`.
    async fn upload(&self, bytes: &[u8], content_type: &str, media_type: MediaType) -> RepoResult<UploadedMedia>;
}
