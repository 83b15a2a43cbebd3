//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::DocumentKey;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("{kind} not found")]
    SubjectNotFound { kind: &'static str, id: String },

    #[error("Parent comment not found")]
    ParentCommentNotFound(String),

    #[error("Community not found")]
    CommunityNotFound(String),

    #[error("User profile not found")]
    UserNotFound(String),

    #[error("Not a member of this community")]
    NotMember,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid vote type")]
    InvalidVoteType(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Community name must be 3-21 characters, lowercase letters, numbers, and underscores only")]
    InvalidCommunityName,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not authorized to {0}")]
    NotAuthorized(&'static str),

    #[error("User is banned")]
    UserBanned,

    #[error("Admin access required")]
    AdminRequired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Community name already taken")]
    CommunityNameTaken,

    #[error("Already a member of this community")]
    AlreadyMember,

    #[error("User profile already exists")]
    ProfileExists,

    /// A write precondition did not hold; the batch was not applied
    #[error("Precondition failed for {0}")]
    PreconditionFailed(DocumentKey),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Batch commit failed: {0}")]
    BatchCommitFailed(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::SubjectNotFound { .. } => "SUBJECT_NOT_FOUND",
            Self::ParentCommentNotFound(_) => "PARENT_NOT_FOUND",
            Self::CommunityNotFound(_) => "UNKNOWN_COMMUNITY",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::NotMember => "NOT_MEMBER",

            Self::InvalidVoteType(_) => "INVALID_VOTE_TYPE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidCommunityName => "INVALID_COMMUNITY_NAME",

            Self::NotAuthorized(_) => "NOT_AUTHORIZED",
            Self::UserBanned => "USER_BANNED",
            Self::AdminRequired => "ADMIN_REQUIRED",

            Self::CommunityNameTaken => "COMMUNITY_NAME_TAKEN",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::ProfileExists => "PROFILE_EXISTS",
            Self::PreconditionFailed(_) => "PRECONDITION_FAILED",

            Self::BatchCommitFailed(_) => "BATCH_COMMIT_FAILED",
            Self::StoreError(_) => "STORE_ERROR",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a subject-not-found error
    pub fn subject_not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::SubjectNotFound { kind, id: id.into() }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SubjectNotFound { .. }
                | Self::ParentCommentNotFound(_)
                | Self::CommunityNotFound(_)
                | Self::UserNotFound(_)
                | Self::NotMember
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidVoteType(_) | Self::ValidationError(_) | Self::InvalidCommunityName
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotAuthorized(_) | Self::UserBanned | Self::AdminRequired
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::CommunityNameTaken | Self::AlreadyMember | Self::ProfileExists
        )
    }

    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_authorization() {
            403
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
