//! Permission service
//!
//! Profile-backed access checks shared by the other services: ban state,
//! admin rights, and ownership.

use tracing::{debug, instrument};

use memex_common::VerifiedIdentity;
use memex_core::{DocumentKey, DomainError, UserId, UserProfile};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a profile if it exists
    pub async fn find_profile(&self, uid: &UserId) -> ServiceResult<Option<UserProfile>> {
        match self.ctx.store().get(&DocumentKey::user(uid)).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Load a profile or fail with `UserNotFound`
    pub async fn require_profile(&self, uid: &UserId) -> ServiceResult<UserProfile> {
        self.find_profile(uid)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(uid.to_string()).into())
    }

    /// Load the profile of a caller about to create content; banned callers are refused
    #[instrument(skip(self))]
    pub async fn require_active_profile(&self, uid: &UserId) -> ServiceResult<UserProfile> {
        let profile = self.require_profile(uid).await?;
        if profile.is_banned {
            debug!(uid = %uid, "Banned user refused");
            return Err(DomainError::UserBanned.into());
        }
        Ok(profile)
    }

    /// Refuse banned callers; a caller without a profile passes
    pub async fn ensure_not_banned(&self, uid: &UserId) -> ServiceResult<()> {
        match self.find_profile(uid).await? {
            Some(profile) if profile.is_banned => Err(DomainError::UserBanned.into()),
            _ => Ok(()),
        }
    }

    /// Admin rights come from the token claim or from the stored profile flag
    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn is_admin(&self, identity: &VerifiedIdentity) -> ServiceResult<bool> {
        if identity.admin {
            return Ok(true);
        }
        Ok(self
            .find_profile(&identity.uid)
            .await?
            .is_some_and(|profile| profile.is_admin))
    }

    pub async fn require_admin(&self, identity: &VerifiedIdentity) -> ServiceResult<()> {
        if self.is_admin(identity).await? {
            Ok(())
        } else {
            Err(DomainError::AdminRequired.into())
        }
    }

    /// Authors may always act on their own content, everyone else needs admin rights
    pub async fn require_author_or_admin(
        &self,
        identity: &VerifiedIdentity,
        author_id: &UserId,
        action: &'static str,
    ) -> ServiceResult<()> {
        if &identity.uid == author_id || self.is_admin(identity).await? {
            Ok(())
        } else {
            Err(DomainError::NotAuthorized(action).into())
        }
    }
}
