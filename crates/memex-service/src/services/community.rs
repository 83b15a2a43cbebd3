//! Community service
//!
//! Listing, lookup by name, creation, and membership. Every membership change is
//! a mutation plan, so the member count and the user's joined list move together
//! with the membership record.

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use memex_common::VerifiedIdentity;
use memex_core::{
    BatchedMutation, Collection, Community, Direction, Document, DocumentKey, DomainError,
    Membership, MembershipRole, MutationPlan, Query, RepoResult, UserId,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;
use crate::dto::{
    CommunityDetailResponse, CommunityListQuery, CommunityListResponse, CommunityResponse,
    CreateCommunityRequest, CreatedCommunityResponse, JoinedCommunitiesResponse,
    JoinedCommunityResponse, MessageResponse, PageRequest, PaginationMeta,
};

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 21;

/// 3-21 characters out of `a-z`, `0-9` and `_`
pub fn is_valid_community_name(name: &str) -> bool {
    (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name.len())
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

pub struct CommunityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommunityService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Active communities by member count, optionally filtered by name prefix
    #[instrument(skip(self))]
    pub async fn list(&self, query: CommunityListQuery, page: PageRequest) -> ServiceResult<CommunityListResponse> {
        let mut store_query = Query::new(Collection::Communities).eq(Community::IS_ACTIVE, true);
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            store_query = store_query.prefix(Community::NAME, term.to_lowercase());
        }
        let store_query = store_query
            .order_by(Community::MEMBER_COUNT, Direction::Desc)
            .page(page.page, page.limit);

        let communities: Vec<CommunityResponse> = self
            .fetch(&store_query)
            .await?
            .into_iter()
            .map(CommunityResponse::from)
            .collect();

        Ok(CommunityListResponse {
            pagination: PaginationMeta::for_page(page, communities.len()),
            communities,
        })
    }

    /// Case-insensitive lookup by the unique name
    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> ServiceResult<CommunityDetailResponse> {
        let name = name.trim().to_lowercase();
        let community = self
            .find_by_name(&name)
            .await?
            .ok_or(DomainError::CommunityNotFound(name))?;
        Ok(CommunityDetailResponse {
            community: community.into(),
        })
    }

    #[instrument(skip(self, identity, request), fields(uid = %identity.uid))]
    pub async fn create(
        &self,
        identity: &VerifiedIdentity,
        request: CreateCommunityRequest,
    ) -> ServiceResult<CreatedCommunityResponse> {
        request.validate()?;
        let display_name = request.name.trim();
        let description = request.description.trim();
        if display_name.is_empty() || description.is_empty() {
            return Err(ServiceError::validation("Name and description are required"));
        }

        let name = display_name.to_lowercase();
        if !is_valid_community_name(&name) {
            return Err(DomainError::InvalidCommunityName.into());
        }
        if self.find_by_name(&name).await?.is_some() {
            return Err(DomainError::CommunityNameTaken.into());
        }

        PermissionService::new(self.ctx)
            .require_active_profile(&identity.uid)
            .await?;

        let now = Utc::now();
        let mut community = Community::new(
            self.ctx.generate_id().to_string(),
            name,
            display_name.to_string(),
            identity.uid.clone(),
            now,
        );
        community.description = description.to_string();
        community.rules = request
            .rules
            .iter()
            .map(|rule| rule.trim())
            .filter(|rule| !rule.is_empty())
            .map(ToString::to_string)
            .collect();
        community.is_nsfw = request.is_nsfw;
        let membership = Membership::new(community.id.as_str(), identity.uid.clone(), MembershipRole::Moderator, now);

        let batch = MutationPlan::CreateCommunity {
            community: &community,
            membership: &membership,
        }
        .into_batch()?;
        BatchedMutation::new(self.ctx.store()).commit_or_abort(batch).await?;

        info!(community_id = %community.id, name = %community.name, "Community created");

        Ok(CreatedCommunityResponse {
            message: "Community created successfully".to_string(),
            community_id: community.id,
            name: community.name,
        })
    }

    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn join(&self, identity: &VerifiedIdentity, community_id: &str) -> ServiceResult<MessageResponse> {
        self.require(community_id).await?;
        if self.find_membership(community_id, &identity.uid).await?.is_some() {
            return Err(DomainError::AlreadyMember.into());
        }
        PermissionService::new(self.ctx)
            .require_active_profile(&identity.uid)
            .await?;

        let membership = Membership::new(community_id, identity.uid.clone(), MembershipRole::Member, Utc::now());
        let batch = MutationPlan::JoinCommunity(&membership).into_batch()?;
        match BatchedMutation::new(self.ctx.store()).commit(batch).await {
            Ok(()) => {}
            // A concurrent join of the same user won the membership create
            Err(DomainError::PreconditionFailed(_)) => return Err(DomainError::AlreadyMember.into()),
            Err(e) => return Err(e.into()),
        }

        info!(community_id, "Joined community");
        Ok(MessageResponse::new("Successfully joined community"))
    }

    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn leave(&self, identity: &VerifiedIdentity, community_id: &str) -> ServiceResult<MessageResponse> {
        self.require(community_id).await?;
        if self.find_membership(community_id, &identity.uid).await?.is_none() {
            return Err(DomainError::NotMember.into());
        }

        let batch = MutationPlan::LeaveCommunity {
            community_id,
            user_id: &identity.uid,
        }
        .into_batch()?;
        match BatchedMutation::new(self.ctx.store()).commit(batch).await {
            Ok(()) => {}
            // A concurrent leave of the same user already removed the membership
            Err(DomainError::PreconditionFailed(_)) => return Err(DomainError::NotMember.into()),
            Err(e) => return Err(e.into()),
        }

        info!(community_id, "Left community");
        Ok(MessageResponse::new("Successfully left community"))
    }

    /// Communities the caller belongs to, with their role
    #[instrument(skip(self))]
    pub async fn joined(&self, uid: &UserId) -> ServiceResult<JoinedCommunitiesResponse> {
        let memberships: Vec<Membership> = self
            .ctx
            .store()
            .query(&Query::new(Collection::Memberships).eq(Membership::USER_ID, uid.as_str()))
            .await?
            .iter()
            .map(Document::decode)
            .collect::<RepoResult<_>>()?;

        let keys: Vec<DocumentKey> = memberships
            .iter()
            .map(|m| DocumentKey::community(m.community_id.as_str()))
            .collect();
        let documents = self.ctx.store().get_many(&keys).await?;

        let mut communities = Vec::with_capacity(memberships.len());
        for (membership, doc) in memberships.iter().zip(documents) {
            if let Some(doc) = doc {
                let community: Community = doc.decode()?;
                communities.push(JoinedCommunityResponse::new(community, membership));
            }
        }
        Ok(JoinedCommunitiesResponse { communities })
    }

    pub async fn require(&self, community_id: &str) -> ServiceResult<Community> {
        match self.ctx.store().get(&DocumentKey::community(community_id)).await? {
            Some(doc) => Ok(doc.decode()?),
            None => Err(DomainError::CommunityNotFound(community_id.to_string()).into()),
        }
    }

    async fn find_by_name(&self, name: &str) -> ServiceResult<Option<Community>> {
        let query = Query::new(Collection::Communities).eq(Community::NAME, name).limit(1);
        Ok(self.fetch(&query).await?.into_iter().next())
    }

    async fn find_membership(&self, community_id: &str, uid: &UserId) -> ServiceResult<Option<Membership>> {
        match self.ctx.store().get(&DocumentKey::membership(community_id, uid)).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    async fn fetch(&self, query: &Query) -> ServiceResult<Vec<Community>> {
        let documents = self.ctx.store().query(query).await?;
        Ok(documents.iter().map(Document::decode).collect::<RepoResult<Vec<Community>>>()?)
    }
}
