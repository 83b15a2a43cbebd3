//! Vote service
//!
//! Drives the optimistic read-decide-commit cycle of the vote ledger. A commit
//! that loses a race against another vote on the same subject fails its version
//! precondition; the whole cycle is then repeated on fresh state, up to the
//! configured number of attempts.

use chrono::Utc;
use tracing::{info, instrument, warn};

use memex_common::VerifiedIdentity;
use memex_core::{DomainError, ScoredSubject, SubjectKind, VoteChoice, VoteLedger};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;
use crate::dto::{VoteRequest, VoteResponse};

pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// `POST /api/posts/{id}/vote` and `POST /api/comments/{id}/vote`
    #[instrument(skip(self, identity, request), fields(uid = %identity.uid))]
    pub async fn vote(
        &self,
        identity: &VerifiedIdentity,
        kind: SubjectKind,
        subject_id: &str,
        request: VoteRequest,
    ) -> ServiceResult<VoteResponse> {
        let choice: VoteChoice = request.vote_type.parse()?;
        PermissionService::new(self.ctx)
            .ensure_not_banned(&identity.uid)
            .await?;

        let scored = self.cast(identity, kind, subject_id, choice).await?;
        Ok(VoteResponse {
            message: "Vote recorded successfully".to_string(),
            new_score: scored.counters.score,
        })
    }

    /// Run the vote cycle until it commits or the attempts run out
    pub async fn cast(
        &self,
        identity: &VerifiedIdentity,
        kind: SubjectKind,
        subject_id: &str,
        choice: VoteChoice,
    ) -> ServiceResult<ScoredSubject> {
        let ledger = VoteLedger::new(self.ctx.store());
        let max_attempts = self.ctx.settings().vote_max_attempts;

        for attempt in 1..=max_attempts {
            let now = Utc::now();
            let decided = ledger
                .cast_vote(kind, subject_id, &identity.uid, choice, now)
                .await?;

            match ledger.apply(&decided, now).await {
                Ok(scored) => {
                    info!(
                        subject = kind.label(),
                        subject_id,
                        choice = %choice,
                        score = scored.counters.score,
                        attempt,
                        "Vote recorded"
                    );
                    return Ok(scored);
                }
                Err(DomainError::PreconditionFailed(key)) => {
                    warn!(%key, attempt, max_attempts, "Vote lost a race, retrying");
                    tokio::task::yield_now().await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::BatchCommitFailed(format!(
            "vote on {} {subject_id} still conflicting after {max_attempts} attempts",
            kind.label()
        ))
        .into())
    }
}
