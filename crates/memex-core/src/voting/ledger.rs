//! Vote ledger: the upvote/downvote/remove state machine
//!
//! Casting a vote is split in two steps. [`VoteLedger::cast_vote`] reads the subject and
//! the caller's existing vote and decides what has to change; [`VoteLedger::apply`]
//! turns that decision into one batch. The subject update is guarded by the version
//! that was read, so a concurrent vote makes the commit fail with
//! `PreconditionFailed` instead of silently losing an update.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::score::{ScoreAggregator, VoteDelta};
use crate::entities::{Post, Vote, VoteCounters};
use crate::error::{DomainError, DomainResult};
use crate::mutation::{BatchedMutation, FieldUpdate, WriteBatch};
use crate::traits::DocumentStore;
use crate::value_objects::{DocumentKey, SubjectKind, UserId, VoteChoice, VoteType};

/// What happens to the caller's vote record
#[derive(Debug, Clone, PartialEq)]
pub enum VoteTransition {
    /// Nothing to write: repeat of the current vote, or removal of no vote
    Unchanged,
    Record(Vote),
    Clear,
}

/// A decided vote, ready to commit
#[derive(Debug, Clone, PartialEq)]
pub struct CastVote {
    pub kind: SubjectKind,
    pub subject_id: String,
    pub user_id: UserId,
    /// Subject version the decision was based on
    pub subject_version: u64,
    pub counters: VoteCounters,
    pub created_at: DateTime<Utc>,
    pub delta: VoteDelta,
    pub transition: VoteTransition,
}

impl CastVote {
    pub fn is_noop(&self) -> bool {
        self.transition == VoteTransition::Unchanged
    }
}

/// Subject counters after a vote
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSubject {
    pub kind: SubjectKind,
    pub id: String,
    pub counters: VoteCounters,
    /// Posts only
    pub hot_score: Option<f64>,
}

/// Fields of a post or comment the ledger reads
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectFields {
    #[serde(flatten)]
    counters: VoteCounters,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
}

pub struct VoteLedger<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> VoteLedger<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Net counter change of moving from `existing` to `choice`
    pub fn compute_delta(existing: Option<VoteType>, choice: VoteChoice) -> VoteDelta {
        let mut delta = VoteDelta::default();
        match existing {
            Some(VoteType::Upvote) => delta.upvotes -= 1,
            Some(VoteType::Downvote) => delta.downvotes -= 1,
            None => {}
        }
        match choice {
            VoteChoice::Cast(VoteType::Upvote) => delta.upvotes += 1,
            VoteChoice::Cast(VoteType::Downvote) => delta.downvotes += 1,
            VoteChoice::Remove => {}
        }
        delta
    }

    /// Decide the vote of `user_id` on a subject.
    ///
    /// Fails with `SubjectNotFound` before anything else when the subject is absent.
    pub async fn cast_vote(
        &self,
        kind: SubjectKind,
        subject_id: &str,
        user_id: &UserId,
        choice: VoteChoice,
        now: DateTime<Utc>,
    ) -> DomainResult<CastVote> {
        let subject = self
            .store
            .get(&DocumentKey::subject(kind, subject_id))
            .await?
            .ok_or_else(|| DomainError::subject_not_found(kind.label(), subject_id))?;
        let fields: SubjectFields = subject.decode()?;

        let existing = match self.store.get(&DocumentKey::vote(kind, subject_id, user_id)).await? {
            Some(doc) => Some(doc.decode::<Vote>()?.vote_type),
            None => None,
        };

        let transition = match (existing, choice) {
            (Some(current), VoteChoice::Cast(requested)) if current == requested => VoteTransition::Unchanged,
            (None, VoteChoice::Remove) => VoteTransition::Unchanged,
            (Some(_), VoteChoice::Remove) => VoteTransition::Clear,
            (_, VoteChoice::Cast(requested)) => {
                VoteTransition::Record(Vote::new(subject_id, user_id.clone(), requested, now))
            }
        };

        Ok(CastVote {
            kind,
            subject_id: subject_id.to_string(),
            user_id: user_id.clone(),
            subject_version: subject.version,
            counters: fields.counters,
            created_at: fields.created_at,
            delta: Self::compute_delta(existing, choice),
            transition,
        })
    }

    /// Commit the vote record and the recomputed counters together.
    ///
    /// A no-op vote commits nothing and returns the current counters.
    pub async fn apply(&self, vote: &CastVote, now: DateTime<Utc>) -> DomainResult<ScoredSubject> {
        if vote.is_noop() {
            debug!(subject_id = %vote.subject_id, "Vote unchanged, nothing to write");
            let hot_score = vote
                .kind
                .is_ranked()
                .then(|| ScoreAggregator::hot_score(vote.counters.score, vote.created_at, now));
            return Ok(ScoredSubject {
                kind: vote.kind,
                id: vote.subject_id.clone(),
                counters: vote.counters,
                hot_score,
            });
        }

        let counters = ScoreAggregator::apply_delta(vote.counters, vote.delta);
        let mut updates = vec![
            (VoteCounters::UPVOTES.to_string(), FieldUpdate::set(counters.upvotes)),
            (VoteCounters::DOWNVOTES.to_string(), FieldUpdate::set(counters.downvotes)),
            (VoteCounters::SCORE.to_string(), FieldUpdate::set(counters.score)),
            (Post::UPDATED_AT.to_string(), FieldUpdate::set(now.timestamp_millis())),
        ];
        let hot_score = if vote.kind.is_ranked() {
            let hot = ScoreAggregator::hot_score(counters.score, vote.created_at, now);
            updates.push((Post::HOT_SCORE.to_string(), FieldUpdate::Set(Value::from(hot))));
            Some(hot)
        } else {
            None
        };

        let vote_key = DocumentKey::vote(vote.kind, &vote.subject_id, &vote.user_id);
        let batch = match &vote.transition {
            VoteTransition::Record(record) => WriteBatch::new().set(vote_key, record)?,
            VoteTransition::Clear | VoteTransition::Unchanged => WriteBatch::new().delete(vote_key),
        }
        .update_at_version(
            DocumentKey::subject(vote.kind, vote.subject_id.as_str()),
            vote.subject_version,
            updates,
        );

        BatchedMutation::new(self.store).commit(batch).await?;

        Ok(ScoredSubject {
            kind: vote.kind,
            id: vote.subject_id.clone(),
            counters,
            hot_score,
        })
    }
}
