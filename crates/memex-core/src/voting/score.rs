//! Counter arithmetic and the hot ranking score

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::entities::VoteCounters;

/// Net change to a subject's counters; each component is in `-1..=1`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteDelta {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteDelta {
    pub fn new(upvotes: i64, downvotes: i64) -> Self {
        Self { upvotes, downvotes }
    }

    pub fn is_zero(&self) -> bool {
        self.upvotes == 0 && self.downvotes == 0
    }

    /// Effect on `score`
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

/// Applies vote deltas to counters and derives the hot score of posts
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Decay exponent of the hot score
    pub const GRAVITY: f64 = 1.8;
    /// Added to the age so brand-new posts do not divide by ~0
    pub const AGE_OFFSET_HOURS: f64 = 2.0;

    const MILLIS_PER_HOUR: f64 = 3_600_000.0;

    /// New counters after the delta. Negative results are an invariant violation:
    /// they are logged and clamped to 0.
    pub fn apply_delta(counters: VoteCounters, delta: VoteDelta) -> VoteCounters {
        let upvotes = Self::clamp("upvotes", counters.upvotes + delta.upvotes);
        let downvotes = Self::clamp("downvotes", counters.downvotes + delta.downvotes);
        VoteCounters::new(upvotes, downvotes)
    }

    fn clamp(field: &'static str, value: i64) -> i64 {
        if value < 0 {
            warn!(field, value, "Vote counter went negative, clamping to 0");
            0
        } else {
            value
        }
    }

    /// `score / (ageHours + 2)^1.8`, with age measured at `now`
    pub fn hot_score(score: i64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let age_ms = (now - created_at).num_milliseconds().max(0);
        let age_hours = age_ms as f64 / Self::MILLIS_PER_HOUR;
        score as f64 / (age_hours + Self::AGE_OFFSET_HOURS).powf(Self::GRAVITY)
    }
}
