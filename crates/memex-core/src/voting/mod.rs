//! Voting: the vote ledger and score aggregation

mod ledger;
mod score;

pub use ledger::{CastVote, ScoredSubject, VoteLedger, VoteTransition};
pub use score::{ScoreAggregator, VoteDelta};
