//! Voting module
//!
//! Vote rows and the adjudicator that decides which ballots are accepted.

pub mod adjudicator;
pub mod model;

pub use adjudicator::VoteAdjudicator;
pub use model::{Vote, VoteDecision, VoteFilter};
