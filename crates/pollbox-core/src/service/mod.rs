//! Poll service module
//!
//! Orchestrates validation, adjudication and storage transactions, and
//! computes result statistics.

mod manager;
pub mod stats;

pub use manager::{PollService, UserVotes, VoteReceipt};
pub use stats::{OptionCount, OptionStat, PollResults, PollStats, TrendingPoll, UserStats};
