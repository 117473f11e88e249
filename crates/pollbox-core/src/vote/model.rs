//! Vote data models

use crate::types::{OptionId, PollId, UserId, VoteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One vote row: a user's selection of one option on one poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Unique vote identifier
    pub id: VoteId,
    /// Poll voted on
    pub poll_id: PollId,
    /// Selected option
    pub option_id: OptionId,
    /// Voter
    pub user_id: UserId,
    /// When the vote was cast
    pub created_at: DateTime<Utc>,
}

impl Vote {
    /// Create a new vote row
    pub fn new(
        poll_id: PollId,
        option_id: OptionId,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: VoteId::new(),
            poll_id,
            option_id,
            user_id,
            created_at,
        }
    }
}

/// Criteria for counting or listing votes; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct VoteFilter {
    pub poll_id: Option<PollId>,
    pub option_id: Option<OptionId>,
    pub user_id: Option<UserId>,
    /// Only votes created strictly after this instant
    pub since: Option<DateTime<Utc>>,
}

impl VoteFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a poll
    pub fn with_poll(mut self, poll_id: PollId) -> Self {
        self.poll_id = Some(poll_id);
        self
    }

    /// Restrict to an option
    pub fn with_option(mut self, option_id: OptionId) -> Self {
        self.option_id = Some(option_id);
        self
    }

    /// Restrict to a user
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restrict to votes after an instant
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Check if a vote matches this filter
    pub fn matches(&self, vote: &Vote) -> bool {
        self.poll_id.map_or(true, |id| vote.poll_id == id)
            && self.option_id.map_or(true, |id| vote.option_id == id)
            && self.user_id.map_or(true, |id| vote.user_id == id)
            && self.since.map_or(true, |since| vote.created_at > since)
    }
}

/// Outcome of an accepted ballot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteDecision {
    /// New rows to insert
    pub accepted: Vec<Vote>,
    /// Prior rows to delete
    pub retracted: Vec<VoteId>,
}

impl VoteDecision {
    /// Whether the ballot replaces earlier votes
    pub fn is_revote(&self) -> bool {
        !self.retracted.is_empty()
    }
}
