//! Vote eligibility and revote reconciliation

use super::model::{Vote, VoteDecision};
use crate::error::{PollboxError, Result};
use crate::poll::{PollDetails, PollType};
use crate::types::{OptionId, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Decides whether a ballot is accepted and which earlier rows it replaces.
///
/// Pure: reads the poll and the user's current rows, never touches storage.
/// The caller applies `retracted` and `accepted` in one transaction.
#[derive(Debug, Clone, Copy)]
pub struct VoteAdjudicator {
    now: DateTime<Utc>,
}

impl VoteAdjudicator {
    /// Adjudicate as of `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Adjudicate as of the current time
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Evaluate a ballot.
    ///
    /// `existing` holds the user's vote rows on this poll; rows for other
    /// polls or users are ignored.
    pub fn adjudicate(
        &self,
        poll: &PollDetails,
        existing: &[Vote],
        user_id: UserId,
        requested: &[OptionId],
    ) -> Result<VoteDecision> {
        self.check_open(poll)?;
        check_membership(poll, requested)?;
        check_cardinality(poll.poll.poll_type, requested)?;

        let prior: Vec<&Vote> = existing
            .iter()
            .filter(|v| v.poll_id == poll.poll.id && v.user_id == user_id)
            .collect();

        let retracted = match poll.poll.poll_type {
            PollType::Binary | PollType::Single => prior.iter().map(|v| v.id).collect(),
            PollType::Multi => {
                check_no_duplicates(&prior, requested)?;
                Vec::new()
            }
        };

        let accepted = requested
            .iter()
            .map(|option_id| Vote::new(poll.poll.id, *option_id, user_id, self.now))
            .collect();

        Ok(VoteDecision {
            accepted,
            retracted,
        })
    }

    /// End time is checked before the active flag.
    fn check_open(&self, poll: &PollDetails) -> Result<()> {
        if poll.poll.has_ended(self.now) {
            return Err(PollboxError::PollEnded(poll.poll.id));
        }
        if !poll.poll.is_active {
            return Err(PollboxError::PollInactive(poll.poll.id));
        }
        Ok(())
    }
}

fn check_membership(poll: &PollDetails, requested: &[OptionId]) -> Result<()> {
    match requested.iter().find(|id| !poll.has_option(id)) {
        Some(option) => Err(PollboxError::OptionNotInPoll {
            poll: poll.poll.id,
            option: *option,
        }),
        None => Ok(()),
    }
}

fn check_cardinality(poll_type: PollType, requested: &[OptionId]) -> Result<()> {
    if poll_type.accepts_selection_count(requested.len()) {
        Ok(())
    } else {
        Err(PollboxError::WrongSelectionCount {
            poll_type,
            count: requested.len(),
        })
    }
}

/// Multi polls allow one row per option: reject options already voted for
/// or listed twice in the same ballot.
fn check_no_duplicates(prior: &[&Vote], requested: &[OptionId]) -> Result<()> {
    let mut seen: HashSet<OptionId> = prior.iter().map(|v| v.option_id).collect();
    for option in requested {
        if !seen.insert(*option) {
            return Err(PollboxError::DuplicateSelection(*option));
        }
    }
    Ok(())
}
