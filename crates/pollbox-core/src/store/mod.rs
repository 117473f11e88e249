//! Store interfaces and transactional storage
//!
//! The three stores (polls, votes, comments) plus users are traits over
//! [`Dataset`], the in-memory table set. A [`Storage`] backend hands out
//! consistent snapshots and applies closures over a `Dataset` atomically,
//! which is how multi-row changes (revote reconciliation, cascading deletes)
//! stay all-or-nothing.
//!
//! # Example
//!
//! ```ignore
//! use pollbox_core::store::{MemoryStorage, PollStore, Storage};
//!
//! let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
//! let count = storage.transaction(|data| Ok(data.count_options(&poll_id)))?;
//! ```

mod dataset;
pub mod migration;
mod persistence;

use crate::comment::Comment;
use crate::error::Result;
use crate::poll::{Poll, PollDetails, PollOption};
use crate::types::{CommentId, OptionId, PollId, UserId, VoteId};
use crate::user::User;
use crate::vote::{Vote, VoteFilter};

pub use dataset::Dataset;
pub use migration::{DatasetFile, DatasetMigrator, CURRENT_SCHEMA_VERSION};
pub use persistence::{MemoryStorage, Storage};

/// Polls and their options
pub trait PollStore {
    /// Get a poll by ID
    fn get_poll(&self, id: &PollId) -> Result<Poll>;

    /// Get a poll with its ordered options
    fn get_poll_details(&self, id: &PollId) -> Result<PollDetails> {
        let poll = self.get_poll(id)?;
        let options = self.list_options(id);
        Ok(PollDetails { poll, options })
    }

    /// List all polls in creation order
    fn list_polls(&self) -> Vec<Poll>;

    /// Insert a poll record
    fn insert_poll(&mut self, poll: Poll);

    /// Replace a stored poll record
    fn update_poll(&mut self, poll: Poll) -> Result<()>;

    /// Delete a poll with its options, votes and comments
    fn delete_poll(&mut self, id: &PollId) -> Result<Poll>;

    /// Options of a poll, in creation order
    fn list_options(&self, poll_id: &PollId) -> Vec<PollOption>;

    /// Number of options of a poll
    fn count_options(&self, poll_id: &PollId) -> usize;

    /// Get an option by ID
    fn get_option(&self, id: &OptionId) -> Result<PollOption>;

    /// Insert an option
    fn insert_option(&mut self, option: PollOption);

    /// Replace a stored option
    fn update_option(&mut self, option: PollOption) -> Result<()>;

    /// Delete an option and every vote referencing it; returns the number of votes removed
    fn delete_option(&mut self, id: &OptionId) -> Result<usize>;
}

/// Append-only vote rows
pub trait VoteStore {
    /// A user's votes on a poll
    fn find_votes(&self, poll_id: &PollId, user_id: &UserId) -> Vec<Vote>;

    /// Append a vote
    fn insert_vote(&mut self, vote: Vote);

    /// Delete a single vote row
    fn delete_vote(&mut self, id: &VoteId) -> Result<()>;

    /// Votes matching a filter, in insertion order
    fn list_votes(&self, filter: &VoteFilter) -> Vec<Vote>;

    /// Number of votes matching a filter
    fn count_votes(&self, filter: &VoteFilter) -> usize;
}

/// Flat comment records
pub trait CommentStore {
    /// Comments of a poll, newest first
    fn list_comments(&self, poll_id: &PollId) -> Vec<Comment>;

    /// Get a comment by ID
    fn get_comment(&self, id: &CommentId) -> Result<Comment>;

    /// Insert a comment
    fn insert_comment(&mut self, comment: Comment);

    /// Replace a stored comment
    fn update_comment(&mut self, comment: Comment) -> Result<()>;

    /// Delete one comment
    fn delete_comment(&mut self, id: &CommentId) -> Result<Comment>;

    /// Delete every comment whose parent is `parent_id`; returns their IDs
    fn delete_comments_by_parent(&mut self, parent_id: &CommentId) -> Vec<CommentId>;
}

/// Users
pub trait UserStore {
    /// Insert a user
    fn insert_user(&mut self, user: User);

    /// Get a user by ID
    fn get_user(&self, id: &UserId) -> Result<User>;

    /// Find a user by username
    fn find_user_by_username(&self, username: &str) -> Option<User>;

    /// List all users in creation order
    fn list_users(&self) -> Vec<User>;
}
