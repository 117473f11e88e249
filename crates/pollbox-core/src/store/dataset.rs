//! In-memory table set implementing the store traits

use super::{CommentStore, PollStore, UserStore, VoteStore};
use crate::comment::Comment;
use crate::error::{PollboxError, Result};
use crate::poll::{Poll, PollOption};
use crate::types::{CommentId, OptionId, PollId, UserId, VoteId};
use crate::user::User;
use crate::vote::{Vote, VoteFilter};
use serde::{Deserialize, Serialize};

/// Every persisted row, one vector per table, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    polls: Vec<Poll>,
    #[serde(default)]
    options: Vec<PollOption>,
    #[serde(default)]
    votes: Vec<Vote>,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    users: Vec<User>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored polls
    pub fn poll_count(&self) -> usize {
        self.polls.len()
    }

    /// Number of stored vote rows
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// Number of stored comments
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

impl PollStore for Dataset {
    fn get_poll(&self, id: &PollId) -> Result<Poll> {
        self.polls
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or(PollboxError::PollNotFound(*id))
    }

    fn list_polls(&self) -> Vec<Poll> {
        self.polls.clone()
    }

    fn insert_poll(&mut self, poll: Poll) {
        self.polls.push(poll);
    }

    fn update_poll(&mut self, poll: Poll) -> Result<()> {
        let slot = self
            .polls
            .iter_mut()
            .find(|p| p.id == poll.id)
            .ok_or(PollboxError::PollNotFound(poll.id))?;
        *slot = poll;
        Ok(())
    }

    fn delete_poll(&mut self, id: &PollId) -> Result<Poll> {
        let pos = self
            .polls
            .iter()
            .position(|p| &p.id == id)
            .ok_or(PollboxError::PollNotFound(*id))?;

        self.votes.retain(|v| &v.poll_id != id);
        self.options.retain(|o| &o.poll_id != id);
        self.comments.retain(|c| &c.poll_id != id);
        Ok(self.polls.remove(pos))
    }

    fn list_options(&self, poll_id: &PollId) -> Vec<PollOption> {
        self.options
            .iter()
            .filter(|o| &o.poll_id == poll_id)
            .cloned()
            .collect()
    }

    fn count_options(&self, poll_id: &PollId) -> usize {
        self.options.iter().filter(|o| &o.poll_id == poll_id).count()
    }

    fn get_option(&self, id: &OptionId) -> Result<PollOption> {
        self.options
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or(PollboxError::OptionNotFound(*id))
    }

    fn insert_option(&mut self, option: PollOption) {
        self.options.push(option);
    }

    fn update_option(&mut self, option: PollOption) -> Result<()> {
        let slot = self
            .options
            .iter_mut()
            .find(|o| o.id == option.id)
            .ok_or(PollboxError::OptionNotFound(option.id))?;
        *slot = option;
        Ok(())
    }

    fn delete_option(&mut self, id: &OptionId) -> Result<usize> {
        let pos = self
            .options
            .iter()
            .position(|o| &o.id == id)
            .ok_or(PollboxError::OptionNotFound(*id))?;

        let before = self.votes.len();
        self.votes.retain(|v| &v.option_id != id);
        self.options.remove(pos);
        Ok(before - self.votes.len())
    }
}

impl VoteStore for Dataset {
    fn find_votes(&self, poll_id: &PollId, user_id: &UserId) -> Vec<Vote> {
        self.list_votes(&VoteFilter::new().with_poll(*poll_id).with_user(*user_id))
    }

    fn insert_vote(&mut self, vote: Vote) {
        self.votes.push(vote);
    }

    fn delete_vote(&mut self, id: &VoteId) -> Result<()> {
        let pos = self
            .votes
            .iter()
            .position(|v| &v.id == id)
            .ok_or_else(|| PollboxError::Storage(format!("Vote not found: {}", id)))?;
        self.votes.remove(pos);
        Ok(())
    }

    fn list_votes(&self, filter: &VoteFilter) -> Vec<Vote> {
        self.votes
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect()
    }

    fn count_votes(&self, filter: &VoteFilter) -> usize {
        self.votes.iter().filter(|v| filter.matches(v)).count()
    }
}

impl CommentStore for Dataset {
    fn list_comments(&self, poll_id: &PollId) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| &c.poll_id == poll_id)
            .cloned()
            .collect();
        // stable: equal timestamps keep insertion order
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments
    }

    fn get_comment(&self, id: &CommentId) -> Result<Comment> {
        self.comments
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or(PollboxError::CommentNotFound(*id))
    }

    fn insert_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    fn update_comment(&mut self, comment: Comment) -> Result<()> {
        let slot = self
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(PollboxError::CommentNotFound(comment.id))?;
        *slot = comment;
        Ok(())
    }

    fn delete_comment(&mut self, id: &CommentId) -> Result<Comment> {
        let pos = self
            .comments
            .iter()
            .position(|c| &c.id == id)
            .ok_or(PollboxError::CommentNotFound(*id))?;
        Ok(self.comments.remove(pos))
    }

    fn delete_comments_by_parent(&mut self, parent_id: &CommentId) -> Vec<CommentId> {
        let mut deleted = Vec::new();
        self.comments.retain(|c| {
            if c.parent_id.as_ref() == Some(parent_id) {
                deleted.push(c.id);
                false
            } else {
                true
            }
        });
        deleted
    }
}

impl UserStore for Dataset {
    fn insert_user(&mut self, user: User) {
        self.users.push(user);
    }

    fn get_user(&self, id: &UserId) -> Result<User> {
        self.users
            .iter()
            .find(|u| &u.id == id)
            .cloned()
            .ok_or_else(|| PollboxError::UserNotFound(id.to_string()))
    }

    fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.users.iter().find(|u| u.username == username).cloned()
    }

    fn list_users(&self) -> Vec<User> {
        self.users.clone()
    }
}
