//! Poll service: every operation runs in one storage transaction

use super::stats::{self, PollResults, PollStats, TrendingPoll, UserStats};
use crate::comment::{build_tree, CascadePolicy, Comment, CommentNode, CommentValidator, NewComment};
use crate::config::Config;
use crate::error::{PollboxError, Result};
use crate::poll::{NewPoll, Poll, PollDetails, PollOption, PollUpdate, PollValidator};
use crate::store::{CommentStore, Dataset, PollStore, Storage, UserStore, VoteStore};
use crate::types::{CommentId, OptionId, PollId, UserId};
use crate::user::User;
use crate::vote::{Vote, VoteAdjudicator};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of an accepted ballot
#[derive(Debug, Clone, Serialize)]
pub struct VoteReceipt {
    /// Voter; freshly synthesized when none was supplied
    pub user_id: UserId,
    /// The anonymous user created for this ballot, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_user: Option<User>,
    /// Rows inserted
    pub votes: Vec<Vote>,
    /// Number of earlier rows replaced
    pub retracted: usize,
}

/// A user's votes on one poll with the options they point at
#[derive(Debug, Clone, Serialize)]
pub struct UserVotes {
    pub votes: Vec<Vote>,
    pub options: Vec<PollOption>,
}

/// Service for polls, votes, comments and users
pub struct PollService {
    /// Storage backend
    storage: Arc<dyn Storage>,
    config: Config,
    polls: PollValidator,
    comments: CommentValidator,
}

impl PollService {
    /// Create a new service with the given storage
    pub fn new(storage: impl Storage + 'static, config: Config) -> Self {
        Self::with_storage(Arc::new(storage), config)
    }

    /// Create a new service with shared storage
    pub fn with_storage(storage: Arc<dyn Storage>, config: Config) -> Self {
        Self {
            polls: PollValidator::new(&config.poll),
            comments: CommentValidator::with_max_length(config.comment.max_length),
            storage,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get access to the underlying storage
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    // Polls

    /// Create a poll with its options
    pub fn create_poll(&self, input: NewPoll) -> Result<PollDetails> {
        let labels = self.polls.validate_new_poll(&input)?;
        let poll = Poll::new(
            input.title.trim(),
            input.description,
            input.poll_type,
            input.end_time,
        );
        let options: Vec<PollOption> = labels
            .into_iter()
            .map(|text| PollOption::new(poll.id, text))
            .collect();

        self.storage.transaction(|data| {
            data.insert_poll(poll.clone());
            for option in &options {
                data.insert_option(option.clone());
            }
            Ok(())
        })?;

        info!("Created {} poll {} with {} options", poll.poll_type, poll.id, options.len());
        Ok(PollDetails { poll, options })
    }

    /// Get a poll with its options
    pub fn get_poll(&self, id: &PollId) -> Result<PollDetails> {
        self.storage.read(|data| data.get_poll_details(id))
    }

    /// List all polls with their options
    pub fn list_polls(&self) -> Result<Vec<PollDetails>> {
        self.storage.read(|data| {
            data.list_polls()
                .iter()
                .map(|p| data.get_poll_details(&p.id))
                .collect()
        })
    }

    /// Update title, description, end time or active flag
    pub fn update_poll(&self, id: &PollId, update: PollUpdate) -> Result<PollDetails> {
        self.polls.validate_update(&update)?;

        let details = self.storage.transaction(|data| {
            let mut poll = data.get_poll(id)?;
            update.clone().apply(&mut poll);
            poll.touch();
            data.update_poll(poll)?;
            data.get_poll_details(id)
        })?;

        debug!("Updated poll {}", id);
        Ok(details)
    }

    /// Delete a poll with its options, votes and comments
    pub fn delete_poll(&self, id: &PollId) -> Result<Poll> {
        let poll = self.storage.transaction(|data| data.delete_poll(id))?;
        info!("Deleted poll {}", id);
        Ok(poll)
    }

    // Options

    /// Append an option to a single or multi poll
    pub fn add_option(&self, poll_id: &PollId, text: &str) -> Result<PollOption> {
        let option = self.storage.transaction(|data| {
            let poll = data.get_poll(poll_id)?;
            self.polls.ensure_options_mutable(&poll)?;
            self.polls.validate_option_text(text)?;

            let option = PollOption::new(poll.id, text.trim());
            data.insert_option(option.clone());
            Ok(option)
        })?;

        debug!("Added option {} to poll {}", option.id, poll_id);
        Ok(option)
    }

    /// Relabel an option of a single or multi poll
    pub fn update_option(
        &self,
        poll_id: &PollId,
        option_id: &OptionId,
        text: &str,
    ) -> Result<PollOption> {
        self.storage.transaction(|data| {
            let (poll, mut option) = option_of(data, poll_id, option_id)?;
            self.polls.ensure_options_mutable(&poll)?;
            self.polls.validate_option_text(text)?;

            option.update_text(text.trim());
            data.update_option(option.clone())?;
            Ok(option)
        })
    }

    /// Delete an option and its votes; returns the number of votes removed.
    ///
    /// The remaining-count check and the cascade run in one transaction, so
    /// concurrent deletions cannot take a poll below two options.
    pub fn delete_option(&self, poll_id: &PollId, option_id: &OptionId) -> Result<usize> {
        let removed = self.storage.transaction(|data| {
            let (poll, option) = option_of(data, poll_id, option_id)?;
            self.polls
                .ensure_can_remove_option(&poll, data.count_options(&poll.id))?;
            data.delete_option(&option.id)
        })?;

        info!("Deleted option {} from poll {} ({} votes removed)", option_id, poll_id, removed);
        Ok(removed)
    }

    // Votes

    /// Cast a ballot.
    ///
    /// Without a user ID an anonymous user is synthesized first. User
    /// creation, retraction of replaced rows and insertion of new rows
    /// commit together or not at all.
    pub fn cast_vote(
        &self,
        poll_id: &PollId,
        user_id: Option<UserId>,
        option_ids: &[OptionId],
    ) -> Result<VoteReceipt> {
        let receipt = self.storage.transaction(|data| {
            let poll = data.get_poll_details(poll_id)?;
            let now = Utc::now();

            let (user_id, created_user) = match user_id {
                Some(id) => (id, None),
                None => {
                    let user = User::anonymous(now);
                    data.insert_user(user.clone());
                    (user.id, Some(user))
                }
            };

            let existing = data.find_votes(poll_id, &user_id);
            let decision =
                VoteAdjudicator::new(now).adjudicate(&poll, &existing, user_id, option_ids)?;

            for vote_id in &decision.retracted {
                data.delete_vote(vote_id)?;
            }
            for vote in &decision.accepted {
                data.insert_vote(vote.clone());
            }

            Ok(VoteReceipt {
                user_id,
                created_user,
                retracted: decision.retracted.len(),
                votes: decision.accepted,
            })
        })?;

        info!(
            "User {} cast {} vote(s) on poll {} ({} replaced)",
            receipt.user_id,
            receipt.votes.len(),
            poll_id,
            receipt.retracted
        );
        Ok(receipt)
    }

    /// A user's current votes on a poll
    pub fn user_votes(&self, poll_id: &PollId, user_id: &UserId) -> Result<UserVotes> {
        self.storage.read(|data| {
            data.get_poll(poll_id)?;
            let votes = data.find_votes(poll_id, user_id);
            let options = votes
                .iter()
                .map(|v| data.get_option(&v.option_id))
                .collect::<Result<Vec<_>>>()?;
            Ok(UserVotes { votes, options })
        })
    }

    // Comments

    /// Post a comment or reply
    pub fn add_comment(&self, poll_id: &PollId, input: NewComment) -> Result<Comment> {
        self.comments.validate_content(&input.content)?;

        let comment = self.storage.transaction(|data| {
            data.get_poll(poll_id)?;
            data.get_user(&input.user_id)?;
            if let Some(parent_id) = &input.parent_id {
                let parent = data.get_comment(parent_id)?;
                self.comments.validate_parent(&parent, *poll_id)?;
            }

            let comment = Comment::new(
                *poll_id,
                input.user_id,
                input.content.trim(),
                input.parent_id,
            );
            data.insert_comment(comment.clone());
            Ok(comment)
        })?;

        debug!("Added comment {} on poll {}", comment.id, poll_id);
        Ok(comment)
    }

    /// Comments of a poll as a reply tree, newest first
    pub fn comment_tree(&self, poll_id: &PollId) -> Result<Vec<CommentNode>> {
        self.storage.read(|data| {
            data.get_poll(poll_id)?;
            Ok(build_tree(data.list_comments(poll_id)))
        })
    }

    /// Edit a comment; only its author may
    pub fn update_comment(
        &self,
        poll_id: &PollId,
        comment_id: &CommentId,
        user_id: &UserId,
        content: &str,
    ) -> Result<Comment> {
        self.comments.validate_content(content)?;

        self.storage.transaction(|data| {
            let mut comment = comment_of(data, poll_id, comment_id)?;
            self.comments.validate_author(&comment, *user_id)?;

            comment.update_content(content.trim());
            data.update_comment(comment.clone())?;
            Ok(comment)
        })
    }

    /// Delete a comment and its replies according to the configured policy.
    /// Returns every deleted ID, the comment itself first.
    pub fn delete_comment(
        &self,
        poll_id: &PollId,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<Vec<CommentId>> {
        let policy = self.config.comment.cascade;

        let deleted = self.storage.transaction(|data| {
            let comment = comment_of(data, poll_id, comment_id)?;
            self.comments.validate_author(&comment, *user_id)?;

            let mut deleted = vec![data.delete_comment(comment_id)?.id];
            match policy {
                CascadePolicy::DirectReplies => {
                    deleted.extend(data.delete_comments_by_parent(comment_id));
                }
                CascadePolicy::Recursive => {
                    let mut frontier = vec![*comment_id];
                    while let Some(parent) = frontier.pop() {
                        let children = data.delete_comments_by_parent(&parent);
                        frontier.extend(children.iter().copied());
                        deleted.extend(children);
                    }
                }
            }
            Ok(deleted)
        })?;

        info!("Deleted comment {} with {} repl(ies)", comment_id, deleted.len() - 1);
        Ok(deleted)
    }

    // Users

    /// Register a named user
    pub fn create_user(&self, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(PollboxError::Validation(
                "Username cannot be empty".to_string(),
            ));
        }

        let user = self.storage.transaction(|data| {
            if data.find_user_by_username(username).is_some() {
                return Err(PollboxError::Validation(format!(
                    "Username '{}' is already taken",
                    username
                )));
            }
            let user = User::new(username);
            data.insert_user(user.clone());
            Ok(user)
        })?;

        debug!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Get a user by ID
    pub fn get_user(&self, id: &UserId) -> Result<User> {
        self.storage.read(|data| data.get_user(id))
    }

    /// Get a user by username
    pub fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.storage.read(|data| {
            data.find_user_by_username(username)
                .ok_or_else(|| PollboxError::UserNotFound(username.to_string()))
        })
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.storage.read(|data| Ok(data.list_users()))
    }

    // Statistics

    /// Vote counts per option
    pub fn poll_results(&self, id: &PollId) -> Result<PollResults> {
        self.storage.read(|data| stats::poll_results(data, id))
    }

    /// Detailed statistics of a poll
    pub fn poll_stats(&self, id: &PollId) -> Result<PollStats> {
        self.storage.read(|data| stats::poll_stats(data, id))
    }

    /// Polls with the most recent votes
    pub fn trending_polls(&self) -> Result<Vec<TrendingPoll>> {
        let days = self.config.stats.trending_window_days;
        let since = Duration::try_days(days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| {
                PollboxError::Validation(format!("trending window of {} days is out of range", days))
            })?;
        let limit = self.config.stats.trending_limit;
        self.storage
            .read(|data| Ok(stats::trending_polls(data, since, limit)))
    }

    /// Voting summary of a user
    pub fn user_stats(&self, id: &UserId) -> Result<UserStats> {
        let limit = self.config.stats.recent_votes_limit;
        self.storage.read(|data| stats::user_stats(data, id, limit))
    }
}

/// Resolve an option addressed through its poll
fn option_of(data: &Dataset, poll_id: &PollId, option_id: &OptionId) -> Result<(Poll, PollOption)> {
    let poll = data.get_poll(poll_id)?;
    let option = data.get_option(option_id)?;
    if option.poll_id != poll.id {
        return Err(PollboxError::OptionNotInPoll {
            poll: poll.id,
            option: option.id,
        });
    }
    Ok((poll, option))
}

/// Resolve a comment addressed through its poll
fn comment_of(data: &Dataset, poll_id: &PollId, comment_id: &CommentId) -> Result<Comment> {
    let comment = data.get_comment(comment_id)?;
    if &comment.poll_id != poll_id {
        return Err(PollboxError::CommentNotFound(*comment_id));
    }
    Ok(comment)
}
