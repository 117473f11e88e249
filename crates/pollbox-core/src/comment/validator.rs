//! Comment validation

use super::model::Comment;
use crate::error::{PollboxError, Result};
use crate::types::{PollId, UserId};

/// Maximum comment length (default)
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Minimum comment length
pub const MIN_COMMENT_LENGTH: usize = 1;

/// Validator for comments
pub struct CommentValidator {
    max_length: usize,
    min_length: usize,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: MAX_COMMENT_LENGTH,
            min_length: MIN_COMMENT_LENGTH,
        }
    }

    /// Create a new validator with custom max length
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            min_length: MIN_COMMENT_LENGTH,
        }
    }

    /// Validate comment content
    pub fn validate_content(&self, content: &str) -> Result<()> {
        let length = content.trim().chars().count();

        if length < self.min_length {
            return Err(PollboxError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        if length > self.max_length {
            return Err(PollboxError::Validation(format!(
                "Comment content exceeds maximum length of {} characters",
                self.max_length
            )));
        }

        Ok(())
    }

    /// A reply's parent must sit under the same poll
    pub fn validate_parent(&self, parent: &Comment, poll_id: PollId) -> Result<()> {
        if parent.poll_id != poll_id {
            return Err(PollboxError::Validation(format!(
                "Parent comment {} does not belong to poll {}",
                parent.id, poll_id
            )));
        }
        Ok(())
    }

    /// Only the author may edit or delete a comment
    pub fn validate_author(&self, comment: &Comment, user_id: UserId) -> Result<()> {
        if comment.user_id != user_id {
            return Err(PollboxError::Forbidden(format!(
                "User {} is not the author of comment {}",
                user_id, comment.id
            )));
        }
        Ok(())
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content() {
        let validator = CommentValidator::new();

        assert!(validator.validate_content("Valid comment").is_ok());
        assert!(validator.validate_content("").is_err());
        assert!(validator.validate_content("   ").is_err());
    }

    #[test]
    fn test_max_length() {
        let validator = CommentValidator::with_max_length(10);

        assert!(validator.validate_content("Short").is_ok());
        assert!(validator.validate_content("This is too long").is_err());
        // counted in characters, not bytes
        assert!(validator.validate_content("投票投票投票投票投票").is_ok());
    }

    #[test]
    fn test_validate_parent() {
        let validator = CommentValidator::new();
        let poll = PollId::new();
        let parent = Comment::new(poll, UserId::new(), "parent", None);

        assert!(validator.validate_parent(&parent, poll).is_ok());
        assert!(matches!(
            validator.validate_parent(&parent, PollId::new()),
            Err(PollboxError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_author() {
        let validator = CommentValidator::new();
        let author = UserId::new();
        let comment = Comment::new(PollId::new(), author, "mine", None);

        assert!(validator.validate_author(&comment, author).is_ok());
        assert!(matches!(
            validator.validate_author(&comment, UserId::new()),
            Err(PollboxError::Forbidden(_))
        ));
    }
}
