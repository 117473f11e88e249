//! Error types for pollbox

use crate::poll::PollType;
use crate::types::{CommentId, OptionId, PollId, UserId};
use thiserror::Error;

/// Main error type for pollbox
#[derive(Debug, Error)]
pub enum PollboxError {
    /// Poll not found
    #[error("Poll not found: {0}")]
    PollNotFound(PollId),

    /// Option not found
    #[error("Option not found: {0}")]
    OptionNotFound(OptionId),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Poll has been closed by its owner
    #[error("Poll is not active: {0}")]
    PollInactive(PollId),

    /// Poll end time has passed
    #[error("Poll has ended: {0}")]
    PollEnded(PollId),

    /// A requested option does not belong to the poll
    #[error("Option {option} does not belong to poll {poll}")]
    OptionNotInPoll { poll: PollId, option: OptionId },

    /// Number of selected options does not fit the poll type
    #[error("A {poll_type} poll does not accept {count} selected option(s)")]
    WrongSelectionCount { poll_type: PollType, count: usize },

    /// User already voted for this option on a multi poll
    #[error("Option {0} has already been voted for")]
    DuplicateSelection(OptionId),

    /// Deleting the option would leave the poll with too few options
    #[error("Poll {poll} must keep at least {minimum} options")]
    OptionCountFloor { poll: PollId, minimum: usize },

    /// Binary polls have a fixed option set
    #[error("Options of binary poll {0} cannot be changed")]
    BinaryPollImmutable(PollId),

    /// Unknown poll type string
    #[error("Invalid poll type: {0}")]
    InvalidPollType(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller is not allowed to act on the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PollboxError>,
    },
}

/// Broad error category, used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced entity does not exist
    NotFound,
    /// The request itself is malformed or violates a fixed rule
    Validation,
    /// The request conflicts with the current state of the data
    StateConflict,
    /// The caller may not perform the operation
    Forbidden,
    /// The storage layer failed
    Storage,
}

impl PollboxError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PollboxError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PollboxError::PollNotFound(_)
            | PollboxError::OptionNotFound(_)
            | PollboxError::CommentNotFound(_)
            | PollboxError::UserNotFound(_) => ErrorKind::NotFound,
            PollboxError::OptionNotInPoll { .. }
            | PollboxError::WrongSelectionCount { .. }
            | PollboxError::BinaryPollImmutable(_)
            | PollboxError::InvalidPollType(_)
            | PollboxError::Validation(_) => ErrorKind::Validation,
            PollboxError::PollInactive(_)
            | PollboxError::PollEnded(_)
            | PollboxError::DuplicateSelection(_)
            | PollboxError::OptionCountFloor { .. } => ErrorKind::StateConflict,
            PollboxError::Forbidden(_) => ErrorKind::Forbidden,
            PollboxError::Io(_)
            | PollboxError::Serde(_)
            | PollboxError::Toml(_)
            | PollboxError::Storage(_)
            | PollboxError::UnsupportedSchemaVersion(_) => ErrorKind::Storage,
            PollboxError::WithContext { source, .. } => source.kind(),
        }
    }
}

/// Result type alias for pollbox
pub type Result<T> = std::result::Result<T, PollboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = PollId::new();
        let err = PollboxError::PollEnded(id);
        assert_eq!(err.to_string(), format!("Poll has ended: {}", id));

        let err = PollboxError::WrongSelectionCount {
            poll_type: PollType::Single,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "A single poll does not accept 2 selected option(s)"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = PollboxError::Validation("empty title".to_string());
        let err = err.with_context("Failed to create poll");
        assert!(err.to_string().contains("Failed to create poll"));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_error_kinds() {
        let poll = PollId::new();
        assert_eq!(PollboxError::PollNotFound(poll).kind(), ErrorKind::NotFound);
        assert_eq!(PollboxError::PollInactive(poll).kind(), ErrorKind::StateConflict);
        assert_eq!(
            PollboxError::OptionCountFloor { poll, minimum: 2 }.kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(PollboxError::BinaryPollImmutable(poll).kind(), ErrorKind::Validation);
        assert_eq!(PollboxError::Forbidden("x".into()).kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PollboxError = io_err.into();
        assert!(matches!(err, PollboxError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}
