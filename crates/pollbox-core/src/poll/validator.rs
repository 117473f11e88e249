//! Poll validation

use super::model::{NewPoll, Poll, PollType, PollUpdate, MIN_OPTIONS};
use crate::config::PollConfig;
use crate::error::{PollboxError, Result};

/// Maximum option label length
pub const MAX_OPTION_LENGTH: usize = 200;

/// Validator for poll input and option-set rules
pub struct PollValidator {
    binary_labels: [String; 2],
    max_title_length: usize,
}

impl PollValidator {
    /// Create a validator from configuration
    pub fn new(config: &PollConfig) -> Self {
        Self {
            binary_labels: config.binary_labels.clone(),
            max_title_length: config.max_title_length,
        }
    }

    /// Validate a poll title
    pub fn validate_title(&self, title: &str) -> Result<()> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(PollboxError::Validation(
                "Poll title cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > self.max_title_length {
            return Err(PollboxError::Validation(format!(
                "Poll title exceeds maximum length of {} characters",
                self.max_title_length
            )));
        }

        Ok(())
    }

    /// Validate an option label
    pub fn validate_option_text(&self, text: &str) -> Result<()> {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(PollboxError::Validation(
                "Option text cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > MAX_OPTION_LENGTH {
            return Err(PollboxError::Validation(format!(
                "Option text exceeds maximum length of {} characters",
                MAX_OPTION_LENGTH
            )));
        }

        Ok(())
    }

    /// Validate creation input and return the option labels to create.
    ///
    /// Binary polls always get the two configured labels, whatever the input listed.
    pub fn validate_new_poll(&self, input: &NewPoll) -> Result<Vec<String>> {
        self.validate_title(&input.title)?;

        if input.poll_type == PollType::Binary {
            return Ok(self.binary_labels.to_vec());
        }

        if input.options.len() < MIN_OPTIONS {
            return Err(PollboxError::Validation(format!(
                "A {} poll needs at least {} options, got {}",
                input.poll_type,
                MIN_OPTIONS,
                input.options.len()
            )));
        }

        for text in &input.options {
            self.validate_option_text(text)?;
        }

        Ok(input.options.iter().map(|t| t.trim().to_string()).collect())
    }

    /// Validate a partial update
    pub fn validate_update(&self, update: &PollUpdate) -> Result<()> {
        if let Some(title) = &update.title {
            self.validate_title(title)?;
        }
        Ok(())
    }

    /// Reject any change to the option set of a binary poll
    pub fn ensure_options_mutable(&self, poll: &Poll) -> Result<()> {
        if poll.is_binary() {
            return Err(PollboxError::BinaryPollImmutable(poll.id));
        }
        Ok(())
    }

    /// Reject deleting an option when the poll would drop below the minimum
    pub fn ensure_can_remove_option(&self, poll: &Poll, current_count: usize) -> Result<()> {
        self.ensure_options_mutable(poll)?;

        if current_count <= MIN_OPTIONS {
            return Err(PollboxError::OptionCountFloor {
                poll: poll.id,
                minimum: MIN_OPTIONS,
            });
        }

        Ok(())
    }
}

impl Default for PollValidator {
    fn default() -> Self {
        Self::new(&PollConfig::default())
    }
}
