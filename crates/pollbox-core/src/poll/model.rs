//! Poll data models

use crate::error::PollboxError;
use crate::types::{OptionId, PollId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum number of options every poll keeps
pub const MIN_OPTIONS: usize = 2;

/// Kind of poll, which decides how many options a ballot may select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollType {
    /// Fixed two-option yes/no poll
    Binary,
    /// Exactly one choice among N
    Single,
    /// Any non-empty subset among N
    Multi,
}

impl PollType {
    /// Whether a ballot with `count` selected options is acceptable
    pub fn accepts_selection_count(&self, count: usize) -> bool {
        match self {
            PollType::Binary | PollType::Single => count == 1,
            PollType::Multi => count >= 1,
        }
    }

    /// Whether a new ballot replaces all previous votes of the user
    pub fn replaces_previous_votes(&self) -> bool {
        matches!(self, PollType::Binary | PollType::Single)
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            PollType::Binary => "binary",
            PollType::Single => "single",
            PollType::Multi => "multi",
        }
    }
}

impl fmt::Display for PollType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PollType {
    type Err = PollboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(PollType::Binary),
            "single" => Ok(PollType::Single),
            "multi" => Ok(PollType::Multi),
            other => Err(PollboxError::InvalidPollType(other.to_string())),
        }
    }
}

/// A poll record, without its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    /// Unique poll identifier
    pub id: PollId,
    /// Poll title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Poll type
    #[serde(rename = "type")]
    pub poll_type: PollType,
    /// When the poll was created
    pub created_at: DateTime<Utc>,
    /// When the poll was last updated
    pub updated_at: DateTime<Utc>,
    /// When voting closes; `None` never closes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Whether the poll accepts votes
    pub is_active: bool,
}

impl Poll {
    /// Create a new active poll
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        poll_type: PollType,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PollId::new(),
            title: title.into(),
            description: description.into(),
            poll_type,
            created_at: now,
            updated_at: now,
            end_time,
            is_active: true,
        }
    }

    /// Whether the end time lies strictly before `now`
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end_time.is_some_and(|end| end < now)
    }

    /// Whether the option set is frozen
    pub fn is_binary(&self) -> bool {
        self.poll_type == PollType::Binary
    }

    /// Mark poll as updated
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One selectable option of a poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    /// Unique option identifier
    pub id: OptionId,
    /// Owning poll
    pub poll_id: PollId,
    /// Option label
    pub text: String,
    /// When the option was created
    pub created_at: DateTime<Utc>,
    /// When the option was last updated
    pub updated_at: DateTime<Utc>,
}

impl PollOption {
    /// Create a new option for a poll
    pub fn new(poll_id: PollId, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: OptionId::new(),
            poll_id,
            text: text.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the label and refresh updated_at
    pub fn update_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.updated_at = Utc::now();
    }
}

/// A poll together with its ordered options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollDetails {
    #[serde(flatten)]
    pub poll: Poll,
    pub options: Vec<PollOption>,
}

impl PollDetails {
    /// Check if an option belongs to this poll
    pub fn has_option(&self, option_id: &OptionId) -> bool {
        self.options.iter().any(|o| &o.id == option_id)
    }

    /// Look up an option by ID
    pub fn option(&self, option_id: &OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| &o.id == option_id)
    }
}

/// Input for creating a poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPoll {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub poll_type: PollType,
    /// Option labels; ignored for binary polls
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl NewPoll {
    /// Create input with the required fields
    pub fn new(title: impl Into<String>, poll_type: PollType) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            poll_type,
            options: Vec::new(),
            end_time: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append an option label
    pub fn with_option(mut self, text: impl Into<String>) -> Self {
        self.options.push(text.into());
        self
    }

    /// Set the end time
    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

/// Partial update of a poll; `None` fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl PollUpdate {
    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.end_time.is_none()
            && self.is_active.is_none()
    }

    /// Apply the update to a poll
    pub fn apply(self, poll: &mut Poll) {
        if let Some(title) = self.title {
            poll.title = title;
        }
        if let Some(description) = self.description {
            poll.description = description;
        }
        if let Some(end_time) = self.end_time {
            poll.end_time = Some(end_time);
        }
        if let Some(is_active) = self.is_active {
            poll.is_active = is_active;
        }
        poll.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_poll_type_parsing() {
        assert_eq!("binary".parse::<PollType>().unwrap(), PollType::Binary);
        assert_eq!("multi".parse::<PollType>().unwrap(), PollType::Multi);

        let err = "ranked".parse::<PollType>().unwrap_err();
        assert!(matches!(err, PollboxError::InvalidPollType(t) if t == "ranked"));
    }

    #[test]
    fn test_poll_type_selection_count() {
        assert!(PollType::Binary.accepts_selection_count(1));
        assert!(!PollType::Binary.accepts_selection_count(2));
        assert!(!PollType::Single.accepts_selection_count(0));
        assert!(!PollType::Multi.accepts_selection_count(0));
        assert!(PollType::Multi.accepts_selection_count(12));
    }

    #[test]
    fn test_poll_type_serde() {
        let json = serde_json::to_string(&PollType::Single).unwrap();
        assert_eq!(json, "\"single\"");
        assert!(serde_json::from_str::<PollType>("\"ranked\"").is_err());
    }

    #[test]
    fn test_has_ended() {
        let now = Utc::now();
        let mut poll = Poll::new("Lunch", "", PollType::Single, None);
        assert!(!poll.has_ended(now));

        poll.end_time = Some(now - Duration::minutes(1));
        assert!(poll.has_ended(now));

        poll.end_time = Some(now + Duration::minutes(1));
        assert!(!poll.has_ended(now));
    }

    #[test]
    fn test_poll_update() {
        let mut poll = Poll::new("Lunch", "", PollType::Single, None);
        let old_updated = poll.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));

        let update = PollUpdate {
            title: Some("Dinner".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply(&mut poll);

        assert_eq!(poll.title, "Dinner");
        assert!(!poll.is_active);
        assert_eq!(poll.description, "");
        assert!(poll.updated_at > old_updated);
    }

    #[test]
    fn test_poll_details_serializes_flat() {
        let poll = Poll::new("Lunch", "", PollType::Binary, None);
        let options = vec![
            PollOption::new(poll.id, "Yes"),
            PollOption::new(poll.id, "No"),
        ];
        let details = PollDetails { poll, options };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["type"], "binary");
        assert_eq!(json["options"].as_array().unwrap().len(), 2);
        assert!(json.get("end_time").is_none());
    }
}
