//! User model

use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of synthesized usernames
pub const ANONYMOUS_PREFIX: &str = "anonymous_";

/// A participant, identified by a bare ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,
    /// Unique username
    pub username: String,
    /// When the user was created
    pub created_at: DateTime<Utc>,
    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a named user
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: username.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Synthesize an anonymous voter.
    /// Format: anonymous_YYYYMMDDHHMMSS_<short_uuid>
    pub fn anonymous(now: DateTime<Utc>) -> Self {
        let uuid = Uuid::new_v4();
        let short_uuid = &uuid.simple().to_string()[..8];
        Self {
            id: UserId(uuid),
            username: format!(
                "{}{}_{}",
                ANONYMOUS_PREFIX,
                now.format("%Y%m%d%H%M%S"),
                short_uuid
            ),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user was synthesized for an anonymous vote
    pub fn is_anonymous(&self) -> bool {
        self.username.starts_with(ANONYMOUS_PREFIX)
    }
}
