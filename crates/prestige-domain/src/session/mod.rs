use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::account::UserProfile;
use crate::shared::{DomainError, UserId};

/// Session value object
/// Bearer token plus the profile of the user it belongs to.
///
/// Lives only as long as the process; nothing here is written to disk.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    token: String,
    expires_at: Option<DateTime<Utc>>,
    user: UserProfile,
}

impl Session {
    pub fn new(
        token: String,
        expires_at: Option<DateTime<Utc>>,
        user: UserProfile,
    ) -> Result<Self, DomainError> {
        if token.trim().is_empty() {
            return Err(DomainError::Validation(
                "Session token cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            token,
            expires_at,
            user,
        })
    }

    /// Session rebuilt from a bare token, before the profile is known.
    /// The profile stays empty until the first `current_user` lookup.
    pub fn from_token(token: String) -> Result<Self, DomainError> {
        let user = UserProfile {
            id: UserId::from_string(""),
            username: String::new(),
            email: String::new(),
            points: 0,
            prestige_tickets: 0,
            referral_code: None,
            is_admin: false,
        };
        Self::new(token, None, user)
    }

    /// Valid when the server gave no expiry or the expiry is still ahead
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires| now < expires)
    }

    /// Check if session will expire within the given number of minutes
    pub fn expires_within(&self, now: DateTime<Utc>, minutes: i64) -> bool {
        self.expires_at
            .is_some_and(|expires| expires < now + Duration::minutes(minutes))
    }

    /// Ensure the session can still be used for authenticated calls
    pub fn ensure_valid(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_valid_at(now) {
            Ok(())
        } else {
            Err(DomainError::ExpiredSession(format!(
                "session for {} expired, log in again",
                self.user.username
            )))
        }
    }

    pub fn replace_user(&mut self, user: UserProfile) {
        self.user = user;
    }

    // Getters
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user.username)
            .finish()
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token && self.expires_at == other.expires_at && self.user == other.user
    }
}
