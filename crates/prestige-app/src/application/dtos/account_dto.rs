use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prestige_domain::session::Session;

/// Session expiring within this many minutes is flagged in the profile view
const EXPIRY_WARNING_MINUTES: i64 = 60 * 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub points: u64,
    pub prestige_tickets: u64,
    pub referral_code: Option<String>,
    pub is_admin: bool,
    pub session_expires_at: Option<String>,
    pub session_expires_soon: bool,
}

impl ProfileDto {
    pub fn from_session(session: &Session, now: DateTime<Utc>) -> Self {
        let user = session.user();
        Self {
            id: user.id.as_str().to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            points: user.points,
            prestige_tickets: user.prestige_tickets,
            referral_code: user.referral_code.clone(),
            is_admin: user.is_admin,
            session_expires_at: session.expires_at().map(|t| t.to_rfc3339()),
            session_expires_soon: session.expires_within(now, EXPIRY_WARNING_MINUTES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionDto {
    pub converted_points: u64,
    pub points: u64,
    pub prestige_tickets: u64,
}
