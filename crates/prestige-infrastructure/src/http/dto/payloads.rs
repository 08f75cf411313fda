use log::warn;
use serde::{Deserialize, Serialize};

use prestige_domain::account::UserProfile;
use prestige_domain::competition::{Competition, CompetitionWindow};
use prestige_domain::daily_reward::LoginStreakState;
use prestige_domain::gateway::{ClaimReceipt, EntryReceipt};
use prestige_domain::leaderboard::LeaderboardEntry;
use prestige_domain::points::ConversionOutcome;
use prestige_domain::referral::ReferralSummary;
use prestige_domain::session::Session;
use prestige_domain::shared::{CompetitionId, UserId};

use super::primitives::{count_u32, count_u64, WireCount, WireId, WireTimestamp};
use crate::http::ApiError;

// ============================================================
// Request bodies
// ============================================================

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ConvertBody {
    pub points: u64,
}

// ============================================================
// Response payloads
// ============================================================

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(alias = "_id", alias = "userId")]
    pub id: Option<WireId>,
    #[serde(alias = "name", alias = "displayName")]
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "pointsBalance")]
    pub points: Option<WireCount>,
    #[serde(alias = "tickets", alias = "prestige_tickets")]
    pub prestige_tickets: Option<WireCount>,
    #[serde(alias = "referral_code")]
    pub referral_code: Option<String>,
    #[serde(alias = "admin")]
    pub is_admin: Option<bool>,
    pub role: Option<String>,
}

impl TryFrom<UserPayload> for UserProfile {
    type Error = ApiError;

    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        let id = payload
            .id
            .and_then(WireId::into_string)
            .ok_or_else(|| ApiError::InvalidRecord("user without id".to_string()))?;

        let email = payload.email.unwrap_or_default().trim().to_string();

        let username = payload
            .username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .or_else(|| {
                email
                    .split('@')
                    .next()
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
            .ok_or_else(|| ApiError::InvalidRecord(format!("user {} without a name", id)))?;

        let is_admin = payload.is_admin.unwrap_or(false)
            || payload
                .role
                .as_deref()
                .is_some_and(|role| role.eq_ignore_ascii_case("admin"));

        Ok(UserProfile {
            id: UserId::from_string(&id),
            username,
            email,
            points: count_u64(&payload.points),
            prestige_tickets: count_u64(&payload.prestige_tickets),
            referral_code: payload
                .referral_code
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty()),
            is_admin,
        })
    }
}

/// Either a bare user object or one wrapped as `{ "user": ... }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UserEnvelope {
    Wrapped { user: UserPayload },
    Bare(UserPayload),
}

impl UserEnvelope {
    pub fn into_payload(self) -> UserPayload {
        match self {
            UserEnvelope::Wrapped { user } => user,
            UserEnvelope::Bare(user) => user,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(alias = "accessToken", alias = "jwt")]
    pub token: Option<String>,
    #[serde(alias = "expires_at", alias = "expiry")]
    pub expires_at: Option<WireTimestamp>,
    pub user: UserPayload,
}

impl TryFrom<AuthPayload> for Session {
    type Error = ApiError;

    fn try_from(payload: AuthPayload) -> Result<Self, Self::Error> {
        let token = payload
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidRecord("auth response without token".to_string()))?;

        let expires_at = match payload.expires_at {
            Some(raw) => {
                let parsed = raw.to_utc();
                if parsed.is_none() {
                    warn!("[auth] ignoring unparseable session expiry {}", raw);
                }
                parsed
            }
            None => None,
        };

        let user = UserProfile::try_from(payload.user)?;

        Session::new(token, expires_at, user)
            .map_err(|e| ApiError::InvalidRecord(e.message().to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WinnerPayload {
    Name(String),
    User {
        username: Option<String>,
        name: Option<String>,
    },
}

impl WinnerPayload {
    fn into_name(self) -> Option<String> {
        let name = match self {
            WinnerPayload::Name(name) => Some(name),
            WinnerPayload::User { username, name } => username.or(name),
        };
        name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionPayload {
    #[serde(alias = "_id")]
    pub id: Option<WireId>,
    #[serde(alias = "name")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "reward")]
    pub prize: Option<String>,
    #[serde(alias = "entryCost", alias = "ticketsRequired", alias = "cost")]
    pub ticket_cost: Option<WireCount>,
    #[serde(alias = "startDate", alias = "startTime", alias = "starts_at")]
    pub starts_at: Option<WireTimestamp>,
    #[serde(alias = "endDate", alias = "endTime", alias = "ends_at")]
    pub ends_at: Option<WireTimestamp>,
    #[serde(alias = "entries", alias = "entriesCount", alias = "participants")]
    pub entry_count: Option<WireCount>,
    #[serde(alias = "hasEntered", alias = "isEntered")]
    pub entered: Option<bool>,
    pub winner: Option<WinnerPayload>,
    #[serde(alias = "image", alias = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
}

impl TryFrom<CompetitionPayload> for Competition {
    type Error = ApiError;

    fn try_from(payload: CompetitionPayload) -> Result<Self, Self::Error> {
        let id = payload
            .id
            .and_then(WireId::into_string)
            .ok_or_else(|| ApiError::InvalidRecord("competition without id".to_string()))?;

        let ends_at = match payload.ends_at {
            Some(raw) => raw.to_utc().ok_or_else(|| {
                ApiError::InvalidRecord(format!("competition {} has malformed endsAt {}", id, raw))
            })?,
            None => {
                return Err(ApiError::InvalidRecord(format!(
                    "competition {} has no endsAt",
                    id
                )))
            }
        };

        let starts_at = match payload.starts_at {
            Some(raw) => Some(raw.to_utc().ok_or_else(|| {
                ApiError::InvalidRecord(format!(
                    "competition {} has malformed startsAt {}",
                    id, raw
                ))
            })?),
            None => None,
        };

        let window = CompetitionWindow::new(starts_at, ends_at);
        if window.is_inverted() {
            warn!(
                "[competition] window of {} starts after it ends, classifying as-is",
                id
            );
        }

        let title = payload
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("Competition {}", id));

        let mut competition = Competition::new(CompetitionId::from_string(&id), title, window);
        competition.description = non_blank(payload.description);
        competition.prize = non_blank(payload.prize);
        competition.ticket_cost = count_u32(&payload.ticket_cost);
        competition.entry_count = count_u32(&payload.entry_count);
        competition.entered = payload.entered.unwrap_or(false);
        competition.winner = payload.winner.and_then(WinnerPayload::into_name);
        competition.image_url = non_blank(payload.image_url);

        Ok(competition)
    }
}

/// Listing sent bare or wrapped under a collection key
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    Bare(Vec<serde_json::Value>),
    Wrapped {
        #[serde(
            alias = "competitions",
            alias = "entries",
            alias = "leaderboard",
            alias = "items"
        )]
        data: Vec<serde_json::Value>,
    },
}

impl ListEnvelope {
    pub fn into_items(self) -> Vec<serde_json::Value> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

/// Decode each element on its own, skipping (and logging) the ones that
/// fail to deserialize or normalize.
pub fn normalize_each<P, T>(area: &str, items: Vec<serde_json::Value>) -> Vec<T>
where
    P: serde::de::DeserializeOwned,
    T: TryFrom<P, Error = ApiError>,
{
    let total = items.len();
    let mut records = Vec::with_capacity(total);

    for (index, item) in items.into_iter().enumerate() {
        let record = serde_json::from_value::<P>(item)
            .map_err(|e| ApiError::Decode(e.to_string()))
            .and_then(T::try_from);

        match record {
            Ok(record) => records.push(record),
            Err(e) => warn!("[{}] skip record #{} of {}: {}", area, index, total, e),
        }
    }

    records
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatusPayload {
    #[serde(alias = "streak", alias = "loginStreak", alias = "current_streak")]
    pub current_streak: Option<WireCount>,
    #[serde(alias = "lastClaimedAt", alias = "lastRewardClaim", alias = "last_claim_date")]
    pub last_claim_date: Option<WireTimestamp>,
    #[serde(alias = "claimed", alias = "claimed_today")]
    pub claimed_today: Option<bool>,
}

impl From<DailyStatusPayload> for LoginStreakState {
    fn from(payload: DailyStatusPayload) -> Self {
        let last_claim_date = payload.last_claim_date.and_then(|raw| {
            let parsed = raw.to_utc();
            if parsed.is_none() {
                warn!("[reward] unparseable lastClaimDate {}, skipping break check", raw);
            }
            parsed
        });

        LoginStreakState::new(
            payload.current_streak.as_ref().map_or(0, WireCount::to_i64),
            last_claim_date,
            payload.claimed_today.unwrap_or(false),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPayload {
    pub success: Option<bool>,
    #[serde(alias = "points", alias = "rewardAmount", alias = "reward")]
    pub points_awarded: Option<WireCount>,
    #[serde(alias = "tickets")]
    pub tickets_awarded: Option<WireCount>,
    #[serde(alias = "msg")]
    pub message: Option<String>,
}

impl TryFrom<ClaimPayload> for ClaimReceipt {
    type Error = ApiError;

    fn try_from(payload: ClaimPayload) -> Result<Self, Self::Error> {
        if payload.success == Some(false) {
            return Err(ApiError::Rejected(
                non_blank(payload.message).unwrap_or_else(|| "claim refused".to_string()),
            ));
        }

        Ok(ClaimReceipt {
            points_awarded: count_u64(&payload.points_awarded),
            tickets_awarded: count_u64(&payload.tickets_awarded),
            message: non_blank(payload.message),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct EntryPayload {
    pub success: Option<bool>,
    #[serde(alias = "msg")]
    pub message: Option<String>,
}

impl TryFrom<EntryPayload> for EntryReceipt {
    type Error = ApiError;

    fn try_from(payload: EntryPayload) -> Result<Self, Self::Error> {
        if payload.success == Some(false) {
            return Err(ApiError::Rejected(
                non_blank(payload.message).unwrap_or_else(|| "entry refused".to_string()),
            ));
        }

        Ok(EntryReceipt {
            message: non_blank(payload.message),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryPayload {
    #[serde(alias = "id", alias = "_id", alias = "user_id")]
    pub user_id: Option<WireId>,
    #[serde(alias = "name", alias = "displayName")]
    pub username: Option<String>,
    #[serde(alias = "score", alias = "totalPoints")]
    pub points: Option<WireCount>,
}

impl TryFrom<LeaderboardEntryPayload> for LeaderboardEntry {
    type Error = ApiError;

    fn try_from(payload: LeaderboardEntryPayload) -> Result<Self, Self::Error> {
        let user_id = payload
            .user_id
            .and_then(WireId::into_string)
            .ok_or_else(|| ApiError::InvalidRecord("leaderboard row without user".to_string()))?;

        let username = non_blank(payload.username).unwrap_or_else(|| user_id.clone());

        Ok(LeaderboardEntry {
            rank: 0,
            user_id: UserId::from_string(&user_id),
            username,
            points: count_u64(&payload.points),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralPayload {
    #[serde(alias = "referralCode", alias = "referral_code")]
    pub code: Option<String>,
    #[serde(alias = "referrals", alias = "count", alias = "referred_count")]
    pub referred_count: Option<WireCount>,
    #[serde(alias = "rewardPoints", alias = "points_earned")]
    pub points_earned: Option<WireCount>,
}

impl TryFrom<ReferralPayload> for ReferralSummary {
    type Error = ApiError;

    fn try_from(payload: ReferralPayload) -> Result<Self, Self::Error> {
        let code = non_blank(payload.code)
            .ok_or_else(|| ApiError::InvalidRecord("referral summary without code".to_string()))?;

        Ok(ReferralSummary {
            code,
            referred_count: count_u32(&payload.referred_count),
            points_earned: count_u64(&payload.points_earned),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionPayload {
    #[serde(alias = "pointsBalance")]
    pub points: Option<WireCount>,
    #[serde(alias = "tickets", alias = "prestige_tickets")]
    pub prestige_tickets: Option<WireCount>,
    pub user: Option<UserPayload>,
}

impl From<ConversionPayload> for ConversionOutcome {
    fn from(payload: ConversionPayload) -> Self {
        // Some deployments answer with the whole updated user
        if let Some(user) = payload.user {
            return ConversionOutcome {
                points: count_u64(&user.points),
                prestige_tickets: count_u64(&user.prestige_tickets),
            };
        }

        ConversionOutcome {
            points: count_u64(&payload.points),
            prestige_tickets: count_u64(&payload.prestige_tickets),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
