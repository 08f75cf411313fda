use std::sync::Arc;

use prestige_domain::referral::referral_link;
use prestige_domain::shared::{Clock, DomainError};
use prestige_domain::RewardsGateway;

use crate::application::dtos::{LeaderboardDto, LeaderboardRowDto, ReferralDto};
use crate::application::AppStore;

/// Largest page the leaderboard endpoint is asked for
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

pub struct CommunityService {
    gateway: Arc<dyn RewardsGateway>,
    store: Arc<AppStore>,
    clock: Arc<dyn Clock>,
    signup_url: String,
    default_limit: u32,
}

impl CommunityService {
    pub fn new(
        gateway: Arc<dyn RewardsGateway>,
        store: Arc<AppStore>,
        clock: Arc<dyn Clock>,
        signup_url: String,
        default_limit: u32,
    ) -> Self {
        Self {
            gateway,
            store,
            clock,
            signup_url,
            default_limit,
        }
    }

    pub async fn leaderboard(&self, limit: Option<u32>) -> Result<LeaderboardDto, DomainError> {
        let session = self.store.authenticated_session(self.clock.now())?;

        let limit = limit.unwrap_or(self.default_limit);
        if limit == 0 {
            return Err(DomainError::InvalidInput(
                "leaderboard limit must be at least 1".to_string(),
            ));
        }
        let limit = limit.min(MAX_LEADERBOARD_LIMIT);

        let entries = self.gateway.leaderboard(&session, limit).await?;
        let me = &session.user().id;

        let rows: Vec<LeaderboardRowDto> = entries
            .into_iter()
            .map(|entry| LeaderboardRowDto {
                rank: entry.rank,
                is_current_user: &entry.user_id == me,
                user_id: entry.user_id.as_str().to_string(),
                username: entry.username,
                points: entry.points,
            })
            .collect();

        let current_user_rank = rows.iter().find(|r| r.is_current_user).map(|r| r.rank);

        Ok(LeaderboardDto {
            entries: rows,
            current_user_rank,
        })
    }

    pub async fn referrals(&self) -> Result<ReferralDto, DomainError> {
        let session = self.store.authenticated_session(self.clock.now())?;
        let summary = self.gateway.referral_summary(&session).await?;

        Ok(ReferralDto {
            link: referral_link(&self.signup_url, &summary.code)?,
            code: summary.code,
            referred_count: summary.referred_count,
            points_earned: summary.points_earned,
        })
    }
}
