use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::account::{Credentials, SignupRequest, UserProfile};
use crate::competition::Competition;
use crate::daily_reward::LoginStreakState;
use crate::leaderboard::LeaderboardEntry;
use crate::points::{ConversionOutcome, PointsConversion};
use crate::referral::ReferralSummary;
use crate::session::Session;
use crate::shared::{CompetitionId, DomainError};

/// Server acknowledgement of a competition entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReceipt {
    pub message: Option<String>,
}

/// Server acknowledgement of a daily reward claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub points_awarded: u64,
    pub tickets_awarded: u64,
    pub message: Option<String>,
}

/// Port to the remote competitions and rewards service.
///
/// Every mutation lives behind this trait; authenticated calls take the
/// session explicitly.
#[async_trait]
pub trait RewardsGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session, DomainError>;
    async fn signup(&self, request: &SignupRequest) -> Result<Session, DomainError>;
    async fn current_user(&self, session: &Session) -> Result<UserProfile, DomainError>;

    async fn list_competitions(&self, session: &Session) -> Result<Vec<Competition>, DomainError>;
    async fn get_competition(
        &self,
        session: &Session,
        id: &CompetitionId,
    ) -> Result<Competition, DomainError>;
    async fn enter_competition(
        &self,
        session: &Session,
        id: &CompetitionId,
    ) -> Result<EntryReceipt, DomainError>;

    async fn daily_reward_status(&self, session: &Session)
        -> Result<LoginStreakState, DomainError>;
    async fn claim_daily_reward(&self, session: &Session) -> Result<ClaimReceipt, DomainError>;

    async fn leaderboard(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, DomainError>;
    async fn referral_summary(&self, session: &Session) -> Result<ReferralSummary, DomainError>;

    async fn convert_points(
        &self,
        session: &Session,
        conversion: PointsConversion,
    ) -> Result<ConversionOutcome, DomainError>;
}
