//! In-memory gateway and fixtures shared by the service tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use prestige_domain::account::{Credentials, SignupRequest, UserProfile};
use prestige_domain::competition::{Competition, CompetitionWindow};
use prestige_domain::daily_reward::LoginStreakState;
use prestige_domain::gateway::{ClaimReceipt, EntryReceipt};
use prestige_domain::leaderboard::{rank_entries, LeaderboardEntry};
use prestige_domain::points::{ConversionOutcome, PointsConversion};
use prestige_domain::referral::ReferralSummary;
use prestige_domain::session::Session;
use prestige_domain::shared::{Clock, CompetitionId, DomainError, FixedClock, UserId};
use prestige_domain::RewardsGateway;

use crate::application::AppStore;

/// Tickets bought per point converted by the fake backend
pub const POINTS_PER_TICKET: u64 = 10;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(now()))
}

pub fn user(points: u64, tickets: u64) -> UserProfile {
    UserProfile {
        id: UserId::from_string("u-ana"),
        username: "ana".to_string(),
        email: "ana@example.com".to_string(),
        points,
        prestige_tickets: tickets,
        referral_code: Some("ANA1".to_string()),
        is_admin: false,
    }
}

pub fn competition(id: &str, starts_in_hours: Option<i64>, ends_in_hours: i64) -> Competition {
    let window = CompetitionWindow::new(
        starts_in_hours.map(|h| now() + Duration::hours(h)),
        now() + Duration::hours(ends_in_hours),
    );
    let mut competition = Competition::new(CompetitionId::from_string(id), id.to_uppercase(), window);
    competition.ticket_cost = 1;
    competition
}

pub fn leaderboard_entry(id: &str, name: &str, points: u64) -> LeaderboardEntry {
    LeaderboardEntry {
        rank: 0,
        user_id: UserId::from_string(id),
        username: name.to_string(),
        points,
    }
}

/// Store already holding a session for `user`
pub fn signed_in_store(user: UserProfile) -> Arc<AppStore> {
    let store = Arc::new(AppStore::new());
    store.set_session(Session::new("tok-ana".to_string(), None, user).unwrap());
    store
}

pub struct FakeState {
    pub user: UserProfile,
    pub competitions: Vec<Competition>,
    pub daily: LoginStreakState,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub referral: ReferralSummary,
    /// Operations that answer with a server error
    pub failing: Vec<&'static str>,
    pub calls: Vec<&'static str>,
}

/// Backend double that keeps balances consistent across calls
#[derive(Clone)]
pub struct FakeGateway {
    state: Arc<RwLock<FakeState>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(FakeState {
                user: user(120, 4),
                competitions: vec![
                    competition("open", Some(-24), 48),
                    competition("soon", Some(24), 72),
                    competition("done", Some(-96), -2),
                ],
                daily: LoginStreakState::new(3, Some(now() - Duration::days(1)), false),
                leaderboard: vec![
                    leaderboard_entry("u-1", "bo", 50),
                    leaderboard_entry("u-ana", "ana", 80),
                    leaderboard_entry("u-3", "cy", 80),
                    leaderboard_entry("u-4", "di", 10),
                ],
                referral: ReferralSummary {
                    code: "ANA1".to_string(),
                    referred_count: 2,
                    points_earned: 40,
                },
                failing: Vec::new(),
                calls: Vec::new(),
            })),
        }
    }

    pub async fn edit<F>(&self, f: F)
    where
        F: FnOnce(&mut FakeState),
    {
        f(&mut *self.state.write().await);
    }

    pub async fn calls(&self) -> Vec<&'static str> {
        self.state.read().await.calls.clone()
    }

    async fn record(&self, op: &'static str) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.calls.push(op);
        if state.failing.contains(&op) {
            return Err(DomainError::ExternalService(format!("{} unavailable", op)));
        }
        Ok(())
    }

    async fn session_for(&self, token: &str) -> Session {
        let user = self.state.read().await.user.clone();
        Session::new(token.to_string(), None, user).unwrap()
    }
}

#[async_trait]
impl RewardsGateway for FakeGateway {
    async fn login(&self, credentials: &Credentials) -> Result<Session, DomainError> {
        self.record("login").await?;
        if credentials.password() != "hunter22" {
            return Err(DomainError::InvalidCredentials("wrong password".to_string()));
        }
        Ok(self.session_for("tok-ana").await)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Session, DomainError> {
        self.record("signup").await?;
        self.edit(|s| {
            s.user.username = request.username().to_string();
            s.user.email = request.email().to_string();
            s.user.points = 0;
            s.user.prestige_tickets = 0;
        })
        .await;
        Ok(self.session_for("tok-new").await)
    }

    async fn current_user(&self, _session: &Session) -> Result<UserProfile, DomainError> {
        self.record("current_user").await?;
        Ok(self.state.read().await.user.clone())
    }

    async fn list_competitions(&self, _session: &Session) -> Result<Vec<Competition>, DomainError> {
        self.record("list_competitions").await?;
        Ok(self.state.read().await.competitions.clone())
    }

    async fn get_competition(
        &self,
        _session: &Session,
        id: &CompetitionId,
    ) -> Result<Competition, DomainError> {
        self.record("get_competition").await?;
        self.state
            .read()
            .await
            .competitions
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(|| DomainError::CompetitionNotFound(id.to_string()))
    }

    async fn enter_competition(
        &self,
        _session: &Session,
        id: &CompetitionId,
    ) -> Result<EntryReceipt, DomainError> {
        self.record("enter_competition").await?;
        let mut state = self.state.write().await;
        let cost = state
            .competitions
            .iter()
            .find(|c| &c.id == id)
            .map(|c| u64::from(c.ticket_cost))
            .ok_or_else(|| DomainError::CompetitionNotFound(id.to_string()))?;

        state.user.prestige_tickets -= cost;
        if let Some(c) = state.competitions.iter_mut().find(|c| &c.id == id) {
            c.entered = true;
            c.entry_count += 1;
        }
        Ok(EntryReceipt {
            message: Some("entered".to_string()),
        })
    }

    async fn daily_reward_status(
        &self,
        _session: &Session,
    ) -> Result<LoginStreakState, DomainError> {
        self.record("daily_reward_status").await?;
        Ok(self.state.read().await.daily.clone())
    }

    async fn claim_daily_reward(&self, _session: &Session) -> Result<ClaimReceipt, DomainError> {
        self.record("claim_daily_reward").await?;
        let mut state = self.state.write().await;
        state.daily = LoginStreakState::new(state.daily.current_streak_reported + 1, Some(now()), true);
        state.user.points += 10;
        state.user.prestige_tickets += 1;
        Ok(ClaimReceipt {
            points_awarded: 10,
            tickets_awarded: 1,
            message: None,
        })
    }

    async fn leaderboard(
        &self,
        _session: &Session,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, DomainError> {
        self.record("leaderboard").await?;
        let mut entries = rank_entries(self.state.read().await.leaderboard.clone());
        entries.truncate(limit as usize);
        Ok(entries)
    }

    async fn referral_summary(&self, _session: &Session) -> Result<ReferralSummary, DomainError> {
        self.record("referral_summary").await?;
        Ok(self.state.read().await.referral.clone())
    }

    async fn convert_points(
        &self,
        _session: &Session,
        conversion: PointsConversion,
    ) -> Result<ConversionOutcome, DomainError> {
        self.record("convert_points").await?;
        let mut state = self.state.write().await;
        state.user.points -= conversion.points();
        state.user.prestige_tickets += conversion.points() / POINTS_PER_TICKET;
        Ok(ConversionOutcome {
            points: state.user.points,
            prestige_tickets: state.user.prestige_tickets,
        })
    }
}

mockall::mock! {
    pub Gateway {}

    #[async_trait]
    impl RewardsGateway for Gateway {
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
        async fn daily_reward_status(&self, session: &Session) -> Result<LoginStreakState, DomainError>;
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
}
