use log::{info, warn};
use std::sync::Arc;

use prestige_domain::daily_reward::{
    normalize_streak, reward_calendar, LoginStreakState, StreakView,
};
use prestige_domain::shared::{Clock, DomainError};
use prestige_domain::RewardsGateway;

use super::refresh_profile_after;
use crate::application::dtos::{ClaimResultDto, DailyRewardDto};
use crate::application::AppStore;

pub struct RewardService {
    gateway: Arc<dyn RewardsGateway>,
    store: Arc<AppStore>,
    clock: Arc<dyn Clock>,
    cycle_days: u32,
}

impl RewardService {
    pub fn new(
        gateway: Arc<dyn RewardsGateway>,
        store: Arc<AppStore>,
        clock: Arc<dyn Clock>,
        cycle_days: u32,
    ) -> Self {
        Self {
            gateway,
            store,
            clock,
            cycle_days,
        }
    }

    pub async fn daily_status(&self) -> Result<DailyRewardDto, DomainError> {
        let now = self.clock.now();
        let session = self.store.authenticated_session(now)?;

        let state = self.gateway.daily_reward_status(&session).await?;
        self.store.set_daily_status(state.clone());

        Ok(self.project(&state))
    }

    /// Claim today's reward.
    ///
    /// The local streak rule only gates the button; the server decides. A
    /// claim the normalizer already rules out is refused without a request,
    /// and after a successful claim both the status and the profile are read
    /// back so the store holds server truth.
    pub async fn claim(&self) -> Result<ClaimResultDto, DomainError> {
        let now = self.clock.now();
        let session = self.store.authenticated_session(now)?;

        let before = self.gateway.daily_reward_status(&session).await?;
        let before_view = normalize_streak(&before, now);
        if !before_view.can_claim {
            self.store.set_daily_status(before);
            return Err(DomainError::AlreadyClaimed(
                "today's reward was already claimed".to_string(),
            ));
        }

        let receipt = self.gateway.claim_daily_reward(&session).await?;

        let after = match self.gateway.daily_reward_status(&session).await {
            Ok(state) => state,
            Err(e) => {
                warn!("[reward] status re-read failed after claim: {}", e);
                LoginStreakState::new(streak_after_claim(&before, &before_view), Some(now), true)
            }
        };
        self.store.set_daily_status(after.clone());

        let user =
            refresh_profile_after("reward", self.gateway.as_ref(), &self.store, &session).await;

        info!(
            "[reward] {} claimed day {}: +{} points, +{} tickets",
            user.username,
            after.current_streak_reported,
            receipt.points_awarded,
            receipt.tickets_awarded
        );

        Ok(ClaimResultDto {
            points_awarded: receipt.points_awarded,
            tickets_awarded: receipt.tickets_awarded,
            message: receipt.message,
            points: user.points,
            prestige_tickets: user.prestige_tickets,
            status: self.project(&after),
        })
    }

    fn project(&self, state: &LoginStreakState) -> DailyRewardDto {
        let view = normalize_streak(state, self.clock.now());
        DailyRewardDto::build(state, view, reward_calendar(&view, self.cycle_days))
    }
}

/// Local estimate of the streak once today's claim landed: a broken streak
/// restarts at day 1.
fn streak_after_claim(before: &LoginStreakState, view: &StreakView) -> i64 {
    if view.streak_broken {
        1
    } else {
        before.current_streak_reported.max(0).saturating_add(1)
    }
}
