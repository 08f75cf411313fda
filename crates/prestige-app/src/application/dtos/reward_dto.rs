use serde::{Deserialize, Serialize};

use prestige_domain::daily_reward::{CalendarDay, LoginStreakState, StreakView};

/// Daily login reward panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRewardDto {
    pub reported_streak: i64,
    pub display_streak: u32,
    pub can_claim: bool,
    pub claimed_today: bool,
    pub streak_broken: bool,
    pub last_claim_date: Option<String>,
    pub calendar: Vec<CalendarDay>,
}

impl DailyRewardDto {
    pub fn build(state: &LoginStreakState, view: StreakView, calendar: Vec<CalendarDay>) -> Self {
        Self {
            reported_streak: state.current_streak_reported,
            display_streak: view.display_streak,
            can_claim: view.can_claim,
            claimed_today: state.claimed_today,
            streak_broken: view.streak_broken,
            last_claim_date: state.last_claim_date.map(|t| t.to_rfc3339()),
            calendar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResultDto {
    pub points_awarded: u64,
    pub tickets_awarded: u64,
    pub message: Option<String>,
    pub points: u64,
    pub prestige_tickets: u64,
    pub status: DailyRewardDto,
}
