mod calendar;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use calendar::{reward_calendar, CalendarDay, CalendarDayStatus, DEFAULT_CYCLE_DAYS};

/// Daily-claim status as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginStreakState {
    /// Streak as last persisted server-side; may be stale after a missed day
    pub current_streak_reported: i64,
    pub last_claim_date: Option<DateTime<Utc>>,
    pub claimed_today: bool,
}

impl LoginStreakState {
    pub fn new(
        current_streak_reported: i64,
        last_claim_date: Option<DateTime<Utc>>,
        claimed_today: bool,
    ) -> Self {
        Self {
            current_streak_reported,
            last_claim_date,
            claimed_today,
        }
    }
}

/// What the daily-login UI shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakView {
    pub display_streak: u32,
    pub can_claim: bool,
    /// The reported streak was hidden because at least one day was skipped
    pub streak_broken: bool,
}

/// Project the reported streak onto what should be displayed at `today`.
///
/// The server only resets a streak when the next claim lands, so a streak
/// whose last claim is two or more UTC calendar days old is shown as 0.
/// The result is a display hint; the server stays authoritative.
pub fn normalize_streak(state: &LoginStreakState, today: DateTime<Utc>) -> StreakView {
    let reported = u32::try_from(state.current_streak_reported.max(0)).unwrap_or(u32::MAX);

    let streak_broken = !state.claimed_today
        && state
            .last_claim_date
            .is_some_and(|last| utc_day_diff(last, today) >= 2);

    StreakView {
        display_streak: if streak_broken { 0 } else { reported },
        can_claim: !state.claimed_today,
        streak_broken,
    }
}

/// Whole UTC calendar days from `earlier` to `later`; time of day ignored.
pub fn utc_day_diff(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later.date_naive() - earlier.date_naive()).num_days()
}
