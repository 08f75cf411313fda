use serde::{Deserialize, Serialize};

use super::StreakView;

pub const DEFAULT_CYCLE_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarDayStatus {
    Claimed,
    Claimable,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// 1-based position within the reward cycle
    pub day: u32,
    pub status: CalendarDayStatus,
}

/// Lay the display streak over a repeating reward cycle.
pub fn reward_calendar(view: &StreakView, cycle_len: u32) -> Vec<CalendarDay> {
    if cycle_len == 0 {
        return Vec::new();
    }

    let mut position = view.display_streak % cycle_len;
    // A cycle completed today stays fully lit until tomorrow's claim.
    if position == 0 && view.display_streak > 0 && !view.can_claim {
        position = cycle_len;
    }

    (1..=cycle_len)
        .map(|day| {
            let status = if day <= position {
                CalendarDayStatus::Claimed
            } else if day == position + 1 && view.can_claim {
                CalendarDayStatus::Claimable
            } else {
                CalendarDayStatus::Locked
            };
            CalendarDay { day, status }
        })
        .collect()
}
