mod window;

#[cfg(test)]
mod competition_test;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::shared::{CompetitionId, DomainError};

pub use window::{
    classify_phase, format_duration, CompetitionPhase, CompetitionWindow, PhaseView, ENDED_LABEL,
};

/// Canonical competition record
///
/// Built once at the API boundary from whatever shape the server sent;
/// everything downstream reads these fields without fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub title: String,
    pub description: Option<String>,
    pub prize: Option<String>,
    /// Prestige tickets spent to enter
    pub ticket_cost: u32,
    pub window: CompetitionWindow,
    pub entry_count: u32,
    /// Whether the current user already holds an entry
    pub entered: bool,
    pub winner: Option<String>,
    pub image_url: Option<String>,
}

impl Competition {
    pub fn new(id: CompetitionId, title: impl Into<String>, window: CompetitionWindow) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            prize: None,
            ticket_cost: 0,
            window,
            entry_count: 0,
            entered: false,
            winner: None,
            image_url: None,
        }
    }

    pub fn phase_at(&self, now: DateTime<Utc>) -> CompetitionPhase {
        self.window.phase_at(now)
    }

    pub fn phase_view_at(&self, now: DateTime<Utc>) -> PhaseView {
        classify_phase(&self.window, now)
    }

    /// Local precheck before posting an entry
    pub fn check_entry(&self, tickets: u64, now: DateTime<Utc>) -> Result<(), DomainError> {
        let phase = self.phase_at(now);
        if phase != CompetitionPhase::Open {
            return Err(DomainError::CompetitionClosed(format!(
                "'{}' is {}",
                self.title, phase
            )));
        }

        if self.entered {
            return Err(DomainError::AlreadyEntered(format!(
                "already entered '{}'",
                self.title
            )));
        }

        if tickets < u64::from(self.ticket_cost) {
            return Err(DomainError::InsufficientTickets(format!(
                "'{}' costs {} tickets, {} available",
                self.title, self.ticket_cost, tickets
            )));
        }

        Ok(())
    }
}

/// Phase-based selection used by listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionFilter {
    #[default]
    All,
    Open,
    Upcoming,
    Ended,
}

impl CompetitionFilter {
    pub fn matches(&self, phase: CompetitionPhase) -> bool {
        match self {
            CompetitionFilter::All => true,
            CompetitionFilter::Open => phase == CompetitionPhase::Open,
            CompetitionFilter::Upcoming => phase == CompetitionPhase::Upcoming,
            CompetitionFilter::Ended => phase == CompetitionPhase::Ended,
        }
    }
}

impl std::str::FromStr for CompetitionFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(CompetitionFilter::All),
            "open" => Ok(CompetitionFilter::Open),
            "upcoming" => Ok(CompetitionFilter::Upcoming),
            "ended" => Ok(CompetitionFilter::Ended),
            other => Err(DomainError::InvalidInput(format!(
                "unknown competition filter '{}'",
                other
            ))),
        }
    }
}

/// Open first (soonest end), then upcoming (soonest start), then ended
/// (most recent end).
pub fn sort_for_display(competitions: &mut [Competition], now: DateTime<Utc>) {
    competitions.sort_by(|a, b| display_order(a, b, now));
}

fn display_order(a: &Competition, b: &Competition, now: DateTime<Utc>) -> Ordering {
    let rank = |phase: CompetitionPhase| match phase {
        CompetitionPhase::Open => 0,
        CompetitionPhase::Upcoming => 1,
        CompetitionPhase::Ended => 2,
    };

    let (phase_a, phase_b) = (a.phase_at(now), b.phase_at(now));

    rank(phase_a)
        .cmp(&rank(phase_b))
        .then_with(|| match phase_a {
            CompetitionPhase::Open => a.window.ends_at().cmp(&b.window.ends_at()),
            CompetitionPhase::Upcoming => a.window.starts_at().cmp(&b.window.starts_at()),
            CompetitionPhase::Ended => b.window.ends_at().cmp(&a.window.ends_at()),
        })
        .then_with(|| a.title.cmp(&b.title))
}
