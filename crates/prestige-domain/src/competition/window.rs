use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

pub const ENDED_LABEL: &str = "Ended";

/// Lifecycle phase of a competition. Strictly monotonic with time:
/// `Upcoming -> Open -> Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionPhase {
    Upcoming,
    Open,
    Ended,
}

impl CompetitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionPhase::Upcoming => "upcoming",
            CompetitionPhase::Open => "open",
            CompetitionPhase::Ended => "ended",
        }
    }
}

impl std::fmt::Display for CompetitionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-boxing of a competition
///
/// `starts_at <= ends_at` is expected but not enforced; an inverted
/// window is classified by the plain comparisons below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionWindow {
    starts_at: Option<DateTime<Utc>>,
    ends_at: DateTime<Utc>,
}

impl CompetitionWindow {
    pub fn new(starts_at: Option<DateTime<Utc>>, ends_at: DateTime<Utc>) -> Self {
        Self { starts_at, ends_at }
    }

    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.starts_at
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn is_inverted(&self) -> bool {
        self.starts_at.is_some_and(|start| start > self.ends_at)
    }

    pub fn phase_at(&self, now: DateTime<Utc>) -> CompetitionPhase {
        let has_started = self.starts_at.is_none_or(|start| start <= now);
        let has_ended = self.ends_at <= now;

        if has_ended {
            CompetitionPhase::Ended
        } else if has_started {
            CompetitionPhase::Open
        } else {
            CompetitionPhase::Upcoming
        }
    }

    /// Classify against the current wall-clock time
    pub fn phase_view(&self) -> PhaseView {
        classify_phase(self, Utc::now())
    }
}

/// Render-ready projection of a window at a given instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseView {
    pub phase: CompetitionPhase,
    pub is_open: bool,
    pub time_label: String,
}

pub fn classify_phase(window: &CompetitionWindow, now: DateTime<Utc>) -> PhaseView {
    let phase = window.phase_at(now);

    let time_label = match phase {
        CompetitionPhase::Ended => ENDED_LABEL.to_string(),
        _ => format!(
            "Ends in {}",
            format_duration((window.ends_at - now).num_milliseconds())
        ),
    };

    PhaseView {
        phase,
        is_open: phase == CompetitionPhase::Open,
        time_label,
    }
}

/// Largest unit pair first, truncating: `4d 12h`, `3h 5m`, `7m`, `42s`.
pub fn format_duration(ms: i64) -> String {
    if ms <= 0 {
        return ENDED_LABEL.to_string();
    }

    let days = ms / MS_PER_DAY;
    if days > 0 {
        let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
        return format!("{}d {}h", days, hours);
    }

    let hours = ms / MS_PER_HOUR;
    if hours > 0 {
        let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
        return format!("{}h {}m", hours, minutes);
    }

    let minutes = ms / MS_PER_MINUTE;
    if minutes > 0 {
        return format!("{}m", minutes);
    }

    format!("{}s", (ms / MS_PER_SECOND) % 60)
}
