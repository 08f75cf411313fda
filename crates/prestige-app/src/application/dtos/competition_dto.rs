use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prestige_domain::competition::{Competition, CompetitionPhase};

/// One competition as shown in a list or detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionCardDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub prize: Option<String>,
    pub image_url: Option<String>,
    pub ticket_cost: u32,
    pub entry_count: u32,
    pub entered: bool,
    pub winner: Option<String>,
    pub phase: CompetitionPhase,
    pub is_open: bool,
    pub time_label: String,
    pub starts_at: Option<String>,
    pub ends_at: String,
    /// Open, not yet entered, and affordable with the current balance
    pub can_enter: bool,
}

impl CompetitionCardDto {
    pub fn build(competition: &Competition, tickets: u64, now: DateTime<Utc>) -> Self {
        let view = competition.phase_view_at(now);

        Self {
            id: competition.id.as_str().to_string(),
            title: competition.title.clone(),
            description: competition.description.clone(),
            prize: competition.prize.clone(),
            image_url: competition.image_url.clone(),
            ticket_cost: competition.ticket_cost,
            entry_count: competition.entry_count,
            entered: competition.entered,
            winner: competition.winner.clone(),
            phase: view.phase,
            is_open: view.is_open,
            time_label: view.time_label,
            starts_at: competition.window.starts_at().map(|t| t.to_rfc3339()),
            ends_at: competition.window.ends_at().to_rfc3339(),
            can_enter: competition.check_entry(tickets, now).is_ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryResultDto {
    pub competition_id: String,
    pub message: Option<String>,
    pub prestige_tickets: u64,
}
