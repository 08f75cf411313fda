use serde::Serialize;
use std::fmt::Write;

use prestige_domain::daily_reward::CalendarDayStatus;
use prestige_domain::shared::DomainError;

use super::cli::{Command, GlobalArgs};
use super::error::CommandError;
use super::state::AppContext;
use crate::application::dtos::{
    ClaimResultDto, CompetitionCardDto, ConversionDto, DailyRewardDto, EntryResultDto,
    LeaderboardDto, ProfileDto, ReferralDto,
};

/// Result of one command; serializes as the bare view DTO
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Profile(ProfileDto),
    Cards(Vec<CompetitionCardDto>),
    Card(CompetitionCardDto),
    Entry(EntryResultDto),
    Daily(DailyRewardDto),
    Claim(ClaimResultDto),
    Leaderboard(LeaderboardDto),
    Referral(ReferralDto),
    Conversion(ConversionDto),
}

/// Sign in from the global flags: a token wins over email and password
pub async fn authenticate(ctx: &AppContext, global: &GlobalArgs) -> Result<ProfileDto, CommandError> {
    if let Some(token) = global.token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(ctx.services.auth.resume(token).await?);
    }

    match (global.email.as_deref(), global.password.as_deref()) {
        (Some(email), Some(password)) => Ok(ctx.services.auth.login(email, password).await?),
        _ => Err(DomainError::Unauthenticated(
            "pass --token, or --email and --password (or PRESTIGE_TOKEN / PRESTIGE_EMAIL / PRESTIGE_PASSWORD)"
                .to_string(),
        )
        .into()),
    }
}

pub async fn execute(
    ctx: &AppContext,
    global: &GlobalArgs,
    command: Command,
) -> Result<Output, CommandError> {
    let services = &ctx.services;

    let output = match command {
        Command::Signup(args) => {
            let (email, password) = match (global.email.as_deref(), global.password.as_deref()) {
                (Some(email), Some(password)) => (email, password),
                _ => {
                    return Err(CommandError::invalid_input(
                        "signup needs --email and --password",
                    ))
                }
            };
            Output::Profile(
                services
                    .auth
                    .signup(&args.username, email, password, args.referral_code.as_deref())
                    .await?,
            )
        }
        Command::Me => Output::Profile(services.auth.refresh_profile().await?),
        Command::Competitions { filter } => {
            Output::Cards(services.competitions.list_cards(filter).await?)
        }
        Command::Competition { id } => Output::Card(services.competitions.card(&id).await?),
        Command::Enter { id } => Output::Entry(services.competitions.enter(&id).await?),
        Command::Daily => Output::Daily(services.rewards.daily_status().await?),
        Command::Claim => Output::Claim(services.rewards.claim().await?),
        Command::Leaderboard { limit } => {
            Output::Leaderboard(services.community.leaderboard(limit).await?)
        }
        Command::Referrals => Output::Referral(services.community.referrals().await?),
        Command::Convert { points } => Output::Conversion(services.points.convert(points).await?),
    };

    Ok(output)
}

impl Output {
    pub fn to_json(&self) -> Result<String, CommandError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, out: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Profile(p) => render_profile(out, p),
            Output::Cards(cards) if cards.is_empty() => writeln!(out, "No competitions."),
            Output::Cards(cards) => cards.iter().try_for_each(|c| render_card(out, c)),
            Output::Card(card) => render_card_detail(out, card),
            Output::Entry(e) => writeln!(
                out,
                "Entered {}. {} tickets left.{}",
                e.competition_id,
                e.prestige_tickets,
                e.message
                    .as_deref()
                    .map(|m| format!(" ({})", m))
                    .unwrap_or_default()
            ),
            Output::Daily(d) => render_daily(out, d),
            Output::Claim(c) => render_claim(out, c),
            Output::Leaderboard(board) => render_leaderboard(out, board),
            Output::Referral(r) => writeln!(
                out,
                "Code: {}\nLink: {}\nReferred: {} ({} points earned)",
                r.code, r.link, r.referred_count, r.points_earned
            ),
            Output::Conversion(c) => writeln!(
                out,
                "Converted {} points. Balance: {} points, {} tickets.",
                c.converted_points, c.points, c.prestige_tickets
            ),
        }
    }
}

fn render_profile(out: &mut impl Write, p: &ProfileDto) -> std::fmt::Result {
    writeln!(out, "{} <{}>", p.username, p.email)?;
    writeln!(out, "Points:  {}", p.points)?;
    writeln!(out, "Tickets: {}", p.prestige_tickets)?;
    if let Some(code) = &p.referral_code {
        writeln!(out, "Referral code: {}", code)?;
    }
    if p.session_expires_soon {
        writeln!(out, "Session expires soon, log in again to renew it.")?;
    }
    Ok(())
}

fn render_card(out: &mut impl Write, c: &CompetitionCardDto) -> std::fmt::Result {
    let mark = if c.entered {
        "entered"
    } else if c.can_enter {
        "can enter"
    } else {
        ""
    };
    writeln!(
        out,
        "{:<10} {:<8} {:<18} {:>3} tickets  {}  {}",
        c.id, c.phase, c.time_label, c.ticket_cost, c.title, mark
    )
}

fn render_card_detail(out: &mut impl Write, c: &CompetitionCardDto) -> std::fmt::Result {
    writeln!(out, "{} ({})", c.title, c.id)?;
    if let Some(description) = &c.description {
        writeln!(out, "{}", description)?;
    }
    if let Some(prize) = &c.prize {
        writeln!(out, "Prize:   {}", prize)?;
    }
    writeln!(out, "Status:  {} - {}", c.phase, c.time_label)?;
    writeln!(out, "Cost:    {} tickets", c.ticket_cost)?;
    writeln!(out, "Entries: {}", c.entry_count)?;
    if let Some(winner) = &c.winner {
        writeln!(out, "Winner:  {}", winner)?;
    }
    if c.entered {
        writeln!(out, "You are entered.")?;
    }
    Ok(())
}

fn render_daily(out: &mut impl Write, d: &DailyRewardDto) -> std::fmt::Result {
    writeln!(out, "Streak: {} day(s)", d.display_streak)?;
    if d.streak_broken {
        writeln!(out, "Your streak was reset after a missed day.")?;
    }

    let calendar: Vec<&str> = d
        .calendar
        .iter()
        .map(|day| match day.status {
            CalendarDayStatus::Claimed => "[x]",
            CalendarDayStatus::Claimable => "[>]",
            CalendarDayStatus::Locked => "[ ]",
        })
        .collect();
    writeln!(out, "{}", calendar.join(" "))?;

    if d.can_claim {
        writeln!(out, "Today's reward is ready: run `prestige claim`.")
    } else {
        writeln!(out, "Already claimed today.")
    }
}

fn render_claim(out: &mut impl Write, c: &ClaimResultDto) -> std::fmt::Result {
    writeln!(
        out,
        "Claimed +{} points, +{} tickets.",
        c.points_awarded, c.tickets_awarded
    )?;
    if let Some(message) = &c.message {
        writeln!(out, "{}", message)?;
    }
    writeln!(
        out,
        "Balance: {} points, {} tickets.",
        c.points, c.prestige_tickets
    )?;
    render_daily(out, &c.status)
}

fn render_leaderboard(out: &mut impl Write, board: &LeaderboardDto) -> std::fmt::Result {
    if board.entries.is_empty() {
        return writeln!(out, "Leaderboard is empty.");
    }
    for row in &board.entries {
        writeln!(
            out,
            "{}{:>4}. {:<24} {:>8}",
            if row.is_current_user { "*" } else { " " },
            row.rank,
            row.username,
            row.points
        )?;
    }
    Ok(())
}
