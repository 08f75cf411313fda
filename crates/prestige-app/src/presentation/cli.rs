use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use prestige_domain::competition::CompetitionFilter;

#[derive(Debug, Parser)]
#[command(name = "prestige", version, about = "Competitions, daily rewards and points for Prestige")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Path to config.json (defaults to the per-user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token of an existing session
    #[arg(long, global = true, env = "PRESTIGE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, global = true, env = "PRESTIGE_EMAIL")]
    pub email: Option<String>,

    #[arg(long, global = true, env = "PRESTIGE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and sign in
    Signup(SignupArgs),

    /// Show the signed-in profile and balances
    Me,

    /// List competitions
    Competitions {
        /// all, open, upcoming or ended
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        filter: CompetitionFilter,
    },

    /// Show one competition
    Competition { id: String },

    /// Spend tickets to enter a competition
    Enter { id: String },

    /// Show the daily login reward status
    Daily,

    /// Claim today's login reward
    Claim,

    /// Show the points leaderboard
    Leaderboard {
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show your referral code and link
    Referrals,

    /// Convert points into prestige tickets
    Convert { points: u64 },
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub username: String,

    /// Referral code of the user who invited you
    #[arg(long = "ref")]
    pub referral_code: Option<String>,
}

fn parse_filter(raw: &str) -> Result<CompetitionFilter, String> {
    raw.parse::<CompetitionFilter>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_competitions_filter() {
        let cli = Cli::try_parse_from(["prestige", "competitions", "--filter", "open"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Competitions {
                filter: CompetitionFilter::Open
            }
        ));

        assert!(Cli::try_parse_from(["prestige", "competitions", "--filter", "soon"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "prestige",
            "leaderboard",
            "--limit",
            "10",
            "--json",
            "--api-url",
            "http://localhost:9000/",
        ])
        .unwrap();

        assert!(cli.global.json);
        assert_eq!(cli.global.api_url.as_deref(), Some("http://localhost:9000/"));
        assert!(matches!(cli.command, Command::Leaderboard { limit: Some(10) }));
    }

    #[test]
    fn test_signup_args() {
        let cli = Cli::try_parse_from([
            "prestige", "signup", "--username", "ana", "--ref", "BOB7",
        ])
        .unwrap();

        match cli.command {
            Command::Signup(args) => {
                assert_eq!(args.username, "ana");
                assert_eq!(args.referral_code.as_deref(), Some("BOB7"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
