use std::sync::Arc;

use prestige_domain::shared::{Clock, SystemClock};
use prestige_domain::RewardsGateway;
use prestige_infrastructure::config::AppConfig;
use prestige_infrastructure::http::ApiClient;
use prestige_infrastructure::logging::{get_log_dir, init_logger};

use super::cli::{Cli, Command, GlobalArgs};
use super::commands::{authenticate, execute};
use super::error::CommandError;
use super::state::AppContext;

/// Run one CLI invocation and return the process exit code
pub async fn run(cli: Cli) -> i32 {
    let json = cli.global.json;

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            let err = err.with_log_hint(get_log_dir().as_deref());
            report(&err, json);
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> Result<(), CommandError> {
    let Cli { global, command } = cli;

    let config = prepare_config(&global)?;

    let log_dir = config.resolved_log_dir();
    if let Err(e) = init_logger(&log_dir, config.log_level) {
        eprintln!("Failed to initialize file logging in {}: {}", log_dir.display(), e);
    }
    tracing::info!(
        "prestige {} starting against {}",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let gateway: Arc<dyn RewardsGateway> = Arc::new(ApiClient::new(&config)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ctx = AppContext::new(&config, gateway, clock);

    if !matches!(command, Command::Signup(_)) {
        authenticate(&ctx, &global).await?;
    }

    let result = execute(&ctx, &global, command).await;
    // Sessions are never persisted past the process
    ctx.services.auth.logout();
    let output = result?;

    if global.json {
        println!("{}", output.to_json()?);
    } else {
        print!("{}", output.render());
    }

    Ok(())
}

/// Load the config file and apply command-line overrides on top
fn prepare_config(global: &GlobalArgs) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(global.config.as_deref())?;

    if let Some(url) = global.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
        config.validate()?;
    }

    Ok(config)
}

fn report(err: &CommandError, json: bool) {
    tracing::error!("command failed: [{}] {}", err.code, err.message);
    eprintln!("{}", err.report(json));
}
