use clap::Parser;

use prestige_lib::presentation::bootstrap;
use prestige_lib::presentation::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let code = bootstrap::run(cli).await;
    std::process::exit(code);
}
