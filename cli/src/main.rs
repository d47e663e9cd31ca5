#![allow(clippy::exit)]

use anyhow::Result;
use clap::Parser as _;
use lendsqr_cli::cli::{Cli, Commands};
use lendsqr_cli::commands::{generate_completions, run_login, run_user, run_users};
use lendsqr_cli::context::AppContext;
use lendsqr_cli::output::Output;
use lendsqr_cli::timing::init_tracing;
use tracing::{debug, warn};

#[tokio::main]
async fn main() {
    // Load `.env` before anything reads the environment, RUST_LOG included.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.timing);

    match dotenv {
        Ok(path) => debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("ignoring unreadable .env file: {e}"),
    }

    if let Err(e) = run(cli).await {
        Output::new().error(format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        api_url,
        data_dir,
        ..
    } = cli;
    let app = move || AppContext::load(api_url, data_dir);

    match command {
        Commands::Login { email } => run_login(&app()?, email),
        Commands::Users(args) => run_users(&app()?, args).await,
        Commands::User { id } => run_user(&app()?, &id).await,
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}
