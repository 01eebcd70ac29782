mod cli;
mod commands;
mod context;
mod table;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command};
use context::AppContext;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::load(cli.config)?;

    match cli.command {
        Command::Auth { a_cookie, b_cookie } => commands::account::auth(&ctx, &a_cookie, &b_cookie),
        Command::Notifications => commands::account::notifications(&ctx).await,
        Command::Upload(args) => commands::submission::upload(&ctx, args).await,
        Command::Edit { id } => commands::submission::edit(&ctx, &id).await,
        Command::Queue(command) => commands::queue::run(&ctx, command).await,
    }
}
