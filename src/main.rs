use clap::{Parser, Subcommand};
use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;

mod config;
mod delivery;
mod digest;
mod feed;
mod inspect;
mod output;
mod push;
mod render;
mod route;
mod telemetry;
mod util;

#[derive(Parser)]
#[command(name = "arxiv-push", about = "Push today's arXiv announcements to a Telegram chat")]
struct Cli {
    /// Settings file (defaults to $ARXIV_PUSH_CONFIG or ./config.json)
    #[arg(global = true, short, long)]
    config: Option<PathBuf>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Push(push::PushCmd),
    Config(inspect::ConfigCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and ARXIV_LOG_FORMAT
    telemetry::config::init_tracing();
    let config_path = config::resolve_path(cli.config);

    match cli.command {
        Commands::Push(args) => push::run(&config_path, args).await?,
        Commands::Config(args) => inspect::run(&config_path, args).await?,
    }

    Ok(())
}
