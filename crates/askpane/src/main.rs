mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries answers and protocol replies
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args).await,
        Commands::Parse { file, json } => commands::parse::run(file.as_deref(), json),
        Commands::History {
            action,
            limit,
            agent,
            stats,
        } => commands::history::run(action, limit, agent.as_deref(), stats),
        Commands::Setup(args) => commands::setup::run(args),
        Commands::Status => commands::status::run(),
        Commands::Rpc => commands::rpc::run().await,
        Commands::Version => commands::version::run(),
    }
}
