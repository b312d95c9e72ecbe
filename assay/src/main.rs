// assay/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug assay run ... to see per-stage details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { project_dir } => commands::run::execute(project_dir).await,
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
        Commands::Report { project_dir } => commands::report::execute(project_dir),
        Commands::Inspect {
            project_dir,
            entity,
            rejected,
            limit,
        } => commands::inspect::execute(project_dir, entity, rejected, limit),
    }
}
