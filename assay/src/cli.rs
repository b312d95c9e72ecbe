// assay/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assay")]
#[command(about = "Batch data-quality pipeline: dedup, standardize, validate, prune", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the pipeline and publishes a new snapshot
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📊 Prints the quality metrics of the published snapshot
    Report {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Prints sample rows of a published table
    Inspect {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Entity or table name (e.g. "customers", "event")
        #[arg(long, short)]
        entity: String,

        /// Show the rejected rows instead of the clean ones
        #[arg(long)]
        rejected: bool,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_run_defaults() -> Result<()> {
        let args = Cli::parse_from(["assay", "run"]);
        match args.command {
            Commands::Run { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_project_dir() -> Result<()> {
        let args = Cli::parse_from(["assay", "run", "--project-dir", "/tmp"]);
        match args.command {
            Commands::Run { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_inspect() -> Result<()> {
        let args = Cli::parse_from([
            "assay",
            "inspect",
            "--entity",
            "customers",
            "--rejected",
            "--limit",
            "10",
        ]);
        match args.command {
            Commands::Inspect {
                entity,
                rejected,
                limit,
                ..
            } => {
                assert_eq!(entity, "customers");
                assert!(rejected);
                assert_eq!(limit, 10);
                Ok(())
            }
            _ => bail!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_cli_inspect_requires_entity() {
        assert!(Cli::try_parse_from(["assay", "inspect"]).is_err());
    }
}
