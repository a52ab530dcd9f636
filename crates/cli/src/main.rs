//! CourseMate CLI, the main entry point.
//!
//! Commands:
//! - `onboard`  Write a default config file
//! - `ask`      Interactive or single-question mode
//! - `courses`  List the indexed courses

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "coursemate",
    about = "CourseMate — answer questions about course materials",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Ask questions about the course catalog
    Ask {
        /// Ask a single question instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Course catalog JSON file (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List the courses in the catalog
    Courses {
        /// Course catalog JSON file (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Ask { message, catalog } => commands::ask::run(message, catalog).await?,
        Commands::Courses { catalog } => commands::courses::run(catalog).await?,
    }

    Ok(())
}
