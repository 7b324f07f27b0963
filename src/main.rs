//! mergebot binary entry point

mod cli;

use anstream::eprintln;
use clap::{Parser, Subcommand};
use cli::automerge::AutomergeOptions;
use cli::style::Stylize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mergebot",
    about = "Branch automerge for dependency update branches",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the config file (default: ./mergebot.toml, then user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository URL, overrides repo_url from the config file
    #[arg(long, global = true)]
    repo_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether an update branch can merge, then merge it
    Automerge {
        /// Name of the update branch
        branch: String,

        /// Decide without performing the merge
        #[arg(long)]
        dry_run: bool,

        /// Preview the decision and prompt before merging
        #[arg(long)]
        confirm: bool,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify platform credentials
    Auth,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    let repo_url = cli.repo_url.as_deref();

    match cli.command {
        Commands::Automerge {
            branch,
            dry_run,
            confirm,
            json,
        } => {
            let options = AutomergeOptions {
                dry_run,
                confirm,
                json,
            };
            cli::automerge::run_automerge(config_path, repo_url, &branch, options).await?;
        }
        Commands::Auth => cli::auth::run_auth(config_path, repo_url).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("{} {e:#}", "error:".error());
        std::process::exit(1);
    }
}
