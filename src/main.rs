//! intel-core: in-memory record lookup (Rust)
//!
//! Dual-mode application:
//! - Session Mode (no subcommand): line-delimited JSON session over stdio
//! - CLI Mode: one-shot search, show, export and classify commands

mod cli;
mod config;
mod correlate;
mod dossier;
mod error;
mod export;
mod feedback;
mod identity;
mod memo;
mod recent;
mod reveal;
mod search;
mod session;
mod store;
mod tools;

#[cfg(test)]
mod tests_scenarios;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::AppError;
use feedback::TracingFeedback;
use search::SearchIndex;
use std::sync::Arc;
use store::RecordStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to stderr to keep stdout clean
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.resolve(config::load_config()?);

    match cli.command {
        Some(command) => run_cli_mode(command, config),
        None => run_session_mode(config).await,
    }
}

fn load_store(config: &Config) -> Result<Arc<RecordStore>, AppError> {
    let path = config.require_data_path()?;
    Ok(Arc::new(RecordStore::load(path)?))
}

/// Run in CLI mode
fn run_cli_mode(command: Commands, config: Config) -> Result<()> {
    match execute_command(command, config) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn execute_command(command: Commands, config: Config) -> Result<String, AppError> {
    match command {
        Commands::Search(args) => {
            let store = load_store(&config)?;
            let mut index = SearchIndex::with_matcher(store, config.matcher.build());
            Ok(tools::search::execute_search(&mut index, &args)?.to_text())
        }
        Commands::Show(args) => {
            let store = load_store(&config)?;
            Ok(tools::show::execute_show(&store, args.id)?.to_text())
        }
        Commands::Export(args) => {
            let id = args
                .id
                .ok_or_else(|| AppError::InvalidInput("Export requires --id".to_string()))?;
            let store = load_store(&config)?;
            let dir = args.dir.unwrap_or(config.export_dir);
            let output = tools::export::execute_export(&store, id, &dir, chrono::Utc::now())?;
            Ok(output.to_text())
        }
        Commands::Classify(args) => Ok(tools::classify::execute_classify(&args).to_text()),
    }
}

/// Run in session mode
async fn run_session_mode(config: Config) -> Result<()> {
    info!("Starting intel-core session");

    let store = load_store(&config)?;
    let session = session::Session::new(store, &config, Some(Arc::new(TracingFeedback)));
    session::handle_stdio(session).await?;

    Ok(())
}
