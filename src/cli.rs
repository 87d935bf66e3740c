//! CLI mode implementation
//!
//! Provides command-line interface for the lookup tools

use crate::config::Config;
use crate::search::MatcherKind;
use clap::{Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// intel-core CLI
#[derive(Parser)]
#[command(name = "intel-core")]
#[command(about = "Fuzzy record lookup, associate correlation and dossier export", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON file with the record collection
    #[arg(short, long, global = true, env = "INTEL_CORE_DATA")]
    pub data: Option<PathBuf>,

    /// Directory dossiers are written to
    #[arg(long, global = true, env = "INTEL_CORE_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Name matcher implementation
    #[arg(long, global = true, value_enum)]
    pub matcher: Option<MatcherKind>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Apply command line and environment settings over file settings
    pub fn resolve(&self, file: Config) -> Config {
        file.with_overrides(self.data.clone(), self.export_dir.clone(), self.matcher)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search records by name
    Search(SearchArgs),
    /// Show a record's profile and associates
    Show(ShowArgs),
    /// Write a record's dossier to a file
    Export(ExportArgs),
    /// Classify an identity number
    Classify(ClassifyArgs),
}

/// Search tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchArgs {
    /// Name to look for (case-insensitive, typo-tolerant)
    #[arg(short = 'q', long)]
    #[schemars(description = "Name to look for (case-insensitive, typo-tolerant)")]
    pub query: String,

    /// Maximum number of results (default 10, max 10)
    #[arg(short = 'l', long)]
    #[schemars(description = "Maximum number of results (default 10, max 10)")]
    pub limit: Option<usize>,
}

/// Record lookup arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct ShowArgs {
    /// Record id
    #[arg(short = 'i', long)]
    #[schemars(description = "Record id")]
    pub id: usize,
}

/// Export tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct ExportArgs {
    /// Record id (session mode defaults to the selected record)
    #[arg(short = 'i', long)]
    #[schemars(description = "Record id; defaults to the selected record")]
    pub id: Option<usize>,

    /// Output directory
    #[arg(short = 'o', long, env = "INTEL_CORE_EXPORT_DIR")]
    #[schemars(description = "Output directory")]
    pub dir: Option<PathBuf>,
}

/// Classify tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct ClassifyArgs {
    /// Identity number to classify
    #[schemars(description = "Identity number to classify")]
    pub value: Option<String>,
}
