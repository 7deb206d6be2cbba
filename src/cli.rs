//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Manifest Union - Aggregate every project ever declared by upstream manifests
#[derive(Parser, Debug)]
#[command(name = "manifest-union")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan every configured revision and write the aggregate manifest
    Generate(commands::generate::GenerateArgs),

    /// Validate a manifest-union.yaml configuration file
    Validate(commands::validate::ValidateArgs),

    /// List the revisions each namespace would scan
    Revisions(commands::revisions::RevisionsArgs),

    /// Show the group labels project names would receive
    Classify(commands::classify::ClassifyArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, &self.color),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Revisions(args) => commands::revisions::execute(args),
            Commands::Classify(args) => commands::classify::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Log to stderr at `level`; `RUST_LOG`-style filters such as
/// `manifest_union::phases=debug` are accepted too.
fn init_logging(level: &str) {
    // A second init (tests running the CLI in-process) is harmless
    let _ = env_logger::Builder::new()
        .parse_filters(level)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
