//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a
//! `manifest-union.yaml` configuration without scanning anything.
//!
//! ## Functionality
//!
//! - **Configuration Validation**: Parses the file and runs every check the
//!   library performs before a run (unique namespaces, compilable rules, ...).
//! - **Summary**: Prints each namespace in precedence order with its source.
//! - **Source Validation**: With `--check-sources`, also clones or updates
//!   every manifest repository and counts the revisions that would be
//!   scanned.
//!
//! Apart from the cache, this command does not modify any files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use manifest_union::config::{self, Config};
use manifest_union::defaults::{default_cache_root, DEFAULT_CONFIG_FILENAME};
use manifest_union::output::{OutputConfig, Status};
use manifest_union::phases::{orchestrator, phase1};
use manifest_union::suggestions;

/// Validate a manifest-union.yaml configuration file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "MANIFEST_UNION_CONFIG",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,

    /// The root directory for the repository cache.
    ///
    /// If not provided, it defaults to the system's cache directory
    /// (e.g., `~/.cache/manifest-union` on Linux).
    #[arg(long, value_name = "DIR", env = "MANIFEST_UNION_CACHE")]
    pub cache_root: Option<PathBuf>,

    /// Also check that every manifest repository can be reached and listed.
    #[arg(long)]
    pub check_sources: bool,

    /// Only use cached clones when checking sources.
    #[arg(long, requires = "check_sources")]
    pub offline: bool,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config_path = &args.config;
    println!(
        "{} Validating configuration: {}",
        Status::Scan.marker(&out),
        config_path.display()
    );

    if !config_path.exists() {
        return Err(suggestions::config_not_found(config_path));
    }

    let config = match config::from_file(config_path) {
        Ok(config) => {
            println!("{} Configuration is valid", Status::Ok.marker(&out));
            config
        }
        Err(e) => {
            println!(
                "{} Configuration is invalid: {}",
                Status::Err.marker(&out),
                e
            );
            return Err(explain(config_path, e));
        }
    };

    print_summary(&config, &out);

    if args.check_sources {
        check_sources(&config, &args, &out)?;
    }
    Ok(())
}

fn print_summary(config: &Config, out: &OutputConfig) {
    println!("\n{} Configuration Summary:", Status::Info.marker(out));
    println!("   Remote: {} ({})", config.remote.name, config.remote.fetch);
    match &config.rules {
        Some(rules) => println!("   Classification rules: {}", rules.len()),
        None => println!("   Classification rules: built-in"),
    }

    let mut order: Vec<(u32, &str, &str)> = config
        .namespaces
        .iter()
        .enumerate()
        .map(|(index, ns)| {
            (
                config.precedence_of(index),
                ns.name.as_str(),
                ns.source.url.as_str(),
            )
        })
        .collect();
    order.sort_by_key(|(precedence, _, _)| *precedence);

    println!("   Namespaces (highest precedence first):");
    for (precedence, name, url) in order {
        println!("     {:>3}  {}  {}", precedence, out.emphasize(name), url);
    }
}

fn check_sources(config: &Config, args: &ValidateArgs, out: &OutputConfig) -> Result<()> {
    println!("\n{} Checking sources...", Status::Scan.marker(out));
    let cache_root = args.cache_root.clone().unwrap_or_else(default_cache_root);
    let namespaces = orchestrator::build_namespaces(config, &cache_root, args.offline);
    orchestrator::prepare_sources(&namespaces)?;

    for namespace in &namespaces {
        let selected = phase1::select_revisions(namespace)?;
        if selected.is_empty() {
            println!(
                "{} {}: no revisions would be scanned",
                Status::Warn.marker(out),
                namespace.name
            );
        } else {
            println!(
                "{} {}: {} revisions",
                Status::Ok.marker(out),
                namespace.name,
                selected.len()
            );
        }
    }
    Ok(())
}

/// Attach a hint to rule errors where one helps.
fn explain(path: &std::path::Path, error: manifest_union::error::Error) -> anyhow::Error {
    if let manifest_union::error::Error::InvalidRule { label, .. } = &error {
        let pattern = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_yaml::from_str::<Config>(&content).ok())
            .and_then(|config| config.rules)
            .and_then(|rules| rules.into_iter().find(|rule| &rule.label == label))
            .and_then(|rule| rule.regex);
        if let Some(pattern) = pattern {
            if let Err(regex_error) = regex::Regex::new(&pattern) {
                return suggestions::invalid_regex(&pattern, &regex_error);
            }
        }
    }
    anyhow::anyhow!("Configuration validation failed: {}", error)
}
