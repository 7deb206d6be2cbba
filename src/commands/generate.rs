//! Generate command implementation
//!
//! Runs the whole pipeline for a configuration:
//! 1. Clone or update every namespace's manifest repository
//! 2. Scan each eligible revision and union the declared projects
//! 3. Reconcile namespaces and annotate projects with paths and groups
//! 4. Render the manifest to a file or stdout

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use manifest_union::config;
use manifest_union::defaults::{default_cache_root, DEFAULT_CONFIG_FILENAME};
use manifest_union::output::{OutputConfig, Status};
use manifest_union::phases::orchestrator;
use manifest_union::render;
use manifest_union::suggestions;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to config file
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "MANIFEST_UNION_CONFIG",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,

    /// Manifest file to write (overrides `output` in the config)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Cache root directory for manifest repository clones
    #[arg(long, value_name = "PATH", env = "MANIFEST_UNION_CACHE")]
    pub cache_root: Option<PathBuf>,

    /// Use cached clones only; never touch the network
    #[arg(long)]
    pub offline: bool,

    /// Number of revisions fetched in parallel (overrides `jobs` in the config)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Print the manifest to stdout instead of writing a file
    #[arg(long, visible_alias = "dry-run")]
    pub stdout: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let start_time = Instant::now();
    // Status lines would corrupt a manifest printed to stdout
    let chatty = !args.quiet && !args.stdout;

    if !args.config.exists() {
        return Err(suggestions::config_not_found(&args.config));
    }
    let config = config::from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let output_path = if args.stdout {
        None
    } else {
        Some(
            args.output
                .clone()
                .or_else(|| config.output.clone())
                .ok_or_else(suggestions::no_output_file)?,
        )
    };

    let cache_root = args.cache_root.clone().unwrap_or_else(default_cache_root);

    let mut options = orchestrator::options_from_config(&config);
    if let Some(jobs) = args.jobs {
        options.jobs = Some(usize::from(jobs));
    }
    options.progress = !args.quiet && console::Term::stderr().is_term();

    if chatty {
        println!(
            "{} Aggregating {} namespaces from {}",
            Status::Scan.marker(&out),
            config.namespaces.len(),
            args.config.display()
        );
    }

    let manifest = orchestrator::execute_generate(&config, &cache_root, args.offline, &options)?;

    // Render fully before touching the output file
    let mut rendered = Vec::new();
    render::write_manifest(&manifest, &config.header(), &mut rendered)?;

    match output_path {
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&rendered)?;
            lock.flush()?;
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            if chatty {
                println!(
                    "{} Wrote {} projects to {}",
                    Status::Write.marker(&out),
                    out.emphasize(manifest.len()),
                    path.display()
                );
            }
        }
    }

    if chatty {
        println!(
            "{} Generated in {:.2}s",
            Status::Ok.marker(&out),
            start_time.elapsed().as_secs_f64()
        );
    }
    Ok(())
}
