//! Revisions command implementation
//!
//! Lists, per namespace, the revisions a `generate` run would scan and the
//! document it would read from each. Useful to check skip lists and document
//! overrides without fetching any document.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use manifest_union::config;
use manifest_union::defaults::{default_cache_root, DEFAULT_CONFIG_FILENAME};
use manifest_union::phases::{orchestrator, phase1};
use manifest_union::suggestions;

/// Arguments for the revisions command
#[derive(Args, Debug)]
pub struct RevisionsArgs {
    /// Path to config file
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "MANIFEST_UNION_CONFIG",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,

    /// Cache root directory for manifest repository clones
    #[arg(long, value_name = "PATH", env = "MANIFEST_UNION_CACHE")]
    pub cache_root: Option<PathBuf>,

    /// Use cached clones only
    #[arg(long)]
    pub offline: bool,

    /// Only list this namespace
    #[arg(short, long, value_name = "NAME")]
    pub namespace: Option<String>,

    /// Print JSON instead of tab-separated lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SelectedRevision {
    namespace: String,
    revision: String,
    document: String,
}

/// Execute the revisions command
pub fn execute(args: RevisionsArgs) -> Result<()> {
    if !args.config.exists() {
        return Err(suggestions::config_not_found(&args.config));
    }
    let config = config::from_file(&args.config)?;

    if let Some(name) = &args.namespace {
        if config.namespace(name).is_none() {
            let known: Vec<&str> = config.namespaces.iter().map(|ns| ns.name.as_str()).collect();
            return Err(suggestions::unknown_namespace(name, &known));
        }
    }

    let cache_root = args.cache_root.clone().unwrap_or_else(default_cache_root);
    let namespaces: Vec<_> = orchestrator::build_namespaces(&config, &cache_root, args.offline)
        .into_iter()
        .filter(|ns| args.namespace.as_ref().is_none_or(|name| &ns.name == name))
        .collect();
    orchestrator::prepare_sources(&namespaces)?;

    let mut listing = Vec::new();
    for namespace in &namespaces {
        for (revision, document) in phase1::select_revisions(namespace)? {
            listing.push(SelectedRevision {
                namespace: namespace.name.clone(),
                revision,
                document,
            });
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for entry in &listing {
            println!("{}\t{}\t{}", entry.namespace, entry.revision, entry.document);
        }
    }
    Ok(())
}
