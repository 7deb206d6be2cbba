//! Classify command implementation
//!
//! Prints the group labels the given project names would receive. Rules
//! come from the configuration when `--config` is given and from the
//! built-in Android rules otherwise.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use manifest_union::classifier::{join_labels, Classifier};
use manifest_union::config;
use manifest_union::defaults::default_rules;
use manifest_union::suggestions;

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Project names to classify
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,

    /// Take the rules from this config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extra labels added to every name, as a namespace would
    #[arg(short, long = "extra", value_name = "LABEL")]
    pub extra: Vec<String>,

    /// Print JSON instead of tab-separated lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Classified<'a> {
    name: &'a str,
    groups: Vec<String>,
}

/// Execute the classify command
pub fn execute(args: ClassifyArgs) -> Result<()> {
    let classifier = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(suggestions::config_not_found(path));
            }
            config::from_file(path)?.classifier()?
        }
        None => Classifier::new(default_rules()?),
    };

    if args.json {
        let classified: Vec<Classified<'_>> = args
            .names
            .iter()
            .map(|name| Classified {
                name,
                groups: classifier.classify(name, &args.extra).into_iter().collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&classified)?);
    } else {
        for name in &args.names {
            println!("{}\t{}", name, join_labels(&classifier.classify(name, &args.extra)));
        }
    }
    Ok(())
}
