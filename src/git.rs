//! Thin wrappers around the system `git` binary.
//!
//! Manifest repositories are kept as bare clones; documents are read
//! straight from the object database with `git cat-file`, so no revision
//! is ever checked out.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which refs of a manifest repository count as revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefSelection {
    #[default]
    Tags,
    Branches,
    All,
}

impl RefSelection {
    fn patterns(self) -> &'static [&'static str] {
        match self {
            RefSelection::Tags => &["refs/tags"],
            RefSelection::Branches => &["refs/heads"],
            RefSelection::All => &["refs/heads", "refs/tags"],
        }
    }
}

/// A ref and the commit it ultimately points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRef {
    pub name: String,
    pub commit: String,
}

fn run(command: &mut Command, label: &str, url: &str) -> Result<Output> {
    command.output().map_err(|e| Error::SourceUnavailable {
        source_name: url.to_string(),
        message: format!("failed to run git {}: {}", label, e),
    })
}

fn failure(label: &str, url: &str, output: &Output) -> Error {
    Error::GitCommand {
        command: label.to_string(),
        url: url.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Clone `url` as a bare repository into `target_dir`.
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Any authentication configured in ~/.gitconfig
pub fn clone_bare(url: &str, target_dir: &Path) -> Result<()> {
    // git won't clone into an existing non-empty dir
    if target_dir.exists() {
        fs::remove_dir_all(target_dir)?;
    }
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let output = run(
        Command::new("git")
            .args(["clone", "--bare", "--quiet", url])
            .arg(target_dir),
        "clone",
        url,
    )?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository.\n\
                 Error: {}",
                stderr.trim()
            )
        } else {
            stderr.trim().to_string()
        };
        return Err(Error::SourceUnavailable {
            source_name: url.to_string(),
            message,
        });
    }

    Ok(())
}

/// Update every branch and tag of a bare clone from its origin.
pub fn fetch(repo_dir: &Path, url: &str) -> Result<()> {
    let output = run(
        Command::new("git")
            .arg("--git-dir")
            .arg(repo_dir)
            .args([
                "fetch",
                "--quiet",
                "--prune",
                "--force",
                "origin",
                "+refs/heads/*:refs/heads/*",
                "+refs/tags/*:refs/tags/*",
            ]),
        "fetch",
        url,
    )?;

    if !output.status.success() {
        return Err(failure("fetch", url, &output));
    }
    Ok(())
}

/// List the selected refs of a clone along with their peeled commits.
pub fn list_refs(repo_dir: &Path, url: &str, selection: RefSelection) -> Result<Vec<GitRef>> {
    let output = run(
        Command::new("git")
            .arg("--git-dir")
            .arg(repo_dir)
            .args([
                "for-each-ref",
                "--format=%(refname:short)%09%(objectname)%09%(*objectname)",
            ])
            .args(selection.patterns()),
        "for-each-ref",
        url,
    )?;

    if !output.status.success() {
        return Err(failure("for-each-ref", url, &output));
    }

    Ok(parse_ref_listing(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `for-each-ref` output of the form `<name>\t<object>\t<peeled>`.
///
/// Annotated tags carry the tagged commit in the peeled column; everything
/// else points at its commit directly.
pub fn parse_ref_listing(stdout: &str) -> Vec<GitRef> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let name = parts.next()?.trim();
            let object = parts.next()?.trim();
            let peeled = parts.next().unwrap_or("").trim();
            if name.is_empty() || object.is_empty() {
                return None;
            }
            let commit = if peeled.is_empty() { object } else { peeled };
            Some(GitRef {
                name: name.to_string(),
                commit: commit.to_string(),
            })
        })
        .collect()
}

/// Read `document` as of `revision`. `Ok(None)` when it does not exist there.
pub fn show_file(
    repo_dir: &Path,
    url: &str,
    revision: &str,
    document: &str,
) -> Result<Option<Vec<u8>>> {
    let object = format!("{}:{}", revision, document);
    let output = run(
        Command::new("git")
            .arg("--git-dir")
            .arg(repo_dir)
            .args(["cat-file", "blob", &object]),
        "cat-file",
        url,
    )?;

    if output.status.success() {
        return Ok(Some(output.stdout));
    }

    if is_missing_object(&String::from_utf8_lossy(&output.stderr)) {
        return Ok(None);
    }
    Err(failure("cat-file", url, &output))
}

fn is_missing_object(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    stderr.contains("not a valid object name")
        || stderr.contains("invalid object name")
        || stderr.contains("does not exist")
}
