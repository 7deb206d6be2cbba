//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let fixture = TestFixture::new();
//!     let platform = ManifestRepo::init(&fixture.child_path("platform"));
//!     platform.commit_projects(&["platform/build"]).tag("android-14.0.0_r1");
//!     // ... test code
//! }
//! ```

#![allow(dead_code)]

use assert_fs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::{git_available, ManifestRepo, TestFixture};
}

/// Whether a usable `git` binary is on the PATH.
///
/// Tests that build manifest repositories return early without it.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A throwaway upstream manifest repository.
pub struct ManifestRepo {
    dir: PathBuf,
}

impl ManifestRepo {
    /// Create an empty repository on branch `master` at `dir`.
    pub fn init(dir: &Path) -> Self {
        fs::create_dir_all(dir).expect("Failed to create repository directory");
        let repo = Self {
            dir: dir.to_path_buf(),
        };
        repo.git(&["init", "--quiet"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/master"]);
        repo
    }

    /// URL to put in a configuration.
    pub fn url(&self) -> String {
        self.dir.to_string_lossy().into_owned()
    }

    /// Commit `default.xml` declaring `projects`.
    pub fn commit_projects(&self, projects: &[&str]) -> &Self {
        let body: String = projects
            .iter()
            .map(|name| format!("  <project name=\"{}\" />\n", name))
            .collect();
        self.commit_document(
            "default.xml",
            &format!("<manifest>\n  <remote name=\"aosp\" fetch=\"..\" />\n{}</manifest>\n", body),
        )
    }

    /// Commit `content` as `document`.
    pub fn commit_document(&self, document: &str, content: &str) -> &Self {
        let path = self.dir.join(document);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create document directory");
        }
        fs::write(&path, content).expect("Failed to write document");
        self.git(&["add", document]);
        self.git(&["commit", "--quiet", "--allow-empty", "-m", document]);
        self
    }

    /// Tag the current commit.
    pub fn tag(&self, name: &str) -> &Self {
        self.git(&["tag", name]);
        self
    }

    /// Create and switch to a new branch at the current commit.
    pub fn branch(&self, name: &str) -> &Self {
        self.git(&["checkout", "--quiet", "-b", name]);
        self
    }

    fn git(&self, args: &[&str]) {
        let output = Command::new("git")
            .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
            .args(args)
            .current_dir(&self.dir)
            .env("GIT_AUTHOR_NAME", "test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com")
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// A temporary directory holding a `manifest-union.yaml` and a private cache.
///
/// ```rust,ignore
/// let fixture = TestFixture::new().with_config(&yaml);
/// fixture.command().arg("generate").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `manifest-union.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("manifest-union.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of `name` inside the fixture.
    pub fn child_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.child_path("manifest-union.yaml")
    }

    /// Cache root used by [`TestFixture::command`].
    pub fn cache_root(&self) -> PathBuf {
        self.child_path("cache")
    }

    /// Create a command running in this fixture's directory with its own cache.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("manifest-union");
        cmd.current_dir(self.path())
            .env("MANIFEST_UNION_CACHE", self.cache_root())
            .env_remove("MANIFEST_UNION_CONFIG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
