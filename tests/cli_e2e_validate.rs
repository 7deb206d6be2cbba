//! End-to-end tests for the `validate` command.
//!
//! These tests invoke the actual CLI binary and validate the behavior of the
//! `validate` subcommand from a user's perspective.

mod common;
use common::prelude::*;

const VALID: &str = r#"
remote: { name: aosp, fetch: https://android.googlesource.com }
namespaces:
  - name: platform
    source: { url: https://android.googlesource.com/platform/manifest }
  - name: kernel
    precedence: 0
    source: { url: https://android.googlesource.com/kernel/manifest }
"#;

#[test]
fn test_validate_valid_config() {
    let fixture = TestFixture::new().with_config(VALID);

    fixture
        .command()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Configuration is valid"))
        .stdout(predicate::str::contains("Classification rules: built-in"))
        .stdout(predicate::str::contains("kernel"));
}

#[test]
fn test_validate_explicit_config_path() {
    let fixture = TestFixture::new();
    let config = fixture.child_path("nested/aosp.yaml");
    std::fs::create_dir_all(config.parent().unwrap()).unwrap();
    std::fs::write(&config, VALID).unwrap();

    fixture
        .command()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();
}

#[test]
fn test_validate_invalid_yaml() {
    let fixture = TestFixture::new().with_config("remote: [unclosed\n");

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn test_validate_duplicate_namespace() {
    let fixture = TestFixture::new().with_config(
        r#"
remote: { name: aosp, fetch: ".." }
namespaces:
  - { name: a, source: { url: a } }
  - { name: a, source: { url: b } }
"#,
    );

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate namespace"));
}

#[test]
fn test_validate_invalid_regex_rule_has_hint() {
    let fixture = TestFixture::new().with_config(
        r#"
remote: { name: aosp, fetch: ".." }
rules:
  - { label: broken, regex: "device/(" }
namespaces:
  - { name: a, source: { url: a } }
"#,
    );

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid regex pattern: device/("))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_validate_missing_config() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MANIFEST_UNION_CONFIG"));
}

#[test]
fn test_validate_check_sources() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new();
    let repo = ManifestRepo::init(&fixture.child_path("upstream"));
    repo.commit_projects(&["a"]).tag("v1");
    repo.commit_projects(&["a", "b"]).tag("v2");
    let fixture = fixture.with_config(&format!(
        "remote: {{ name: aosp, fetch: '..' }}\nnamespaces:\n  - {{ name: up, source: {{ url: '{}' }} }}\n",
        repo.url()
    ));

    fixture
        .command()
        .args(["validate", "--check-sources"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up: 2 revisions"));
}
