//! End-to-end tests for the envspec binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn envspec() -> Command {
    Command::cargo_bin("envspec").unwrap()
}

fn write_doc(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_export_prints_resolved_document() {
    let temp = tempdir().unwrap();
    write_doc(
        temp.path(),
        "base.yml",
        "channels:\n  - included\naliases:\n  gs: git status\n",
    );
    write_doc(
        temp.path(),
        "environment.yml",
        "name: demo\nchannels:\n  - own\nincludes:\n  - base.yml\n",
    );

    envspec()
        .arg("export")
        .arg("--file")
        .arg(temp.path().join("environment.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("name: demo"))
        .stdout(predicate::str::contains("- included\n- own"))
        .stdout(predicate::str::contains("gs: git status"));
}

#[test]
fn test_export_output_round_trips() {
    let temp = tempdir().unwrap();
    write_doc(
        temp.path(),
        "environment.yml",
        "name: demo\ndependencies:\n  - python=3.12\n  - pip:\n      - rich\n",
    );
    let out = temp.path().join("resolved.yml");

    envspec()
        .arg("export")
        .arg("--file")
        .arg(temp.path().join("environment.yml"))
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    // Exporting the exported file again must be a fixed point.
    let first = std::fs::read_to_string(&out).unwrap();
    let assert = envspec()
        .arg("export")
        .arg("--file")
        .arg(&out)
        .assert()
        .success();
    let second = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_export_missing_document_fails() {
    let temp = tempdir().unwrap();
    envspec()
        .arg("export")
        .arg("--file")
        .arg(temp.path().join("missing.yml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_export_honors_name_override() {
    let temp = tempdir().unwrap();
    write_doc(temp.path(), "environment.yml", "name: original\n");

    envspec()
        .arg("export")
        .arg("--file")
        .arg(temp.path().join("environment.yml"))
        .arg("--name")
        .arg("renamed")
        .assert()
        .success()
        .stdout(predicate::str::contains("name: renamed"));
}

#[test]
fn test_create_writes_activation_scripts() {
    let temp = tempdir().unwrap();
    write_doc(
        temp.path(),
        "environment.yml",
        "name: demo\nenvironment:\n  - TOOLS: /opt/tools\naliases:\n  ls: ls -la\n",
    );
    let prefix = temp.path().join("prefix");

    envspec()
        .arg("create")
        .arg("--file")
        .arg(temp.path().join("environment.yml"))
        .arg("--prefix")
        .arg(&prefix)
        .assert()
        .success();

    let ext = if cfg!(windows) { "bat" } else { "sh" };
    assert!(
        prefix
            .join("etc/envspec/activate.d")
            .join(format!("_activate.{ext}"))
            .exists()
    );
    assert!(
        prefix
            .join("etc/envspec/deactivate.d")
            .join(format!("_deactivate.{ext}"))
            .exists()
    );
}

#[test]
fn test_create_skips_scripts_for_empty_fields() {
    let temp = tempdir().unwrap();
    write_doc(temp.path(), "environment.yml", "name: bare\n");
    let prefix = temp.path().join("prefix");

    envspec()
        .arg("create")
        .arg("--file")
        .arg(temp.path().join("environment.yml"))
        .arg("--prefix")
        .arg(&prefix)
        .assert()
        .success();

    assert!(prefix.exists());
    assert!(!prefix.join("etc/envspec").exists());
}

#[test]
fn test_create_unregistered_namespace_exits_distinctly() {
    let temp = tempdir().unwrap();
    write_doc(
        temp.path(),
        "environment.yml",
        "name: demo\ndependencies:\n  - pip:\n      - rich\n",
    );

    envspec()
        .arg("create")
        .arg("--file")
        .arg(temp.path().join("environment.yml"))
        .arg("--prefix")
        .arg(temp.path().join("prefix"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("pip"));
}
