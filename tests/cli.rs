//! Integration tests for the promptdump command-line contract:
//! exit status, stdout summary, stderr errors.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

/// Helper to build a promptdump command
fn promptdump() -> Command {
    let mut cmd = Command::cargo_bin("promptdump").expect("promptdump binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn project(base: &Path, name: &str) -> std::path::PathBuf {
    let root = base.join(name);
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("README.md"), "# Demo\n").unwrap();
    fs::write(root.join("src").join("main.rs"), "fn main() {}\n").unwrap();
    root
}

#[test]
fn dump_codebase_prints_summary_and_writes_file() {
    let temp = tempdir().unwrap();
    let root = project(temp.path(), "Demo");

    promptdump()
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("✅ Codebase dumped to: Demo.txt"))
        .stdout(predicate::str::contains("2 files included"))
        .stderr(predicate::str::is_empty());

    let doc = fs::read_to_string(root.join("Demo.txt")).unwrap();
    assert!(doc.contains("Demo/\n├── src/\n│   └── main.rs\n└── README.md"));
}

#[test]
fn second_run_gets_numbered_name() {
    let temp = tempdir().unwrap();
    let root = project(temp.path(), "Demo");

    promptdump().arg(&root).assert().success();
    promptdump()
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo (1).txt"));

    assert_eq!(
        fs::read(root.join("Demo.txt")).unwrap(),
        fs::read(root.join("Demo (1).txt")).unwrap()
    );
}

#[test]
fn prompt_flag_prefixes_persona() {
    let temp = tempdir().unwrap();
    let root = project(temp.path(), "Demo");

    promptdump()
        .arg(&root)
        .args(["--prompt", "rooreview"])
        .assert()
        .success();

    let doc = fs::read_to_string(root.join("Demo.txt")).unwrap();
    assert!(doc.starts_with("# 🧠 You are *RooReview*"));
}

#[test]
fn unknown_persona_fails_before_scanning() {
    let temp = tempdir().unwrap();
    let root = project(temp.path(), "Demo");

    promptdump()
        .arg(&root)
        .args(["--prompt", "pirate"])
        .assert()
        .code(5)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unknown persona 'pirate'"));

    assert!(!root.join("Demo.txt").exists());
}

#[test]
fn missing_root_is_reported_on_stderr() {
    let temp = tempdir().unwrap();

    promptdump()
        .arg(temp.path().join("nope"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid project root"));
}

#[test]
fn diff_mode_outside_repository_fails() {
    let temp = tempdir().unwrap();
    let root = project(temp.path(), "Demo");

    promptdump()
        .arg(&root)
        .args(["--mode", "dump-diff", "--no-prompt"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Not a version-controlled project"));

    assert!(!root.join("diff_dump.txt").exists());
}

#[test]
fn completions_are_generated() {
    promptdump()
        .args(["--generate", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("promptdump"));
}
