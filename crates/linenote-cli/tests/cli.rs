//! Runs the `linenote` binary end to end: exit codes and what reaches the notes file.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Runs `linenote --file <notes> <args>` with `stdin` piped in. HOME and the XDG data dir
/// point into `dir` so the user's real config is never read or written.
fn linenote(dir: &Path, notes: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_linenote"))
        .arg("--file")
        .arg(notes)
        .args(args)
        .env("HOME", dir)
        .env("XDG_DATA_HOME", dir.join("data"))
        .env_remove("LINENOTE_FILE")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    (dir, notes)
}

fn seed(dir: &Path, notes: &Path, bodies: &[&str]) {
    for body in bodies {
        assert!(linenote(dir, notes, &["add", body], "").status.success());
    }
}

#[test]
fn unwritable_notes_file_is_fatal() {
    let (dir, _) = setup();
    let notes = dir.path().join("missing-dir").join("notes.txt");
    let out = linenote(dir.path(), &notes, &["list"], "");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot create notes file"));
    assert!(!notes.exists());
}

#[test]
fn add_lines_then_list_json() {
    let (dir, notes) = setup();
    let out = linenote(dir.path(), &notes, &["add", "a", "b"], "");
    assert!(out.status.success());

    let out = linenote(dir.path(), &notes, &["list", "--json"], "");
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let listed = value.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["index"], 1);
    assert_eq!(listed[0]["body"], "a\nb");
}

#[test]
fn add_reads_stdin_until_empty_line() {
    let (dir, notes) = setup();
    let out = linenote(dir.path(), &notes, &["add"], "first\nsecond\n\nignored\n");
    assert!(out.status.success());
    let text = std::fs::read_to_string(&notes).unwrap();
    assert!(text.ends_with(" :: first \\n second\n"));
}

#[test]
fn blank_add_exits_1() {
    let (dir, notes) = setup();
    let out = linenote(dir.path(), &notes, &["add"], "\n");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(std::fs::read_to_string(&notes).unwrap(), "");
}

#[test]
fn delete_out_of_range_exits_1_and_keeps_file() {
    let (dir, notes) = setup();
    seed(dir.path(), &notes, &["one", "two", "three"]);
    let before = std::fs::read_to_string(&notes).unwrap();

    let out = linenote(dir.path(), &notes, &["delete", "5", "--yes"], "");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(std::fs::read_to_string(&notes).unwrap(), before);
}

#[test]
fn declined_delete_exits_0_and_keeps_file() {
    let (dir, notes) = setup();
    seed(dir.path(), &notes, &["one", "two"]);
    let before = std::fs::read_to_string(&notes).unwrap();

    let out = linenote(dir.path(), &notes, &["delete", "1"], "n\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Aborted."));
    assert_eq!(std::fs::read_to_string(&notes).unwrap(), before);
}

#[test]
fn confirmed_delete_removes_note() {
    let (dir, notes) = setup();
    seed(dir.path(), &notes, &["one", "two", "three"]);

    let out = linenote(dir.path(), &notes, &["delete", "2"], "y\n");
    assert!(out.status.success());

    let out = linenote(dir.path(), &notes, &["list", "--json"], "");
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let bodies: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["body"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(bodies, vec!["one", "three"]);
}

#[test]
fn clear_needs_yes() {
    let (dir, notes) = setup();
    seed(dir.path(), &notes, &["one"]);

    let out = linenote(dir.path(), &notes, &["clear"], "yes\n");
    assert!(out.status.success());
    assert_ne!(std::fs::read_to_string(&notes).unwrap(), "");

    let out = linenote(dir.path(), &notes, &["clear", "--yes"], "");
    assert!(out.status.success());
    assert_eq!(std::fs::read_to_string(&notes).unwrap(), "");
}

#[test]
fn search_without_hits_prints_message() {
    let (dir, notes) = setup();
    seed(dir.path(), &notes, &["Buy milk"]);

    let out = linenote(dir.path(), &notes, &["search", "MILK"], "");
    assert!(String::from_utf8_lossy(&out.stdout).contains("\tBuy milk"));

    let out = linenote(dir.path(), &notes, &["search", "bread"], "");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("(No matches found)"));
}
