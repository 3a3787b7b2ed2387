//! Integration tests for the `tl` CLI.
//!
//! Each test creates a temp root directory, runs `tl` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn tl(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tl"))
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .expect("failed to run tl")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// A root with stable colours and one groceries list
fn create_test_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("tinylist.toml"),
        "[display]\ncolours = \"stable\"\n",
    )
    .unwrap();
    fs::create_dir_all(tmp.path().join("lists")).unwrap();
    fs::write(
        tmp.path().join("lists/groceries.list"),
        "\
Name Groceries
Colour green

BeginItems
Item apple
Item fruit:banana
Item zebra
EndItems
",
    )
    .unwrap();
    tmp
}

fn read_list(root: &Path, key: &str) -> String {
    fs::read_to_string(root.join("lists").join(format!("{}.list", key))).unwrap()
}

#[test]
fn new_creates_list_file() {
    let tmp = TempDir::new().unwrap();
    let out = tl(tmp.path(), &["new", "My Groceries"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "created my_groceries\n");
    assert_eq!(
        read_list(tmp.path(), "my_groceries"),
        "Name My Groceries\n\nBeginItems\nEndItems\n"
    );
}

#[test]
fn new_with_colour_and_json() {
    let tmp = TempDir::new().unwrap();
    let out = tl(tmp.path(), &["--json", "new", "Chores", "--colour", "orange"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["key"], "chores");
    assert!(read_list(tmp.path(), "chores").contains("Colour orange\n"));
}

#[test]
fn new_rejects_unknown_colour_and_duplicates() {
    let tmp = create_test_root();
    let out = tl(tmp.path(), &["new", "x", "--colour", "plaid"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("unknown colour 'plaid'"));

    let before = read_list(tmp.path(), "groceries");
    let out = tl(tmp.path(), &["new", "Groceries"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("already taken"));
    assert_eq!(read_list(tmp.path(), "groceries"), before);
}

#[test]
fn lists_shows_overview() {
    let tmp = create_test_root();
    tl(tmp.path(), &["new", "Empty"]);

    let out = tl(tmp.path(), &["lists"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("empty      Empty ["));
    assert!(lines[0].ends_with("(0 items)"));
    assert_eq!(lines[1], "groceries  Groceries [green] (3 items)");

    let out = tl(tmp.path(), &["lists", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json[1]["key"], "groceries");
    assert_eq!(json[1]["item_count"], 3);
}

#[test]
fn lists_without_directory() {
    let tmp = TempDir::new().unwrap();
    let out = tl(tmp.path(), &["lists"]);
    assert!(out.status.success());
    assert!(stdout(&out).starts_with("no lists yet"));
}

#[test]
fn show_prints_tree_with_lines() {
    let tmp = create_test_root();
    let out = tl(tmp.path(), &["show", "groceries"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Groceries [green] (3 items)");
    assert_eq!(lines[1], "   5  apple");
    assert!(lines[2].starts_with("      fruit: ["));
    assert_eq!(lines[3], "   6    banana");
    assert_eq!(lines[4], "   7  zebra");
}

#[test]
fn show_missing_list_fails() {
    let tmp = create_test_root();
    let out = tl(tmp.path(), &["show", "nope"]);
    assert!(!out.status.success());
    assert_eq!(stderr(&out), "error: list nope does not exist\n");
}

#[test]
fn add_alter_rm_cycle() {
    let tmp = create_test_root();

    let out = tl(tmp.path(), &["add", "groceries", "fruit:cherry"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("   7    cherry"));
    assert_eq!(
        read_list(tmp.path(), "groceries"),
        "\
Name Groceries
Colour green

BeginItems
Item apple
Item fruit:banana
Item fruit:cherry
Item zebra
EndItems
"
    );

    let out = tl(
        tmp.path(),
        &["alter", "groceries", "8", "aardvark", "--expect", "zebra"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(read_list(tmp.path(), "groceries").contains("BeginItems\nItem aardvark\nItem apple\n"));

    let out = tl(tmp.path(), &["rm", "groceries", "5"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(!read_list(tmp.path(), "groceries").contains("aardvark"));
    assert!(stdout(&out).starts_with("Groceries [green] (3 items)"));
}

#[test]
fn stale_expectation_is_refused() {
    let tmp = create_test_root();
    let before = read_list(tmp.path(), "groceries");
    let out = tl(tmp.path(), &["rm", "groceries", "5", "--expect", "zebra"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("reload the list"));
    assert_eq!(read_list(tmp.path(), "groceries"), before);

    let out = tl(tmp.path(), &["rm", "groceries", "2"]);
    assert!(!out.status.success());
}

#[test]
fn delete_requires_confirmation() {
    let tmp = create_test_root();
    let out = tl(tmp.path(), &["delete", "groceries"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("--confirm delete"));

    let out = tl(tmp.path(), &["delete", "groceries", "--confirm", "yes"]);
    assert!(!out.status.success());
    assert!(tmp.path().join("lists/groceries.list").exists());

    let out = tl(tmp.path(), &["delete", "groceries", "--confirm", "delete"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "removed groceries\n");
    assert!(!tmp.path().join("lists/groceries.list").exists());
}

#[test]
fn recovery_shows_deleted_content() {
    let tmp = create_test_root();
    let out = tl(tmp.path(), &["recovery"]);
    assert_eq!(stdout(&out), "recovery log is empty\n");

    tl(tmp.path(), &["rm", "groceries", "7"]);
    tl(tmp.path(), &["delete", "groceries", "--confirm", "delete"]);

    let out = tl(tmp.path(), &["recovery", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["description"], "list deleted");
    assert_eq!(json[1]["description"], "item removed");
    assert_eq!(json[1]["body"], "Item zebra");
    assert_eq!(json[1]["fields"]["List"], "groceries");

    let out = tl(tmp.path(), &["recovery", "--limit", "1"]);
    assert_eq!(stdout(&out).matches("## ").count(), 1);
}

#[test]
fn custom_list_directory_from_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("tinylist.toml"),
        "[store]\ndir = \"data\"\n",
    )
    .unwrap();
    let out = tl(tmp.path(), &["new", "Elsewhere"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(tmp.path().join("data/elsewhere.list").exists());
}

#[test]
fn bad_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tinylist.toml"), "[store\n").unwrap();
    let out = tl(tmp.path(), &["lists"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("could not parse tinylist.toml"));
}
