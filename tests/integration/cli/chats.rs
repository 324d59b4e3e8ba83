//! `tigs` binary: local chat commands.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tigs::core::decode;

use crate::fixtures::chat_text;
use crate::fixtures::git::Rig;

pub(super) fn tigs(repo: &Path, config_dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tigs");
    cmd.current_dir(repo);
    cmd.env("TIGS_CONFIG_DIR", config_dir);
    for var in ["TIGS_LOG", "TIGS_REMOTE", "TIGS_STRATEGY", "TIGS_LOG_DIR"] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn add_show_list_remove_round_trip() {
    let rig = Rig::new();
    let repo = rig.clone_as("a");
    let config = rig.config_dir();
    let base = rig.base.to_string();

    tigs(&repo, &config)
        .args(["add-chat", "-m", &chat_text("cli")])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Added chat to commit: {base}")));

    let shown = tigs(&repo, &config).args(["show-chat", &base[..8]]).output().unwrap();
    assert!(shown.status.success());
    let text = String::from_utf8(shown.stdout).unwrap();
    assert_eq!(decode(&text).unwrap(), decode(&chat_text("cli")).unwrap());

    tigs(&repo, &config)
        .arg("list-chats")
        .assert()
        .success()
        .stdout(format!("{base}\n"));

    tigs(&repo, &config)
        .arg("remove-chat")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed chat from commit"));

    tigs(&repo, &config)
        .arg("show-chat")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(format!(
            "Error: No chat found for commit: {base}"
        )));
}

#[test]
fn malformed_chat_is_rejected_with_format_status() {
    let rig = Rig::new();
    let repo = rig.clone_as("a");
    let config = rig.config_dir();

    tigs(&repo, &config)
        .args(["add-chat", "-m", "schema: tigs.chat/v2\nmessages: []\n"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("tigs.chat/v2")));

    tigs(&repo, &config)
        .args(["add-chat", "-m", "   "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No content provided"));

    tigs(&repo, &config).arg("list-chats").assert().success().stdout("");
}

#[test]
fn json_output_is_structured() {
    let rig = Rig::new();
    let repo = rig.clone_as("a");
    let config = rig.config_dir();
    let base = rig.base.to_string();

    tigs(&repo, &config)
        .args(["add-chat", "-m", &chat_text("json")])
        .assert()
        .success();

    let out = tigs(&repo, &config)
        .args(["--json", "show-chat"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["commit"], base.as_str());
    assert_eq!(value["chats"][0]["schema"], "tigs.chat/v1");
    assert_eq!(value["chats"][0]["messages"][1]["model"], "test-model");

    let out = tigs(&repo, &config).args(["list-chats", "--json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value, serde_json::json!([base]));
}

#[test]
fn outside_a_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    tigs(dir.path(), dir.path())
        .arg("list-chats")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn invalid_repo_config_is_reported() {
    let rig = Rig::new();
    let repo = rig.clone_as("a");
    std::fs::write(repo.join(".tigs.toml"), "strategy = \"rebase\"\n").unwrap();

    tigs(&repo, &rig.config_dir())
        .arg("list-chats")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".tigs.toml"));
}
