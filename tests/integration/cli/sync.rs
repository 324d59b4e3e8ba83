//! `tigs` binary: fetch, pull and push between two clones.

use predicates::prelude::*;
use tigs::core::decode;

use super::chats::tigs;
use crate::fixtures::chat_text;
use crate::fixtures::git::Rig;

#[test]
fn union_pull_merges_both_clones() {
    let rig = Rig::new();
    let a = rig.clone_as("a");
    let b = rig.clone_as("b");
    let config = rig.config_dir();
    let base = rig.base.to_string();

    tigs(&a, &config).args(["add-chat", &base, "-m", &chat_text("A")]).assert().success();
    tigs(&b, &config).args(["add-chat", &base, "-m", &chat_text("B")]).assert().success();

    tigs(&a, &config)
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully pushed chats to 'origin'"));

    tigs(&b, &config)
        .args(["fetch", "origin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("refs/notes-remote/origin/chats"));

    tigs(&b, &config)
        .args(["pull", "--strategy=union"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 merged (+1 chats)"));

    let shown = tigs(&b, &config).args(["show-chat", &base]).output().unwrap();
    let docs = decode(&String::from_utf8(shown.stdout).unwrap()).unwrap();
    let mut expected = decode(&chat_text("B")).unwrap();
    expected.extend(decode(&chat_text("A")).unwrap());
    assert_eq!(docs, expected);

    tigs(&b, &config).arg("push").assert().success();
}

#[test]
fn manual_conflict_exits_non_zero() {
    let rig = Rig::new();
    let a = rig.clone_as("a");
    let b = rig.clone_as("b");
    let config = rig.config_dir();

    tigs(&a, &config).args(["add-chat", "-m", &chat_text("A")]).assert().success();
    tigs(&a, &config).arg("push").assert().success();
    tigs(&b, &config).args(["add-chat", "-m", &chat_text("B")]).assert().success();

    tigs(&b, &config)
        .args(["pull", "-s", "manual"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("1 conflicted"))
        .stderr(predicate::str::contains("conflicting chats"));

    tigs(&b, &config)
        .arg("push")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn configured_strategy_applies_when_none_given() {
    let rig = Rig::new();
    let a = rig.clone_as("a");
    let b = rig.clone_as("b");
    let config = rig.config_dir();
    std::fs::write(b.join(".tigs.toml"), "strategy = \"theirs\"\n").unwrap();

    tigs(&a, &config).args(["add-chat", "-m", &chat_text("A")]).assert().success();
    tigs(&a, &config).arg("push").assert().success();
    tigs(&b, &config).args(["add-chat", "-m", &chat_text("B")]).assert().success();

    tigs(&b, &config)
        .arg("pull")
        .assert()
        .success()
        .stdout(predicate::str::contains("(theirs): 1 replaced"));

    let shown = tigs(&b, &config).arg("show-chat").output().unwrap();
    let docs = decode(&String::from_utf8(shown.stdout).unwrap()).unwrap();
    assert_eq!(docs, decode(&chat_text("A")).unwrap());
}

#[test]
fn push_of_unpublished_commit_is_refused() {
    let rig = Rig::new();
    let a = rig.clone_as("a");
    let config = rig.config_dir();
    let raw = git2::Repository::open(&a).unwrap();
    let local = crate::fixtures::git::commit_file(&raw, "new.txt", "x\n").unwrap();

    tigs(&a, &config).args(["add-chat", "-m", &chat_text("A")]).assert().success();
    tigs(&a, &config)
        .arg("push")
        .assert()
        .code(4)
        .stderr(predicate::str::contains(local.to_string()))
        .stderr(predicate::str::contains("Push these commits first"));
}
