//! Two clones diverge on one commit, then pull under each strategy.

use std::path::Path;

use tigs::core::{CommitId, RemoteName, decode};
use tigs::git::GitRepo;
use tigs::sync::{MergeOutcome, Strategy};
use tigs::{Error, chats};

use crate::fixtures::chat_text;
use crate::fixtures::git::{Rig, commit_file, push_branch, ref_target};

struct Diverged {
    rig: Rig,
    a: GitRepo,
    b: GitRepo,
    b_dir: std::path::PathBuf,
    commit: CommitId,
}

fn open(dir: &Path) -> GitRepo {
    GitRepo::discover(dir).expect("open repo")
}

/// `a` published chat A on the shared commit; `b` holds chat B locally.
fn diverged() -> Diverged {
    let rig = Rig::new();
    let a = open(&rig.clone_as("a"));
    let b_dir = rig.clone_as("b");
    let b = open(&b_dir);
    let commit = CommitId::from(rig.base);
    let origin = RemoteName::origin();

    chats::add_chat(&a, commit.as_str(), &chat_text("alpha")).expect("add on a");
    chats::add_chat(&b, commit.as_str(), &chat_text("beta")).expect("add on b");
    chats::push(&a, &origin).expect("push from a");

    Diverged {
        rig,
        a,
        b,
        b_dir,
        commit,
    }
}

#[test]
fn union_pull_keeps_both_chats_on_both_sides() {
    let d = diverged();
    let origin = RemoteName::origin();
    let expected_a = decode(&chat_text("alpha")).unwrap().remove(0);
    let expected_b = decode(&chat_text("beta")).unwrap().remove(0);

    let report = chats::pull(&d.b, &origin, Strategy::Union).expect("pull on b");
    assert!(!report.merge.has_conflicts());
    assert!(report.merge.history_joined);
    assert!(matches!(
        report.merge.commits[0].outcome,
        MergeOutcome::Unioned { added: 1 }
    ));
    let on_b = chats::show_documents(&d.b, d.commit.as_str()).unwrap();
    assert_eq!(on_b, vec![expected_b.clone(), expected_a.clone()]);

    // Joined history lets b fast-forward the remote.
    chats::push(&d.b, &origin).expect("push from b");

    chats::pull(&d.a, &origin, Strategy::Union).expect("pull on a");
    let on_a = chats::show_documents(&d.a, d.commit.as_str()).unwrap();
    assert_eq!(on_a.len(), 2);
    assert!(on_a.contains(&expected_a) && on_a.contains(&expected_b));

    // Same snapshot again: nothing to write.
    let again = chats::pull(&d.b, &origin, Strategy::Union).unwrap();
    assert_eq!(again.merge.written(), 0);
    assert_eq!(again.merge.summary(), "already up to date");
}

#[test]
fn union_pulls_settle_on_one_notes_tip() {
    let d = diverged();
    let origin = RemoteName::origin();
    let remote_tip = || ref_target(&d.rig.remote, "refs/notes/chats").unwrap();

    chats::pull(&d.b, &origin, Strategy::Union).expect("pull on b");
    chats::push(&d.b, &origin).expect("push from b");
    // a holds a subset in another order and takes b's note as published.
    chats::pull(&d.a, &origin, Strategy::Union).expect("pull on a");
    chats::push(&d.a, &origin).expect("push from a");
    let settled = remote_tip();

    let again = chats::pull(&d.b, &origin, Strategy::Union).expect("re-pull on b");
    assert_eq!(again.merge.written(), 0);
    assert_eq!(ref_target(&d.b_dir, "refs/notes/chats").unwrap(), settled);
    chats::push(&d.b, &origin).expect("no-op push");
    assert_eq!(remote_tip(), settled);
    assert_eq!(
        chats::show_chat(&d.a, d.commit.as_str()).unwrap(),
        chats::show_chat(&d.b, d.commit.as_str()).unwrap()
    );
}

#[test]
fn ours_pull_leaves_local_blob_byte_for_byte() {
    let d = diverged();
    let before = chats::show_chat(&d.b, d.commit.as_str()).unwrap();

    let report = chats::pull(&d.b, &RemoteName::origin(), Strategy::Ours).unwrap();
    assert!(matches!(report.merge.commits[0].outcome, MergeOutcome::KeptLocal));
    let after = chats::show_chat(&d.b, d.commit.as_str()).unwrap();
    assert_eq!(after.as_str(), before.as_str());
}

#[test]
fn ours_pull_then_push_keeps_the_other_clones_chat() {
    let rig = Rig::new();
    let origin = RemoteName::origin();
    let a = open(&rig.clone_as("a"));
    let base = CommitId::from(rig.base);
    chats::add_chat(&a, base.as_str(), &chat_text("alpha")).expect("add on a");
    chats::push(&a, &origin).expect("push from a");

    let b_dir = rig.clone_as("b");
    let raw = git2::Repository::open(&b_dir).expect("open b");
    let own = CommitId::from(commit_file(&raw, "b.txt", "b\n").expect("commit on b"));
    push_branch(&raw).expect("push b's branch");
    let b = open(&b_dir);
    chats::add_chat(&b, own.as_str(), &chat_text("beta")).expect("add on b");

    let report = chats::pull(&b, &origin, Strategy::Ours).expect("pull on b");
    assert!(matches!(report.merge.commits[0].outcome, MergeOutcome::Adopted));
    chats::push(&b, &origin).expect("push from b");

    let c = open(&rig.clone_as("c"));
    chats::pull(&c, &origin, Strategy::Union).expect("pull on c");
    let mut expected = vec![base, own];
    expected.sort();
    assert_eq!(chats::list_chats(&c).unwrap(), expected);
}

#[test]
fn theirs_pull_adopts_the_remote_blob() {
    let d = diverged();
    let remote_blob = chats::show_chat(&d.a, d.commit.as_str()).unwrap();

    chats::pull(&d.b, &RemoteName::origin(), Strategy::Theirs).unwrap();
    let after = chats::show_chat(&d.b, d.commit.as_str()).unwrap();
    assert_eq!(after.as_str(), remote_blob.as_str());
}

#[test]
fn manual_pull_reports_conflict_and_changes_nothing() {
    let d = diverged();
    let before = chats::show_chat(&d.b, d.commit.as_str()).unwrap();
    let local_tip = ref_target(&d.b_dir, "refs/notes/chats").unwrap();

    let report = chats::pull(&d.b, &RemoteName::origin(), Strategy::Manual).unwrap();
    assert!(report.merge.has_conflicts());
    assert!(!report.merge.history_joined);
    assert_eq!(chats::show_chat(&d.b, d.commit.as_str()).unwrap(), before);
    assert_eq!(ref_target(&d.b_dir, "refs/notes/chats").unwrap(), local_tip);

    let err = Error::from(report.merge.into_result().unwrap_err());
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains(d.commit.as_str()));

    // Unjoined history: the remote still refuses b's notes.
    let rejected = chats::push(&d.b, &RemoteName::origin()).unwrap_err();
    assert_eq!(rejected.exit_code(), 5);
}

#[test]
fn pulling_into_an_empty_clone_adopts_remote_chats() {
    let d = diverged();
    let c = open(&d.rig.clone_as("c"));

    let report = chats::pull(&c, &RemoteName::origin(), Strategy::Union).unwrap();
    assert!(matches!(report.merge.commits[0].outcome, MergeOutcome::Adopted));
    assert_eq!(chats::list_chats(&c).unwrap(), vec![d.commit.clone()]);
    assert_eq!(
        chats::show_chat(&c, d.commit.as_str()).unwrap(),
        chats::show_chat(&d.a, d.commit.as_str()).unwrap()
    );
}
