//! Fetch mirrors the remote into staging and never touches local notes.

use tigs::core::{CommitId, Namespace, RemoteName};
use tigs::git::GitRepo;
use tigs::store::{FetchOutcome, NoteStore};
use tigs::chats;

use crate::fixtures::chat_text;
use crate::fixtures::git::{Rig, ref_target};

#[test]
fn fetch_stages_remote_chats_without_merging() {
    let rig = Rig::new();
    let a = GitRepo::discover(&rig.clone_as("a")).unwrap();
    let b_dir = rig.clone_as("b");
    let b = GitRepo::discover(&b_dir).unwrap();
    let origin = RemoteName::origin();
    let base = CommitId::from(rig.base);

    let empty = chats::fetch(&b, &origin).unwrap();
    assert_eq!(empty.outcome, FetchOutcome::NoRemoteNotes);
    assert_eq!(empty.notes, 0);

    chats::add_chat(&a, base.as_str(), &chat_text("staged")).unwrap();
    chats::push(&a, &origin).unwrap();

    let report = chats::fetch(&b, &origin).unwrap();
    assert_eq!(report.outcome, FetchOutcome::Staged);
    assert_eq!(report.notes, 1);
    assert_eq!(report.staging, Namespace::staging(&origin));

    let staged = NoteStore::staging(&b, &origin).get(&base).unwrap();
    assert_eq!(staged, Some(chats::show_chat(&a, base.as_str()).unwrap()));
    assert!(chats::list_chats(&b).unwrap().is_empty());
    assert!(ref_target(&b_dir, "refs/notes/chats").unwrap().is_none());
}

#[test]
fn failed_fetch_keeps_previous_snapshot() {
    let rig = Rig::new();
    let a = GitRepo::discover(&rig.clone_as("a")).unwrap();
    let b_dir = rig.clone_as("b");
    let b = GitRepo::discover(&b_dir).unwrap();
    let origin = RemoteName::origin();

    chats::add_chat(&a, "HEAD", &chat_text("kept")).unwrap();
    chats::push(&a, &origin).unwrap();
    chats::fetch(&b, &origin).unwrap();
    let staged_tip = ref_target(&b_dir, "refs/notes-remote/origin/chats").unwrap();
    assert!(staged_tip.is_some());

    let missing = rig.remote.with_file_name("gone.git");
    b.repository()
        .remote_set_url("origin", missing.to_str().unwrap())
        .unwrap();
    let err = chats::fetch(&b, &origin).unwrap_err();
    assert_eq!(err.exit_code(), 5);
    assert_eq!(
        ref_target(&b_dir, "refs/notes-remote/origin/chats").unwrap(),
        staged_tip
    );
}
