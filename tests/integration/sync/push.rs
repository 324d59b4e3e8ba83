//! Push validation against the remote-tracking view, and remote rejection.

use git2::Repository;
use tigs::core::{CommitId, RemoteName};
use tigs::git::GitRepo;
use tigs::store::TransportError;
use tigs::{Error, chats};

use crate::fixtures::chat_text;
use crate::fixtures::git::{Rig, commit_file, push_branch, ref_target};

#[test]
fn unpushed_commit_blocks_the_whole_push() {
    let rig = Rig::new();
    let dir = rig.clone_as("a");
    let raw = Repository::open(&dir).unwrap();
    let local_only = CommitId::from(commit_file(&raw, "wip.txt", "draft\n").unwrap());
    let repo = GitRepo::discover(&dir).unwrap();

    let base = CommitId::from(rig.base);
    chats::add_chat(&repo, base.as_str(), &chat_text("published")).unwrap();
    chats::add_chat(&repo, "HEAD", &chat_text("local")).unwrap();

    let err = chats::push(&repo, &RemoteName::origin()).unwrap_err();
    match &err {
        Error::Orphan(orphans) => assert_eq!(orphans.commits, vec![local_only.clone()]),
        other => panic!("expected orphan error, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 4);
    assert!(err.to_string().contains(local_only.as_str()));
    assert!(ref_target(&rig.remote, "refs/notes/chats").unwrap().is_none());

    // Publishing the code first clears the way.
    push_branch(&raw).unwrap();
    chats::fetch(&repo, &RemoteName::origin()).unwrap();
    let report = chats::push(&repo, &RemoteName::origin()).unwrap();
    assert!(report.published);
    assert_eq!(report.notes, 2);
    assert!(ref_target(&rig.remote, "refs/notes/chats").unwrap().is_some());
}

#[test]
fn nothing_to_push_is_a_success() {
    let rig = Rig::new();
    let repo = GitRepo::discover(&rig.clone_as("a")).unwrap();
    let report = chats::push(&repo, &RemoteName::origin()).unwrap();
    assert!(!report.published);
    assert!(ref_target(&rig.remote, "refs/notes/chats").unwrap().is_none());
}

#[test]
fn diverged_remote_rejects_push_until_pulled() {
    let rig = Rig::new();
    let a = GitRepo::discover(&rig.clone_as("a")).unwrap();
    let b = GitRepo::discover(&rig.clone_as("b")).unwrap();
    let base = CommitId::from(rig.base);
    let origin = RemoteName::origin();

    chats::add_chat(&a, base.as_str(), &chat_text("first")).unwrap();
    chats::push(&a, &origin).unwrap();
    let published = ref_target(&rig.remote, "refs/notes/chats").unwrap();

    chats::add_chat(&b, base.as_str(), &chat_text("second")).unwrap();
    let err = chats::push(&b, &origin).unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    assert_eq!(err.exit_code(), 5);
    if let Error::Transport(TransportError::NonFastForward { .. }) = &err {
        assert!(err.to_string().contains("tigs pull"));
    }
    assert_eq!(ref_target(&rig.remote, "refs/notes/chats").unwrap(), published);

    chats::pull(&b, &origin, tigs::Strategy::Union).unwrap();
    chats::push(&b, &origin).unwrap();
    assert_ne!(ref_target(&rig.remote, "refs/notes/chats").unwrap(), published);
}

#[test]
fn unknown_remote_is_rejected() {
    let rig = Rig::new();
    let repo = GitRepo::discover(&rig.clone_as("a")).unwrap();
    chats::add_chat(&repo, "HEAD", &chat_text("x")).unwrap();

    let upstream = RemoteName::parse("upstream").unwrap();
    let err = chats::fetch(&repo, &upstream).unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::UnknownRemote(_))
    ));
}
