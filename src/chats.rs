//! Command-level chat operations.
//!
//! Each function takes the repository accessor explicitly and resolves
//! user-supplied revisions through it. These are what the `tigs` binary
//! calls; they are equally usable from another front end.

use tracing::{debug, info, info_span};

use crate::core::{ChatDocument, CommitId, NoteBlob, RemoteName, decode};
use crate::store::{NoteAccess, NoteStore, RemoteAccess, StoreError};
use crate::sync::{FetchReport, PullReport, PushReport, Strategy, SyncProcess, fetch as fetch_notes};
use crate::{Error, Result};

/// Resolve a revision expression to the commit it names.
pub fn resolve<A: NoteAccess + ?Sized>(access: &A, rev: &str) -> Result<CommitId> {
    Ok(access.resolve_commit(rev)?)
}

/// Attach the chats in `text` to `rev`, after any already attached.
///
/// `text` holds one or more chat documents. Nothing is written if it or the
/// existing note fails to decode.
pub fn add_chat<A: NoteAccess + ?Sized>(access: &A, rev: &str, text: &str) -> Result<CommitId> {
    let commit = access.resolve_commit(rev)?;
    let span = info_span!("add_chat", %commit);
    let _guard = span.enter();

    if text.trim().is_empty() {
        return Err(Error::NoContent);
    }
    let added = decode(text)?;
    if added.is_empty() {
        return Err(Error::NoContent);
    }

    let store = NoteStore::local(access);
    let mut documents = match store.get(&commit)? {
        Some(existing) => existing.documents()?,
        None => Vec::new(),
    };
    let before = documents.len();
    documents.extend(added);

    let blob = NoteBlob::from_documents(&documents)?;
    store.set(&commit, &blob)?;
    info!(existing = before, total = documents.len(), "chat attached");
    Ok(commit)
}

/// The raw note text on `rev`.
pub fn show_chat<A: NoteAccess + ?Sized>(access: &A, rev: &str) -> Result<NoteBlob> {
    let commit = access.resolve_commit(rev)?;
    NoteStore::local(access)
        .get(&commit)?
        .ok_or(Error::NotFound(commit))
}

/// The note on `rev`, decoded.
pub fn show_documents<A: NoteAccess + ?Sized>(access: &A, rev: &str) -> Result<Vec<ChatDocument>> {
    Ok(show_chat(access, rev)?.documents()?)
}

/// Commits carrying a local chat, in commit id order.
pub fn list_chats<A: NoteAccess + ?Sized>(access: &A) -> Result<Vec<CommitId>> {
    let mut commits = NoteStore::local(access)
        .list()?
        .collect::<std::result::Result<Vec<_>, StoreError>>()?;
    commits.sort();
    Ok(commits)
}

/// Remove every chat on `rev`. Fails with [`Error::NotFound`] when there was
/// nothing to remove; the note namespace is unchanged in that case.
pub fn remove_chat<A: NoteAccess + ?Sized>(access: &A, rev: &str) -> Result<CommitId> {
    let commit = access.resolve_commit(rev)?;
    if !NoteStore::local(access).remove(&commit)? {
        return Err(Error::NotFound(commit));
    }
    debug!(%commit, "chat removed");
    Ok(commit)
}

/// Refresh the staging copy of `remote`'s chats. Local chats are untouched.
pub fn fetch<A: RemoteAccess + ?Sized>(access: &A, remote: &RemoteName) -> Result<FetchReport> {
    Ok(fetch_notes(access, remote)?)
}

/// Fetch, then merge under `strategy`.
///
/// Conflicts do not fail the pull: they are listed in the returned report,
/// and [`crate::sync::MergeReport::into_result`] turns them into an error.
pub fn pull<A: RemoteAccess + ?Sized>(
    access: &A,
    remote: &RemoteName,
    strategy: Strategy,
) -> Result<PullReport> {
    SyncProcess::new(access, remote.clone())
        .fetch()?
        .merge(strategy)
}

/// Validate every noted commit against `remote`, then publish.
pub fn push<A: RemoteAccess + ?Sized>(access: &A, remote: &RemoteName) -> Result<PushReport> {
    crate::sync::push(access, remote)
}
