//! Push validator and publish.

use tracing::{info, info_span, warn};

use super::error::OrphanReferenceError;
use crate::core::{CommitId, Namespace, RemoteName};
use crate::store::{NoteStore, RemoteAccess, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    pub remote: RemoteName,
    /// Commits carrying a local note at push time.
    pub notes: usize,
    /// `false` when there was nothing to publish.
    pub published: bool,
}

/// Every locally noted commit that `remote` cannot reach, in commit id order.
pub fn find_orphans<A: RemoteAccess + ?Sized>(
    access: &A,
    remote: &RemoteName,
) -> Result<Vec<CommitId>, StoreError> {
    let mut orphans = Vec::new();
    for commit in NoteStore::local(access).list()? {
        let commit = commit?;
        if !access.is_reachable(remote, &commit)? {
            orphans.push(commit);
        }
    }
    orphans.sort();
    Ok(orphans)
}

/// Check every noted commit against the last fetched view of `remote`.
///
/// Returns the number of noted commits. Fails naming every orphan at once.
pub fn validate<A: RemoteAccess + ?Sized>(access: &A, remote: &RemoteName) -> crate::Result<usize> {
    let noted = NoteStore::local(access).list()?.count();
    let orphans = find_orphans(access, remote)?;
    if !orphans.is_empty() {
        warn!(%remote, orphans = orphans.len(), "push blocked by unreachable commits");
        return Err(OrphanReferenceError {
            remote: remote.clone(),
            commits: orphans,
        }
        .into());
    }
    Ok(noted)
}

/// Validate, then publish the local notes ref. All or nothing: a validation
/// failure publishes nothing, and the remote accepts only a fast-forward.
pub fn push<A: RemoteAccess + ?Sized>(access: &A, remote: &RemoteName) -> crate::Result<PushReport> {
    let span = info_span!("push", %remote);
    let _guard = span.enter();

    let notes = validate(access, remote)?;
    if notes == 0 {
        info!("no chats to push");
        return Ok(PushReport {
            remote: remote.clone(),
            notes,
            published: false,
        });
    }

    access.push_notes(remote, &Namespace::local())?;
    info!(notes, "push finished");
    Ok(PushReport {
        remote: remote.clone(),
        notes,
        published: true,
    })
}
