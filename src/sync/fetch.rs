//! Fetch stage: mirror a remote's chats into its staging namespace.

use tracing::{info, info_span};

use crate::core::{Namespace, RemoteName};
use crate::store::{FetchOutcome, NoteStore, RemoteAccess, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub remote: RemoteName,
    pub staging: Namespace,
    pub outcome: FetchOutcome,
    /// Commits noted in the new staging snapshot.
    pub notes: usize,
}

/// Replace the staging snapshot for `remote`. Local notes are never touched;
/// on failure staging keeps its previous snapshot.
pub fn fetch<A: RemoteAccess + ?Sized>(
    access: &A,
    remote: &RemoteName,
) -> Result<FetchReport, TransportError> {
    let span = info_span!("fetch", %remote);
    let _guard = span.enter();

    let staging = Namespace::staging(remote);
    let outcome = access.fetch_notes(remote, &staging)?;
    let notes = NoteStore::staging(access, remote).list()?.count();

    info!(notes, ?outcome, "fetched chats");
    Ok(FetchReport {
        remote: remote.clone(),
        staging,
        outcome,
        notes,
    })
}
