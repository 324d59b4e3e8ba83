//! Commit-keyed note storage.
//!
//! The version-control system is reached only through two narrow capability
//! traits: [`NoteAccess`] for note reads/writes in one repository and
//! [`RemoteAccess`] for moving note refs to and from a remote. Everything
//! above this layer (merge, push validation, commands) takes an accessor as
//! an explicit parameter, so it runs the same against [`crate::git::GitRepo`]
//! and the in-memory [`memory::MemoryRepo`].
//!
//! [`NoteStore`] binds an accessor to one namespace. A staged store is
//! read-only at the type level; only a fetch replaces its contents.

mod error;
pub mod memory;

use std::marker::PhantomData;

pub use error::{StoreError, TransportError};

use crate::core::{CommitId, Namespace, NoteBlob, RemoteName};

/// Lazy sequence of commits carrying a note. Order is unspecified.
pub type NotedCommits<'a> = Box<dyn Iterator<Item = Result<CommitId, StoreError>> + 'a>;

/// Note reads and writes in a single repository.
///
/// Each single-note call is atomic within the process. Nothing here locks
/// against other processes operating on the same repository.
pub trait NoteAccess {
    /// Resolve a revision expression (`HEAD`, branch, short or full hash).
    fn resolve_commit(&self, rev: &str) -> Result<CommitId, StoreError>;

    fn get_note(&self, ns: &Namespace, commit: &CommitId) -> Result<Option<NoteBlob>, StoreError>;

    /// Replace the note on `commit` wholly.
    fn set_note(&self, ns: &Namespace, commit: &CommitId, blob: &NoteBlob) -> Result<(), StoreError>;

    /// Returns whether a note was present.
    fn remove_note(&self, ns: &Namespace, commit: &CommitId) -> Result<bool, StoreError>;

    fn list_noted_commits(&self, ns: &Namespace) -> Result<NotedCommits<'_>, StoreError>;

    /// Record `staged` as merged into `local` so publishing `local` afterwards
    /// fast-forwards the remote. Returns `false` when either side has no notes
    /// history to join.
    fn join_history(&self, local: &Namespace, staged: &Namespace) -> Result<bool, StoreError>;
}

/// Result of copying a remote's notes into staging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Staging now mirrors the remote notes ref.
    Staged,
    /// The remote has no notes ref; staging was cleared.
    NoRemoteNotes,
}

/// Note ref transfer between a repository and its remotes.
pub trait RemoteAccess: NoteAccess {
    /// Replace `staging` with the remote's current notes and refresh the
    /// remote-tracking view used by [`RemoteAccess::is_reachable`].
    ///
    /// On error `staging` is left exactly as it was.
    fn fetch_notes(&self, remote: &RemoteName, staging: &Namespace)
    -> Result<FetchOutcome, TransportError>;

    /// Publish `local` to the remote's notes ref. Only fast-forward updates are
    /// made; a diverged remote is [`TransportError::NonFastForward`].
    fn push_notes(&self, remote: &RemoteName, local: &Namespace) -> Result<(), TransportError>;

    /// Whether `commit` exists locally and is equal to or an ancestor of a
    /// commit in the most recently fetched view of `remote`.
    fn is_reachable(&self, remote: &RemoteName, commit: &CommitId) -> Result<bool, StoreError>;
}

/// Store mode: the local, writable namespace.
#[derive(Debug, Clone, Copy)]
pub struct Local;

/// Store mode: a remote's staging mirror. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct Staged;

/// An accessor bound to one note namespace.
pub struct NoteStore<'a, A: ?Sized, M = Local> {
    access: &'a A,
    namespace: Namespace,
    _mode: PhantomData<M>,
}

impl<'a, A: NoteAccess + ?Sized> NoteStore<'a, A, Local> {
    pub fn local(access: &'a A) -> Self {
        Self {
            access,
            namespace: Namespace::local(),
            _mode: PhantomData,
        }
    }

    pub fn set(&self, commit: &CommitId, blob: &NoteBlob) -> Result<(), StoreError> {
        self.access.set_note(&self.namespace, commit, blob)
    }

    /// Idempotent; returns whether a note was present.
    pub fn remove(&self, commit: &CommitId) -> Result<bool, StoreError> {
        self.access.remove_note(&self.namespace, commit)
    }
}

impl<'a, A: NoteAccess + ?Sized> NoteStore<'a, A, Staged> {
    pub fn staging(access: &'a A, remote: &RemoteName) -> Self {
        Self {
            access,
            namespace: Namespace::staging(remote),
            _mode: PhantomData,
        }
    }
}

impl<'a, A: NoteAccess + ?Sized, M> NoteStore<'a, A, M> {
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn get(&self, commit: &CommitId) -> Result<Option<NoteBlob>, StoreError> {
        self.access.get_note(&self.namespace, commit)
    }

    pub fn contains(&self, commit: &CommitId) -> Result<bool, StoreError> {
        Ok(self.get(commit)?.is_some())
    }

    pub fn list(&self) -> Result<NotedCommits<'a>, StoreError> {
        self.access.list_noted_commits(&self.namespace)
    }
}
