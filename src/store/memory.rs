//! In-memory accessor for tests and examples.
//!
//! [`MemoryRepo`] keeps commits, note namespaces and remote-tracking views in
//! plain maps. [`MemoryRemote`] is a shared handle several repos can attach to,
//! standing in for a bare remote. Fast-forward checks are modeled with a
//! generation counter on the remote notes ref: a push is accepted only when the
//! pushing repo has merged (or itself produced) the remote's current
//! generation.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use super::{FetchOutcome, NoteAccess, NotedCommits, RemoteAccess, StoreError, TransportError};
use crate::core::{CommitId, Namespace, NoteBlob, RemoteName};

#[derive(Debug, Default)]
struct RemoteState {
    commits: BTreeSet<CommitId>,
    /// `None` until the first notes push creates the ref.
    notes: Option<BTreeMap<CommitId, NoteBlob>>,
    generation: u64,
    unavailable: Option<String>,
}

/// Shared stand-in for a remote repository.
#[derive(Clone, Debug, Default)]
pub struct MemoryRemote(Rc<RefCell<RemoteState>>);

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes currently published on the remote, if the ref exists.
    pub fn notes(&self) -> Option<BTreeMap<CommitId, NoteBlob>> {
        self.0.borrow().notes.clone()
    }

    pub fn has_commit(&self, commit: &CommitId) -> bool {
        self.0.borrow().commits.contains(commit)
    }

    /// Number of accepted notes updates so far.
    pub fn generation(&self) -> u64 {
        self.0.borrow().generation
    }

    /// Make every transfer fail until cleared with `None`.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.0.borrow_mut().unavailable = reason.map(str::to_string);
    }
}

#[derive(Debug, Default)]
struct RepoState {
    commits: BTreeSet<CommitId>,
    head: Option<CommitId>,
    namespaces: BTreeMap<Namespace, BTreeMap<CommitId, NoteBlob>>,
    /// Commits seen on each remote at the last fetch.
    tracking: BTreeMap<RemoteName, BTreeSet<CommitId>>,
    /// Remote notes generation held in each staging namespace.
    staged_generation: BTreeMap<RemoteName, u64>,
    /// Remote notes generation the local notes history already contains.
    merged_generation: BTreeMap<RemoteName, u64>,
}

/// In-memory repository implementing [`NoteAccess`] and [`RemoteAccess`].
#[derive(Debug, Default)]
pub struct MemoryRepo {
    state: RefCell<RepoState>,
    remotes: BTreeMap<RemoteName, MemoryRemote>,
}

thread_local! {
    static NEXT_COMMIT: Cell<u64> = const { Cell::new(1) };
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repo with `remote` configured as `origin` and its commits checked out.
    pub fn clone_from(remote: &MemoryRemote) -> Self {
        let mut repo = Self::new();
        repo.add_remote(RemoteName::origin(), remote.clone());
        {
            let mut state = repo.state.borrow_mut();
            let commits = remote.0.borrow().commits.clone();
            state.head = commits.iter().next_back().cloned();
            state.commits.extend(commits.iter().cloned());
            state.tracking.insert(RemoteName::origin(), commits);
        }
        repo
    }

    pub fn add_remote(&mut self, name: RemoteName, remote: MemoryRemote) {
        self.remotes.insert(name, remote);
    }

    /// Create a new commit and move HEAD to it.
    pub fn commit(&self) -> CommitId {
        let n = NEXT_COMMIT.with(|next| {
            let n = next.get();
            next.set(n + 1);
            n
        });
        let id = CommitId::synthetic(n);
        let mut state = self.state.borrow_mut();
        state.commits.insert(id.clone());
        state.head = Some(id.clone());
        id
    }

    /// Publish every local commit to `remote` (the code push, not notes).
    pub fn push_commits(&self, remote: &RemoteName) -> Result<(), TransportError> {
        let target = self.remote(remote)?;
        let state = self.state.borrow();
        target.0.borrow_mut().commits.extend(state.commits.iter().cloned());
        Ok(())
    }

    fn remote(&self, name: &RemoteName) -> Result<&MemoryRemote, TransportError> {
        let remote = self
            .remotes
            .get(name)
            .ok_or_else(|| TransportError::UnknownRemote(name.clone()))?;
        if let Some(reason) = remote.0.borrow().unavailable.clone() {
            return Err(TransportError::Unavailable {
                remote: name.clone(),
                reason,
            });
        }
        Ok(remote)
    }
}

impl NoteAccess for MemoryRepo {
    fn resolve_commit(&self, rev: &str) -> Result<CommitId, StoreError> {
        let state = self.state.borrow();
        if rev == "HEAD" {
            return state
                .head
                .clone()
                .ok_or_else(|| StoreError::UnknownRevision(rev.to_string()));
        }
        let needle = rev.to_ascii_lowercase();
        let mut matches = state
            .commits
            .iter()
            .filter(|id| needle.len() >= 4 && id.as_str().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id.clone()),
            _ => Err(StoreError::UnknownRevision(rev.to_string())),
        }
    }

    fn get_note(&self, ns: &Namespace, commit: &CommitId) -> Result<Option<NoteBlob>, StoreError> {
        Ok(self
            .state
            .borrow()
            .namespaces
            .get(ns)
            .and_then(|notes| notes.get(commit))
            .cloned())
    }

    fn set_note(&self, ns: &Namespace, commit: &CommitId, blob: &NoteBlob) -> Result<(), StoreError> {
        self.state
            .borrow_mut()
            .namespaces
            .entry(ns.clone())
            .or_default()
            .insert(commit.clone(), blob.clone());
        Ok(())
    }

    fn remove_note(&self, ns: &Namespace, commit: &CommitId) -> Result<bool, StoreError> {
        Ok(self
            .state
            .borrow_mut()
            .namespaces
            .get_mut(ns)
            .and_then(|notes| notes.remove(commit))
            .is_some())
    }

    fn list_noted_commits(&self, ns: &Namespace) -> Result<NotedCommits<'_>, StoreError> {
        let commits: Vec<_> = self
            .state
            .borrow()
            .namespaces
            .get(ns)
            .map(|notes| notes.keys().cloned().collect())
            .unwrap_or_default();
        Ok(Box::new(commits.into_iter().map(Ok::<_, StoreError>)))
    }

    fn join_history(&self, local: &Namespace, staged: &Namespace) -> Result<bool, StoreError> {
        let mut state = self.state.borrow_mut();
        let Some(remote) = staged.remote() else {
            return Ok(false);
        };
        if !state.namespaces.contains_key(local) || !state.namespaces.contains_key(staged) {
            return Ok(false);
        }
        let Some(generation) = state.staged_generation.get(remote).copied() else {
            return Ok(false);
        };
        state.merged_generation.insert(remote.clone(), generation);
        Ok(true)
    }
}

impl RemoteAccess for MemoryRepo {
    fn fetch_notes(
        &self,
        remote: &RemoteName,
        staging: &Namespace,
    ) -> Result<FetchOutcome, TransportError> {
        let source = self.remote(remote)?.0.borrow();
        let mut state = self.state.borrow_mut();

        state.tracking.insert(remote.clone(), source.commits.clone());
        match &source.notes {
            Some(notes) => {
                state.namespaces.insert(staging.clone(), notes.clone());
                state
                    .staged_generation
                    .insert(remote.clone(), source.generation);
                Ok(FetchOutcome::Staged)
            }
            None => {
                state.namespaces.remove(staging);
                state.staged_generation.remove(remote);
                Ok(FetchOutcome::NoRemoteNotes)
            }
        }
    }

    fn push_notes(&self, remote: &RemoteName, local: &Namespace) -> Result<(), TransportError> {
        let target = self.remote(remote)?;
        let mut state = self.state.borrow_mut();
        let Some(notes) = state.namespaces.get(local).cloned() else {
            return Ok(());
        };

        let mut dest = target.0.borrow_mut();
        let merged = state.merged_generation.get(remote).copied();
        if dest.notes.is_some() && merged != Some(dest.generation) {
            return Err(TransportError::NonFastForward {
                remote: remote.clone(),
            });
        }
        if dest.notes.as_ref() != Some(&notes) {
            dest.notes = Some(notes);
            dest.generation += 1;
        }
        state.merged_generation.insert(remote.clone(), dest.generation);
        Ok(())
    }

    fn is_reachable(&self, remote: &RemoteName, commit: &CommitId) -> Result<bool, StoreError> {
        let state = self.state.borrow();
        Ok(state.commits.contains(commit)
            && state
                .tracking
                .get(remote)
                .is_some_and(|seen| seen.contains(commit)))
    }
}
