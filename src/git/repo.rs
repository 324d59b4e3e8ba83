//! Note access over a real repository.

use std::path::Path;

use git2::{ErrorCode, Oid, Repository, Signature};
use tracing::debug;

use crate::core::{CommitId, Namespace, NoteBlob};
use crate::store::{NoteAccess, NotedCommits, StoreError};

/// A git repository viewed through [`NoteAccess`] and
/// [`RemoteAccess`](crate::store::RemoteAccess).
pub struct GitRepo {
    pub(super) repo: Repository,
}

impl GitRepo {
    /// Open the repository containing `path`.
    pub fn discover(path: &Path) -> Result<Self, StoreError> {
        let repo = Repository::discover(path).map_err(|source| StoreError::OpenRepo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Working directory, `None` for bare repositories.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    fn signature(&self) -> Result<Signature<'static>, StoreError> {
        // Fall back when user.name / user.email are unset.
        match self.repo.signature() {
            Ok(sig) => Ok(sig),
            Err(_) => Ok(Signature::now("tigs", "tigs@localhost")?),
        }
    }

    pub(super) fn ref_tip(&self, refname: &str) -> Result<Option<Oid>, StoreError> {
        match self.repo.refname_to_id(refname) {
            Ok(oid) => Ok(Some(oid)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn oid(commit: &CommitId) -> Result<Oid, StoreError> {
    Ok(Oid::from_str(commit.as_str())?)
}

impl NoteAccess for GitRepo {
    fn resolve_commit(&self, rev: &str) -> Result<CommitId, StoreError> {
        let unknown = |_| StoreError::UnknownRevision(rev.to_string());
        let commit = self
            .repo
            .revparse_single(rev)
            .map_err(unknown)?
            .peel_to_commit()
            .map_err(unknown)?;
        Ok(CommitId::from(commit.id()))
    }

    fn get_note(&self, ns: &Namespace, commit: &CommitId) -> Result<Option<NoteBlob>, StoreError> {
        let note = match self.repo.find_note(Some(ns.refname()), oid(commit)?) {
            Ok(note) => note,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let text = note
            .message()
            .ok_or_else(|| StoreError::NotUtf8(commit.clone()))?;
        Ok(Some(NoteBlob::new(text)))
    }

    fn set_note(&self, ns: &Namespace, commit: &CommitId, blob: &NoteBlob) -> Result<(), StoreError> {
        let sig = self.signature()?;
        self.repo
            .note(&sig, &sig, Some(ns.refname()), oid(commit)?, blob.as_str(), true)?;
        debug!(namespace = %ns, commit = %commit, "note written");
        Ok(())
    }

    fn remove_note(&self, ns: &Namespace, commit: &CommitId) -> Result<bool, StoreError> {
        let target = oid(commit)?;
        match self.repo.find_note(Some(ns.refname()), target) {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }
        let sig = self.signature()?;
        self.repo
            .note_delete(target, Some(ns.refname()), &sig, &sig)?;
        debug!(namespace = %ns, commit = %commit, "note removed");
        Ok(true)
    }

    fn list_noted_commits(&self, ns: &Namespace) -> Result<NotedCommits<'_>, StoreError> {
        let notes = match self.repo.notes(Some(ns.refname())) {
            Ok(notes) => notes,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Ok(Box::new(std::iter::empty::<Result<CommitId, StoreError>>()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Box::new(notes.map(|entry| -> Result<CommitId, StoreError> {
            let (_note, annotated) = entry?;
            Ok(CommitId::from(annotated))
        })))
    }

    fn join_history(&self, local: &Namespace, staged: &Namespace) -> Result<bool, StoreError> {
        let (Some(local_tip), Some(staged_tip)) =
            (self.ref_tip(local.refname())?, self.ref_tip(staged.refname())?)
        else {
            return Ok(false);
        };
        if local_tip == staged_tip || self.repo.graph_descendant_of(local_tip, staged_tip)? {
            return Ok(true);
        }

        let local_commit = self.repo.find_commit(local_tip)?;
        let staged_commit = self.repo.find_commit(staged_tip)?;
        let tree = local_commit.tree()?;

        if tree.id() == staged_commit.tree_id() {
            // Same notes on both sides: adopt the remote history as is.
            self.repo.reference(
                local.refname(),
                staged_tip,
                true,
                "tigs: fast-forward chats",
            )?;
            debug!(namespace = %local, tip = %staged_tip, "notes history fast-forwarded");
            return Ok(true);
        }

        let sig = self.signature()?;
        let message = format!("Merge {staged} into {local}");
        let merged = self.repo.commit(
            Some(local.refname()),
            &sig,
            &sig,
            &message,
            &tree,
            &[&local_commit, &staged_commit],
        )?;
        debug!(namespace = %local, tip = %merged, "notes history joined");
        Ok(true)
    }
}
