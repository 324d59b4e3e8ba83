//! Merge engine: reconcile local notes with a remote's staged snapshot.
//!
//! The engine walks every commit noted in staging and resolves it against
//! the local note under one [`Strategy`]:
//!
//! | local vs staged      | union              | ours      | theirs   | manual     |
//! |----------------------|--------------------|-----------|----------|------------|
//! | equal                | unchanged          | unchanged | unchanged| unchanged  |
//! | staged only          | adopted            | adopted   | adopted  | conflicted |
//! | both, different      | unioned            | kept local| replaced | conflicted |
//!
//! Commits noted only locally are never touched. Union treats chat documents
//! as immutable units: the result is every local document followed by each
//! staged document that is not already present, compared field by field.
//! When that result holds exactly the staged documents, the staged note is
//! taken byte for byte, so clones that differ only in document order
//! converge. Messages never move between documents.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use super::error::{Conflict, MergeConflictError};
use crate::core::{ChatDocument, CommitId, FormatError, NoteBlob, RemoteName};
use crate::store::{NoteAccess, NoteStore};

/// How to settle a commit whose local and staged notes differ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Keep every distinct conversation from both sides.
    #[default]
    Union,
    /// Keep the local note.
    Ours,
    /// Take the remote note.
    Theirs,
    /// Report differences without resolving them.
    Manual,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Union,
        Strategy::Ours,
        Strategy::Theirs,
        Strategy::Manual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Union => "union",
            Strategy::Ours => "ours",
            Strategy::Theirs => "theirs",
            Strategy::Manual => "manual",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown merge strategy {0:?} (expected union, ours, theirs or manual)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Local,
    Staged,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Local => "local",
            Side::Staged => "remote",
        })
    }
}

#[derive(Debug)]
pub enum ConflictReason {
    /// The manual strategy never resolves on its own.
    Manual,
    /// Union needs both sides decoded; one of them is malformed.
    Undecodable { side: Side, error: FormatError },
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::Manual => f.write_str("local and remote chats differ"),
            ConflictReason::Undecodable { side, error } => {
                write!(f, "{side} chat is malformed: {error}")
            }
        }
    }
}

/// What happened to one commit.
#[derive(Debug)]
pub enum MergeOutcome {
    /// Nothing to do: equal on both sides, or union found nothing new.
    Unchanged,
    /// Local note kept, staged note discarded.
    KeptLocal,
    /// Staged note copied to a commit that had none locally.
    Adopted,
    /// Local note overwritten by the staged one.
    Replaced,
    /// Staged documents appended to the local note.
    Unioned { added: usize },
    /// Left untouched; needs attention.
    Conflicted(ConflictReason),
}

impl MergeOutcome {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            MergeOutcome::Adopted | MergeOutcome::Replaced | MergeOutcome::Unioned { .. }
        )
    }
}

/// Per-commit decision, before anything is written.
#[derive(Debug)]
pub struct Resolution {
    pub outcome: MergeOutcome,
    /// New local note, when the outcome changes it.
    pub write: Option<NoteBlob>,
}

impl Resolution {
    fn keep(outcome: MergeOutcome) -> Self {
        Self {
            outcome,
            write: None,
        }
    }

    fn write(outcome: MergeOutcome, blob: NoteBlob) -> Self {
        Self {
            outcome,
            write: Some(blob),
        }
    }
}

/// Local documents, then each staged document not already included.
///
/// Returns the merged list and how many staged documents were added.
pub fn union(local: Vec<ChatDocument>, staged: &[ChatDocument]) -> (Vec<ChatDocument>, usize) {
    let mut merged = local;
    let mut added = 0;
    for doc in staged {
        if !merged.contains(doc) {
            merged.push(doc.clone());
            added += 1;
        }
    }
    (merged, added)
}

/// Equal as multisets: order ignored, duplicates counted.
fn same_documents(a: &[ChatDocument], b: &[ChatDocument]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts: HashMap<&ChatDocument, isize> = HashMap::new();
    for doc in a {
        *counts.entry(doc).or_default() += 1;
    }
    for doc in b {
        *counts.entry(doc).or_default() -= 1;
    }
    counts.values().all(|&n| n == 0)
}

fn union_blobs(local: &NoteBlob, staged: &NoteBlob) -> Result<Resolution, FormatError> {
    let local_docs = match local.documents() {
        Ok(docs) => docs,
        Err(error) => {
            return Ok(Resolution::keep(MergeOutcome::Conflicted(
                ConflictReason::Undecodable {
                    side: Side::Local,
                    error,
                },
            )));
        }
    };
    let staged_docs = match staged.documents() {
        Ok(docs) => docs,
        Err(error) => {
            return Ok(Resolution::keep(MergeOutcome::Conflicted(
                ConflictReason::Undecodable {
                    side: Side::Staged,
                    error,
                },
            )));
        }
    };

    let (merged, added) = union(local_docs, &staged_docs);
    // Exactly the remote's documents: keep its bytes so both clones end up
    // with one notes tree.
    if same_documents(&merged, &staged_docs) {
        let outcome = match added {
            0 => MergeOutcome::Unchanged,
            added => MergeOutcome::Unioned { added },
        };
        return Ok(Resolution::write(outcome, staged.clone()));
    }
    if added == 0 {
        return Ok(Resolution::keep(MergeOutcome::Unchanged));
    }
    Ok(Resolution::write(
        MergeOutcome::Unioned { added },
        NoteBlob::from_documents(&merged)?,
    ))
}

/// Decide one commit. Pure: reads nothing, writes nothing.
pub fn resolve(
    local: Option<&NoteBlob>,
    staged: Option<&NoteBlob>,
    strategy: Strategy,
) -> Result<Resolution, FormatError> {
    let Some(staged) = staged else {
        return Ok(Resolution::keep(MergeOutcome::Unchanged));
    };

    let Some(local) = local else {
        return Ok(match strategy {
            Strategy::Union => match staged.documents() {
                Ok(_) => Resolution::write(MergeOutcome::Adopted, staged.clone()),
                Err(error) => Resolution::keep(MergeOutcome::Conflicted(
                    ConflictReason::Undecodable {
                        side: Side::Staged,
                        error,
                    },
                )),
            },
            // Nothing local to prefer: only a differing local note is kept.
            Strategy::Theirs | Strategy::Ours => {
                Resolution::write(MergeOutcome::Adopted, staged.clone())
            }
            Strategy::Manual => Resolution::keep(MergeOutcome::Conflicted(ConflictReason::Manual)),
        });
    };

    if local == staged {
        return Ok(Resolution::keep(MergeOutcome::Unchanged));
    }

    match strategy {
        Strategy::Ours => Ok(Resolution::keep(MergeOutcome::KeptLocal)),
        Strategy::Theirs => Ok(Resolution::write(MergeOutcome::Replaced, staged.clone())),
        Strategy::Manual => Ok(Resolution::keep(MergeOutcome::Conflicted(
            ConflictReason::Manual,
        ))),
        Strategy::Union => union_blobs(local, staged),
    }
}

#[derive(Debug)]
pub struct CommitMerge {
    pub commit: CommitId,
    pub outcome: MergeOutcome,
}

/// Result of one merge pass.
#[derive(Debug)]
pub struct MergeReport {
    pub remote: RemoteName,
    pub strategy: Strategy,
    /// Every staged commit, in commit id order.
    pub commits: Vec<CommitMerge>,
    /// Whether the local notes history now contains the staged history.
    pub history_joined: bool,
}

impl MergeReport {
    pub fn conflicts(&self) -> impl Iterator<Item = &CommitMerge> {
        self.commits
            .iter()
            .filter(|c| matches!(c.outcome, MergeOutcome::Conflicted(_)))
    }

    pub fn has_conflicts(&self) -> bool {
        self.conflicts().next().is_some()
    }

    /// Number of commits whose local note was written.
    pub fn written(&self) -> usize {
        self.commits.iter().filter(|c| c.outcome.is_write()).count()
    }

    fn count(&self, pred: impl Fn(&MergeOutcome) -> bool) -> usize {
        self.commits.iter().filter(|c| pred(&c.outcome)).count()
    }

    fn summary_parts(&self) -> Vec<String> {
        let mut parts = Vec::new();
        let adopted = self.count(|o| matches!(o, MergeOutcome::Adopted));
        let replaced = self.count(|o| matches!(o, MergeOutcome::Replaced));
        let kept = self.count(|o| matches!(o, MergeOutcome::KeptLocal));
        let unioned = self.count(|o| matches!(o, MergeOutcome::Unioned { .. }));
        let conflicted = self.count(|o| matches!(o, MergeOutcome::Conflicted(_)));
        let added: usize = self
            .commits
            .iter()
            .map(|c| match c.outcome {
                MergeOutcome::Unioned { added } => added,
                _ => 0,
            })
            .sum();

        if adopted > 0 {
            parts.push(format!("{adopted} adopted"));
        }
        if unioned > 0 {
            parts.push(format!("{unioned} merged (+{added} chats)"));
        }
        if replaced > 0 {
            parts.push(format!("{replaced} replaced"));
        }
        if kept > 0 {
            parts.push(format!("{kept} kept local"));
        }
        if conflicted > 0 {
            parts.push(format!("{conflicted} conflicted"));
        }
        parts
    }

    /// One-line human summary, e.g. `2 adopted, 1 merged (+1 chats)`.
    pub fn summary(&self) -> String {
        let parts = self.summary_parts();
        if parts.is_empty() {
            "already up to date".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Turn remaining conflicts into an error, for a non-zero exit.
    pub fn into_result(self) -> Result<Self, MergeConflictError> {
        if !self.has_conflicts() {
            return Ok(self);
        }
        let conflicts = self
            .commits
            .into_iter()
            .filter_map(|c| match c.outcome {
                MergeOutcome::Conflicted(reason) => Some(Conflict {
                    commit: c.commit,
                    reason,
                }),
                _ => None,
            })
            .collect();
        Err(MergeConflictError { conflicts })
    }
}

/// Merge the staging snapshot of `remote` into the local notes.
///
/// Conflicts are reported per commit and never stop the other commits from
/// merging. When none remain, the staged notes history is joined into the
/// local one so the next push fast-forwards.
pub fn merge<A: NoteAccess + ?Sized>(
    access: &A,
    remote: &RemoteName,
    strategy: Strategy,
) -> crate::Result<MergeReport> {
    let span = info_span!("merge", %remote, %strategy);
    let _guard = span.enter();

    let local = NoteStore::local(access);
    let staged = NoteStore::staging(access, remote);

    let staged_commits = staged.list()?.collect::<Result<BTreeSet<_>, _>>()?;
    let mut commits = Vec::with_capacity(staged_commits.len());

    for commit in staged_commits {
        let ours = local.get(&commit)?;
        let theirs = staged.get(&commit)?;
        let Resolution { outcome, write } = resolve(ours.as_ref(), theirs.as_ref(), strategy)?;

        if let Some(blob) = write {
            local.set(&commit, &blob)?;
        }
        match &outcome {
            MergeOutcome::Conflicted(reason) => warn!(commit = %commit, %reason, "conflict"),
            other => debug!(commit = %commit, outcome = ?other, "resolved"),
        }
        commits.push(CommitMerge { commit, outcome });
    }

    let mut report = MergeReport {
        remote: remote.clone(),
        strategy,
        commits,
        history_joined: false,
    };
    if !report.has_conflicts() {
        report.history_joined = access.join_history(local.namespace(), staged.namespace())?;
    }

    info!(
        commits = report.commits.len(),
        written = report.written(),
        joined = report.history_joined,
        "merge finished: {}",
        report.summary()
    );
    Ok(report)
}
