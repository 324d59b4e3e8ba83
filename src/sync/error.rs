//! Merge and push validation errors.

use std::fmt::Write as _;

use thiserror::Error;

use super::merge::ConflictReason;
use crate::core::{CommitId, RemoteName};

/// Noted commits the remote cannot reach. Nothing was published.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", render_orphans(.remote, .commits))]
pub struct OrphanReferenceError {
    pub remote: RemoteName,
    pub commits: Vec<CommitId>,
}

fn render_orphans(remote: &RemoteName, commits: &[CommitId]) -> String {
    let mut out = format!(
        "cannot push chats to {remote}: {} noted commit(s) are not reachable on the remote:",
        commits.len()
    );
    for commit in commits {
        let _ = write!(out, "\n  {commit}");
    }
    let _ = write!(out, "\nPush these commits first (git push {remote} <branch>), then retry.");
    out
}

/// One commit the merge engine left untouched.
#[derive(Debug)]
pub struct Conflict {
    pub commit: CommitId,
    pub reason: ConflictReason,
}

/// Commits left unresolved by a merge. Every other commit was merged.
#[derive(Error, Debug)]
#[error("{}", render_conflicts(.conflicts))]
pub struct MergeConflictError {
    pub conflicts: Vec<Conflict>,
}

fn render_conflicts(conflicts: &[Conflict]) -> String {
    let mut out = format!("{} commit(s) have conflicting chats:", conflicts.len());
    for conflict in conflicts {
        let _ = write!(out, "\n  {}: {}", conflict.commit, conflict.reason);
    }
    out.push_str("\nResolve with `tigs pull --strategy ours|theirs|union` or edit the local chat.");
    out
}
