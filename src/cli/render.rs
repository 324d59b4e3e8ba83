//! Human and JSON renderers for CLI outputs.
//!
//! This module is pure formatting; handlers gather the data.

use serde::Serialize;

use crate::core::{ChatDocument, CommitId};
use crate::store::FetchOutcome;
use crate::sync::{FetchReport, MergeOutcome, MergeReport, PushReport};

// -----------------------------------------------------------------------------
// Human output
// -----------------------------------------------------------------------------

pub fn render_added(commit: &CommitId) -> String {
    format!("Added chat to commit: {commit}")
}

pub fn render_removed(commit: &CommitId) -> String {
    format!("Removed chat from commit: {commit}")
}

pub fn render_fetch(report: &FetchReport) -> String {
    match report.outcome {
        FetchOutcome::Staged => format!(
            "Fetched {} chat(s) from '{}' to staging namespace\n  Remote notes: {}\n  Use 'tigs pull' to merge with your local notes",
            report.notes, report.remote, report.staging
        ),
        FetchOutcome::NoRemoteNotes => format!("No chats on '{}'", report.remote),
    }
}

pub fn render_merge(report: &MergeReport) -> String {
    let mut out = format!(
        "Pulled chats from '{}' ({}): {}",
        report.remote,
        report.strategy,
        report.summary()
    );
    for merge in report.conflicts() {
        if let MergeOutcome::Conflicted(reason) = &merge.outcome {
            out.push_str(&format!("\n  conflict {}: {reason}", merge.commit.short()));
        }
    }
    out
}

pub fn render_push(report: &PushReport) -> String {
    if report.published {
        format!(
            "Successfully pushed chats to '{}' ({} commit(s))",
            report.remote, report.notes
        )
    } else {
        "No chats to push".to_string()
    }
}

// -----------------------------------------------------------------------------
// JSON views
// -----------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CommitView<'a> {
    pub commit: &'a str,
}

#[derive(Serialize)]
pub struct ShowView<'a> {
    pub commit: &'a str,
    pub chats: &'a [ChatDocument],
}

#[derive(Serialize)]
pub struct FetchView<'a> {
    pub remote: &'a str,
    pub staging: &'a str,
    pub remote_has_chats: bool,
    pub notes: usize,
}

impl<'a> From<&'a FetchReport> for FetchView<'a> {
    fn from(report: &'a FetchReport) -> Self {
        Self {
            remote: report.remote.as_str(),
            staging: report.staging.refname(),
            remote_has_chats: report.outcome == FetchOutcome::Staged,
            notes: report.notes,
        }
    }
}

#[derive(Serialize)]
pub struct CommitMergeView<'a> {
    pub commit: &'a str,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct PullView<'a> {
    pub fetch: FetchView<'a>,
    pub strategy: &'static str,
    pub commits: Vec<CommitMergeView<'a>>,
    pub history_joined: bool,
    pub summary: String,
}

impl<'a> PullView<'a> {
    pub fn new(fetch: &'a FetchReport, merge: &'a MergeReport) -> Self {
        let commits = merge
            .commits
            .iter()
            .map(|c| {
                let (outcome, added, reason) = match &c.outcome {
                    MergeOutcome::Unchanged => ("unchanged", None, None),
                    MergeOutcome::KeptLocal => ("kept_local", None, None),
                    MergeOutcome::Adopted => ("adopted", None, None),
                    MergeOutcome::Replaced => ("replaced", None, None),
                    MergeOutcome::Unioned { added } => ("unioned", Some(*added), None),
                    MergeOutcome::Conflicted(reason) => {
                        ("conflicted", None, Some(reason.to_string()))
                    }
                };
                CommitMergeView {
                    commit: c.commit.as_str(),
                    outcome,
                    added,
                    reason,
                }
            })
            .collect();
        Self {
            fetch: FetchView::from(fetch),
            strategy: merge.strategy.as_str(),
            commits,
            history_joined: merge.history_joined,
            summary: merge.summary(),
        }
    }
}

#[derive(Serialize)]
pub struct PushView<'a> {
    pub remote: &'a str,
    pub notes: usize,
    pub published: bool,
}

impl<'a> From<&'a PushReport> for PushView<'a> {
    fn from(report: &'a PushReport) -> Self {
        Self {
            remote: report.remote.as_str(),
            notes: report.notes,
            published: report.published,
        }
    }
}
