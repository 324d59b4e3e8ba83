//! Note synchronization: fetch → merge → push.
//!
//! Pulling goes through a small typestate machine:
//! - Idle → Fetched → merged ([`MergeReport`])
//! - Each transition consumes `self`, returns next phase
//! - A merge can only run against a snapshot fetched by the same process
//!
//! Pushing is separate ([`push`]) and always validates first.

mod error;
mod fetch;
mod merge;
mod push;

pub use error::{Conflict, MergeConflictError, OrphanReferenceError};
pub use fetch::{FetchReport, fetch};
pub use merge::{
    CommitMerge, ConflictReason, MergeOutcome, MergeReport, Resolution, Side, Strategy,
    UnknownStrategy, merge, resolve, union,
};
pub use push::{PushReport, find_orphans, push, validate};

use crate::core::RemoteName;
use crate::store::{RemoteAccess, TransportError};

// =============================================================================
// Phase markers (zero-sized types for typestate)
// =============================================================================

/// Initial phase - nothing fetched yet.
pub struct Idle;

/// Fetched phase - staging holds a fresh snapshot.
pub struct Fetched {
    pub report: FetchReport,
}

/// Pull orchestration with compile-time phase ordering.
///
/// ```ignore
/// let report = SyncProcess::new(&repo, remote)
///     .fetch()?
///     .merge(Strategy::Union)?;
/// ```
pub struct SyncProcess<'a, A: ?Sized, Phase> {
    access: &'a A,
    remote: RemoteName,
    pub phase: Phase,
}

impl<'a, A: RemoteAccess + ?Sized> SyncProcess<'a, A, Idle> {
    pub fn new(access: &'a A, remote: RemoteName) -> Self {
        SyncProcess {
            access,
            remote,
            phase: Idle,
        }
    }

    /// Refresh staging from the remote, transition to Fetched phase.
    pub fn fetch(self) -> Result<SyncProcess<'a, A, Fetched>, TransportError> {
        let report = fetch(self.access, &self.remote)?;
        Ok(SyncProcess {
            access: self.access,
            remote: self.remote,
            phase: Fetched { report },
        })
    }
}

impl<'a, A: RemoteAccess + ?Sized> SyncProcess<'a, A, Fetched> {
    pub fn fetched(&self) -> &FetchReport {
        &self.phase.report
    }

    /// Merge the fetched snapshot into local notes.
    pub fn merge(self, strategy: Strategy) -> crate::Result<PullReport> {
        let merge = merge(self.access, &self.remote, strategy)?;
        Ok(PullReport {
            fetch: self.phase.report,
            merge,
        })
    }
}

/// Outcome of fetch followed by merge.
#[derive(Debug)]
pub struct PullReport {
    pub fetch: FetchReport,
    pub merge: MergeReport,
}
