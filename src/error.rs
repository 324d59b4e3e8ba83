use thiserror::Error;

use crate::config::ConfigError;
use crate::core::{CommitId, FormatError, InvalidId};
use crate::store::{StoreError, TransportError};
use crate::sync::{MergeConflictError, OrphanReferenceError};

/// Whether retrying this operation may succeed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transience {
    /// Retry will never help without changing inputs/state.
    Permanent,
    /// Retry may help (transient contention/outage).
    Retryable,
    /// Unknown if retry will help.
    Unknown,
}

impl Transience {
    pub fn is_retryable(self) -> bool {
        matches!(self, Transience::Retryable)
    }
}

/// What we know about side effects when an error is returned.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Effect {
    /// Definitely no side effects occurred.
    None,
    /// Side effects definitely occurred (locally or remotely).
    Some,
    /// We don't know if side effects occurred.
    Unknown,
}

impl Effect {
    pub fn as_str(self) -> &'static str {
        match self {
            Effect::None => "none",
            Effect::Some => "some",
            Effect::Unknown => "unknown",
        }
    }
}

/// Crate-level convenience error.
///
/// Not a "god error": it is a thin wrapper over canonical capability errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Orphan(#[from] OrphanReferenceError),

    #[error(transparent)]
    Conflict(#[from] MergeConflictError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    #[error("No chat found for commit: {0}")]
    NotFound(CommitId),

    #[error("No content provided")]
    NoContent,

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn transience(&self) -> Transience {
        match self {
            Error::Store(e) => e.transience(),
            Error::Transport(e) => e.transience(),
            // Another pull or push changes the answer.
            Error::Orphan(_) | Error::Conflict(_) => Transience::Retryable,
            Error::Format(_)
            | Error::Config(_)
            | Error::InvalidId(_)
            | Error::NotFound(_)
            | Error::NoContent => Transience::Permanent,
            Error::Io(_) => Transience::Unknown,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            Error::Store(e) => e.effect(),
            Error::Transport(e) => e.effect(),
            // Non-conflicting commits were merged.
            Error::Conflict(_) => Effect::Some,
            _ => Effect::None,
        }
    }

    /// Process exit status for this error. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Format(_) => 2,
            Error::Conflict(_) => 3,
            Error::Orphan(_) => 4,
            Error::Transport(TransportError::Store(_)) => 1,
            Error::Transport(_) => 5,
            _ => 1,
        }
    }
}
