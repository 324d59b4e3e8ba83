//! Note storage and transport error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::{CommitId, InvalidId, RemoteName};
use crate::error::{Effect, Transience};

/// Errors raised by local note reads and writes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("failed to open repository at {path}: {source}")]
    OpenRepo {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("unknown revision {0:?}")]
    UnknownRevision(String),

    #[error("note attached to {0} is not valid UTF-8")]
    NotUtf8(CommitId),

    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),
}

impl StoreError {
    pub fn transience(&self) -> Transience {
        match self {
            StoreError::OpenRepo { .. }
            | StoreError::UnknownRevision(_)
            | StoreError::NotUtf8(_)
            | StoreError::InvalidId(_) => Transience::Permanent,
            // Lock contention on refs surfaces here too.
            StoreError::Git(_) => Transience::Unknown,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            StoreError::Git(_) => Effect::Unknown,
            _ => Effect::None,
        }
    }
}

/// Errors raised while talking to a remote.
///
/// Neither fetch nor push leaves partial state behind when one of these is
/// returned: staging keeps its previous snapshot and the remote ref is only
/// ever moved by its own atomic update.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    #[error("remote {0:?} is not configured")]
    UnknownRemote(RemoteName),

    #[error("failed to connect to {remote}: {source}")]
    Connect {
        remote: RemoteName,
        #[source]
        source: git2::Error,
    },

    #[error("failed to fetch chats from {remote}: {source}")]
    Fetch {
        remote: RemoteName,
        #[source]
        source: git2::Error,
    },

    #[error("failed to push chats to {remote}: {source}")]
    Push {
        remote: RemoteName,
        #[source]
        source: git2::Error,
    },

    #[error(
        "push to {remote} rejected: remote chats have changed. Run `tigs pull {remote}` first, \
         or pull with --strategy theirs/ours to settle conflicts"
    )]
    NonFastForward { remote: RemoteName },

    #[error("push to {remote} rejected: {message}")]
    Rejected { remote: RemoteName, message: String },

    #[error("remote {remote} is unavailable: {reason}")]
    Unavailable { remote: RemoteName, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TransportError {
    pub fn transience(&self) -> Transience {
        match self {
            TransportError::Connect { .. }
            | TransportError::Fetch { .. }
            | TransportError::Push { .. }
            | TransportError::Unavailable { .. } => Transience::Retryable,
            // Retrying only helps after a fresh pull.
            TransportError::NonFastForward { .. } | TransportError::Rejected { .. } => {
                Transience::Permanent
            }
            TransportError::UnknownRemote(_) => Transience::Permanent,
            TransportError::Store(e) => e.transience(),
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            TransportError::Store(e) => e.effect(),
            // A dropped connection mid-push may or may not have landed.
            TransportError::Push { .. } => Effect::Unknown,
            _ => Effect::None,
        }
    }
}
