#![forbid(unsafe_code)]

pub mod chats;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
mod paths;
pub mod repo;
pub mod store;
pub mod sync;
pub mod telemetry;

pub use error::{Effect, Error, Transience};
pub type Result<T> = std::result::Result<T, Error>;

// Re-export core types at crate root for convenience
pub use crate::core::{
    ChatDocument, CommitId, FormatError, Message, Namespace, NoteBlob, RemoteName, Role, Timestamp,
};
pub use crate::git::GitRepo;
pub use crate::sync::Strategy;
