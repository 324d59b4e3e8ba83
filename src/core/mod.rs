//! Core domain types for tigs
//!
//! Module hierarchy follows type dependency order:
//! - time: second-precision UTC timestamps
//! - identity: CommitId, RemoteName, Namespace
//! - chat: ChatDocument codec
//! - blob: NoteBlob assembly (multi-document note text)

pub mod blob;
pub mod chat;
pub mod error;
pub mod identity;
pub mod time;

#[cfg(test)]
pub(crate) mod arb;

pub use blob::{DOCUMENT_SEPARATOR, NoteBlob, decode, encode, split_segments};
pub use chat::{ChatDocument, Message, Role, SCHEMA_V1, Schema};
pub use error::{FormatError, InvalidId};
pub use identity::{CommitId, LOCAL_NOTES_REF, Namespace, RemoteName, STAGING_REF_PREFIX};
pub use time::Timestamp;
