//! Identifier newtypes: commits, remotes, note namespaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InvalidId;

/// Fully-qualified ref holding the local chat notes.
pub const LOCAL_NOTES_REF: &str = "refs/notes/chats";

/// Prefix of the per-remote staging namespaces.
pub const STAGING_REF_PREFIX: &str = "refs/notes-remote";

/// A full 40-character lowercase hex commit id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub const HEX_LEN: usize = 40;

    /// Parse a full hex object id. Uppercase input is normalized.
    ///
    /// Short hashes and symbolic revisions are not accepted here; resolve them
    /// through a [`NoteAccess`](crate::store::NoteAccess) first.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        if s.len() != Self::HEX_LEN {
            return Err(InvalidId::Commit {
                raw: s.to_string(),
                reason: format!("expected {} hex characters", Self::HEX_LEN),
            });
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidId::Commit {
                raw: s.to_string(),
                reason: "non-hex character".into(),
            });
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A well-formed id for the `n`th commit of an in-memory repository.
    pub(crate) fn synthetic(n: u64) -> Self {
        Self(format!("{n:040x}"))
    }

    /// Abbreviated form for human-readable output.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

impl FromStr for CommitId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Name of a configured git remote, validated to be safe inside a ref name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteName(String);

impl RemoteName {
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        let reject = |reason: &str| InvalidId::Remote {
            raw: s.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(reject("empty"));
        }
        if s.starts_with('/') || s.ends_with('/') || s.starts_with('-') {
            return Err(reject("must not start or end with '/' or start with '-'"));
        }
        if s.contains("..") || s.contains("//") || s.contains("@{") || s.ends_with(".lock") {
            return Err(reject("not a valid ref component"));
        }
        if let Some(c) = s.chars().find(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '~' | '^' | ':' | '?' | '*' | '[' | '\\')
        }) {
            return Err(InvalidId::Remote {
                raw: s.to_string(),
                reason: format!("illegal character {c:?}"),
            });
        }
        Ok(Self(s.to_string()))
    }

    pub fn origin() -> Self {
        Self("origin".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RemoteName {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RemoteName {
    type Error = InvalidId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<RemoteName> for String {
    fn from(name: RemoteName) -> Self {
        name.0
    }
}

/// A notes ref: either the local chat notes or a remote's staging mirror.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace {
    refname: String,
    remote: Option<RemoteName>,
}

impl Namespace {
    pub fn local() -> Self {
        Self {
            refname: LOCAL_NOTES_REF.to_string(),
            remote: None,
        }
    }

    pub fn staging(remote: &RemoteName) -> Self {
        Self {
            refname: format!("{STAGING_REF_PREFIX}/{remote}/chats"),
            remote: Some(remote.clone()),
        }
    }

    pub fn refname(&self) -> &str {
        &self.refname
    }

    /// The remote this namespace mirrors, if it is a staging namespace.
    pub fn remote(&self) -> Option<&RemoteName> {
        self.remote.as_ref()
    }

    pub fn is_staging(&self) -> bool {
        self.remote.is_some()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.refname)
    }
}
