//! Validation and decoding errors for the domain model.

use thiserror::Error;

/// A malformed identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidId {
    #[error("invalid commit id {raw:?}: {reason}")]
    Commit { raw: String, reason: String },
    #[error("invalid remote name {raw:?}: {reason}")]
    Remote { raw: String, reason: String },
}

/// A note blob or chat document that does not follow the wire format.
///
/// Never repaired or skipped: every caller surfaces it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing schema identifier")]
    MissingSchema,

    #[error("unrecognized schema {0:?} (expected {expected:?})", expected = super::chat::SCHEMA_V1)]
    UnknownSchema(String),

    #[error("missing messages list")]
    MissingMessages,

    #[error("message {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("message {index}: invalid role {role:?} (expected user, assistant or system)")]
    InvalidRole { index: usize, role: String },

    #[error("message {index}: invalid timestamp {raw:?} (expected YYYY-MM-DDThh:mm:ssZ)")]
    InvalidTimestamp { index: usize, raw: String },

    #[error("document {index}: {source}")]
    Segment {
        index: usize,
        #[source]
        source: Box<FormatError>,
    },
}

impl FormatError {
    /// Attach the position of the failing document within a note blob.
    pub(crate) fn in_segment(self, index: usize) -> Self {
        FormatError::Segment {
            index,
            source: Box::new(self),
        }
    }

    /// Index of the offending document, when decoding a multi-document blob.
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            FormatError::Segment { index, .. } => Some(*index),
            _ => None,
        }
    }
}
