//! NoteBlob assembly: the text attached to one commit, holding an ordered
//! list of chat documents.
//!
//! Decoding is two-phase. [`split_segments`] cuts the text at document
//! separators without looking inside the documents, then every segment goes
//! through [`chat::parse`] on its own. The first failure aborts the whole
//! decode with the segment's position attached.

use std::fmt;

use super::chat::{self, ChatDocument};
use super::error::FormatError;

/// Separator written between documents.
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Raw note text for one commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NoteBlob(String);

impl NoteBlob {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn from_documents(docs: &[ChatDocument]) -> Result<Self, FormatError> {
        encode(docs).map(Self)
    }

    pub fn documents(&self) -> Result<Vec<ChatDocument>, FormatError> {
        decode(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for NoteBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteBlob {
    fn from(text: String) -> Self {
        Self(text)
    }
}

fn is_boundary(line: &str) -> bool {
    let marker = line.trim_end();
    marker == "---" || marker == "..."
}

/// Split note text at column-0 `---` / `...` lines.
///
/// Segments are returned without their separator lines. Blank segments (a
/// leading separator, doubled separators, trailing whitespace) are dropped,
/// so the result lines up one-to-one with the documents in the blob.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if is_boundary(line) {
            segments.push(&text[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    segments.push(&text[start..]);

    segments.retain(|segment| !segment.trim().is_empty());
    segments
}

/// Decode every document in `text`, in order.
pub fn decode(text: &str) -> Result<Vec<ChatDocument>, FormatError> {
    split_segments(text)
        .into_iter()
        .enumerate()
        .map(|(index, segment)| chat::parse(segment).map_err(|err| err.in_segment(index)))
        .collect()
}

/// Canonical blob text for `docs`, in the given order. An empty list encodes
/// to the empty string.
pub fn encode(docs: &[ChatDocument]) -> Result<String, FormatError> {
    let parts = docs
        .iter()
        .map(chat::serialize)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(DOCUMENT_SEPARATOR))
}
