//! ChatDocument codec.
//!
//! One conversation is one YAML mapping:
//!
//! ```yaml
//! schema: tigs.chat/v1
//! summary: optional one-liner
//! messages:
//! - role: user
//!   content: |
//!     verbatim, multi-line
//!   model: optional
//!   timestamp: 2025-01-01T12:00:00Z
//! ```
//!
//! Parsing goes through a permissive wire struct so that every missing or
//! malformed field maps to a precise [`FormatError`]. Serialization is the
//! canonical form: fixed key order, `content` emitted as a literal block
//! whenever the emitter can represent it exactly, otherwise quoted.

use serde::{Deserialize, Serialize, Serializer};

use super::error::FormatError;
use super::time::Timestamp;

/// The only schema this codec speaks.
pub const SCHEMA_V1: &str = "tigs.chat/v1";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Schema {
    #[default]
    V1,
}

impl Schema {
    pub fn as_str(self) -> &'static str {
        match self {
            Schema::V1 => SCHEMA_V1,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        (raw == SCHEMA_V1).then_some(Schema::V1)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "system" => Some(Role::System),
            _ => None,
        }
    }
}

/// One turn of a conversation. `content` is kept byte-for-byte.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub timestamp: Timestamp,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            role,
            content: content.into(),
            model: None,
            timestamp,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// One complete, independent recorded conversation.
///
/// Documents are immutable units: two documents are the same only when every
/// field matches, including message order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ChatDocument {
    pub schema: Schema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub messages: Vec<Message>,
}

impl ChatDocument {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            schema: Schema::V1,
            summary: None,
            messages,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

// =============================================================================
// Wire types (permissive intermediate for precise errors)
// =============================================================================

#[derive(Deserialize)]
struct WireDocument {
    #[serde(default)]
    schema: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    messages: Option<Vec<WireMessage>>,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl WireMessage {
    fn into_message(self, index: usize) -> Result<Message, FormatError> {
        let role = self
            .role
            .ok_or(FormatError::MissingField { index, field: "role" })?;
        let role = Role::parse(&role).ok_or(FormatError::InvalidRole { index, role })?;
        let content = self
            .content
            .ok_or(FormatError::MissingField { index, field: "content" })?;
        let raw = self.timestamp.ok_or(FormatError::MissingField {
            index,
            field: "timestamp",
        })?;
        let timestamp =
            Timestamp::parse(&raw).ok_or(FormatError::InvalidTimestamp { index, raw })?;
        Ok(Message {
            role,
            content,
            model: self.model,
            timestamp,
        })
    }
}

// =============================================================================
// Codec
// =============================================================================

/// Parse one document. The text must hold exactly one YAML document.
pub fn parse(text: &str) -> Result<ChatDocument, FormatError> {
    // Straight into the wire struct: scalars stay strings exactly as written
    // (`content: true` is the text "true", not a boolean).
    let wire: WireDocument = serde_yaml::from_str(text)?;

    let schema = wire.schema.ok_or(FormatError::MissingSchema)?;
    let schema = Schema::parse(&schema).ok_or(FormatError::UnknownSchema(schema))?;
    let messages = wire
        .messages
        .ok_or(FormatError::MissingMessages)?
        .into_iter()
        .enumerate()
        .map(|(index, msg)| msg.into_message(index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ChatDocument {
        schema,
        summary: wire.summary,
        messages,
    })
}

/// Canonical text form of one document, always newline-terminated.
pub fn serialize(doc: &ChatDocument) -> Result<String, FormatError> {
    Ok(serde_yaml::to_string(doc)?)
}
