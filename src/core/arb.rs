//! Proptest strategies shared by the codec and merge tests.

use proptest::prelude::*;

use super::chat::{ChatDocument, Message, Role, Schema};
use super::time::Timestamp;

pub(crate) fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant), Just(Role::System)]
}

pub(crate) fn message_strategy() -> impl Strategy<Value = Message> {
    (
        role_strategy(),
        // Separator lookalikes, CR, tabs and non-ASCII all show up here.
        prop_oneof![
            "[ -~\t\r\né你👋]{0,80}",
            Just("---\n".to_string()),
            Just("...\n---\n".to_string()),
        ],
        proptest::option::of("[a-z0-9-]{1,16}"),
        0i64..4_000_000_000,
    )
        .prop_map(|(role, content, model, secs)| Message {
            role,
            content,
            model,
            timestamp: Timestamp::from_unix_seconds(secs).unwrap_or_else(Timestamp::now),
        })
}

pub(crate) fn document_strategy() -> impl Strategy<Value = ChatDocument> {
    (
        proptest::option::of("[ -~]{0,40}"),
        proptest::collection::vec(message_strategy(), 0..5),
    )
        .prop_map(|(summary, messages)| ChatDocument {
            schema: Schema::V1,
            summary,
            messages,
        })
}

pub(crate) fn documents_strategy(max: usize) -> impl Strategy<Value = Vec<ChatDocument>> {
    proptest::collection::vec(document_strategy(), 0..=max)
}
