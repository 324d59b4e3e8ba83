#![allow(dead_code)]

pub mod git;

/// One complete chat, as a user would pass it to `add-chat -m`.
pub fn chat_text(topic: &str) -> String {
    format!(
        "schema: tigs.chat/v1\n\
         summary: {topic}\n\
         messages:\n\
         - role: user\n  \
           content: |\n    How does {topic} work?\n    Keep it short.\n  \
           timestamp: 2025-03-01T10:00:00Z\n\
         - role: assistant\n  \
           content: It just works.\n  \
           model: test-model\n  \
           timestamp: 2025-03-01T10:00:05Z\n"
    )
}
