use chrono::{DateTime, Utc};

use crate::constants::MAX_EMBED_CHARS;

use super::message::{Message, MessageRole};

/// A conversation: an ordered sequence of messages sharing one
/// `conversation_id`, plus the fields spec §3 derives from that sequence.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub conversation_id: String,
    pub messages: Vec<Message>,
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub last_at: DateTime<Utc>,
}

impl Conversation {
    /// Builds a `Conversation` from its ordered messages.
    ///
    /// `messages` must be non-empty and already sorted by `message_index`;
    /// the message store is responsible for ordering, not this constructor.
    pub fn from_messages(conversation_id: String, messages: Vec<Message>) -> Option<Self> {
        let first = messages.first()?;
        let started_at = messages.iter().map(|m| m.created_at).min()?;
        let last_at = messages.iter().map(|m| m.created_at).max()?;
        let title = Self::derive_title(&messages).unwrap_or_else(|| first.text.clone());

        Some(Self {
            conversation_id,
            messages,
            title,
            started_at,
            last_at,
        })
    }

    /// Title is the first user line, truncated to a single line.
    fn derive_title(messages: &[Message]) -> Option<String> {
        let first_user = messages.iter().find(|m| m.role == MessageRole::User)?;
        let line = first_user.text.lines().next().unwrap_or(&first_user.text);
        Some(line.trim().to_string())
    }

    /// Concatenation of user-role messages, newline-joined (spec §4.1).
    pub fn user_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All messages joined, role-prefixed, truncated at the rightmost
    /// whitespace at or before `max_chars` (spec §4.1). Deterministic given
    /// the message sequence.
    pub fn full_text(&self, max_chars: usize) -> String {
        let joined = self
            .messages
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.text))
            .collect::<Vec<_>>()
            .join("\n");

        truncate_at_whitespace(&joined, max_chars)
    }

    /// `full_text` at the default embedding truncation length.
    pub fn embed_text(&self) -> String {
        self.full_text(MAX_EMBED_CHARS)
    }
}

/// Truncates `text` to at most `max_chars` characters, backing off to the
/// rightmost whitespace boundary so truncation never splits a word. Purely
/// a function of `(text, max_chars)` — deterministic.
fn truncate_at_whitespace(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }

    let window: String = chars[..max_chars].iter().collect();
    match window.rfind(char::is_whitespace) {
        Some(idx) => window[..idx].to_string(),
        None => window,
    }
}
