//! Fixture loader and conversation builders shared across sensor crate
//! integration tests. Mirrors the corpus row shapes `sensor-storage`'s
//! readers expect, so a fixture file here is byte-for-byte what a real
//! `CORPUS_PATH` snapshot looks like.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;

use sensor_core::models::{Conversation, Message, MessageRole};

/// Root directory of the test-fixtures crate, found by walking up from
/// `CARGO_MANIFEST_DIR` until a sibling named `test-fixtures` exists. Works
/// from any crate in the workspace.
pub fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").exists() {
        if path.file_name().and_then(|n| n.to_str()) == Some("test-fixtures") {
            return path;
        }
        if !path.pop() {
            panic!("could not find test-fixtures directory from CARGO_MANIFEST_DIR={manifest_dir}");
        }
    }
    path.join("test-fixtures")
}

/// Loads and deserializes a JSON fixture file relative to the fixtures root.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized — fixtures are
/// part of the test harness, not data under test.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
}

/// Absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// A timestamp `seconds` after a fixed epoch, used so fixture conversations
/// have a stable, reproducible ordering without calling `Utc::now()`.
pub fn fixture_time(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

/// Builds one `Message` row.
pub fn message(conversation_id: &str, index: i64, role: MessageRole, text: &str, seconds: i64) -> Message {
    Message {
        conversation_id: conversation_id.to_string(),
        message_index: index,
        role,
        text: text.to_string(),
        created_at: fixture_time(seconds),
    }
}

/// Builds a two-turn conversation: one user message stating an intent,
/// optionally followed by an assistant reply. `seconds` offsets every
/// message's timestamp so conversations can be given a stable ordering.
pub fn conversation_with_intent(conversation_id: &str, user_text: &str, seconds: i64) -> Conversation {
    let messages = vec![
        message(conversation_id, 0, MessageRole::User, user_text, seconds),
        message(
            conversation_id,
            1,
            MessageRole::Assistant,
            "noted, let's pick this back up",
            seconds + 1,
        ),
    ];
    Conversation::from_messages(conversation_id.to_string(), messages).expect("non-empty message list")
}

/// Builds a conversation whose user text reads as already resolved — used
/// to exercise the completion-similarity cutoff in detector tests.
pub fn conversation_with_completion(conversation_id: &str, user_text: &str, seconds: i64) -> Conversation {
    conversation_with_intent(conversation_id, user_text, seconds)
}

/// Builds `count` distinct open-loop conversations with unique ids
/// `"synthetic-0"..`, spaced one hour apart, for tests that need a corpus of
/// a specific size (e.g. the maintenance/closure boundary scenarios). Index
/// is the only source of variation, so two calls with the same `count`
/// produce byte-identical output.
pub fn synthetic_open_corpus(count: usize) -> Vec<Conversation> {
    (0..count)
        .map(|i| {
            conversation_with_intent(
                &format!("synthetic-{i}"),
                &format!("I still need to finish task number {i}"),
                (i as i64) * 3600,
            )
        })
        .collect()
}
