use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use sensor_core::errors::{SensorError, SensorResult};
use sensor_core::models::{Conversation, Message, MessageRole};
use sensor_core::traits::ConversationSource;

use super::timestamp::parse_created_at;

/// Raw row shape, one per line of the JSONL snapshot.
#[derive(Debug, Deserialize)]
struct RawMessage {
    conversation_id: String,
    message_index: i64,
    role: String,
    text: String,
    created_at: String,
}

/// Read-only view over a newline-delimited JSON snapshot of the corpus
/// (spec §6's schema, serialized one row per line rather than as SQLite
/// rows). Used when `CORPUS_PATH` points at a `.jsonl` file instead of a
/// database.
pub struct JsonlCorpus {
    path: PathBuf,
}

impl JsonlCorpus {
    pub fn open(path: &Path) -> SensorResult<Self> {
        if !path.exists() {
            return Err(SensorError::CorpusError {
                reason: format!("corpus snapshot not found at {}", path.display()),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn load_all_messages(&self) -> SensorResult<BTreeMap<String, Vec<Message>>> {
        let contents = fs::read_to_string(&self.path).map_err(|e| SensorError::CorpusError {
            reason: format!("failed to read {}: {e}", self.path.display()),
        })?;

        let mut by_conversation: BTreeMap<String, Vec<Message>> = BTreeMap::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let raw: RawMessage =
                serde_json::from_str(line).map_err(|e| SensorError::CorpusError {
                    reason: format!("malformed row at line {}: {e}", line_no + 1),
                })?;
            let role = MessageRole::parse(&raw.role).ok_or_else(|| SensorError::CorpusError {
                reason: format!(
                    "unrecognized role {:?} at line {}",
                    raw.role,
                    line_no + 1
                ),
            })?;
            let created_at = parse_created_at(&raw.created_at)?;

            by_conversation
                .entry(raw.conversation_id.clone())
                .or_default()
                .push(Message {
                    conversation_id: raw.conversation_id,
                    message_index: raw.message_index,
                    role,
                    text: raw.text,
                    created_at,
                });
        }

        for messages in by_conversation.values_mut() {
            messages.sort_by_key(|m| m.message_index);
        }

        Ok(by_conversation)
    }
}

impl ConversationSource for JsonlCorpus {
    fn list_conversations(&self) -> SensorResult<Vec<Conversation>> {
        let by_conversation = self.load_all_messages()?;
        Ok(by_conversation
            .into_iter()
            .filter_map(|(id, messages)| Conversation::from_messages(id, messages))
            .collect())
    }

    fn get_messages(&self, conversation_id: &str) -> SensorResult<Vec<Message>> {
        let by_conversation = self.load_all_messages()?;
        by_conversation
            .get(conversation_id)
            .cloned()
            .ok_or_else(|| SensorError::NotFound {
                conversation_id: conversation_id.to_string(),
            })
    }

    fn get_conversation(&self, conversation_id: &str) -> SensorResult<Conversation> {
        let messages = self.get_messages(conversation_id)?;
        Conversation::from_messages(conversation_id.to_string(), messages).ok_or_else(|| {
            SensorError::NotFound {
                conversation_id: conversation_id.to_string(),
            }
        })
    }
}
