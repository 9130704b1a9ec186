use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use sensor_core::errors::{SensorError, SensorResult};
use sensor_core::models::{Conversation, Message, MessageRole};
use sensor_core::traits::ConversationSource;

use super::timestamp::parse_created_at;

/// Read-only view over a `(conversation_id, message_index, role, text,
/// created_at)` SQLite table (spec §6).
///
/// Single connection behind a mutex: the refresh pipeline is single-threaded
/// per spec §5, so a full reader pool (as the teacher's `ReadPool` provides
/// for concurrent readers) would be unused machinery here.
pub struct SqliteCorpus {
    conn: Mutex<Connection>,
}

impl SqliteCorpus {
    /// Opens the corpus database read-only. A missing or unreadable file is
    /// a `CorpusError`, not silently treated as an empty corpus.
    pub fn open(path: &Path) -> SensorResult<Self> {
        let conn = Connection::open_with_flags(path, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| SensorError::CorpusError {
                reason: format!("failed to open corpus at {}: {e}", path.display()),
            })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn load_all_messages(&self) -> SensorResult<BTreeMap<String, Vec<Message>>> {
        let conn = self.conn.lock().expect("corpus connection mutex poisoned");
        let mut stmt = conn
            .prepare(
                "SELECT conversation_id, message_index, role, text, created_at \
                 FROM messages ORDER BY conversation_id, message_index",
            )
            .map_err(|e| SensorError::CorpusError {
                reason: format!("failed to prepare corpus query: {e}"),
            })?;

        let rows = stmt
            .query_map([], |row| {
                let conversation_id: String = row.get(0)?;
                let message_index: i64 = row.get(1)?;
                let role_raw: String = row.get(2)?;
                let text: String = row.get(3)?;
                let created_at_raw: String = row.get(4)?;
                Ok((conversation_id, message_index, role_raw, text, created_at_raw))
            })
            .map_err(|e| SensorError::CorpusError {
                reason: format!("failed to run corpus query: {e}"),
            })?;

        let mut by_conversation: BTreeMap<String, Vec<Message>> = BTreeMap::new();
        for row in rows {
            let (conversation_id, message_index, role_raw, text, created_at_raw) =
                row.map_err(|e| SensorError::CorpusError {
                    reason: format!("corrupt corpus row: {e}"),
                })?;

            let role = MessageRole::parse(&role_raw).ok_or_else(|| SensorError::CorpusError {
                reason: format!("unrecognized role {role_raw:?} in conversation {conversation_id}"),
            })?;
            let created_at = parse_created_at(&created_at_raw)?;

            by_conversation
                .entry(conversation_id.clone())
                .or_default()
                .push(Message {
                    conversation_id,
                    message_index,
                    role,
                    text,
                    created_at,
                });
        }

        Ok(by_conversation)
    }
}

impl ConversationSource for SqliteCorpus {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection as RwConnection;
    use tempfile::tempdir;

    fn seed(path: &Path) {
        let conn = RwConnection::open(path).unwrap();
        conn.execute(
            "CREATE TABLE messages (conversation_id TEXT, message_index INT, role TEXT, text TEXT, created_at TEXT)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO messages VALUES ('c1', 0, 'user', 'I need to finish the report', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO messages VALUES ('c1', 1, 'assistant', 'Got it', '2024-01-01T00:01:00Z')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn lists_conversations_from_seeded_corpus() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.sqlite3");
        seed(&path);

        let corpus = SqliteCorpus::open(&path).unwrap();
        let conversations = corpus.list_conversations().unwrap();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].conversation_id, "c1");
        assert_eq!(conversations[0].messages.len(), 2);
    }

    #[test]
    fn missing_conversation_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.sqlite3");
        seed(&path);

        let corpus = SqliteCorpus::open(&path).unwrap();
        let err = corpus.get_conversation("missing").unwrap_err();
        assert!(matches!(err, SensorError::NotFound { .. }));
    }

    #[test]
    fn rejects_unknown_role() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.sqlite3");
        let conn = RwConnection::open(&path).unwrap();
        conn.execute(
            "CREATE TABLE messages (conversation_id TEXT, message_index INT, role TEXT, text TEXT, created_at TEXT)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO messages VALUES ('c1', 0, 'narrator', 'hmm', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let corpus = SqliteCorpus::open(&path).unwrap();
        let err = corpus.list_conversations().unwrap_err();
        assert!(matches!(err, SensorError::CorpusError { .. }));
    }
}
