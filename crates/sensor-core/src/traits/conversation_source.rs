use crate::errors::SensorResult;
use crate::models::{Conversation, Message};

/// Read-only view over the message corpus (spec §4.1). Backed by SQLite or a
/// JSONL snapshot depending on what `CORPUS_PATH` points at; the rest of the
/// pipeline only ever sees this trait.
pub trait ConversationSource: Send + Sync {
    /// Every conversation in the corpus. Order is unspecified but stable
    /// within one run.
    fn list_conversations(&self) -> SensorResult<Vec<Conversation>>;

    /// Ordered messages for one conversation.
    fn get_messages(&self, conversation_id: &str) -> SensorResult<Vec<Message>>;

    /// One conversation by id, or `NotFound`.
    fn get_conversation(&self, conversation_id: &str) -> SensorResult<Conversation>;
}
