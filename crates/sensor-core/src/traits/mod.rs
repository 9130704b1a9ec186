mod conversation_source;
mod embedding_provider;

pub use conversation_source::ConversationSource;
pub use embedding_provider::EmbeddingProvider;
