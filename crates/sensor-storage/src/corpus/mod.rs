//! Message Store (spec §4.1): read-only views over the corpus, one
//! implementation per backing format.

mod jsonl_source;
mod sqlite_source;
mod timestamp;

pub use jsonl_source::JsonlCorpus;
pub use sqlite_source::SqliteCorpus;
