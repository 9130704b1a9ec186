pub const DEFAULT_CORPUS_PATH: &str = "corpus.sqlite3";
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
pub const DEFAULT_MODEL_ID: &str = "local-minilm-384";
