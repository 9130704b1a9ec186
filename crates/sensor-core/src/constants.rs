/// Crate version, surfaced in diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dense vector dimensionality every embedding provider must produce.
pub const EMBEDDING_DIMENSIONS: usize = 384;

/// Conversation text is truncated to this many characters before embedding.
pub const MAX_EMBED_CHARS: usize = 5_000;

/// `batch_ensure` processes conversations in chunks of this size.
pub const EMBEDDING_BATCH_SIZE: usize = 32;

/// Default number of open loops emitted by the loop detector.
pub const DEFAULT_LOOP_TOP_K: usize = 15;

/// Default number of k-means clusters.
pub const DEFAULT_CLUSTER_K: usize = 10;

/// Minimum members a cluster must retain before being emitted.
pub const MIN_CLUSTER_SIZE: usize = 3;

/// Clusterer requires at least `2 * k` vectors, otherwise it returns no clusters.
pub const CLUSTER_MIN_VECTOR_MULTIPLE: usize = 2;

/// Max k-means iterations before forced convergence.
pub const KMEANS_MAX_ITERATIONS: usize = 300;

/// K-means convergence threshold: stop once centroid shift drops below this.
pub const KMEANS_CONVERGENCE_EPSILON: f64 = 1e-4;

/// Fixed seed for the k-means PRNG — required for run-to-run determinism.
pub const KMEANS_SEED: u64 = 0xC0FFEE_5EED_u64;

/// Number of keywords summarized per cluster.
pub const CLUSTER_KEYWORD_COUNT: usize = 5;

/// Default size of the cached user-vocabulary list.
pub const DEFAULT_VOCABULARY_TOP_N: usize = 500;

/// Tolerance for the unit-norm invariant on stored embeddings.
pub const UNIT_NORM_TOLERANCE: f64 = 1e-5;
