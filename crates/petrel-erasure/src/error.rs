//! Error types for the erasure kernel.

/// Errors that can occur during parity generation or reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum ErasureError {
    /// The Reed-Solomon library returned an error.
    #[error("reed-solomon error: {0}")]
    ReedSolomon(#[from] reed_solomon_erasure::Error),

    /// The group would exceed the GF(256) shard limit.
    #[error("too many shards: {data} data + {parity} parity exceeds 256")]
    TooManyShards {
        /// Data shards requested (k).
        data: usize,
        /// Parity shards requested (m).
        parity: usize,
    },

    /// Not enough shards survived to reconstruct the group.
    #[error("not enough shards: need {needed}, got {got}")]
    NotEnoughShards {
        /// Minimum shards required (k).
        needed: usize,
        /// Shards actually present.
        got: usize,
    },

    /// A buffer's length disagrees with the group shard size.
    #[error("shard size mismatch: expected {expected}, got {got}")]
    SizeMismatch {
        /// The group shard size.
        expected: usize,
        /// The offending buffer's length.
        got: usize,
    },
}
