//! Error types for the packet codec.

/// Errors that can occur while parsing or encoding shards.
///
/// The streaming decoder never surfaces these from `add`; it absorbs
/// transport pathology into its statistics. They appear on the parsing
/// surface ([`Shard::parse`](crate::Shard::parse)) where a caller framing
/// packets itself can act on them.
#[derive(Debug, thiserror::Error)]
pub enum FecError {
    /// The packet is shorter than a shard header.
    #[error("packet too short: {len} bytes, need at least {min}")]
    Truncated {
        /// Bytes received.
        len: usize,
        /// Minimum packet size.
        min: usize,
    },

    /// The header claims a block index outside its own group.
    #[error("block index {block} outside group of {total} shards")]
    BlockOutOfRange {
        /// Claimed block index.
        block: u8,
        /// Claimed group size (data + parity).
        total: u16,
    },

    /// The header claims more shards than the erasure code supports.
    #[error("group too large: {data} data + {parity} parity shards exceeds 256")]
    GroupTooLarge {
        /// Claimed data shard count.
        data: u8,
        /// Claimed parity shard count.
        parity: u8,
    },

    /// A data shard claims more payload than the packet carries.
    #[error("payload length {length} exceeds capacity {capacity}")]
    LengthOverflow {
        /// Claimed payload length.
        length: u16,
        /// Bytes actually present after the header.
        capacity: usize,
    },

    /// The erasure kernel rejected the group.
    #[error("erasure kernel error: {0}")]
    Erasure(#[from] petrel_erasure::ErasureError),
}
