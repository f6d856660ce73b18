//! Group-based forward error correction for lossy packet links.
//!
//! This crate packs a stream of variable-length application messages into
//! fixed-size shards, groups the shards, and protects each group with
//! Reed-Solomon parity so the receiver can ride out packet loss without
//! retransmission:
//!
//! - [`GroupEncoder`] — accumulates `k` data shards, appends `m` parity
//!   shards, and emits all `k + m` as independent packets.
//! - [`GroupDecoder`] — ingests packets in whatever order and quantity the
//!   link delivers, releases in-order data eagerly, reconstructs losses
//!   from parity, and keeps [`DecoderStats`] on link quality.
//! - [`BufferEncoder`] — frames one whole byte buffer as one group.
//!
//! Every shard is a self-contained packet:
//!
//! ```text
//! [ seq_num | block | n_blocks | n_fec_blocks | length | payload ]
//!      1        1        1           1            2        ...
//!                                              └────── FEC-covered ──────┘
//! ```
//!
//! Groups are self-describing — each header carries its group's shape —
//! so a decoder can join a stream cold. Encoders and decoders are plain
//! single-threaded state machines: every call completes synchronously and
//! performs at most one erasure computation.

mod buffer;
mod decoder;
mod encoder;
mod error;
mod header;
mod shard;
mod stats;

pub use buffer::BufferEncoder;
pub use decoder::GroupDecoder;
pub use encoder::GroupEncoder;
pub use error::FecError;
pub use header::ShardHeader;
pub use shard::{Shard, ShardMut};
pub use stats::DecoderStats;

#[cfg(test)]
mod tests;
