//! Decoder statistics.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Running decoder counters. All counters are monotonic over the life of a
/// decoder; subtract two snapshots for interval reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderStats {
    /// Every shard ingested, well-formed or not.
    pub total_packets: u64,
    /// Every group that completed, whether all data arrived or erasure
    /// decoding filled the gaps.
    pub total_blocks: u64,
    /// Shards inferred missing from block-index or sequence-gap
    /// arithmetic, plus malformed packets.
    pub dropped_packets: u64,
    /// Shards that could not be emitted: failed reconstruction or whole
    /// skipped groups.
    pub dropped_blocks: u64,
    /// Events where the sequence moved backward or a group could not be
    /// reconstructed from what arrived.
    pub lost_sync: u64,
    /// Sum of ingested packet lengths.
    pub bytes: u64,
}

impl Add for DecoderStats {
    type Output = DecoderStats;

    fn add(self, rhs: DecoderStats) -> DecoderStats {
        DecoderStats {
            total_packets: self.total_packets + rhs.total_packets,
            total_blocks: self.total_blocks + rhs.total_blocks,
            dropped_packets: self.dropped_packets + rhs.dropped_packets,
            dropped_blocks: self.dropped_blocks + rhs.dropped_blocks,
            lost_sync: self.lost_sync + rhs.lost_sync,
            bytes: self.bytes + rhs.bytes,
        }
    }
}

impl Sub for DecoderStats {
    type Output = DecoderStats;

    /// Interval between two snapshots. Saturates at zero rather than
    /// wrapping if the operands are swapped.
    fn sub(self, rhs: DecoderStats) -> DecoderStats {
        DecoderStats {
            total_packets: self.total_packets.saturating_sub(rhs.total_packets),
            total_blocks: self.total_blocks.saturating_sub(rhs.total_blocks),
            dropped_packets: self.dropped_packets.saturating_sub(rhs.dropped_packets),
            dropped_blocks: self.dropped_blocks.saturating_sub(rhs.dropped_blocks),
            lost_sync: self.lost_sync.saturating_sub(rhs.lost_sync),
            bytes: self.bytes.saturating_sub(rhs.bytes),
        }
    }
}
