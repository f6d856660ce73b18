//! Group encoder: packs data shards and emits them with parity.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::header::{ShardHeader, next_seq};
use crate::shard::{Shard, ShardMut};

/// Accumulates up to `k` data shards for one group, computes `m` parity
/// shards over them, and emits all `k + m` shards to an output queue in
/// block order (data first, then parity).
///
/// With `k == 0` or `m == 0` the encoder degrades to a passthrough: every
/// shard is emitted immediately as its own group.
///
/// A freshly constructed encoder is empty and has produced nothing.
pub struct GroupEncoder {
    n_blocks: u8,
    n_fec_blocks: u8,
    shard_size: usize,
    seq_num: u8,
    in_group: Vec<ShardMut>,
    out: VecDeque<Shard>,
}

impl GroupEncoder {
    /// Create an encoder producing groups of `n_blocks` data shards and
    /// `n_fec_blocks` parity shards, each with `shard_size` bytes of
    /// payload capacity, starting at sequence number `start_seq`.
    ///
    /// `n_blocks + n_fec_blocks` must not exceed 256.
    pub fn new(n_blocks: u8, n_fec_blocks: u8, shard_size: usize, start_seq: u8) -> Self {
        debug_assert!(usize::from(n_blocks) + usize::from(n_fec_blocks) <= petrel_erasure::MAX_SHARDS);
        Self {
            n_blocks,
            n_fec_blocks,
            shard_size,
            seq_num: start_seq,
            in_group: Vec::new(),
            out: VecDeque::new(),
        }
    }

    /// Allocate the next data shard, header pre-populated, payload zeroed.
    ///
    /// The caller fills the first `length` payload bytes and hands the
    /// shard back via [`add`](Self::add). `length` must not exceed the
    /// encoder's shard size.
    pub fn next_shard(&mut self, length: u16) -> ShardMut {
        debug_assert!(usize::from(length) <= self.shard_size);
        ShardMut::new(
            ShardHeader {
                seq_num: self.seq_num,
                block: self.in_group.len() as u8,
                n_blocks: self.n_blocks,
                n_fec_blocks: self.n_fec_blocks,
                length,
            },
            self.shard_size,
        )
    }

    /// Add a filled data shard to the current group.
    ///
    /// The shard's block index is re-stamped from the in-group position,
    /// so shards may be pre-allocated and added in any order. Filling the
    /// group triggers parity generation.
    pub fn add(&mut self, mut shard: ShardMut) {
        shard.set_block(self.in_group.len() as u8);

        // Not actually encoding: pass the shard straight through.
        if self.n_blocks == 0 || self.n_fec_blocks == 0 {
            self.out.push_back(shard.into_wire());
            self.seq_num = next_seq(self.seq_num);
            return;
        }

        let filled = shard.header().block == self.n_blocks - 1;
        self.in_group.push(shard);
        if filled {
            self.encode_group();
        }
    }

    /// Close the current group early, generating parity over however many
    /// data shards have been added. A no-op on an empty group.
    pub fn flush(&mut self) {
        self.encode_group();
    }

    /// Pop the next encoded shard, or `None` if the queue is empty.
    pub fn take_shard(&mut self) -> Option<Shard> {
        self.out.pop_front()
    }

    fn encode_group(&mut self) {
        let n = self.in_group.len();
        if n == 0 {
            return;
        }

        // The group shard size covers the largest payload plus its length
        // field; shorter shards are zero-padded up to it.
        let fec_size = self
            .in_group
            .iter()
            .map(|s| usize::from(s.header().length) + 2)
            .max()
            .unwrap_or(2);

        // The group may be shorter than configured when flushed early;
        // every header carries the actual group width.
        for shard in &mut self.in_group {
            shard.set_n_blocks(n as u8);
        }

        let m = usize::from(self.n_fec_blocks);
        let mut parity: Vec<ShardMut> = (0..m)
            .map(|i| {
                ShardMut::new(
                    ShardHeader {
                        seq_num: self.seq_num,
                        block: (n + i) as u8,
                        n_blocks: n as u8,
                        n_fec_blocks: self.n_fec_blocks,
                        length: (fec_size - 2) as u16,
                    },
                    fec_size - 2,
                )
            })
            .collect();

        let data_refs: Vec<&[u8]> = self
            .in_group
            .iter()
            .map(|s| &s.fec_payload()[..fec_size])
            .collect();
        let mut parity_refs: Vec<&mut [u8]> =
            parity.iter_mut().map(|s| s.fec_payload_mut()).collect();
        if let Err(e) = petrel_erasure::encode(&data_refs, &mut parity_refs) {
            warn!(
                seq = self.seq_num,
                n, m,
                error = %e,
                "parity generation failed, emitting data shards unprotected"
            );
            parity.clear();
        }

        debug!(seq = self.seq_num, n, m = parity.len(), fec_size, "encoded group");

        for shard in self.in_group.drain(..) {
            self.out.push_back(shard.into_wire());
        }
        for shard in parity {
            self.out.push_back(shard.freeze());
        }
        self.seq_num = next_seq(self.seq_num);
    }
}
