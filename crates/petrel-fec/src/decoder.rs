//! Streaming group decoder.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::header::ShardHeader;
use crate::shard::Shard;
use crate::stats::DecoderStats;

/// Reassembles shard groups from a lossy, reordering transport.
///
/// Shards are fed in via [`add`](Self::add); in-order data shards are
/// released to the output queue immediately, and erasure decoding runs
/// only when a group has losses and enough shards (data + parity ≥ k)
/// have arrived to repair them. Group boundaries and losses are inferred
/// purely from the sequence and block numbers each shard carries; there
/// are no timers, and abandoning a stalled group takes the arrival of a
/// shard from a later one.
///
/// `add` never fails: every transport pathology — duplicates, reordering,
/// truncated groups, sync loss — is absorbed and exposed through
/// [`stats`](Self::stats).
///
/// Within a group, data shards are emitted in ascending block order;
/// across groups, in sequence order. Parity shards are never emitted and
/// no shard is emitted twice.
#[derive(Debug, Default)]
pub struct GroupDecoder {
    /// Shard size of the active group; 0 means no group is in flight.
    fec_size: usize,
    /// Data shards received for the active group, in arrival order.
    data: Vec<Shard>,
    /// Parity shards received for the active group.
    parity: Vec<Shard>,
    /// Header of the last accepted shard.
    prev: ShardHeader,
    stats: DecoderStats,
    out: VecDeque<Shard>,
}

impl GroupDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one received packet.
    pub fn add(&mut self, packet: &[u8]) {
        self.stats.total_packets += 1;
        self.stats.bytes += packet.len() as u64;

        let shard = match Shard::parse(packet) {
            Ok(shard) => shard,
            Err(e) => {
                debug!(len = packet.len(), error = %e, "dropping malformed packet");
                self.stats.dropped_packets += 1;
                return;
            }
        };
        let h = shard.header();

        let prev_seq = u64::from(self.prev.seq_num);
        let mut cur_seq = u64::from(h.seq_num);
        if prev_seq > cur_seq {
            cur_seq += 256;
        }

        if self.fec_size != 0 {
            // A group is in flight.
            if cur_seq != prev_seq {
                if cur_seq < prev_seq {
                    self.stats.lost_sync += 1;
                } else {
                    // The group can never complete now. Estimate what the
                    // link dropped and move on.
                    self.stats.dropped_blocks += seq_distance(prev_seq, cur_seq);
                    let width = u64::from(h.total_shards());
                    let prev_pos = prev_seq * width + u64::from(self.prev.block);
                    let cur_pos = cur_seq * width + u64::from(h.block);
                    if prev_pos < cur_pos {
                        self.stats.dropped_packets += cur_pos - prev_pos;
                    }
                }
                debug!(
                    prev_seq = self.prev.seq_num,
                    seq = h.seq_num,
                    received = self.data.len() + self.parity.len(),
                    "sequence break, discarding partial group"
                );
                self.close_group();
            } else if h.block <= self.prev.block {
                // Duplicate or reordered within the group; the hole it
                // left was already counted when the gap was observed.
                self.stats.dropped_packets += 1;
                return;
            } else {
                self.stats.dropped_packets += u64::from(h.block - self.prev.block) - 1;
            }
        } else if cur_seq == prev_seq {
            // Trailing shard of a group that already completed.
            self.prev = h;
            return;
        } else if self.prev.seq_num != 0 {
            // Idle between groups: whole sequence numbers that never
            // showed up were dropped groups.
            self.stats.dropped_blocks += seq_distance(prev_seq, cur_seq) - 1;
        }

        self.prev = h;

        if self.fec_size == 0 {
            // Shards missing from the head of a fresh group.
            self.stats.dropped_packets += u64::from(h.block);
        }

        if h.fec_disabled() {
            self.out.push_back(shard);
            return;
        }

        self.fec_size = self.fec_size.max(shard.fec_size());

        if h.is_data() {
            self.data.push(shard.clone());

            // Fast path: release immediately when nothing before it is
            // missing.
            if self.data.len() - 1 == usize::from(h.block) {
                self.out.push_back(shard);
            }

            // Every data shard arrived; nothing to reconstruct.
            if self.data.len() == usize::from(h.n_blocks) {
                self.close_group();
                self.stats.total_blocks += 1;
                return;
            }
        } else {
            self.parity.push(shard);
        }

        // Enough shards to repair the losses.
        if self.data.len() + self.parity.len() >= usize::from(h.n_blocks) {
            self.decode_group();
            self.close_group();
            self.stats.total_blocks += 1;
        }
    }

    /// Pop the next decoded data shard, or `None` if the queue is empty.
    pub fn take_shard(&mut self) -> Option<Shard> {
        self.out.pop_front()
    }

    /// Snapshot of the running counters.
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    fn close_group(&mut self) {
        self.fec_size = 0;
        self.data.clear();
        self.parity.clear();
    }

    /// Run erasure decoding over the active group and release every shard
    /// from the first erasure onward. Shards before it already went out on
    /// the fast path.
    fn decode_group(&mut self) {
        let Some(h) = self
            .data
            .first()
            .or_else(|| self.parity.first())
            .map(Shard::header)
        else {
            return;
        };
        let k = usize::from(h.n_blocks);
        let m = usize::from(h.n_fec_blocks);
        let fec_size = self.fec_size;

        if self.data.len() + self.parity.len() < k {
            self.stats.lost_sync += 1;
            return;
        }

        // Slot received data shards by block index; the holes left over
        // are the erasures.
        let mut received: Vec<Option<Shard>> = vec![None; k];
        for shard in &self.data {
            let block = usize::from(shard.header().block);
            if let Some(slot) = received.get_mut(block) {
                *slot = Some(shard.clone());
            }
        }

        let mut table: Vec<Option<Vec<u8>>> = received
            .iter()
            .map(|slot| slot.as_ref().map(|s| padded(s.fec_payload(), fec_size)))
            .collect();
        let Some(first_erased) = table.iter().position(Option::is_none) else {
            return;
        };

        let parity: Vec<(usize, Vec<u8>)> = self
            .parity
            .iter()
            .map(|shard| {
                let h = shard.header();
                (
                    usize::from(h.block) - usize::from(h.n_blocks),
                    padded(shard.fec_payload(), fec_size),
                )
            })
            .collect();

        debug!(
            seq = h.seq_num,
            k,
            m,
            data = self.data.len(),
            parity = parity.len(),
            fec_size,
            "reconstructing group"
        );

        if let Err(e) = petrel_erasure::reconstruct(fec_size, m, &mut table, parity) {
            warn!(seq = h.seq_num, error = %e, "group reconstruction failed");
            self.stats.lost_sync += 1;
            return;
        }

        for block in first_erased..k {
            if let Some(shard) = &received[block] {
                self.out.push_back(shard.clone());
                continue;
            }
            let Some(fec) = table[block].take() else {
                self.stats.dropped_blocks += 1;
                continue;
            };
            // A reconstructed length beyond the shard size means the
            // recovery produced garbage; drop the shard.
            let length = usize::from(u16::from_le_bytes([fec[0], fec[1]]));
            if length + 2 > fec_size {
                self.stats.dropped_blocks += 1;
                continue;
            }
            let header = ShardHeader {
                seq_num: h.seq_num,
                block: block as u8,
                n_blocks: h.n_blocks,
                n_fec_blocks: h.n_fec_blocks,
                length: length as u16,
            };
            self.out.push_back(Shard::assemble(header, &fec));
        }
    }
}

/// Copy a FEC region into a buffer of the group shard size, zero-padding
/// the tail so encoder and decoder agree on the padded symbols.
fn padded(fec: &[u8], fec_size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; fec_size];
    let n = fec.len().min(fec_size);
    buf[..n].copy_from_slice(&fec[..n]);
    buf
}

/// Sequence steps from `prev` to `cur` in unrolled space, accounting for
/// the reserved value 0 that is skipped at the 255 → 1 wrap.
fn seq_distance(prev: u64, cur: u64) -> u64 {
    let mut distance = cur - prev;
    if cur > 255 {
        distance -= 1;
    }
    distance
}
