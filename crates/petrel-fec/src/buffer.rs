//! One-shot framing of a whole byte buffer as a single FEC group.

use tracing::debug;

use crate::encoder::GroupEncoder;
use crate::header::next_seq;
use crate::shard::{Shard, ShardMut};

/// Frames arbitrary byte buffers into self-contained FEC groups.
///
/// Each call to [`encode_buffer`](Self::encode_buffer) picks a group shape
/// `(n, shard_size, m)` for the buffer — as few shards as possible without
/// exceeding `max_shard_size`, with `⌈n × fec_ratio⌉` parity shards — and
/// drives a fresh [`GroupEncoder`] through it. Consecutive buffers get
/// consecutive sequence numbers, so a plain
/// [`GroupDecoder`](crate::GroupDecoder) on the far side reassembles the
/// stream; concatenating the emitted data shards of one group, each
/// truncated to its own length, yields the original buffer.
pub struct BufferEncoder {
    max_shard_size: usize,
    fec_ratio: f64,
    seq_num: u8,
}

impl BufferEncoder {
    /// Create an encoder with the given shard size ceiling and parity
    /// ratio (e.g. `0.5` for one parity shard per two data shards).
    pub fn new(max_shard_size: usize, fec_ratio: f64) -> Self {
        Self {
            max_shard_size,
            fec_ratio,
            seq_num: 1,
        }
    }

    /// Encode `buf` as one group and return all of its shards.
    ///
    /// Returns an empty vector, leaving the encoder untouched, if the
    /// buffer would need more than 255 data shards at `max_shard_size` or
    /// a shard size beyond what the wire format can express; the caller
    /// must split such buffers itself.
    pub fn encode_buffer(&mut self, buf: &[u8]) -> Vec<Shard> {
        let len = buf.len();

        // As few shards as fit under the ceiling, sizes balanced so the
        // last shard stays non-empty.
        let n = len.div_ceil(self.max_shard_size).max(1);
        if n > 255 {
            return Vec::new();
        }
        let shard_size = len.div_ceil(n);
        if shard_size > usize::from(u16::MAX) {
            return Vec::new();
        }

        let m = (n as f64 * self.fec_ratio).ceil() as usize;
        let m = m.min(petrel_erasure::MAX_SHARDS - n);

        let mut encoder = GroupEncoder::new(n as u8, m as u8, shard_size, self.seq_num);
        self.seq_num = next_seq(self.seq_num);

        if len == 0 {
            let shard = fill_shard(&mut encoder, &[]);
            encoder.add(shard);
        } else {
            for slice in buf.chunks(shard_size) {
                let shard = fill_shard(&mut encoder, slice);
                encoder.add(shard);
            }
        }

        let mut shards = Vec::with_capacity(n + m);
        while let Some(shard) = encoder.take_shard() {
            shards.push(shard);
        }

        debug!(bytes = len, n, m, shard_size, "encoded buffer");
        shards
    }
}

fn fill_shard(encoder: &mut GroupEncoder, slice: &[u8]) -> ShardMut {
    let mut shard = encoder.next_shard(slice.len() as u16);
    shard.payload_mut()[..slice.len()].copy_from_slice(slice);
    shard
}
