//! The fixed wire header carried by every shard.

/// Header prepended to every shard on the wire. All fields little-endian.
///
/// ```text
/// offset  size  field
/// 0       1     seq_num        group sequence number, 1..255 (0 reserved)
/// 1       1     block          shard index within the group
/// 2       1     n_blocks       data shards in the group (k)
/// 3       1     n_fec_blocks   parity shards in the group (m)
/// 4       2     length         payload bytes in a data shard
/// ```
///
/// The `length` field doubles as the first two bytes of the FEC-covered
/// region, so parity shards encode each data shard's true length and a
/// reconstructed shard carries its own size without a side channel.
///
/// Every shard describes its own group: a decoder needs no handshake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShardHeader {
    /// Group sequence number. Wraps 255 → 1; 0 is reserved and never sent.
    pub seq_num: u8,
    /// Shard index within the group: `0..k` data, `k..k+m` parity.
    pub block: u8,
    /// Number of data shards in the group. 0 means FEC is disabled.
    pub n_blocks: u8,
    /// Number of parity shards in the group. 0 means FEC is disabled.
    pub n_fec_blocks: u8,
    /// Payload length of a data shard. Undefined for parity shards.
    pub length: u16,
}

impl ShardHeader {
    /// Encoded size of the header in bytes.
    pub const SIZE: usize = 6;

    /// Total shards in the group (data + parity).
    pub fn total_shards(&self) -> u16 {
        u16::from(self.n_blocks) + u16::from(self.n_fec_blocks)
    }

    /// Whether this shard carries application payload.
    pub fn is_data(&self) -> bool {
        self.block < self.n_blocks
    }

    /// Whether the group was emitted without parity protection.
    pub fn fec_disabled(&self) -> bool {
        self.n_blocks == 0 || self.n_fec_blocks == 0
    }

    /// Serialize into the first [`SIZE`](Self::SIZE) bytes of `buf`.
    pub(crate) fn write_into(&self, buf: &mut [u8]) {
        buf[0] = self.seq_num;
        buf[1] = self.block;
        buf[2] = self.n_blocks;
        buf[3] = self.n_fec_blocks;
        buf[4..6].copy_from_slice(&self.length.to_le_bytes());
    }

    /// Parse a header from the front of `buf`, or `None` if too short.
    pub fn read_from(buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            seq_num: buf[0],
            block: buf[1],
            n_blocks: buf[2],
            n_fec_blocks: buf[3],
            length: u16::from_le_bytes([buf[4], buf[5]]),
        })
    }
}

/// Advance a group sequence number, skipping the reserved value 0.
pub(crate) fn next_seq(seq: u8) -> u8 {
    match seq.wrapping_add(1) {
        0 => 1,
        next => next,
    }
}
