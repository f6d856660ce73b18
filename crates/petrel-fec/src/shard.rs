//! Shard buffers: one contiguous allocation per packet.
//!
//! A shard is built mutably ([`ShardMut`]) while the encoder fills headers
//! and payload, then frozen into an immutable, cheaply clonable [`Shard`]
//! the moment it is committed to an output queue. The freeze mirrors the
//! ownership rule of the codec: a shard may sit in a decoder's group buffer
//! and on the output queue at the same time, but is never mutated after
//! publication.

use bytes::{Bytes, BytesMut};

use crate::error::FecError;
use crate::header::ShardHeader;

/// Offset of the FEC-covered region: the 2-byte `length` field plus the
/// payload are what the erasure code protects.
pub(crate) const FEC_OFFSET: usize = ShardHeader::SIZE - 2;

/// An immutable shard, ready for the wire or handed out by a decoder.
///
/// Clones share the underlying buffer.
#[derive(Debug, Clone)]
pub struct Shard {
    buf: Bytes,
}

impl Shard {
    /// Parse a received packet into a shard, copying its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FecError::Truncated`] for packets shorter than a header,
    /// [`FecError::GroupTooLarge`] or [`FecError::BlockOutOfRange`] for
    /// self-inconsistent headers, and [`FecError::LengthOverflow`] for a
    /// data shard claiming more payload than the packet carries.
    pub fn parse(packet: &[u8]) -> Result<Self, FecError> {
        let header = ShardHeader::read_from(packet).ok_or(FecError::Truncated {
            len: packet.len(),
            min: ShardHeader::SIZE,
        })?;

        if !header.fec_disabled() {
            let total = header.total_shards();
            if total as usize > petrel_erasure::MAX_SHARDS {
                return Err(FecError::GroupTooLarge {
                    data: header.n_blocks,
                    parity: header.n_fec_blocks,
                });
            }
            if u16::from(header.block) >= total {
                return Err(FecError::BlockOutOfRange {
                    block: header.block,
                    total,
                });
            }
        }

        // Parity payloads are opaque code symbols; only data shards must
        // fit their claimed length inside the packet.
        if header.is_data() || header.fec_disabled() {
            let capacity = packet.len() - ShardHeader::SIZE;
            if header.length as usize > capacity {
                return Err(FecError::LengthOverflow {
                    length: header.length,
                    capacity,
                });
            }
        }

        Ok(Self {
            buf: Bytes::copy_from_slice(packet),
        })
    }

    /// Build a shard from header fields and a reconstructed FEC region.
    ///
    /// The caller guarantees `fec` starts with the little-endian length
    /// matching `header.length`.
    pub(crate) fn assemble(header: ShardHeader, fec: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(FEC_OFFSET + fec.len());
        buf.extend_from_slice(&[
            header.seq_num,
            header.block,
            header.n_blocks,
            header.n_fec_blocks,
        ]);
        buf.extend_from_slice(fec);
        Self { buf: buf.freeze() }
    }

    /// The shard's header fields.
    pub fn header(&self) -> ShardHeader {
        // The buffer always holds at least a full header.
        ShardHeader::read_from(&self.buf).unwrap_or_default()
    }

    /// The complete packet as sent on the wire.
    pub fn packet(&self) -> &[u8] {
        &self.buf
    }

    /// Everything after the header: payload bytes for a data shard, code
    /// symbols for a parity shard.
    pub fn payload(&self) -> &[u8] {
        &self.buf[ShardHeader::SIZE.min(self.buf.len())..]
    }

    /// The useful payload of a data shard, truncated to its `length`.
    pub fn data(&self) -> &[u8] {
        let len = (self.header().length as usize).min(self.payload().len());
        &self.payload()[..len]
    }

    /// The FEC-covered region: length field plus payload.
    pub(crate) fn fec_payload(&self) -> &[u8] {
        &self.buf[FEC_OFFSET.min(self.buf.len())..]
    }

    /// Size of the FEC-covered region; the group shard size is the largest
    /// such size seen across the group.
    pub(crate) fn fec_size(&self) -> usize {
        self.buf.len().saturating_sub(FEC_OFFSET)
    }
}

/// A shard under construction: header written, payload waiting to be
/// filled by the caller before it is handed back to the encoder.
#[derive(Debug)]
pub struct ShardMut {
    buf: BytesMut,
}

impl ShardMut {
    /// Allocate a zeroed shard with the given header and payload capacity.
    ///
    /// The buffer is zero-filled so that padding between a short payload
    /// and the group shard size is deterministic on both sides of the link.
    pub(crate) fn new(header: ShardHeader, capacity: usize) -> Self {
        let mut buf = BytesMut::zeroed(ShardHeader::SIZE + capacity);
        header.write_into(&mut buf);
        Self { buf }
    }

    /// The shard's header fields.
    pub fn header(&self) -> ShardHeader {
        ShardHeader::read_from(&self.buf).unwrap_or_default()
    }

    /// Mutable access to the payload region (after the header).
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buf[ShardHeader::SIZE..]
    }

    pub(crate) fn set_block(&mut self, block: u8) {
        self.buf[1] = block;
    }

    pub(crate) fn set_n_blocks(&mut self, n_blocks: u8) {
        self.buf[2] = n_blocks;
    }

    /// The FEC-covered region, padding included.
    pub(crate) fn fec_payload(&self) -> &[u8] {
        &self.buf[FEC_OFFSET..]
    }

    pub(crate) fn fec_payload_mut(&mut self) -> &mut [u8] {
        &mut self.buf[FEC_OFFSET..]
    }

    /// Freeze a data shard into wire form, trimming the packet to its
    /// useful length.
    pub(crate) fn into_wire(mut self) -> Shard {
        let len = ShardHeader::SIZE + self.header().length as usize;
        self.buf.truncate(len);
        Shard {
            buf: self.buf.freeze(),
        }
    }

    /// Freeze without trimming. Parity shards go out whole: the kernel has
    /// overwritten their entire FEC region, length field included, so the
    /// length header no longer describes the packet.
    pub(crate) fn freeze(self) -> Shard {
        Shard {
            buf: self.buf.freeze(),
        }
    }
}
