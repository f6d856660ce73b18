//! Shared test utilities for codec tests.

use crate::{GroupDecoder, GroupEncoder, Shard};

/// Generate deterministic, non-repeating test data.
pub fn test_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

/// Encode one group of payloads and return its packets in emission order.
///
/// The shard size is the largest payload; a short final group is closed
/// with `flush`.
pub fn group_packets(k: u8, m: u8, seq: u8, payloads: &[&[u8]]) -> Vec<Vec<u8>> {
    let shard_size = payloads.iter().map(|p| p.len()).max().unwrap_or(0);
    let mut enc = GroupEncoder::new(k, m, shard_size, seq);
    for payload in payloads {
        let mut shard = enc.next_shard(payload.len() as u16);
        shard.payload_mut()[..payload.len()].copy_from_slice(payload);
        enc.add(shard);
    }
    enc.flush();
    drain(&mut enc).iter().map(|s| s.packet().to_vec()).collect()
}

/// Pull every queued shard out of an encoder.
pub fn drain(enc: &mut GroupEncoder) -> Vec<Shard> {
    let mut out = Vec::new();
    while let Some(shard) = enc.take_shard() {
        out.push(shard);
    }
    out
}

/// Pull every queued shard out of a decoder.
pub fn drain_decoder(dec: &mut GroupDecoder) -> Vec<Shard> {
    let mut out = Vec::new();
    while let Some(shard) = dec.take_shard() {
        out.push(shard);
    }
    out
}

/// Feed shards into a fresh decoder and concatenate everything it emits.
pub fn decode_bytes(shards: &[Shard]) -> Vec<u8> {
    let mut dec = GroupDecoder::new();
    for shard in shards {
        dec.add(shard.packet());
    }
    drain_decoder(&mut dec)
        .iter()
        .flat_map(|s| s.data().to_vec())
        .collect()
}
