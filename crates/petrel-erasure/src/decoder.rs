//! Erasure reconstruction.

use reed_solomon_erasure::galois_8::ReedSolomon;
use tracing::trace;

use crate::{ErasureError, MAX_SHARDS};

/// Rebuild the erased entries of `data` in place.
///
/// `data` holds the group's `k` data buffers by position; erased positions
/// are `None` and are filled in on success. `parity` holds the surviving
/// parity buffers as `(index, bytes)` pairs, where `index` is the parity
/// buffer's position within `0..parity_count`. Any combination of at least
/// `k` surviving buffers reconstructs the group.
///
/// If every data buffer is already present the call is a no-op.
///
/// # Errors
///
/// Returns [`ErasureError::NotEnoughShards`] if fewer than `k` buffers
/// survive, [`ErasureError::SizeMismatch`] if any buffer disagrees with
/// `shard_size`, or [`ErasureError::ReedSolomon`] if the library fails.
pub fn reconstruct(
    shard_size: usize,
    parity_count: usize,
    data: &mut [Option<Vec<u8>>],
    parity: Vec<(usize, Vec<u8>)>,
) -> Result<(), ErasureError> {
    let k = data.len();
    let m = parity_count;

    if k + m > MAX_SHARDS {
        return Err(ErasureError::TooManyShards { data: k, parity: m });
    }
    for buf in data.iter().flatten() {
        if buf.len() != shard_size {
            return Err(ErasureError::SizeMismatch {
                expected: shard_size,
                got: buf.len(),
            });
        }
    }

    for (idx, bytes) in &parity {
        if *idx >= m {
            return Err(ErasureError::ReedSolomon(
                reed_solomon_erasure::Error::InvalidIndex,
            ));
        }
        if bytes.len() != shard_size {
            return Err(ErasureError::SizeMismatch {
                expected: shard_size,
                got: bytes.len(),
            });
        }
    }

    if data.iter().all(|d| d.is_some()) {
        return Ok(());
    }

    let present = data.iter().filter(|d| d.is_some()).count() + parity.len();
    if present < k {
        return Err(ErasureError::NotEnoughShards {
            needed: k,
            got: present,
        });
    }
    let erased = data.iter().filter(|d| d.is_none()).count();

    // Lay the group out as the library expects: k data positions followed
    // by m parity positions, missing entries left as None.
    let mut shards: Vec<Option<Vec<u8>>> = Vec::with_capacity(k + m);
    for slot in data.iter_mut() {
        shards.push(slot.take());
    }
    shards.resize_with(k + m, || None);
    for (idx, bytes) in parity {
        shards[k + idx] = Some(bytes);
    }

    let rs = ReedSolomon::new(k, m)?;
    rs.reconstruct_data(&mut shards)?;

    for (slot, rebuilt) in data.iter_mut().zip(shards) {
        *slot = rebuilt;
    }

    trace!(k, m, shard_size, erased, "reconstructed erased shards");
    Ok(())
}
