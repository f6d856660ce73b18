//! Parity generation.

use reed_solomon_erasure::galois_8::ReedSolomon;
use tracing::trace;

use crate::{ErasureError, MAX_SHARDS};

/// Fill `parity` with Reed-Solomon parity symbols computed over `data`.
///
/// All buffers must have the same length (the group shard size). On return
/// every parity buffer has been overwritten; the data buffers are untouched.
/// Passing an empty `parity` slice is a no-op.
///
/// # Errors
///
/// Returns [`ErasureError::TooManyShards`] if `data.len() + parity.len()`
/// exceeds 256, [`ErasureError::SizeMismatch`] if any buffer disagrees with
/// `data[0].len()`, or [`ErasureError::ReedSolomon`] if the library rejects
/// the parameters.
pub fn encode(data: &[&[u8]], parity: &mut [&mut [u8]]) -> Result<(), ErasureError> {
    let k = data.len();
    let m = parity.len();

    if m == 0 {
        return Ok(());
    }
    if k + m > MAX_SHARDS {
        return Err(ErasureError::TooManyShards { data: k, parity: m });
    }

    let shard_size = data.first().map_or(0, |d| d.len());
    for d in data {
        if d.len() != shard_size {
            return Err(ErasureError::SizeMismatch {
                expected: shard_size,
                got: d.len(),
            });
        }
    }
    for p in parity.iter() {
        if p.len() != shard_size {
            return Err(ErasureError::SizeMismatch {
                expected: shard_size,
                got: p.len(),
            });
        }
    }

    let rs = ReedSolomon::new(k, m)?;
    rs.encode_sep(data, parity)?;

    trace!(k, m, shard_size, "generated parity shards");
    Ok(())
}
