//! GF(256) Reed-Solomon erasure kernel.
//!
//! This crate provides:
//! - [`encode`] — fills `m` parity buffers from `k` equally-sized data buffers.
//! - [`reconstruct`] — rebuilds erased data buffers from any `k` of the
//!   `k + m` buffers of a group.
//!
//! The code is systematic: data buffers pass through unchanged and parity
//! buffers carry the redundancy. Any `k` surviving buffers (data or parity,
//! in any combination) reconstruct all `k` data buffers. Buffer counts are
//! bounded by the field: `k + m ≤ 256`.
//!
//! The kernel is purely computational and keeps no global state; callers
//! serialize access per group themselves.

mod decoder;
mod encoder;
mod error;

pub use decoder::reconstruct;
pub use encoder::encode;
pub use error::ErasureError;

/// Maximum total number of shards (data + parity) in one group, fixed by
/// the GF(256) field order.
pub const MAX_SHARDS: usize = 256;
