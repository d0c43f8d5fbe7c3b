//! Key derivation primitives for password hashes.
//!
//! Provides the fallback HMAC-SHA256 derivation, the legacy iterated digest,
//! and the native bcrypt adapter.

pub mod kdf;
pub mod native;

pub use kdf::{HashParams, derive};
pub use native::{Bcrypt, NativeHasher};

/// Length of the raw salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the encoded salt body (22 alphabet characters).
pub const SALT_CHARS: usize = 22;
/// Length of one derived block (SHA-256 digest, 32 bytes).
pub const BLOCK_LEN: usize = 32;
/// Lowest accepted work factor.
pub const MIN_COST: u32 = 4;
/// Highest accepted work factor.
pub const MAX_COST: u32 = 31;
/// Work factor used when none is given.
pub const DEFAULT_COST: u32 = 8;

/// Brings `cost` into `MIN_COST..=MAX_COST`.
pub fn clamp_cost(cost: u32) -> u32 {
    cost.clamp(MIN_COST, MAX_COST)
}
