//! Deterministic hashing helpers.

use ahash::{AHasher, RandomState};
use std::hash::{BuildHasher, Hash, Hasher};

const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Returns a hasher with fixed seeds, so equal input gives equal output in every process.
#[must_use]
pub fn stable_hasher() -> AHasher {
    RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3]).build_hasher()
}

/// Hashes a single value with [`stable_hasher`].
#[must_use]
pub fn stable_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = stable_hasher();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Mixes `value` into `seed` the way a 31-multiplier hash code does.
#[must_use]
pub const fn combine(seed: u64, value: u64) -> u64 {
    seed.wrapping_mul(31).wrapping_add(value)
}
