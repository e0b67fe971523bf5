/*
 * hash.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Hash functions used by the LCFG core.
 *
 * Two hashes are needed:
 * - djb2 for tag names, cached on every tag
 * - a seedless 64-bit hash over whole derivation strings, which is the
 *   key (and the list id) inside a derivation map
 */

use rustc_hash::FxHasher;
use std::hash::Hasher;

const DJB2_SEED: u64 = 5381;

/// Bernstein's djb2 over the raw bytes of `s` (`h * 33 + byte`, wrapping).
pub fn djb2(s: &str) -> u64 {
    s.bytes().fold(DJB2_SEED, |hash, byte| {
        hash.wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(u64::from(byte))
    })
}

/// Fixed 64-bit non-cryptographic hash of a derivation string.
///
/// `FxHasher` carries no per-process seed, so the same content always maps
/// to the same id.
pub fn content_hash(s: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(s.as_bytes());
    hasher.finish()
}
