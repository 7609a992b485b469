//! Shared test utilities for the lanehash workspace.
//!
//! Reference digests come from the RustCrypto `sha2` and `ripemd` crates, so
//! batch results can be checked against an implementation that shares no
//! code with the lane-parallel one.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA-256 of 32 zero bytes.
pub const SHA256_OF_ZEROS: &str = "66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925";

/// RIPEMD-160 of 32 zero bytes.
pub const RIPEMD160_OF_ZEROS: &str = "d1a70126ff7a149ca6f9b638db084480440ff842";

/// Lower-case hex encoding.
pub fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

/// Reference SHA-256.
pub fn sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input).into()
}

/// Reference RIPEMD-160.
pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    Ripemd160::digest(input).into()
}

/// Reference RIPEMD-160 of SHA-256.
pub fn hash160(input: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(input))
}

/// Deterministic, pairwise distinct 32-byte inputs.
///
/// Input `i` differs from every other input in its first eight bytes, so a
/// lane mix-up always changes at least one digest.
pub fn distinct_inputs(count: usize) -> Vec<[u8; 32]> {
    (0..count as u64)
        .map(|index| {
            let mut input = [0u8; 32];
            input[..8].copy_from_slice(&index.to_le_bytes());
            for (offset, byte) in input[8..].iter_mut().enumerate() {
                *byte = (index as u8).wrapping_mul(31).wrapping_add(offset as u8);
            }
            input
        })
        .collect()
}
