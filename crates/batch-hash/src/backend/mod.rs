//! Vector word abstraction and per-architecture backends.
//!
//! The compression functions in [`crate::sha256`] and [`crate::ripemd160`]
//! are written once, generic over [`LaneWord`]: a register holding
//! [`LaneWord::LANES`] independent 32-bit words. Each backend implements the
//! trait for its register type and exposes `#[target_feature]` entry points
//! that instantiate the generic code, so the compiler emits the real vector
//! instructions inside a function that is allowed to use them.
//!
//! - **all targets**: scalar `u32` (1 lane)
//! - **x86_64**: SSE2 (4 lanes), AVX2 (8 lanes), AVX-512 (16 lanes)
//! - **aarch64**: NEON (4 lanes)

pub(crate) mod scalar;

#[cfg(all(target_arch = "x86_64", feature = "sse2"))]
pub(crate) mod sse2;

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub(crate) mod avx2;

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub(crate) mod avx512;

#[cfg(all(target_arch = "aarch64", feature = "neon"))]
pub(crate) mod neon;

use crate::lanes::LaneRow;

/// A register of `LANES` independent 32-bit words.
///
/// All arithmetic is lane-wise and wraps modulo 2^32. Rotation and shift
/// counts are in `0..32`.
///
/// # Safety
///
/// Every method may compile to instructions of the implementing backend's
/// instruction set. Callers must only invoke them from code running on a CPU
/// that supports that set, which in practice means from inside the backend's
/// `#[target_feature]` entry points.
pub(crate) trait LaneWord: Copy {
    /// Independent words per register.
    const LANES: usize;

    /// Broadcasts `value` to every lane.
    unsafe fn splat(value: u32) -> Self;

    /// Loads the first `LANES` elements of `row`.
    unsafe fn load(row: &LaneRow) -> Self;

    /// Stores into the first `LANES` elements of `row`.
    unsafe fn store(self, row: &mut LaneRow);

    unsafe fn add(self, other: Self) -> Self;

    unsafe fn xor(self, other: Self) -> Self;

    unsafe fn and(self, other: Self) -> Self;

    unsafe fn or(self, other: Self) -> Self;

    /// `!self & other`.
    unsafe fn andnot(self, other: Self) -> Self;

    unsafe fn not(self) -> Self;

    /// Logical right shift.
    unsafe fn shr(self, count: u32) -> Self;

    unsafe fn rotl(self, count: u32) -> Self;

    #[inline(always)]
    unsafe fn rotr(self, count: u32) -> Self {
        unsafe { self.rotl((32 - count) & 31) }
    }

    /// Bitwise select: `y` where `self` is set, `z` elsewhere.
    #[inline(always)]
    unsafe fn choose(self, y: Self, z: Self) -> Self {
        unsafe { self.and(y).or(self.andnot(z)) }
    }

    /// Bitwise majority of `self`, `y` and `z`.
    #[inline(always)]
    unsafe fn majority(self, y: Self, z: Self) -> Self {
        unsafe { self.and(y).or(z.and(self.or(y))) }
    }
}
