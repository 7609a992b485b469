//! AVX-512 16-lane backend.
//!
//! Uses native variable rotates and three-input ternary logic for the
//! select and majority functions. Only AVX-512F instructions are emitted;
//! the dispatcher still requires the full F+DQ+BW+VL tier before selecting
//! this backend.

use std::arch::x86_64::*;

use super::LaneWord;
use crate::lanes::{LaneBatch, LaneRow, LaneState};

/// Truth table of `a ? b : c` for `vpternlogd`.
const TERNLOG_SELECT: i32 = 0xCA;
/// Truth table of `maj(a, b, c)` for `vpternlogd`.
const TERNLOG_MAJORITY: i32 = 0xE8;

#[derive(Clone, Copy)]
#[repr(transparent)]
pub(crate) struct Avx512Word(__m512i);

impl LaneWord for Avx512Word {
    const LANES: usize = 16;

    #[inline(always)]
    unsafe fn splat(value: u32) -> Self {
        unsafe { Self(_mm512_set1_epi32(value as i32)) }
    }

    #[inline(always)]
    unsafe fn load(row: &LaneRow) -> Self {
        unsafe { Self(_mm512_loadu_si512(row.0.as_ptr().cast())) }
    }

    #[inline(always)]
    unsafe fn store(self, row: &mut LaneRow) {
        unsafe { _mm512_storeu_si512(row.0.as_mut_ptr().cast(), self.0) }
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        unsafe { Self(_mm512_add_epi32(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        unsafe { Self(_mm512_xor_si512(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        unsafe { Self(_mm512_and_si512(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        unsafe { Self(_mm512_or_si512(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn andnot(self, other: Self) -> Self {
        unsafe { Self(_mm512_andnot_si512(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn not(self) -> Self {
        unsafe { Self(_mm512_xor_si512(self.0, _mm512_set1_epi32(-1))) }
    }

    #[inline(always)]
    unsafe fn shr(self, count: u32) -> Self {
        unsafe { Self(_mm512_srl_epi32(self.0, _mm_cvtsi32_si128(count as i32))) }
    }

    #[inline(always)]
    unsafe fn rotl(self, count: u32) -> Self {
        unsafe { Self(_mm512_rolv_epi32(self.0, _mm512_set1_epi32(count as i32))) }
    }

    #[inline(always)]
    unsafe fn rotr(self, count: u32) -> Self {
        unsafe { Self(_mm512_rorv_epi32(self.0, _mm512_set1_epi32(count as i32))) }
    }

    #[inline(always)]
    unsafe fn choose(self, y: Self, z: Self) -> Self {
        unsafe { Self(_mm512_ternarylogic_epi32::<TERNLOG_SELECT>(self.0, y.0, z.0)) }
    }

    #[inline(always)]
    unsafe fn majority(self, y: Self, z: Self) -> Self {
        unsafe { Self(_mm512_ternarylogic_epi32::<TERNLOG_MAJORITY>(self.0, y.0, z.0)) }
    }
}

/// # Safety
///
/// Caller must ensure AVX-512F is available.
#[target_feature(enable = "avx512f")]
pub(crate) unsafe fn sha256(state: &mut LaneState<8>, batch: &LaneBatch) {
    unsafe { crate::sha256::compress::<Avx512Word>(state, batch) }
}

/// # Safety
///
/// Caller must ensure AVX-512F is available.
#[target_feature(enable = "avx512f")]
pub(crate) unsafe fn ripemd160(state: &mut LaneState<5>, batch: &LaneBatch) {
    unsafe { crate::ripemd160::compress::<Avx512Word>(state, batch) }
}
