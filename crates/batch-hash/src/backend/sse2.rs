//! SSE2 4-lane backend.
//!
//! SSE2 has no rotate instruction, so rotations are two shifts and an OR.

use std::arch::x86_64::*;

use super::LaneWord;
use crate::lanes::{LaneBatch, LaneRow, LaneState};

#[derive(Clone, Copy)]
#[repr(transparent)]
pub(crate) struct Sse2Word(__m128i);

impl LaneWord for Sse2Word {
    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn splat(value: u32) -> Self {
        unsafe { Self(_mm_set1_epi32(value as i32)) }
    }

    #[inline(always)]
    unsafe fn load(row: &LaneRow) -> Self {
        unsafe { Self(_mm_loadu_si128(row.0.as_ptr().cast())) }
    }

    #[inline(always)]
    unsafe fn store(self, row: &mut LaneRow) {
        unsafe { _mm_storeu_si128(row.0.as_mut_ptr().cast(), self.0) }
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        unsafe { Self(_mm_add_epi32(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        unsafe { Self(_mm_xor_si128(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        unsafe { Self(_mm_and_si128(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        unsafe { Self(_mm_or_si128(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn andnot(self, other: Self) -> Self {
        unsafe { Self(_mm_andnot_si128(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn not(self) -> Self {
        unsafe { Self(_mm_xor_si128(self.0, _mm_set1_epi32(-1))) }
    }

    #[inline(always)]
    unsafe fn shr(self, count: u32) -> Self {
        unsafe { Self(_mm_srl_epi32(self.0, _mm_cvtsi32_si128(count as i32))) }
    }

    #[inline(always)]
    unsafe fn rotl(self, count: u32) -> Self {
        unsafe {
            let left = _mm_sll_epi32(self.0, _mm_cvtsi32_si128(count as i32));
            let right = _mm_srl_epi32(self.0, _mm_cvtsi32_si128((32 - count) as i32));
            Self(_mm_or_si128(left, right))
        }
    }
}

/// # Safety
///
/// Caller must ensure SSE2 is available.
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn sha256(state: &mut LaneState<8>, batch: &LaneBatch) {
    unsafe { crate::sha256::compress::<Sse2Word>(state, batch) }
}

/// # Safety
///
/// Caller must ensure SSE2 is available.
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn ripemd160(state: &mut LaneState<5>, batch: &LaneBatch) {
    unsafe { crate::ripemd160::compress::<Sse2Word>(state, batch) }
}
