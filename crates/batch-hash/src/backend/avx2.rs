//! AVX2 8-lane backend.

use std::arch::x86_64::*;

use super::LaneWord;
use crate::lanes::{LaneBatch, LaneRow, LaneState};

#[derive(Clone, Copy)]
#[repr(transparent)]
pub(crate) struct Avx2Word(__m256i);

impl LaneWord for Avx2Word {
    const LANES: usize = 8;

    #[inline(always)]
    unsafe fn splat(value: u32) -> Self {
        unsafe { Self(_mm256_set1_epi32(value as i32)) }
    }

    #[inline(always)]
    unsafe fn load(row: &LaneRow) -> Self {
        unsafe { Self(_mm256_loadu_si256(row.0.as_ptr().cast())) }
    }

    #[inline(always)]
    unsafe fn store(self, row: &mut LaneRow) {
        unsafe { _mm256_storeu_si256(row.0.as_mut_ptr().cast(), self.0) }
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        unsafe { Self(_mm256_add_epi32(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        unsafe { Self(_mm256_xor_si256(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        unsafe { Self(_mm256_and_si256(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        unsafe { Self(_mm256_or_si256(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn andnot(self, other: Self) -> Self {
        unsafe { Self(_mm256_andnot_si256(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn not(self) -> Self {
        unsafe { Self(_mm256_xor_si256(self.0, _mm256_set1_epi32(-1))) }
    }

    #[inline(always)]
    unsafe fn shr(self, count: u32) -> Self {
        unsafe { Self(_mm256_srl_epi32(self.0, _mm_cvtsi32_si128(count as i32))) }
    }

    #[inline(always)]
    unsafe fn rotl(self, count: u32) -> Self {
        unsafe {
            let left = _mm256_sll_epi32(self.0, _mm_cvtsi32_si128(count as i32));
            let right = _mm256_srl_epi32(self.0, _mm_cvtsi32_si128((32 - count) as i32));
            Self(_mm256_or_si256(left, right))
        }
    }
}

/// # Safety
///
/// Caller must ensure AVX2 is available (use `is_x86_feature_detected!`).
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn sha256(state: &mut LaneState<8>, batch: &LaneBatch) {
    unsafe { crate::sha256::compress::<Avx2Word>(state, batch) }
}

/// # Safety
///
/// Caller must ensure AVX2 is available (use `is_x86_feature_detected!`).
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn ripemd160(state: &mut LaneState<5>, batch: &LaneBatch) {
    unsafe { crate::ripemd160::compress::<Avx2Word>(state, batch) }
}
