//! NEON 4-lane backend.
//!
//! NEON shifts by a signed per-lane count; a negative count shifts right.

use std::arch::aarch64::*;

use super::LaneWord;
use crate::lanes::{LaneBatch, LaneRow, LaneState};

#[derive(Clone, Copy)]
#[repr(transparent)]
pub(crate) struct NeonWord(uint32x4_t);

impl LaneWord for NeonWord {
    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn splat(value: u32) -> Self {
        unsafe { Self(vdupq_n_u32(value)) }
    }

    #[inline(always)]
    unsafe fn load(row: &LaneRow) -> Self {
        unsafe { Self(vld1q_u32(row.0.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn store(self, row: &mut LaneRow) {
        unsafe { vst1q_u32(row.0.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        unsafe { Self(vaddq_u32(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        unsafe { Self(veorq_u32(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        unsafe { Self(vandq_u32(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        unsafe { Self(vorrq_u32(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn andnot(self, other: Self) -> Self {
        // vbic computes a & !b.
        unsafe { Self(vbicq_u32(other.0, self.0)) }
    }

    #[inline(always)]
    unsafe fn not(self) -> Self {
        unsafe { Self(vmvnq_u32(self.0)) }
    }

    #[inline(always)]
    unsafe fn shr(self, count: u32) -> Self {
        unsafe { Self(vshlq_u32(self.0, vdupq_n_s32(-(count as i32)))) }
    }

    #[inline(always)]
    unsafe fn rotl(self, count: u32) -> Self {
        unsafe {
            let left = vshlq_u32(self.0, vdupq_n_s32(count as i32));
            let right = vshlq_u32(self.0, vdupq_n_s32(count as i32 - 32));
            Self(vorrq_u32(left, right))
        }
    }

    #[inline(always)]
    unsafe fn choose(self, y: Self, z: Self) -> Self {
        unsafe { Self(vbslq_u32(self.0, y.0, z.0)) }
    }
}

/// # Safety
///
/// Caller must ensure NEON is available.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn sha256(state: &mut LaneState<8>, batch: &LaneBatch) {
    unsafe { crate::sha256::compress::<NeonWord>(state, batch) }
}

/// # Safety
///
/// Caller must ensure NEON is available.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn ripemd160(state: &mut LaneState<5>, batch: &LaneBatch) {
    unsafe { crate::ripemd160::compress::<NeonWord>(state, batch) }
}
