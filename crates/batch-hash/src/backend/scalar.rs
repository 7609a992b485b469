//! Portable single-lane backend.
//!
//! Always compiled. Serves as the reference every vector backend is tested
//! against and as the fallback when no vector tier is usable.

use super::LaneWord;
use crate::lanes::{LaneBatch, LaneRow, LaneState};

impl LaneWord for u32 {
    const LANES: usize = 1;

    #[inline(always)]
    unsafe fn splat(value: u32) -> Self {
        value
    }

    #[inline(always)]
    unsafe fn load(row: &LaneRow) -> Self {
        row.0[0]
    }

    #[inline(always)]
    unsafe fn store(self, row: &mut LaneRow) {
        row.0[0] = self;
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        self.wrapping_add(other)
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        self ^ other
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        self & other
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        self | other
    }

    #[inline(always)]
    unsafe fn andnot(self, other: Self) -> Self {
        !self & other
    }

    #[inline(always)]
    unsafe fn not(self) -> Self {
        !self
    }

    #[inline(always)]
    unsafe fn shr(self, count: u32) -> Self {
        self >> count
    }

    #[inline(always)]
    unsafe fn rotl(self, count: u32) -> Self {
        self.rotate_left(count)
    }
}

pub(crate) fn sha256(state: &mut LaneState<8>, batch: &LaneBatch) {
    // SAFETY: plain integer arithmetic has no CPU requirements.
    unsafe { crate::sha256::compress::<u32>(state, batch) }
}

pub(crate) fn ripemd160(state: &mut LaneState<5>, batch: &LaneBatch) {
    // SAFETY: plain integer arithmetic has no CPU requirements.
    unsafe { crate::ripemd160::compress::<u32>(state, batch) }
}
