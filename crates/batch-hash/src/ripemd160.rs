//! Lane-parallel RIPEMD-160 compression.
//!
//! RIPEMD-160 runs two independent lines of 80 steps over the same block,
//! each in five rounds of sixteen, then folds both lines into the chaining
//! value. Message words, the length field and the digest are little-endian.

use crate::backend::LaneWord;
use crate::block::{BLOCK_WORDS, PaddedBlock, WordOrder};
use crate::Input;
use crate::lanes::{LaneBatch, LaneState};

/// RIPEMD-160 reads message words and writes digests little-endian.
pub const WORD_ORDER: WordOrder = WordOrder::LittleEndian;

/// Pads `input` into a single block in this algorithm's byte order.
#[must_use]
pub const fn pad(input: &Input) -> PaddedBlock {
    crate::block::pad(input, WORD_ORDER)
}

/// Initial chaining value.
pub const IV: [u32; 5] = [
    0x6745_2301,
    0xefcd_ab89,
    0x98ba_dcfe,
    0x1032_5476,
    0xc3d2_e1f0,
];

/// Left line round constants.
const KL: [u32; 5] = [0x0000_0000, 0x5a82_7999, 0x6ed9_eba1, 0x8f1b_bcdc, 0xa953_fd4e];
/// Right line round constants.
const KR: [u32; 5] = [0x50a2_8be6, 0x5c4d_d124, 0x6d70_3ef3, 0x7a6d_76e9, 0x0000_0000];

/// Left line message word selection.
const R: [usize; 80] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, //
    7, 4, 13, 1, 10, 6, 15, 3, 12, 0, 9, 5, 2, 14, 11, 8, //
    3, 10, 14, 4, 9, 15, 8, 1, 2, 7, 0, 6, 13, 11, 5, 12, //
    1, 9, 11, 10, 0, 8, 12, 4, 13, 3, 7, 15, 14, 5, 6, 2, //
    4, 0, 5, 9, 7, 12, 2, 10, 14, 1, 3, 8, 11, 6, 15, 13,
];

/// Right line message word selection.
const RP: [usize; 80] = [
    5, 14, 7, 0, 9, 2, 11, 4, 13, 6, 15, 8, 1, 10, 3, 12, //
    6, 11, 3, 7, 0, 13, 5, 10, 14, 15, 8, 12, 4, 9, 1, 2, //
    15, 5, 1, 3, 7, 14, 6, 9, 11, 8, 12, 2, 10, 0, 4, 13, //
    8, 6, 4, 1, 3, 11, 15, 0, 5, 12, 2, 13, 9, 7, 10, 14, //
    12, 15, 10, 4, 1, 5, 8, 7, 6, 2, 13, 14, 0, 3, 9, 11,
];

/// Left line rotation amounts.
const S: [u32; 80] = [
    11, 14, 15, 12, 5, 8, 7, 9, 11, 13, 14, 15, 6, 7, 9, 8, //
    7, 6, 8, 13, 11, 9, 7, 15, 7, 12, 15, 9, 11, 7, 13, 12, //
    11, 13, 6, 7, 14, 9, 13, 15, 14, 8, 13, 6, 5, 12, 7, 5, //
    11, 12, 14, 15, 14, 15, 9, 8, 9, 14, 5, 6, 8, 6, 5, 12, //
    9, 15, 5, 11, 6, 8, 13, 12, 5, 12, 13, 14, 11, 8, 5, 6,
];

/// Right line rotation amounts.
const SP: [u32; 80] = [
    8, 9, 9, 11, 13, 15, 15, 5, 7, 7, 8, 11, 14, 14, 12, 6, //
    9, 13, 15, 7, 12, 8, 9, 11, 7, 7, 12, 7, 6, 15, 13, 11, //
    9, 7, 15, 11, 8, 6, 6, 14, 12, 13, 5, 14, 13, 13, 7, 5, //
    15, 5, 8, 11, 14, 14, 6, 14, 6, 9, 12, 9, 12, 5, 15, 8, //
    8, 5, 12, 9, 12, 5, 14, 6, 8, 13, 6, 5, 15, 13, 11, 11,
];

/// The five boolean functions. `F` is resolved at compile time.
#[inline(always)]
unsafe fn boolean<V: LaneWord, const F: usize>(x: V, y: V, z: V) -> V {
    unsafe {
        match F {
            0 => x.xor(y).xor(z),
            1 => x.choose(y, z),
            2 => x.or(y.not()).xor(z),
            3 => z.choose(x, y),
            _ => x.xor(y.or(z.not())),
        }
    }
}

/// One step of a line. `line` holds `[A, B, C, D, E]`.
#[inline(always)]
unsafe fn step<V: LaneWord, const F: usize>(line: &mut [V; 5], word: V, k: V, shift: u32) {
    unsafe {
        let [a, b, c, d, e] = *line;
        let t = a
            .add(boolean::<V, F>(b, c, d))
            .add(word)
            .add(k)
            .rotl(shift)
            .add(e);
        *line = [e, t, b, c.rotl(10), d];
    }
}

/// Sixteen steps of both lines. The right line applies the boolean
/// functions in reverse order.
#[inline(always)]
unsafe fn round<V: LaneWord, const LEFT_F: usize, const RIGHT_F: usize>(
    index: usize,
    left: &mut [V; 5],
    right: &mut [V; 5],
    x: &[V; BLOCK_WORDS],
) {
    unsafe {
        let kl = V::splat(KL[index]);
        let kr = V::splat(KR[index]);
        for j in index * 16..(index + 1) * 16 {
            step::<V, LEFT_F>(left, x[R[j]], kl, S[j]);
            step::<V, RIGHT_F>(right, x[RP[j]], kr, SP[j]);
        }
    }
}

/// Runs all 160 steps over one block in every lane and folds the result into
/// `state`.
///
/// # Safety
///
/// The CPU must support the instruction set behind `V`.
#[inline(always)]
pub(crate) unsafe fn compress<V: LaneWord>(state: &mut LaneState<5>, batch: &LaneBatch) {
    debug_assert_eq!(batch.lanes(), V::LANES);
    unsafe {
        let mut x = [V::splat(0); BLOCK_WORDS];
        for (i, word) in x.iter_mut().enumerate() {
            *word = V::load(batch.row(i));
        }

        let mut h = [V::splat(0); 5];
        for (i, word) in h.iter_mut().enumerate() {
            *word = V::load(state.row(i));
        }

        let mut left = h;
        let mut right = h;
        round::<V, 0, 4>(0, &mut left, &mut right, &x);
        round::<V, 1, 3>(1, &mut left, &mut right, &x);
        round::<V, 2, 2>(2, &mut left, &mut right, &x);
        round::<V, 3, 1>(3, &mut left, &mut right, &x);
        round::<V, 4, 0>(4, &mut left, &mut right, &x);

        for i in 0..5 {
            h[(i + 1) % 5]
                .add(left[(i + 2) % 5])
                .add(right[(i + 3) % 5])
                .store(state.row_mut(i));
        }
    }
}
