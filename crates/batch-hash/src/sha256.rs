//! Lane-parallel SHA-256 compression (FIPS 180-4).
//!
//! Message words are read big-endian and digests are serialized big-endian.
//! The message schedule is kept in a 16-entry rolling window so that only
//! sixteen vector registers of schedule state are live at any time.

use crate::backend::LaneWord;
use crate::block::{BLOCK_WORDS, PaddedBlock, WordOrder};
use crate::Input;
use crate::lanes::{LaneBatch, LaneState};

/// SHA-256 reads message words and writes digests big-endian.
pub const WORD_ORDER: WordOrder = WordOrder::BigEndian;

/// Pads `input` into a single block in this algorithm's byte order.
#[must_use]
pub const fn pad(input: &Input) -> PaddedBlock {
    crate::block::pad(input, WORD_ORDER)
}

/// Initial hash value H(0).
pub const IV: [u32; 8] = [
    0x6a09_e667,
    0xbb67_ae85,
    0x3c6e_f372,
    0xa54f_f53a,
    0x510e_527f,
    0x9b05_688c,
    0x1f83_d9ab,
    0x5be0_cd19,
];

/// Round constants.
pub const K: [u32; 64] = [
    0x428a_2f98, 0x7137_4491, 0xb5c0_fbcf, 0xe9b5_dba5, 0x3956_c25b, 0x59f1_11f1, 0x923f_82a4,
    0xab1c_5ed5, 0xd807_aa98, 0x1283_5b01, 0x2431_85be, 0x550c_7dc3, 0x72be_5d74, 0x80de_b1fe,
    0x9bdc_06a7, 0xc19b_f174, 0xe49b_69c1, 0xefbe_4786, 0x0fc1_9dc6, 0x240c_a1cc, 0x2de9_2c6f,
    0x4a74_84aa, 0x5cb0_a9dc, 0x76f9_88da, 0x983e_5152, 0xa831_c66d, 0xb003_27c8, 0xbf59_7fc7,
    0xc6e0_0bf3, 0xd5a7_9147, 0x06ca_6351, 0x1429_2967, 0x27b7_0a85, 0x2e1b_2138, 0x4d2c_6dfc,
    0x5338_0d13, 0x650a_7354, 0x766a_0abb, 0x81c2_c92e, 0x9272_2c85, 0xa2bf_e8a1, 0xa81a_664b,
    0xc24b_8b70, 0xc76c_51a3, 0xd192_e819, 0xd699_0624, 0xf40e_3585, 0x106a_a070, 0x19a4_c116,
    0x1e37_6c08, 0x2748_774c, 0x34b0_bcb5, 0x391c_0cb3, 0x4ed8_aa4a, 0x5b9c_ca4f, 0x682e_6ff3,
    0x748f_82ee, 0x78a5_636f, 0x84c8_7814, 0x8cc7_0208, 0x90be_fffa, 0xa450_6ceb, 0xbef9_a3f7,
    0xc671_78f2,
];

#[inline(always)]
unsafe fn big_sigma0<V: LaneWord>(x: V) -> V {
    unsafe { x.rotr(2).xor(x.rotr(13)).xor(x.rotr(22)) }
}

#[inline(always)]
unsafe fn big_sigma1<V: LaneWord>(x: V) -> V {
    unsafe { x.rotr(6).xor(x.rotr(11)).xor(x.rotr(25)) }
}

#[inline(always)]
unsafe fn small_sigma0<V: LaneWord>(x: V) -> V {
    unsafe { x.rotr(7).xor(x.rotr(18)).xor(x.shr(3)) }
}

#[inline(always)]
unsafe fn small_sigma1<V: LaneWord>(x: V) -> V {
    unsafe { x.rotr(17).xor(x.rotr(19)).xor(x.shr(10)) }
}

/// Runs the 64 rounds over one block in every lane and adds the result into
/// `state`.
///
/// # Safety
///
/// The CPU must support the instruction set behind `V`.
#[inline(always)]
pub(crate) unsafe fn compress<V: LaneWord>(state: &mut LaneState<8>, batch: &LaneBatch) {
    debug_assert_eq!(batch.lanes(), V::LANES);
    unsafe {
        let mut w: [V; BLOCK_WORDS] = [V::splat(0); BLOCK_WORDS];
        for (i, word) in w.iter_mut().enumerate() {
            *word = V::load(batch.row(i));
        }

        let mut init = [V::splat(0); 8];
        for (i, word) in init.iter_mut().enumerate() {
            *word = V::load(state.row(i));
        }
        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = init;

        for (round, &k) in K.iter().enumerate() {
            let wi = if round < BLOCK_WORDS {
                w[round]
            } else {
                let next = small_sigma1(w[(round - 2) & 15])
                    .add(w[(round - 7) & 15])
                    .add(small_sigma0(w[(round - 15) & 15]))
                    .add(w[round & 15]);
                w[round & 15] = next;
                next
            };

            let t1 = h
                .add(big_sigma1(e))
                .add(e.choose(f, g))
                .add(V::splat(k))
                .add(wi);
            let t2 = big_sigma0(a).add(a.majority(b, c));

            h = g;
            g = f;
            f = e;
            e = d.add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.add(t2);
        }

        for (i, (start, end)) in init.into_iter().zip([a, b, c, d, e, f, g, h]).enumerate() {
            start.add(end).store(state.row_mut(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::scalar;

    fn digest(input: &[u8; 32]) -> [u8; 32] {
        let batch = LaneBatch::pack(&[pad(input)], WORD_ORDER);
        let mut state = LaneState::splat(&IV, 1);
        scalar::sha256(&mut state, &batch);
        state.unpack::<32>(WORD_ORDER)[0]
    }

    #[test]
    fn zero_input_vector() {
        assert_eq!(
            test_support::hex(&digest(&[0; 32])),
            test_support::SHA256_OF_ZEROS
        );
    }

    #[test]
    fn single_bit_changes_digest() {
        let mut flipped = [0u8; 32];
        flipped[31] = 1;
        assert_ne!(digest(&[0; 32]), digest(&flipped));
    }
}
