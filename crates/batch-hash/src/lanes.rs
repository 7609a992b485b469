//! Transposed lane layout.
//!
//! A vector backend processes `N` independent messages at once, one per
//! 32-bit lane. To feed it, the padded blocks are transposed so that row `w`
//! holds message word `w` of every input:
//!
//! ```text
//!            lane 0   lane 1   lane 2   ...  lane N-1
//! row 0    [ in0.w0 , in1.w0 , in2.w0 , ..., inN-1.w0 ]
//! row 1    [ in0.w1 , in1.w1 , in2.w1 , ..., inN-1.w1 ]
//!  ...
//! row 15   [ in0.w15, in1.w15, in2.w15, ..., inN-1.w15]
//! ```
//!
//! # Lane mapping
//!
//! The mapping is ascending and fixed: input `i` always occupies lane `i`,
//! which is element `i` of the vector register, and digest `i` is read back
//! from lane `i`. Nothing in the pipeline reverses or rotates lanes.
//!
//! Rows are stored at full 16-lane width regardless of the backend in use; a
//! backend with `N` lanes only touches the first `N` elements of each row.

use crate::block::{BLOCK_LEN, BLOCK_WORDS, PaddedBlock, WordOrder};

/// Widest lane count any backend uses (AVX-512).
pub const MAX_LANES: usize = 16;

/// Lane occupied by input `index`, and the lane its digest is read from.
#[inline]
#[must_use]
pub const fn lane_of(index: usize) -> usize {
    index
}

/// One row of lane values, aligned for 512-bit loads.
#[repr(C, align(64))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaneRow(pub(crate) [u32; MAX_LANES]);

impl LaneRow {
    /// Value held by `lane`.
    #[inline]
    #[must_use]
    pub const fn lane(&self, lane: usize) -> u32 {
        self.0[lane]
    }
}

/// Padded message blocks of up to [`MAX_LANES`] inputs in transposed form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaneBatch {
    rows: [LaneRow; BLOCK_WORDS],
    lanes: usize,
}

impl LaneBatch {
    /// Transposes `blocks` so that block `i` lands in lane [`lane_of`]`(i)`.
    ///
    /// # Panics
    ///
    /// Panics unless `1..=MAX_LANES` blocks are supplied.
    #[must_use]
    pub fn pack(blocks: &[PaddedBlock], order: WordOrder) -> Self {
        assert!(
            (1..=MAX_LANES).contains(&blocks.len()),
            "expected 1..={MAX_LANES} blocks, got {}",
            blocks.len()
        );
        let mut rows = [LaneRow::default(); BLOCK_WORDS];
        for (index, block) in blocks.iter().enumerate() {
            for (word, row) in rows.iter_mut().enumerate() {
                row.0[lane_of(index)] = block.word(word, order);
            }
        }
        Self {
            rows,
            lanes: blocks.len(),
        }
    }

    /// Reassembles the padded block held by each lane.
    #[must_use]
    pub fn unpack(&self, order: WordOrder) -> Vec<PaddedBlock> {
        (0..self.lanes)
            .map(|index| {
                let mut bytes = [0u8; BLOCK_LEN];
                for (chunk, row) in bytes.chunks_exact_mut(4).zip(&self.rows) {
                    chunk.copy_from_slice(&order.write(row.lane(lane_of(index))));
                }
                PaddedBlock::from_bytes(bytes)
            })
            .collect()
    }

    /// Number of occupied lanes.
    #[must_use]
    pub const fn lanes(&self) -> usize {
        self.lanes
    }

    /// Message word `word` across all lanes.
    #[inline]
    #[must_use]
    pub const fn row(&self, word: usize) -> &LaneRow {
        &self.rows[word]
    }
}

/// Hash chaining state for `W` words across up to [`MAX_LANES`] lanes.
///
/// SHA-256 uses `W = 8`, RIPEMD-160 `W = 5`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaneState<const W: usize> {
    rows: [LaneRow; W],
    lanes: usize,
}

impl<const W: usize> LaneState<W> {
    /// Broadcasts the initial chaining value `iv` into `lanes` lanes.
    ///
    /// # Panics
    ///
    /// Panics if `lanes` exceeds [`MAX_LANES`].
    #[must_use]
    pub fn splat(iv: &[u32; W], lanes: usize) -> Self {
        assert!(lanes <= MAX_LANES, "at most {MAX_LANES} lanes, got {lanes}");
        let mut rows = [LaneRow::default(); W];
        for (row, &value) in rows.iter_mut().zip(iv) {
            row.0[..lanes].fill(value);
        }
        Self { rows, lanes }
    }

    /// Number of occupied lanes.
    #[must_use]
    pub const fn lanes(&self) -> usize {
        self.lanes
    }

    /// Chaining words of a single lane.
    #[must_use]
    pub fn lane_words(&self, lane: usize) -> [u32; W] {
        std::array::from_fn(|word| self.rows[word].lane(lane))
    }

    /// Serializes every lane's state into a `D`-byte digest.
    #[must_use]
    pub fn unpack<const D: usize>(&self, order: WordOrder) -> Vec<[u8; D]> {
        let mut digests = vec![[0u8; D]; self.lanes];
        self.unpack_into(order, &mut digests);
        digests
    }

    /// Serializes the first `out.len()` lanes into `out`.
    ///
    /// Lanes beyond `out.len()` are ignored, which is how dummy padding lanes
    /// are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `out` is longer than the number of occupied lanes.
    pub fn unpack_into<const D: usize>(&self, order: WordOrder, out: &mut [[u8; D]]) {
        const { assert!(D == 4 * W, "digest size must be four bytes per state word") };
        assert!(out.len() <= self.lanes, "{} digests from {} lanes", out.len(), self.lanes);
        for (index, digest) in out.iter_mut().enumerate() {
            for (chunk, row) in digest.chunks_exact_mut(4).zip(&self.rows) {
                chunk.copy_from_slice(&order.write(row.lane(lane_of(index))));
            }
        }
    }

    #[inline]
    pub(crate) const fn row(&self, word: usize) -> &LaneRow {
        &self.rows[word]
    }

    #[inline]
    pub(crate) const fn row_mut(&mut self, word: usize) -> &mut LaneRow {
        &mut self.rows[word]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::pad;

    fn distinct_blocks(count: usize, order: WordOrder) -> Vec<PaddedBlock> {
        (0..count)
            .map(|i| pad(&[i as u8 + 1; 32], order))
            .collect()
    }

    #[test]
    fn input_i_occupies_lane_i() {
        let blocks = distinct_blocks(MAX_LANES, WordOrder::BigEndian);
        let batch = LaneBatch::pack(&blocks, WordOrder::BigEndian);

        for lane in 0..MAX_LANES {
            let expected = u32::from_be_bytes([lane as u8 + 1; 4]);
            assert_eq!(batch.row(0).lane(lane), expected, "lane {lane}");
            assert_eq!(batch.row(7).lane(lane), expected, "lane {lane}");
        }
    }

    #[test]
    fn padding_rows_are_uniform() {
        let batch = LaneBatch::pack(&distinct_blocks(4, WordOrder::BigEndian), WordOrder::BigEndian);
        for lane in 0..4 {
            assert_eq!(batch.row(8).lane(lane), 0x8000_0000);
            assert_eq!(batch.row(14).lane(lane), 0);
            assert_eq!(batch.row(15).lane(lane), 256);
        }
    }

    #[test]
    fn unused_lanes_stay_zero() {
        let batch = LaneBatch::pack(&distinct_blocks(3, WordOrder::LittleEndian), WordOrder::LittleEndian);
        assert_eq!(batch.lanes(), 3);
        for word in 0..BLOCK_WORDS {
            assert!(batch.row(word).0[3..].iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn unpack_restores_packed_blocks() {
        let blocks = distinct_blocks(8, WordOrder::LittleEndian);
        let batch = LaneBatch::pack(&blocks, WordOrder::LittleEndian);
        assert_eq!(batch.unpack(WordOrder::LittleEndian), blocks);
    }

    #[test]
    #[should_panic(expected = "expected 1..=16 blocks, got 17")]
    fn pack_rejects_too_many_blocks() {
        let _ = LaneBatch::pack(&distinct_blocks(17, WordOrder::BigEndian), WordOrder::BigEndian);
    }

    #[test]
    #[should_panic(expected = "got 0")]
    fn pack_rejects_empty_batch() {
        let _ = LaneBatch::pack(&[], WordOrder::BigEndian);
    }

    #[test]
    fn lane_mapping_is_ascending() {
        assert!((0..MAX_LANES).all(|index| lane_of(index) == index));
    }

    #[test]
    fn splat_fills_only_occupied_lanes() {
        let state = LaneState::splat(&[1, 2, 3, 4, 5], 4);
        assert_eq!(state.lane_words(0), [1, 2, 3, 4, 5]);
        assert_eq!(state.lane_words(3), [1, 2, 3, 4, 5]);
        assert_eq!(state.lane_words(4), [0; 5]);
    }

    #[test]
    fn state_serializes_per_lane_in_word_order() {
        let mut state = LaneState::<2>::splat(&[0, 0], 2);
        state.row_mut(0).0[1] = 0x0102_0304;
        state.row_mut(1).0[1] = 0x0506_0708;

        let be: Vec<[u8; 8]> = state.unpack(WordOrder::BigEndian);
        let le: Vec<[u8; 8]> = state.unpack(WordOrder::LittleEndian);
        assert_eq!(be[0], [0; 8]);
        assert_eq!(be[1], [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(le[1], [4, 3, 2, 1, 8, 7, 6, 5]);
    }

    #[test]
    fn unpack_into_discards_trailing_lanes() {
        let mut state = LaneState::<1>::splat(&[0], 4);
        for lane in 0..4 {
            state.row_mut(0).0[lane] = lane as u32;
        }
        let mut out = [[0u8; 4]; 2];
        state.unpack_into(WordOrder::LittleEndian, &mut out);
        assert_eq!(out, [[0, 0, 0, 0], [1, 0, 0, 0]]);
    }
}
