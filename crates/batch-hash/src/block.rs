//! Single-block message padding for 32-byte inputs.
//!
//! Both SHA-256 and RIPEMD-160 pad a message with a `0x80` byte, zeros and a
//! 64-bit bit-length field so that the result fills a whole 64-byte block. A
//! 32-byte input always fits in exactly one block, so the layout is fixed:
//!
//! | bytes   | content                                  |
//! |---------|------------------------------------------|
//! | 0..32   | input                                    |
//! | 32      | `0x80`                                   |
//! | 33..56  | zero                                     |
//! | 56..64  | `256` as a 64-bit integer in word order  |
//!
//! The two algorithms differ only in byte order: SHA-256 reads words and the
//! length field big-endian, RIPEMD-160 little-endian.

use crate::Input;

/// Size of one compression block in bytes.
pub const BLOCK_LEN: usize = 64;

/// Message words per block.
pub const BLOCK_WORDS: usize = BLOCK_LEN / 4;

/// Bit length of every message this crate hashes.
pub const MESSAGE_BITS: u64 = 256;

/// Byte order used to read message words and write the length field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordOrder {
    /// SHA-256.
    BigEndian,
    /// RIPEMD-160.
    LittleEndian,
}

impl WordOrder {
    /// Decodes one 32-bit word.
    #[inline]
    #[must_use]
    pub const fn read(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::BigEndian => u32::from_be_bytes(bytes),
            Self::LittleEndian => u32::from_le_bytes(bytes),
        }
    }

    /// Encodes one 32-bit word.
    #[inline]
    #[must_use]
    pub const fn write(self, word: u32) -> [u8; 4] {
        match self {
            Self::BigEndian => word.to_be_bytes(),
            Self::LittleEndian => word.to_le_bytes(),
        }
    }

    const fn length_field(self, bits: u64) -> [u8; 8] {
        match self {
            Self::BigEndian => bits.to_be_bytes(),
            Self::LittleEndian => bits.to_le_bytes(),
        }
    }
}

/// One padded 64-byte message block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaddedBlock([u8; BLOCK_LEN]);

impl PaddedBlock {
    /// Raw block bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BLOCK_LEN] {
        &self.0
    }

    /// The original 32-byte input.
    #[must_use]
    pub fn input(&self) -> Input {
        let mut input = [0u8; 32];
        input.copy_from_slice(&self.0[..32]);
        input
    }

    /// Message word `index` decoded in `order`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 16`.
    #[inline]
    #[must_use]
    pub fn word(&self, index: usize, order: WordOrder) -> u32 {
        let start = index * 4;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.0[start..start + 4]);
        order.read(bytes)
    }

    /// Decodes the trailing length field.
    #[must_use]
    pub fn length_bits(&self, order: WordOrder) -> u64 {
        let mut field = [0u8; 8];
        field.copy_from_slice(&self.0[56..]);
        match order {
            WordOrder::BigEndian => u64::from_be_bytes(field),
            WordOrder::LittleEndian => u64::from_le_bytes(field),
        }
    }

    pub(crate) const fn from_bytes(bytes: [u8; BLOCK_LEN]) -> Self {
        Self(bytes)
    }
}

/// Pads a 32-byte input into a single block.
#[must_use]
pub const fn pad(input: &Input, order: WordOrder) -> PaddedBlock {
    let mut block = [0u8; BLOCK_LEN];
    let mut i = 0;
    while i < input.len() {
        block[i] = input[i];
        i += 1;
    }
    block[32] = 0x80;
    let length = order.length_field(MESSAGE_BITS);
    let mut j = 0;
    while j < length.len() {
        block[56 + j] = length[j];
        j += 1;
    }
    PaddedBlock(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_input_marker_zeros_length() {
        let input = [0xAB; 32];
        let block = pad(&input, WordOrder::BigEndian);
        let bytes = block.as_bytes();

        assert_eq!(&bytes[..32], &input);
        assert_eq!(bytes[32], 0x80);
        assert!(bytes[33..56].iter().all(|&b| b == 0));
        assert_eq!(&bytes[56..], &[0, 0, 0, 0, 0, 0, 0x01, 0x00]);
    }

    #[test]
    fn little_endian_length_field() {
        let block = pad(&[0; 32], WordOrder::LittleEndian);
        assert_eq!(&block.as_bytes()[56..], &[0x00, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(block.length_bits(WordOrder::LittleEndian), 256);
    }

    #[test]
    fn length_bits_reads_back_in_matching_order() {
        for order in [WordOrder::BigEndian, WordOrder::LittleEndian] {
            assert_eq!(pad(&[7; 32], order).length_bits(order), MESSAGE_BITS);
        }
    }

    #[test]
    fn words_follow_order() {
        let mut input = [0u8; 32];
        input[..4].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);

        let be = pad(&input, WordOrder::BigEndian);
        let le = pad(&input, WordOrder::LittleEndian);
        assert_eq!(be.word(0, WordOrder::BigEndian), 0x0102_0304);
        assert_eq!(le.word(0, WordOrder::LittleEndian), 0x0403_0201);
        assert_eq!(be.word(8, WordOrder::BigEndian), 0x8000_0000);
        assert_eq!(le.word(8, WordOrder::LittleEndian), 0x0000_0080);
        assert_eq!(be.word(15, WordOrder::BigEndian), 256);
        assert_eq!(le.word(14, WordOrder::LittleEndian), 256);
    }

    #[test]
    fn input_recovers_original_bytes() {
        let input: Input = std::array::from_fn(|i| i as u8);
        assert_eq!(pad(&input, WordOrder::LittleEndian).input(), input);
    }
}
