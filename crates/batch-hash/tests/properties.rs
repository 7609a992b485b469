//! Property tests over random input sets.

use batch_hash::block::{BLOCK_LEN, WordOrder, pad};
use batch_hash::lanes::{LaneBatch, MAX_LANES};
use batch_hash::{BatchError, Dispatcher, Input};
use proptest::prelude::*;

fn word_order() -> impl Strategy<Value = WordOrder> {
    prop_oneof![Just(WordOrder::BigEndian), Just(WordOrder::LittleEndian)]
}

fn inputs(max: usize) -> impl Strategy<Value = Vec<Input>> {
    prop::collection::vec(any::<Input>(), 0..=max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn many_matches_reference(inputs in inputs(40)) {
        let sha = batch_hash::sha256_many(&inputs);
        let rmd = batch_hash::ripemd160_many(&inputs);
        let h160 = batch_hash::hash160_many(&inputs);

        prop_assert_eq!(sha.len(), inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            prop_assert_eq!(sha[i], test_support::sha256(input));
            prop_assert_eq!(rmd[i], test_support::ripemd160(input));
            prop_assert_eq!(h160[i], test_support::hash160(input));
        }
    }

    #[test]
    fn every_backend_agrees_with_scalar(inputs in inputs(40)) {
        let scalar = Dispatcher::scalar();
        for backend in Dispatcher::available() {
            let dispatcher = Dispatcher::with_backend(backend).expect("available backend is usable");
            prop_assert_eq!(dispatcher.sha256_many(&inputs), scalar.sha256_many(&inputs));
            prop_assert_eq!(dispatcher.ripemd160_many(&inputs), scalar.ripemd160_many(&inputs));
        }
    }

    #[test]
    fn exact_width_accepts_only_lane_count(inputs in inputs(20)) {
        let dispatcher = batch_hash::global();
        let result = dispatcher.sha256(&inputs);
        if inputs.len() == dispatcher.lanes() {
            prop_assert!(result.is_ok());
        } else {
            let is_lane_count_error = matches!(result, Err(BatchError::LaneCount { .. }));
            prop_assert!(is_lane_count_error);
        }
    }

    #[test]
    fn padding_layout_is_fixed(input in any::<Input>(), order in word_order()) {
        let block = pad(&input, order);
        let bytes = block.as_bytes();
        prop_assert_eq!(bytes.len(), BLOCK_LEN);
        prop_assert_eq!(&bytes[..32], &input[..]);
        prop_assert_eq!(bytes[32], 0x80);
        prop_assert!(bytes[33..56].iter().all(|&b| b == 0));
        prop_assert_eq!(block.length_bits(order), 256);
        prop_assert_eq!(block.input(), input);
    }

    #[test]
    fn pack_then_unpack_restores_blocks(
        inputs in prop::collection::vec(any::<Input>(), 1..=MAX_LANES),
        order in word_order(),
    ) {
        let blocks: Vec<_> = inputs.iter().map(|input| pad(input, order)).collect();
        let batch = LaneBatch::pack(&blocks, order);
        prop_assert_eq!(batch.lanes(), blocks.len());
        prop_assert_eq!(batch.unpack(order), blocks);
    }
}
