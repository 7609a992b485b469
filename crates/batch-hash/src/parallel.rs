//! Rayon integration for very large input sets.
//!
//! Inputs are split into chunks of whole lane groups and each chunk is
//! hashed on a worker thread through the global dispatcher. Output order
//! always matches input order.

use std::borrow::Borrow;

use rayon::prelude::*;

use crate::dispatcher::{Hash160Kernel, Kernel, Ripemd160Kernel, Sha256Kernel, global};
use crate::{Input, Ripemd160Digest, Sha256Digest};

/// Lane groups handed to one rayon task.
const GROUPS_PER_TASK: usize = 64;

fn par_many<K, I>(inputs: &[I]) -> Vec<K::Digest>
where
    K: Kernel,
    I: Borrow<Input> + Sync,
{
    let dispatcher = global();
    let chunk = dispatcher.lanes() * GROUPS_PER_TASK;
    let mut out = vec![K::ZERO; inputs.len()];
    inputs
        .par_chunks(chunk)
        .zip(out.par_chunks_mut(chunk))
        .for_each(|(group, digests)| dispatcher.fill::<K, I>(group, digests));
    out
}

/// SHA-256 of any number of inputs across the rayon thread pool.
///
/// # Example
///
/// ```
/// let inputs = vec![[7u8; 32]; 10_000];
/// let digests = batch_hash::par_sha256_many(&inputs);
/// assert_eq!(digests, batch_hash::sha256_many(&inputs));
/// ```
pub fn par_sha256_many<I: Borrow<Input> + Sync>(inputs: &[I]) -> Vec<Sha256Digest> {
    par_many::<Sha256Kernel, I>(inputs)
}

/// RIPEMD-160 of any number of inputs across the rayon thread pool.
pub fn par_ripemd160_many<I: Borrow<Input> + Sync>(inputs: &[I]) -> Vec<Ripemd160Digest> {
    par_many::<Ripemd160Kernel, I>(inputs)
}

/// RIPEMD-160 of SHA-256 for any number of inputs across the rayon thread
/// pool.
pub fn par_hash160_many<I: Borrow<Input> + Sync>(inputs: &[I]) -> Vec<Ripemd160Digest> {
    par_many::<Hash160Kernel, I>(inputs)
}
