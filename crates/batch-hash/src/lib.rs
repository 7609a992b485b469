//! Lane-parallel SHA-256 and RIPEMD-160 for batches of 32-byte inputs.
//!
//! Every message hashed by this crate is exactly 32 bytes long, so each one
//! pads into a single 64-byte block. Independent inputs are placed side by
//! side in the lanes of a vector register and compressed together: 16 at a
//! time with AVX-512, 8 with AVX2, 4 with SSE2 or NEON, and one at a time on
//! the scalar fallback.
//!
//! The backend is chosen once per process from the runtime CPU capabilities
//! reported by the [`caps`] crate (see [`Dispatcher`] for the rules and the
//! `LANEHASH_BACKEND` override). Whatever backend runs, digest `i` is always
//! the hash of input `i` and is bit-identical to the scalar result.
//!
//! # Entry points
//!
//! - [`batch_sha256`], [`batch_ripemd160`], [`batch_hash160`]: exactly
//!   [`lanes()`] inputs, anything else is a [`BatchError::LaneCount`].
//! - [`sha256_many`], [`ripemd160_many`], [`hash160_many`]: any number of
//!   inputs; the trailing partial group is padded with dummy lanes whose
//!   digests are discarded.
//! - [`Dispatcher`] methods offer the same operations on a specific backend,
//!   plus allocation-free `*_into` variants.
//!
//! # Example
//!
//! ```
//! let inputs = vec![[0u8; 32]; batch_hash::lanes()];
//! let digests = batch_hash::batch_sha256(&inputs)?;
//! assert_eq!(digests.len(), inputs.len());
//! assert_eq!(digests[0], batch_hash::digest_sha256(&[0; 32]));
//!
//! let digests = batch_hash::hash160_many(&inputs[..1]);
//! assert_eq!(digests.len(), 1);
//! # Ok::<(), batch_hash::BatchError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

mod backend;
pub mod block;
mod dispatcher;
mod error;
pub mod lanes;
#[cfg(feature = "parallel")]
mod parallel;
pub mod ripemd160;
pub mod sha256;

use std::borrow::Borrow;

pub use dispatcher::{BACKEND_ENV, Backend, Dispatcher, global};
pub use error::{BatchError, BatchResult, DispatchError, ParseBackendError};
#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub use parallel::{par_hash160_many, par_ripemd160_many, par_sha256_many};

use dispatcher::{Hash160Kernel, Kernel, Ripemd160Kernel, Sha256Kernel};

/// One 32-byte message.
pub type Input = [u8; 32];

/// SHA-256 digest (32 bytes).
pub type Sha256Digest = [u8; 32];

/// RIPEMD-160 digest (20 bytes). Also the output of HASH160.
pub type Ripemd160Digest = [u8; 20];

/// SHA-256 of exactly [`lanes()`] inputs on the active backend.
pub fn batch_sha256<I: Borrow<Input>>(inputs: &[I]) -> BatchResult<Vec<Sha256Digest>> {
    global().sha256(inputs)
}

/// RIPEMD-160 of exactly [`lanes()`] inputs on the active backend.
pub fn batch_ripemd160<I: Borrow<Input>>(inputs: &[I]) -> BatchResult<Vec<Ripemd160Digest>> {
    global().ripemd160(inputs)
}

/// RIPEMD-160 of SHA-256 (HASH160) of exactly [`lanes()`] inputs.
pub fn batch_hash160<I: Borrow<Input>>(inputs: &[I]) -> BatchResult<Vec<Ripemd160Digest>> {
    global().hash160(inputs)
}

/// SHA-256 of any number of inputs, in input order.
pub fn sha256_many<I: Borrow<Input>>(inputs: &[I]) -> Vec<Sha256Digest> {
    global().sha256_many(inputs)
}

/// RIPEMD-160 of any number of inputs, in input order.
pub fn ripemd160_many<I: Borrow<Input>>(inputs: &[I]) -> Vec<Ripemd160Digest> {
    global().ripemd160_many(inputs)
}

/// HASH160 of any number of inputs, in input order.
pub fn hash160_many<I: Borrow<Input>>(inputs: &[I]) -> Vec<Ripemd160Digest> {
    global().hash160_many(inputs)
}

/// SHA-256 of a single input on the scalar backend.
pub fn digest_sha256(input: &Input) -> Sha256Digest {
    let mut out = [Sha256Kernel::ZERO];
    Sha256Kernel::hash_lanes(Backend::Scalar, std::slice::from_ref(input), &mut out);
    out[0]
}

/// RIPEMD-160 of a single input on the scalar backend.
pub fn digest_ripemd160(input: &Input) -> Ripemd160Digest {
    let mut out = [Ripemd160Kernel::ZERO];
    Ripemd160Kernel::hash_lanes(Backend::Scalar, std::slice::from_ref(input), &mut out);
    out[0]
}

/// HASH160 of a single input on the scalar backend.
pub fn digest_hash160(input: &Input) -> Ripemd160Digest {
    let mut out = [Hash160Kernel::ZERO];
    Hash160Kernel::hash_lanes(Backend::Scalar, std::slice::from_ref(input), &mut out);
    out[0]
}

/// Get the currently active backend.
///
/// Useful for logging or diagnostics.
pub fn active_backend() -> Backend {
    global().backend()
}

/// Inputs per exact-width batch on the active backend.
pub fn lanes() -> usize {
    global().lanes()
}
