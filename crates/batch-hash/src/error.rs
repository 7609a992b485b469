//! Error types for batch hashing and backend selection.

use thiserror::Error;

use crate::dispatcher::Backend;

/// Result type for batch hashing operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors returned by the exact-width batch entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BatchError {
    /// The number of inputs does not match the active backend's lane count.
    #[error("{backend} backend hashes exactly {expected} inputs per batch, got {actual}")]
    LaneCount {
        /// Backend that was asked to hash.
        backend: Backend,
        /// Lanes the backend processes per batch.
        expected: usize,
        /// Inputs supplied.
        actual: usize,
    },
    /// The output buffer length differs from the number of inputs.
    #[error("output buffer holds {actual} digests, expected {expected}")]
    OutputLength {
        /// Number of inputs.
        expected: usize,
        /// Length of the supplied output slice.
        actual: usize,
    },
}

/// Errors returned when a specific backend is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The backend's cargo feature is disabled or it targets another
    /// architecture.
    #[error("{0} backend is not compiled into this build")]
    NotCompiled(Backend),
    /// The backend is compiled in but the CPU lacks its instruction set.
    #[error("{backend} backend requires {required}, which this CPU does not support")]
    Unsupported {
        /// Requested backend.
        backend: Backend,
        /// Human readable instruction set requirement.
        required: &'static str,
    },
}

/// A backend name that does not match any known backend.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown backend `{input}`, expected one of: scalar, sse2, neon, avx2, avx512")]
pub struct ParseBackendError {
    pub(crate) input: String,
}

impl ParseBackendError {
    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}
