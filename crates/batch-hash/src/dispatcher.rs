//! Runtime backend selection and batch dispatch.
//!
//! A [`Dispatcher`] pins one [`Backend`] for its whole lifetime. Construction
//! is the only place where the backend is checked against the process-wide
//! capability snapshot, so every hashing call afterwards can enter the
//! backend's vector code without re-checking.
//!
//! # Selection order
//!
//! 1. [`Dispatcher::with_backend`]: an explicit request, rejected with a
//!    [`DispatchError`] when unusable.
//! 2. The [`BACKEND_ENV`] environment variable, read by
//!    [`Dispatcher::detect`]. Unknown or unusable values are logged and
//!    ignored.
//! 3. The widest backend that is both compiled in and supported by the CPU.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use caps::Capabilities;

use crate::backend;
use crate::block::{WordOrder, pad};
use crate::error::{BatchError, BatchResult, DispatchError, ParseBackendError};
use crate::lanes::{LaneBatch, LaneState, MAX_LANES};
use crate::{Input, Ripemd160Digest, Sha256Digest, ripemd160, sha256};

/// Environment variable that overrides automatic backend selection.
///
/// Accepts a backend name (see [`Backend::name`]) or `auto`.
pub const BACKEND_ENV: &str = "LANEHASH_BACKEND";

/// Available hashing backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    /// AVX-512 with 16 parallel lanes.
    Avx512,
    /// AVX2 with 8 parallel lanes.
    Avx2,
    /// SSE2 with 4 parallel lanes.
    Sse2,
    /// ARM NEON with 4 parallel lanes.
    Neon,
    /// Scalar fallback (1 lane).
    Scalar,
}

impl Backend {
    /// Every backend, widest first. Automatic selection picks the first
    /// usable entry.
    pub const ALL: [Self; 5] = [Self::Avx512, Self::Avx2, Self::Sse2, Self::Neon, Self::Scalar];

    /// Number of parallel lanes for this backend.
    #[must_use]
    pub const fn lanes(self) -> usize {
        match self {
            Self::Avx512 => 16,
            Self::Avx2 => 8,
            Self::Sse2 | Self::Neon => 4,
            Self::Scalar => 1,
        }
    }

    /// Lower-case name, as accepted by [`FromStr`] and [`BACKEND_ENV`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Avx512 => "avx512",
            Self::Avx2 => "avx2",
            Self::Sse2 => "sse2",
            Self::Neon => "neon",
            Self::Scalar => "scalar",
        }
    }

    /// Instruction set the backend needs at runtime.
    #[must_use]
    pub const fn requirement(self) -> &'static str {
        match self {
            Self::Avx512 => "AVX-512 F+DQ+BW+VL",
            Self::Avx2 => "AVX2",
            Self::Sse2 => "SSE2",
            Self::Neon => "NEON",
            Self::Scalar => "nothing",
        }
    }

    /// Whether this build contains the backend's code.
    #[must_use]
    pub const fn is_compiled(self) -> bool {
        match self {
            Self::Avx512 => cfg!(all(target_arch = "x86_64", feature = "avx512")),
            Self::Avx2 => cfg!(all(target_arch = "x86_64", feature = "avx2")),
            Self::Sse2 => cfg!(all(target_arch = "x86_64", feature = "sse2")),
            Self::Neon => cfg!(all(target_arch = "aarch64", feature = "neon")),
            Self::Scalar => true,
        }
    }

    /// Whether `caps` report the instruction set this backend needs.
    #[must_use]
    pub fn is_supported_by(self, caps: &Capabilities) -> bool {
        match self {
            Self::Avx512 => caps.has_avx512(),
            Self::Avx2 => caps.has_avx2(),
            Self::Sse2 => caps.has_sse2(),
            Self::Neon => caps.has_neon(),
            Self::Scalar => true,
        }
    }

    /// Compiled in and supported by `caps`.
    #[must_use]
    pub fn is_usable(self, caps: &Capabilities) -> bool {
        self.check(caps).is_ok()
    }

    /// Widest usable backend for `caps`. Never fails: the scalar backend is
    /// always usable.
    #[must_use]
    pub fn best_for(caps: &Capabilities) -> Self {
        Self::ALL
            .into_iter()
            .find(|backend| backend.is_usable(caps))
            .unwrap_or(Self::Scalar)
    }

    fn check(self, caps: &Capabilities) -> Result<(), DispatchError> {
        if !self.is_compiled() {
            return Err(DispatchError::NotCompiled(self));
        }
        if !self.is_supported_by(caps) {
            return Err(DispatchError::Unsupported {
                backend: self,
                required: self.requirement(),
            });
        }
        Ok(())
    }

    /// Only reachable through a [`Dispatcher`], whose constructors verified
    /// that the CPU supports `self`.
    fn compress_sha256(self, state: &mut LaneState<8>, batch: &LaneBatch) {
        match self {
            Self::Scalar => backend::scalar::sha256(state, batch),
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            // SAFETY: selected only after AVX-512 was detected.
            Self::Avx512 => unsafe { backend::avx512::sha256(state, batch) },
            #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
            // SAFETY: selected only after AVX2 was detected.
            Self::Avx2 => unsafe { backend::avx2::sha256(state, batch) },
            #[cfg(all(target_arch = "x86_64", feature = "sse2"))]
            // SAFETY: selected only after SSE2 was detected.
            Self::Sse2 => unsafe { backend::sse2::sha256(state, batch) },
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            // SAFETY: selected only after NEON was detected.
            Self::Neon => unsafe { backend::neon::sha256(state, batch) },
            #[allow(unreachable_patterns)]
            other => unreachable!("{other} backend is not compiled in"),
        }
    }

    fn compress_ripemd160(self, state: &mut LaneState<5>, batch: &LaneBatch) {
        match self {
            Self::Scalar => backend::scalar::ripemd160(state, batch),
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            // SAFETY: selected only after AVX-512 was detected.
            Self::Avx512 => unsafe { backend::avx512::ripemd160(state, batch) },
            #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
            // SAFETY: selected only after AVX2 was detected.
            Self::Avx2 => unsafe { backend::avx2::ripemd160(state, batch) },
            #[cfg(all(target_arch = "x86_64", feature = "sse2"))]
            // SAFETY: selected only after SSE2 was detected.
            Self::Sse2 => unsafe { backend::sse2::ripemd160(state, batch) },
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            // SAFETY: selected only after NEON was detected.
            Self::Neon => unsafe { backend::neon::ripemd160(state, batch) },
            #[allow(unreachable_patterns)]
            other => unreachable!("{other} backend is not compiled in"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|backend| backend.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseBackendError {
                input: wanted.to_owned(),
            })
    }
}

/// One hash pipeline over a group of at most `backend.lanes()` inputs.
pub(crate) trait Kernel {
    type Digest: Copy + Send;

    const ZERO: Self::Digest;

    /// Hashes `inputs` into `out`, padding unused lanes with zero inputs.
    /// Requires `inputs.len() == out.len() <= backend.lanes()`.
    fn hash_lanes<I: Borrow<Input>>(backend: Backend, inputs: &[I], out: &mut [Self::Digest]);
}

pub(crate) struct Sha256Kernel;
pub(crate) struct Ripemd160Kernel;
pub(crate) struct Hash160Kernel;

fn pack_inputs<I: Borrow<Input>>(inputs: &[I], lanes: usize, order: WordOrder) -> LaneBatch {
    let mut blocks = [pad(&[0; 32], order); MAX_LANES];
    for (block, input) in blocks.iter_mut().zip(inputs) {
        *block = pad(input.borrow(), order);
    }
    LaneBatch::pack(&blocks[..lanes], order)
}

impl Kernel for Sha256Kernel {
    type Digest = Sha256Digest;

    const ZERO: Sha256Digest = [0; 32];

    fn hash_lanes<I: Borrow<Input>>(backend: Backend, inputs: &[I], out: &mut [Sha256Digest]) {
        let lanes = backend.lanes();
        let batch = pack_inputs(inputs, lanes, sha256::WORD_ORDER);
        let mut state = LaneState::splat(&sha256::IV, lanes);
        backend.compress_sha256(&mut state, &batch);
        state.unpack_into(sha256::WORD_ORDER, out);
    }
}

impl Kernel for Ripemd160Kernel {
    type Digest = Ripemd160Digest;

    const ZERO: Ripemd160Digest = [0; 20];

    fn hash_lanes<I: Borrow<Input>>(backend: Backend, inputs: &[I], out: &mut [Ripemd160Digest]) {
        let lanes = backend.lanes();
        let batch = pack_inputs(inputs, lanes, ripemd160::WORD_ORDER);
        let mut state = LaneState::splat(&ripemd160::IV, lanes);
        backend.compress_ripemd160(&mut state, &batch);
        state.unpack_into(ripemd160::WORD_ORDER, out);
    }
}

impl Kernel for Hash160Kernel {
    type Digest = Ripemd160Digest;

    const ZERO: Ripemd160Digest = [0; 20];

    fn hash_lanes<I: Borrow<Input>>(backend: Backend, inputs: &[I], out: &mut [Ripemd160Digest]) {
        let mut inner = [Sha256Kernel::ZERO; MAX_LANES];
        let inner = &mut inner[..inputs.len()];
        Sha256Kernel::hash_lanes(backend, inputs, inner);
        Ripemd160Kernel::hash_lanes(backend, &*inner, out);
    }
}

/// Dispatcher that pins a backend verified against the running CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatcher {
    backend: Backend,
}

impl Dispatcher {
    /// Selects the widest usable backend, honouring [`BACKEND_ENV`].
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug"))]
    pub fn detect() -> Self {
        let requested = std::env::var(BACKEND_ENV).ok();
        let backend = select(caps::detect(), requested.as_deref());
        #[cfg(feature = "tracing")]
        tracing::debug!(%backend, lanes = backend.lanes(), "selected hashing backend");
        Self { backend }
    }

    /// Pins `backend`, failing if it is not compiled in or the CPU cannot
    /// run it.
    pub fn with_backend(backend: Backend) -> Result<Self, DispatchError> {
        backend.check(caps::detect())?;
        Ok(Self { backend })
    }

    /// The scalar backend, usable everywhere.
    #[must_use]
    pub const fn scalar() -> Self {
        Self {
            backend: Backend::Scalar,
        }
    }

    /// Backends usable on this machine, widest first.
    #[must_use]
    pub fn available() -> Vec<Backend> {
        let caps = caps::detect();
        Backend::ALL
            .into_iter()
            .filter(|backend| backend.is_usable(caps))
            .collect()
    }

    /// The pinned backend.
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Inputs per batch for the pinned backend.
    pub const fn lanes(&self) -> usize {
        self.backend.lanes()
    }

    /// SHA-256 of exactly [`lanes`](Self::lanes) inputs.
    pub fn sha256<I: Borrow<Input>>(&self, inputs: &[I]) -> BatchResult<Vec<Sha256Digest>> {
        self.exact::<Sha256Kernel, I>(inputs)
    }

    /// SHA-256 of exactly [`lanes`](Self::lanes) inputs into `out`.
    pub fn sha256_into<I: Borrow<Input>>(&self, inputs: &[I], out: &mut [Sha256Digest]) -> BatchResult<()> {
        self.exact_into::<Sha256Kernel, I>(inputs, out)
    }

    /// SHA-256 of any number of inputs.
    pub fn sha256_many<I: Borrow<Input>>(&self, inputs: &[I]) -> Vec<Sha256Digest> {
        self.many::<Sha256Kernel, I>(inputs)
    }

    /// SHA-256 of any number of inputs into `out`.
    pub fn sha256_many_into<I: Borrow<Input>>(
        &self,
        inputs: &[I],
        out: &mut [Sha256Digest],
    ) -> BatchResult<()> {
        self.many_into::<Sha256Kernel, I>(inputs, out)
    }

    /// RIPEMD-160 of exactly [`lanes`](Self::lanes) inputs.
    pub fn ripemd160<I: Borrow<Input>>(&self, inputs: &[I]) -> BatchResult<Vec<Ripemd160Digest>> {
        self.exact::<Ripemd160Kernel, I>(inputs)
    }

    /// RIPEMD-160 of exactly [`lanes`](Self::lanes) inputs into `out`.
    pub fn ripemd160_into<I: Borrow<Input>>(
        &self,
        inputs: &[I],
        out: &mut [Ripemd160Digest],
    ) -> BatchResult<()> {
        self.exact_into::<Ripemd160Kernel, I>(inputs, out)
    }

    /// RIPEMD-160 of any number of inputs.
    pub fn ripemd160_many<I: Borrow<Input>>(&self, inputs: &[I]) -> Vec<Ripemd160Digest> {
        self.many::<Ripemd160Kernel, I>(inputs)
    }

    /// RIPEMD-160 of any number of inputs into `out`.
    pub fn ripemd160_many_into<I: Borrow<Input>>(
        &self,
        inputs: &[I],
        out: &mut [Ripemd160Digest],
    ) -> BatchResult<()> {
        self.many_into::<Ripemd160Kernel, I>(inputs, out)
    }

    /// RIPEMD-160 of SHA-256 for exactly [`lanes`](Self::lanes) inputs.
    pub fn hash160<I: Borrow<Input>>(&self, inputs: &[I]) -> BatchResult<Vec<Ripemd160Digest>> {
        self.exact::<Hash160Kernel, I>(inputs)
    }

    /// RIPEMD-160 of SHA-256 for exactly [`lanes`](Self::lanes) inputs into
    /// `out`.
    pub fn hash160_into<I: Borrow<Input>>(&self, inputs: &[I], out: &mut [Ripemd160Digest]) -> BatchResult<()> {
        self.exact_into::<Hash160Kernel, I>(inputs, out)
    }

    /// RIPEMD-160 of SHA-256 for any number of inputs.
    pub fn hash160_many<I: Borrow<Input>>(&self, inputs: &[I]) -> Vec<Ripemd160Digest> {
        self.many::<Hash160Kernel, I>(inputs)
    }

    /// RIPEMD-160 of SHA-256 for any number of inputs into `out`.
    pub fn hash160_many_into<I: Borrow<Input>>(
        &self,
        inputs: &[I],
        out: &mut [Ripemd160Digest],
    ) -> BatchResult<()> {
        self.many_into::<Hash160Kernel, I>(inputs, out)
    }

    fn check_lanes(&self, actual: usize) -> BatchResult<()> {
        if actual == self.lanes() {
            Ok(())
        } else {
            Err(BatchError::LaneCount {
                backend: self.backend,
                expected: self.lanes(),
                actual,
            })
        }
    }

    fn exact<K: Kernel, I: Borrow<Input>>(&self, inputs: &[I]) -> BatchResult<Vec<K::Digest>> {
        self.check_lanes(inputs.len())?;
        let mut out = vec![K::ZERO; inputs.len()];
        K::hash_lanes(self.backend, inputs, &mut out);
        Ok(out)
    }

    fn exact_into<K: Kernel, I: Borrow<Input>>(&self, inputs: &[I], out: &mut [K::Digest]) -> BatchResult<()> {
        self.check_lanes(inputs.len())?;
        check_output(inputs.len(), out.len())?;
        K::hash_lanes(self.backend, inputs, out);
        Ok(())
    }

    fn many<K: Kernel, I: Borrow<Input>>(&self, inputs: &[I]) -> Vec<K::Digest> {
        let mut out = vec![K::ZERO; inputs.len()];
        self.fill::<K, I>(inputs, &mut out);
        out
    }

    fn many_into<K: Kernel, I: Borrow<Input>>(&self, inputs: &[I], out: &mut [K::Digest]) -> BatchResult<()> {
        check_output(inputs.len(), out.len())?;
        self.fill::<K, I>(inputs, out);
        Ok(())
    }

    /// Hashes `inputs` group by group. The final partial group is padded
    /// with dummy lanes whose digests are dropped.
    pub(crate) fn fill<K: Kernel, I: Borrow<Input>>(&self, inputs: &[I], out: &mut [K::Digest]) {
        let lanes = self.lanes();
        for (group, digests) in inputs.chunks(lanes).zip(out.chunks_mut(lanes)) {
            K::hash_lanes(self.backend, group, digests);
        }
    }
}

const fn check_output(expected: usize, actual: usize) -> BatchResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(BatchError::OutputLength { expected, actual })
    }
}

/// Resolves the backend from capabilities and an optional override string.
fn select(caps: &Capabilities, requested: Option<&str>) -> Backend {
    let detected = Backend::best_for(caps);
    let Some(raw) = requested.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return detected;
    };
    if raw.eq_ignore_ascii_case("auto") {
        return detected;
    }

    let outcome = match raw.parse::<Backend>() {
        Ok(backend) => backend
            .check(caps)
            .map(|()| backend)
            .map_err(|error| error.to_string()),
        Err(error) => Err(error.to_string()),
    };
    match outcome {
        Ok(backend) => backend,
        Err(reason) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                variable = BACKEND_ENV,
                value = raw,
                %reason,
                fallback = %detected,
                "ignoring backend override"
            );
            #[cfg(not(feature = "tracing"))]
            let _ = reason;
            detected
        }
    }
}

/// Global dispatcher instance, initialized on first use.
pub fn global() -> &'static Dispatcher {
    static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();
    DISPATCHER.get_or_init(Dispatcher::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caps::{Feature, Vendor};

    fn caps_with(features: &[Feature]) -> Capabilities {
        Capabilities::new(Vendor::Intel, 6, 0x55, features)
    }

    fn full_x86() -> Capabilities {
        caps_with(&[
            Feature::Sse2,
            Feature::Avx2,
            Feature::Avx512F,
            Feature::Avx512Dq,
            Feature::Avx512Bw,
            Feature::Avx512Vl,
        ])
    }

    #[test]
    fn lanes_per_backend() {
        assert_eq!(Backend::Avx512.lanes(), 16);
        assert_eq!(Backend::Avx2.lanes(), 8);
        assert_eq!(Backend::Sse2.lanes(), 4);
        assert_eq!(Backend::Neon.lanes(), 4);
        assert_eq!(Backend::Scalar.lanes(), 1);
    }

    #[test]
    fn names_round_trip_case_insensitively() {
        for backend in Backend::ALL {
            assert_eq!(backend.name().parse::<Backend>(), Ok(backend));
            assert_eq!(backend.name().to_uppercase().parse::<Backend>(), Ok(backend));
        }
        assert!(" avx2 ".parse::<Backend>().is_ok());
        assert!("mmx".parse::<Backend>().is_err());
    }

    #[test]
    fn unsupported_processor_gets_scalar() {
        assert_eq!(Backend::best_for(&Capabilities::unsupported()), Backend::Scalar);
    }

    #[test]
    fn scalar_is_always_usable() {
        assert!(Backend::Scalar.is_usable(&Capabilities::unsupported()));
        assert!(Dispatcher::with_backend(Backend::Scalar).is_ok());
        assert!(Dispatcher::available().contains(&Backend::Scalar));
    }

    #[cfg(all(target_arch = "x86_64", feature = "avx512", feature = "avx2", feature = "sse2"))]
    #[test]
    fn widest_compiled_tier_wins() {
        assert_eq!(Backend::best_for(&full_x86()), Backend::Avx512);
        assert_eq!(
            Backend::best_for(&caps_with(&[Feature::Sse2, Feature::Avx2])),
            Backend::Avx2
        );
        assert_eq!(Backend::best_for(&caps_with(&[Feature::Sse2])), Backend::Sse2);
    }

    #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
    #[test]
    fn partial_avx512_is_not_enough() {
        let caps = caps_with(&[Feature::Sse2, Feature::Avx2, Feature::Avx512F, Feature::Avx512Bw]);
        assert_eq!(Backend::best_for(&caps), Backend::Avx2);
        assert!(matches!(
            Backend::Avx512.check(&caps),
            Err(DispatchError::Unsupported { .. } | DispatchError::NotCompiled(_))
        ));
    }

    #[test]
    fn neon_is_never_compiled_on_x86() {
        if cfg!(target_arch = "x86_64") {
            assert_eq!(
                Backend::Neon.check(&full_x86().with_feature(Feature::Neon)),
                Err(DispatchError::NotCompiled(Backend::Neon))
            );
        }
    }

    #[test]
    fn override_selects_usable_backend() {
        assert_eq!(select(&full_x86(), Some("scalar")), Backend::Scalar);
        assert_eq!(select(&full_x86(), Some("auto")), Backend::best_for(&full_x86()));
        assert_eq!(select(&full_x86(), Some("   ")), Backend::best_for(&full_x86()));
    }

    #[test]
    fn bad_override_falls_back_to_detection() {
        let caps = caps_with(&[Feature::Sse2]);
        let detected = Backend::best_for(&caps);
        assert_eq!(select(&caps, Some("avx512")), detected);
        assert_eq!(select(&caps, Some("not-a-backend")), detected);
    }

    #[test]
    fn exact_width_rejects_wrong_count() {
        let dispatcher = global();
        let inputs = vec![[0u8; 32]; dispatcher.lanes() + 1];
        let err = dispatcher.sha256(&inputs).unwrap_err();
        assert_eq!(
            err,
            BatchError::LaneCount {
                backend: dispatcher.backend(),
                expected: dispatcher.lanes(),
                actual: dispatcher.lanes() + 1,
            }
        );
        assert!(dispatcher.ripemd160(&inputs[..0]).is_err());
    }

    #[test]
    fn into_variants_check_output_length() {
        let dispatcher = Dispatcher::scalar();
        let mut out = [[0u8; 32]; 2];
        assert_eq!(
            dispatcher.sha256_into(&[[1u8; 32]], &mut out),
            Err(BatchError::OutputLength {
                expected: 1,
                actual: 2
            })
        );
        assert!(dispatcher.sha256_many_into(&[[1u8; 32]; 2], &mut out).is_ok());
    }

    #[test]
    fn empty_many_returns_empty() {
        let inputs: [Input; 0] = [];
        assert!(global().sha256_many(&inputs).is_empty());
        assert!(global().hash160_many(&inputs).is_empty());
    }

    #[test]
    fn every_available_backend_agrees_with_scalar_on_ragged_input() {
        let inputs: Vec<Input> = (0..37u8).map(|i| [i.wrapping_mul(29); 32]).collect();
        let scalar = Dispatcher::scalar();
        for backend in Dispatcher::available() {
            let dispatcher = Dispatcher::with_backend(backend).unwrap();
            assert_eq!(dispatcher.sha256_many(&inputs), scalar.sha256_many(&inputs), "{backend}");
            assert_eq!(dispatcher.ripemd160_many(&inputs), scalar.ripemd160_many(&inputs), "{backend}");
            assert_eq!(dispatcher.hash160_many(&inputs), scalar.hash160_many(&inputs), "{backend}");
        }
    }

    #[test]
    fn global_dispatcher_is_consistent() {
        assert!(std::ptr::eq(global(), global()));
    }
}
