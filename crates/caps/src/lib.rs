//! Process-wide CPU vector capability probe.
//!
//! The probe answers one question for the lane-parallel hashing engine: which
//! vector instruction tiers can this process legally execute? Detection runs
//! once, on first use, and the result is cached for the lifetime of the
//! process. Every later call to [`detect`] returns the same `&'static`
//! [`Capabilities`] value.
//!
//! # Tiers
//!
//! | Tier            | x86 / x86_64                         | aarch64 |
//! |-----------------|--------------------------------------|---------|
//! | 128-bit         | SSE2                                 | NEON    |
//! | 256-bit         | AVX2                                 | -       |
//! | 512-bit         | AVX-512 F + DQ + BW + VL             | -       |
//!
//! Feature flags come from the standard library's runtime detection, which
//! also verifies that the operating system saves the extended register state.
//! Vendor, family and model numbers are read from CPUID through `raw-cpuid`
//! and only feed the [`Microarch`] hint and the diagnostic report.
//!
//! On targets without a capability query mechanism the probe reports an
//! unsupported processor instead of failing.
//!
//! # Example
//!
//! ```
//! let caps = caps::detect();
//! if caps.has_avx2() {
//!     assert!(caps.widest() >= caps::VectorWidth::W256);
//! }
//! println!("{caps}");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod report;
mod vendor;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86;

use std::sync::OnceLock;

pub use vendor::{Microarch, Vendor};

/// Individual instruction set extensions tracked by the probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    /// SSE2, 128-bit integer vectors (baseline on x86_64).
    Sse2,
    /// Supplemental SSE3.
    Ssse3,
    /// SSE4.1.
    Sse41,
    /// AVX, 256-bit floating point vectors.
    Avx,
    /// AVX2, 256-bit integer vectors.
    Avx2,
    /// AVX-512 Foundation.
    Avx512F,
    /// AVX-512 doubleword and quadword instructions.
    Avx512Dq,
    /// AVX-512 byte and word instructions.
    Avx512Bw,
    /// AVX-512 vector length extensions.
    Avx512Vl,
    /// AVX-512 conflict detection.
    Avx512Cd,
    /// AVX-512 vector neural network instructions.
    Avx512Vnni,
    /// AVX-512 BFLOAT16 instructions.
    Avx512Bf16,
    /// ARM Advanced SIMD.
    Neon,
}

impl Feature {
    /// Every tracked feature, in report order.
    pub const ALL: [Self; 13] = [
        Self::Sse2,
        Self::Ssse3,
        Self::Sse41,
        Self::Avx,
        Self::Avx2,
        Self::Avx512F,
        Self::Avx512Dq,
        Self::Avx512Bw,
        Self::Avx512Vl,
        Self::Avx512Cd,
        Self::Avx512Vnni,
        Self::Avx512Bf16,
        Self::Neon,
    ];

    /// Sub-extensions that together make up the 512-bit tier.
    pub const AVX512_TIER: [Self; 4] = [
        Self::Avx512F,
        Self::Avx512Dq,
        Self::Avx512Bw,
        Self::Avx512Vl,
    ];

    /// Human readable name used by the diagnostic report.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sse2 => "SSE2",
            Self::Ssse3 => "SSSE3",
            Self::Sse41 => "SSE4.1",
            Self::Avx => "AVX",
            Self::Avx2 => "AVX2",
            Self::Avx512F => "AVX-512F",
            Self::Avx512Dq => "AVX-512DQ",
            Self::Avx512Bw => "AVX-512BW",
            Self::Avx512Vl => "AVX-512VL",
            Self::Avx512Cd => "AVX-512CD",
            Self::Avx512Vnni => "AVX-512VNNI",
            Self::Avx512Bf16 => "AVX-512BF16",
            Self::Neon => "NEON",
        }
    }

    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Widest vector register tier the processor supports for 32-bit lanes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VectorWidth {
    /// No usable vector unit.
    #[default]
    None,
    /// 128-bit registers (SSE2 or NEON), 4 lanes.
    W128,
    /// 256-bit registers (AVX2), 8 lanes.
    W256,
    /// 512-bit registers (AVX-512 F+DQ+BW+VL), 16 lanes.
    W512,
}

impl VectorWidth {
    /// Register width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::None => 32,
            Self::W128 => 128,
            Self::W256 => 256,
            Self::W512 => 512,
        }
    }

    /// Number of independent 32-bit lanes a register of this width holds.
    #[must_use]
    pub const fn u32_lanes(self) -> usize {
        (self.bits() / 32) as usize
    }
}

/// Snapshot of the processor's vector capabilities and identity.
///
/// Values are normally obtained through [`detect`]. The constructors exist so
/// that dispatch logic can be exercised against machines other than the one
/// running the tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    vendor: Vendor,
    microarch: Microarch,
    family: u8,
    model: u8,
    features: u32,
}

impl Capabilities {
    /// Capabilities of a processor with no vector support and unknown identity.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::default()
    }

    /// Builds a capability set from an explicit identity and feature list.
    #[must_use]
    pub fn new(vendor: Vendor, family: u8, model: u8, features: &[Feature]) -> Self {
        let microarch = Microarch::classify(&vendor, family, model);
        let features = features.iter().fold(0, |acc, feature| acc | feature.bit());
        Self {
            vendor,
            microarch,
            family,
            model,
            features,
        }
    }

    /// Returns a copy with `feature` marked as present.
    #[must_use]
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features |= feature.bit();
        self
    }

    /// Returns `true` when `feature` was detected.
    #[inline]
    #[must_use]
    pub const fn has(&self, feature: Feature) -> bool {
        self.features & feature.bit() != 0
    }

    /// 128-bit x86 integer vectors.
    #[must_use]
    pub const fn has_sse2(&self) -> bool {
        self.has(Feature::Sse2)
    }

    /// 256-bit x86 integer vectors.
    #[must_use]
    pub const fn has_avx2(&self) -> bool {
        self.has(Feature::Avx2)
    }

    /// 512-bit tier: AVX-512 F, DQ, BW and VL are all present.
    #[must_use]
    pub fn has_avx512(&self) -> bool {
        Feature::AVX512_TIER.iter().all(|&feature| self.has(feature))
    }

    /// Only the AVX-512 Foundation subset.
    #[must_use]
    pub const fn has_avx512f(&self) -> bool {
        self.has(Feature::Avx512F)
    }

    /// ARM Advanced SIMD.
    #[must_use]
    pub const fn has_neon(&self) -> bool {
        self.has(Feature::Neon)
    }

    /// Widest tier usable for 32-bit lane arithmetic.
    #[must_use]
    pub fn widest(&self) -> VectorWidth {
        if self.has_avx512() {
            VectorWidth::W512
        } else if self.has_avx2() {
            VectorWidth::W256
        } else if self.has_sse2() || self.has_neon() {
            VectorWidth::W128
        } else {
            VectorWidth::None
        }
    }

    /// Processor vendor reported by CPUID.
    #[must_use]
    pub const fn vendor(&self) -> &Vendor {
        &self.vendor
    }

    /// Microarchitecture hint. Never used for correctness decisions.
    #[must_use]
    pub const fn microarch(&self) -> Microarch {
        self.microarch
    }

    /// Display family (base plus extended family).
    #[must_use]
    pub const fn family(&self) -> u8 {
        self.family
    }

    /// Display model (extended model folded in where CPUID requires it).
    #[must_use]
    pub const fn model(&self) -> u8 {
        self.model
    }

    /// Iterates over the detected features in report order.
    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(|&feature| self.has(feature))
    }

    fn probe() -> Self {
        let caps = probe_arch();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            vendor = %caps.vendor,
            microarch = ?caps.microarch,
            family = caps.family,
            model = caps.model,
            widest = ?caps.widest(),
            "detected CPU vector capabilities"
        );
        caps
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn probe_arch() -> Capabilities {
    x86::probe()
}

#[cfg(target_arch = "aarch64")]
fn probe_arch() -> Capabilities {
    let mut caps = Capabilities::unsupported();
    if std::arch::is_aarch64_feature_detected!("neon") {
        caps = caps.with_feature(Feature::Neon);
    }
    caps
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn probe_arch() -> Capabilities {
    Capabilities::unsupported()
}

/// Returns the process-wide capability snapshot, probing on first use.
///
/// Initialization is guarded by a [`OnceLock`], so concurrent first callers
/// observe a single probe.
pub fn detect() -> &'static Capabilities {
    static CAPS: OnceLock<Capabilities> = OnceLock::new();
    CAPS.get_or_init(Capabilities::probe)
}
