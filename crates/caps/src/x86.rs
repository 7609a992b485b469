//! x86 / x86_64 probing.

use raw_cpuid::CpuId;

use crate::{Capabilities, Feature, Vendor};

/// Reads identity through CPUID and features through std's runtime detection.
pub(crate) fn probe() -> Capabilities {
    let cpuid = CpuId::new();

    let vendor = cpuid
        .get_vendor_info()
        .map_or(Vendor::Unknown, |info| Vendor::from_cpuid(info.as_str()));
    let (family, model) = cpuid
        .get_feature_info()
        .map_or((0, 0), |info| (info.family_id(), info.model_id()));

    let features: Vec<Feature> = Feature::ALL
        .into_iter()
        .filter(|&feature| runtime_detected(feature))
        .collect();

    Capabilities::new(vendor, family, model, &features)
}

fn runtime_detected(feature: Feature) -> bool {
    match feature {
        Feature::Sse2 => std::arch::is_x86_feature_detected!("sse2"),
        Feature::Ssse3 => std::arch::is_x86_feature_detected!("ssse3"),
        Feature::Sse41 => std::arch::is_x86_feature_detected!("sse4.1"),
        Feature::Avx => std::arch::is_x86_feature_detected!("avx"),
        Feature::Avx2 => std::arch::is_x86_feature_detected!("avx2"),
        Feature::Avx512F => std::arch::is_x86_feature_detected!("avx512f"),
        Feature::Avx512Dq => std::arch::is_x86_feature_detected!("avx512dq"),
        Feature::Avx512Bw => std::arch::is_x86_feature_detected!("avx512bw"),
        Feature::Avx512Vl => std::arch::is_x86_feature_detected!("avx512vl"),
        Feature::Avx512Cd => std::arch::is_x86_feature_detected!("avx512cd"),
        Feature::Avx512Vnni => std::arch::is_x86_feature_detected!("avx512vnni"),
        Feature::Avx512Bf16 => std::arch::is_x86_feature_detected!("avx512bf16"),
        Feature::Neon => false,
    }
}
