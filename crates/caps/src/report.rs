//! Human readable capability report.

use std::fmt;

use crate::{Capabilities, Feature, Microarch};

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CPU features detected:")?;
        writeln!(f, "  Vendor: {}", self.vendor())?;
        writeln!(f, "  Family/model: {:#04x}/{:#04x}", self.family(), self.model())?;
        let zen5 = if self.microarch() == Microarch::Zen5 { "yes" } else { "no" };
        writeln!(f, "  Zen5: {zen5}")?;
        for feature in Feature::ALL {
            writeln!(f, "  {}: {}", feature.name(), yes_no(self.has(feature)))?;
        }
        writeln!(f, "  AVX-512 tier: {}", yes_no(self.has_avx512()))?;
        write!(
            f,
            "  Widest vector: {} bits ({} lanes)",
            self.widest().bits(),
            self.widest().u32_lanes()
        )
    }
}

const fn yes_no(present: bool) -> &'static str {
    if present { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use crate::{Capabilities, Feature, Vendor};

    #[test]
    fn report_lists_every_feature() {
        let caps = Capabilities::new(Vendor::Amd, 0x1A, 0x44, &[Feature::Sse2, Feature::Avx2]);
        let report = caps.to_string();

        assert!(report.contains("Vendor: AMD"));
        assert!(report.contains("Zen5: yes"));
        assert!(report.contains("AVX2: yes"));
        assert!(report.contains("AVX-512F: no"));
        for feature in Feature::ALL {
            assert!(report.contains(feature.name()), "missing {}", feature.name());
        }
        assert!(report.ends_with("Widest vector: 256 bits (8 lanes)"));
    }

    #[test]
    fn unsupported_report_is_well_formed() {
        let report = Capabilities::unsupported().to_string();
        assert!(report.contains("Vendor: unknown"));
        assert!(report.ends_with("Widest vector: 32 bits (1 lanes)"));
    }
}
