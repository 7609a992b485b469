use std::fmt;

/// Processor vendor as reported by the CPUID vendor string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Vendor {
    /// `GenuineIntel`.
    Intel,
    /// `AuthenticAMD`.
    Amd,
    /// Any other vendor string, kept verbatim.
    Other(String),
    /// The platform offers no way to query the vendor.
    #[default]
    Unknown,
}

impl Vendor {
    /// Classifies a 12-byte CPUID vendor string.
    #[must_use]
    pub fn from_cpuid(vendor: &str) -> Self {
        match vendor {
            "GenuineIntel" => Self::Intel,
            "AuthenticAMD" => Self::Amd,
            "" => Self::Unknown,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intel => f.write_str("Intel"),
            Self::Amd => f.write_str("AMD"),
            Self::Other(name) => f.write_str(name),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Coarse microarchitecture hint.
///
/// Only used for logging and reporting; dispatch never depends on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Microarch {
    /// AMD Zen 5 (family 1Ah), which executes 512-bit operations on full-width
    /// datapaths.
    Zen5,
    /// Anything else.
    #[default]
    Unknown,
}

/// AMD display family of the Zen 5 generation.
const ZEN5_FAMILY: u8 = 0x1A;

impl Microarch {
    /// Derives the hint from vendor and display family/model numbers.
    #[must_use]
    pub fn classify(vendor: &Vendor, family: u8, _model: u8) -> Self {
        match vendor {
            Vendor::Amd if family == ZEN5_FAMILY => Self::Zen5,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_strings_are_classified() {
        assert_eq!(Vendor::from_cpuid("GenuineIntel"), Vendor::Intel);
        assert_eq!(Vendor::from_cpuid("AuthenticAMD"), Vendor::Amd);
        assert_eq!(
            Vendor::from_cpuid("HygonGenuine"),
            Vendor::Other("HygonGenuine".to_owned())
        );
        assert_eq!(Vendor::from_cpuid(""), Vendor::Unknown);
    }

    #[test]
    fn zen5_needs_amd_family_1ah() {
        assert_eq!(Microarch::classify(&Vendor::Amd, 0x1A, 0x44), Microarch::Zen5);
        assert_eq!(Microarch::classify(&Vendor::Amd, 0x19, 0x61), Microarch::Unknown);
        assert_eq!(Microarch::classify(&Vendor::Intel, 0x1A, 0), Microarch::Unknown);
    }
}
