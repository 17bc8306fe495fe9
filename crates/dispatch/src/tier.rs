//! Kernel tiers and their requirements

use std::fmt;
use std::str::FromStr;

use crate::capabilities::CapabilitySet;
use crate::config::ConfigError;

/// One family of kernel implementations sharing an instruction set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Portable scalar reference, always available
    Generic,
    /// 128-bit SSE2 (x86 baseline)
    Sse2,
    /// 128-bit NEON (aarch64)
    Neon,
    /// 256-bit AVX2 + FMA, falls through to SSE2 widths
    Avx2,
    /// 512-bit AVX-512F, falls through to AVX2 and SSE2 widths
    Avx512,
}

impl Tier {
    /// Every tier, lowest rank first
    pub const ALL: [Tier; 5] = [Tier::Generic, Tier::Sse2, Tier::Neon, Tier::Avx2, Tier::Avx512];

    /// Capabilities a kernel of this tier may use
    pub const fn requires(self) -> CapabilitySet {
        let sse = CapabilitySet::SSE.union(CapabilitySet::SSE2);
        let avx2 = sse
            .union(CapabilitySet::AVX)
            .union(CapabilitySet::AVX2)
            .union(CapabilitySet::FMA3);
        match self {
            Tier::Generic => CapabilitySet::empty(),
            Tier::Sse2 => sse,
            Tier::Neon => CapabilitySet::NEON,
            Tier::Avx2 => avx2,
            Tier::Avx512 => avx2.union(CapabilitySet::AVX512F),
        }
    }

    /// Default selection rank, higher wins
    pub const fn rank(self) -> u32 {
        match self {
            Tier::Generic => 0,
            Tier::Sse2 | Tier::Neon => 10,
            Tier::Avx2 => 20,
            Tier::Avx512 => 30,
        }
    }

    /// Lowercase name, as accepted by [`Tier::from_str`]
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Generic => "generic",
            Tier::Sse2 => "sse2",
            Tier::Neon => "neon",
            Tier::Avx2 => "avx2",
            Tier::Avx512 => "avx512",
        }
    }

    /// Whether kernels of this tier can run with `caps`
    pub fn is_supported_by(self, caps: CapabilitySet) -> bool {
        caps.contains(self.requires())
    }

    /// Whether kernels of this tier were compiled for the build target
    pub const fn is_compiled(self) -> bool {
        match self {
            Tier::Generic => true,
            Tier::Sse2 => cfg!(any(target_arch = "x86", target_arch = "x86_64")),
            Tier::Avx2 => cfg!(all(
                feature = "avx2",
                any(target_arch = "x86", target_arch = "x86_64")
            )),
            Tier::Avx512 => cfg!(all(
                feature = "avx512",
                any(target_arch = "x86", target_arch = "x86_64")
            )),
            Tier::Neon => cfg!(all(feature = "neon", target_arch = "aarch64")),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_ascii_lowercase().as_str() {
                "scalar" => Some(Tier::Generic),
                "avx-512" => Some(Tier::Avx512),
                _ => None,
            })
            .ok_or_else(|| ConfigError::UnknownTier(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_nest() {
        assert!(Tier::Avx512.requires().contains(Tier::Avx2.requires()));
        assert!(Tier::Avx2.requires().contains(Tier::Sse2.requires()));
        assert!(Tier::Generic.requires().is_empty());
        assert!(Tier::Generic.is_supported_by(CapabilitySet::empty()));
        assert!(!Tier::Sse2.is_supported_by(CapabilitySet::SSE2));
    }

    #[test]
    fn test_parse_round_trips_names() {
        for tier in Tier::ALL {
            assert_eq!(tier.name().parse::<Tier>().ok(), Some(tier));
        }
        assert_eq!("AVX2".parse::<Tier>().ok(), Some(Tier::Avx2));
        assert_eq!("scalar".parse::<Tier>().ok(), Some(Tier::Generic));
        assert!(matches!("mmx".parse::<Tier>(), Err(ConfigError::UnknownTier(_))));
    }
}
