//! Runtime CPU capability detection
//!
//! On x86/x86_64 the probe goes through `cpufeatures`, which also checks
//! that the OS saves the wide register state (a CPU can report AVX while
//! the kernel has it disabled). On aarch64 the standard library probe is
//! used. Other targets report no capabilities and always run the generic
//! kernels.

use std::fmt;
use std::sync::OnceLock;

use bitflags::bitflags;

bitflags! {
    /// Instruction set extensions a kernel may require
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapabilitySet: u32 {
        /// SSE
        const SSE = 1 << 0;
        /// SSE2
        const SSE2 = 1 << 1;
        /// SSE3
        const SSE3 = 1 << 2;
        /// SSSE3
        const SSSE3 = 1 << 3;
        /// SSE4.1
        const SSE4_1 = 1 << 4;
        /// SSE4.2
        const SSE4_2 = 1 << 5;
        /// AVX
        const AVX = 1 << 6;
        /// AVX2
        const AVX2 = 1 << 7;
        /// FMA3
        const FMA3 = 1 << 8;
        /// AVX-512 Foundation
        const AVX512F = 1 << 9;
        /// AVX-512 Doubleword & Quadword
        const AVX512DQ = 1 << 10;
        /// AVX-512 Byte & Word
        const AVX512BW = 1 << 11;
        /// AVX-512 Vector Length extensions
        const AVX512VL = 1 << 12;
        /// AArch64 Advanced SIMD
        const NEON = 1 << 13;
    }
}

static HOST: OnceLock<CapabilitySet> = OnceLock::new();

impl CapabilitySet {
    /// Probe the executing CPU
    ///
    /// Deterministic and side-effect free; prefer [`CapabilitySet::host`],
    /// which probes once per process.
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            cpufeatures::new!(cpuid_sse, "sse");
            cpufeatures::new!(cpuid_sse2, "sse2");
            cpufeatures::new!(cpuid_sse3, "sse3");
            cpufeatures::new!(cpuid_ssse3, "ssse3");
            cpufeatures::new!(cpuid_sse41, "sse4.1");
            cpufeatures::new!(cpuid_sse42, "sse4.2");
            cpufeatures::new!(cpuid_avx, "avx");
            cpufeatures::new!(cpuid_avx2, "avx2");
            cpufeatures::new!(cpuid_fma, "fma");
            cpufeatures::new!(cpuid_avx512f, "avx512f");
            cpufeatures::new!(cpuid_avx512dq, "avx512dq");
            cpufeatures::new!(cpuid_avx512bw, "avx512bw");
            cpufeatures::new!(cpuid_avx512vl, "avx512vl");

            let probes = [
                (cpuid_sse::get(), Self::SSE),
                (cpuid_sse2::get(), Self::SSE2),
                (cpuid_sse3::get(), Self::SSE3),
                (cpuid_ssse3::get(), Self::SSSE3),
                (cpuid_sse41::get(), Self::SSE4_1),
                (cpuid_sse42::get(), Self::SSE4_2),
                (cpuid_avx::get(), Self::AVX),
                (cpuid_avx2::get(), Self::AVX2),
                (cpuid_fma::get(), Self::FMA3),
                (cpuid_avx512f::get(), Self::AVX512F),
                (cpuid_avx512dq::get(), Self::AVX512DQ),
                (cpuid_avx512bw::get(), Self::AVX512BW),
                (cpuid_avx512vl::get(), Self::AVX512VL),
            ];
            probes
                .into_iter()
                .filter(|&(present, _)| present)
                .fold(Self::empty(), |caps, (_, flag)| caps | flag)
        }

        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                Self::NEON
            } else {
                Self::empty()
            }
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::empty()
        }
    }

    /// Capabilities of the executing CPU, probed on first use
    pub fn host() -> Self {
        *HOST.get_or_init(Self::detect)
    }

    /// Parse one capability name
    ///
    /// Case-insensitive; accepts both `sse4_1` and `sse4.1`, and `fma` for
    /// [`CapabilitySet::FMA3`].
    pub fn parse_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_uppercase().replace('.', "_");
        match normalized.as_str() {
            "FMA" => Some(Self::FMA3),
            other => Self::from_name(other),
        }
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("generic");
        }
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&name.to_ascii_lowercase())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_is_stable() {
        assert_eq!(CapabilitySet::host(), CapabilitySet::host());
        assert_eq!(CapabilitySet::host(), CapabilitySet::detect());
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_x86_64_baseline_present() {
        // SSE2 is part of the x86_64 ABI
        assert!(CapabilitySet::host().contains(CapabilitySet::SSE | CapabilitySet::SSE2));
    }

    #[test]
    fn test_parse_name_variants() {
        assert_eq!(CapabilitySet::parse_name("avx2"), Some(CapabilitySet::AVX2));
        assert_eq!(CapabilitySet::parse_name("SSE4.1"), Some(CapabilitySet::SSE4_1));
        assert_eq!(CapabilitySet::parse_name(" fma "), Some(CapabilitySet::FMA3));
        assert_eq!(CapabilitySet::parse_name("mmx"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CapabilitySet::empty().to_string(), "generic");
        assert_eq!((CapabilitySet::SSE | CapabilitySet::AVX2).to_string(), "sse avx2");
    }
}
