//! Dispatcher configuration
//!
//! A configuration can only take capabilities away from the host, never
//! add them, so no setting can select a kernel the CPU cannot run.
//!
//! Sources, in order of precedence:
//! 1. the `force-*` Cargo features (tier ceiling for deterministic runs)
//! 2. `VECDSP_TIER`: tier ceiling by name (`generic`, `sse2`, `avx2`, ...)
//! 3. `VECDSP_DISABLE`: comma separated capability names to mask out

use thiserror::Error;

use crate::capabilities::CapabilitySet;
use crate::tier::Tier;

/// Environment variable naming the highest tier to use
pub const TIER_ENV: &str = "VECDSP_TIER";

/// Environment variable listing capabilities to ignore
pub const DISABLE_ENV: &str = "VECDSP_DISABLE";

/// An unusable configuration value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Not a tier name
    #[error("unknown tier `{0}` (expected generic, sse2, neon, avx2 or avx512)")]
    UnknownTier(String),

    /// Not a capability name
    #[error("unknown capability `{0}`")]
    UnknownCapability(String),
}

/// Restrictions applied to the host capabilities before resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchConfig {
    /// Use no tier above this one
    pub ceiling: Option<Tier>,
    /// Capabilities to treat as absent
    pub mask: CapabilitySet,
}

impl DispatchConfig {
    /// Cap selection at `tier`
    pub fn with_ceiling(mut self, tier: Tier) -> Self {
        self.ceiling = Some(tier);
        self
    }

    /// Treat `caps` as absent
    pub fn without(mut self, caps: CapabilitySet) -> Self {
        self.mask |= caps;
        self
    }

    /// Ceiling forced at build time through a `force-*` feature
    pub const fn forced_ceiling() -> Option<Tier> {
        if cfg!(feature = "force-generic") {
            Some(Tier::Generic)
        } else if cfg!(feature = "force-sse2") {
            Some(Tier::Sse2)
        } else if cfg!(feature = "force-neon") {
            Some(Tier::Neon)
        } else if cfg!(feature = "force-avx2") {
            Some(Tier::Avx2)
        } else if cfg!(feature = "force-avx512") {
            Some(Tier::Avx512)
        } else {
            None
        }
    }

    /// Only the build-time ceiling, ignoring the environment
    pub const fn forced() -> Self {
        Self {
            ceiling: Self::forced_ceiling(),
            mask: CapabilitySet::empty(),
        }
    }

    /// Build from the `force-*` features and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let tier = std::env::var(TIER_ENV).ok();
        let disable = std::env::var(DISABLE_ENV).ok();
        Self::from_values(tier.as_deref(), disable.as_deref())
    }

    /// Build from raw setting values, as read from the environment or
    /// the command line
    pub fn from_values(tier: Option<&str>, disable: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(name) = tier.filter(|s| !s.trim().is_empty()) {
            config.ceiling = Some(name.parse()?);
        }
        if let Some(list) = disable {
            config.mask = parse_capabilities(list)?;
        }

        if let Some(forced) = Self::forced_ceiling() {
            if config.ceiling.is_some_and(|t| t != forced) {
                log::warn!("{TIER_ENV} ignored, build forces the {forced} tier");
            }
            config.ceiling = Some(forced);
        }
        Ok(config)
    }

    /// Capabilities left after applying this configuration to `caps`
    pub fn apply(&self, caps: CapabilitySet) -> CapabilitySet {
        let capped = match self.ceiling {
            Some(tier) => caps & tier.requires(),
            None => caps,
        };
        capped - self.mask
    }
}

/// Parse a comma or whitespace separated capability list
pub fn parse_capabilities(list: &str) -> Result<CapabilitySet, ConfigError> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .try_fold(CapabilitySet::empty(), |caps, name| {
            CapabilitySet::parse_name(name)
                .map(|flag| caps | flag)
                .ok_or_else(|| ConfigError::UnknownCapability(name.to_string()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_keeps_only_tier_requirements() {
        let host = Tier::Avx512.requires() | CapabilitySet::SSE4_2;
        let config = DispatchConfig::default().with_ceiling(Tier::Sse2);
        assert_eq!(config.apply(host), Tier::Sse2.requires());
        assert!(DispatchConfig::default()
            .with_ceiling(Tier::Generic)
            .apply(host)
            .is_empty());
    }

    #[test]
    fn test_mask_removes_capabilities() {
        let config = DispatchConfig::default().without(CapabilitySet::AVX512F);
        let caps = config.apply(Tier::Avx512.requires());
        assert_eq!(caps, Tier::Avx2.requires());
    }

    #[test]
    #[cfg(not(any(
        feature = "force-generic",
        feature = "force-sse2",
        feature = "force-neon",
        feature = "force-avx2",
        feature = "force-avx512"
    )))]
    fn test_from_values() {
        let config = DispatchConfig::from_values(Some("avx2"), Some("fma, avx512f")).unwrap();
        assert_eq!(config.ceiling, Some(Tier::Avx2));
        assert_eq!(config.mask, CapabilitySet::FMA3 | CapabilitySet::AVX512F);

        assert_eq!(DispatchConfig::from_values(Some(""), None).unwrap(), DispatchConfig::default());
        assert_eq!(
            DispatchConfig::from_values(Some("mmx"), None),
            Err(ConfigError::UnknownTier("mmx".into()))
        );
        assert_eq!(
            DispatchConfig::from_values(None, Some("sse2,bogus")),
            Err(ConfigError::UnknownCapability("bogus".into()))
        );
    }
}
