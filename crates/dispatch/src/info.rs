//! System report: host, capabilities and the tier chosen per operation

use std::fmt;

use crate::capabilities::CapabilitySet;
use crate::dispatcher::{dispatcher, Dispatcher};
use crate::table::OpId;
use crate::tier::Tier;

/// Snapshot of what a dispatcher runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    /// Target architecture the library was built for
    pub arch: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Capabilities the CPU reports
    pub host: CapabilitySet,
    /// Capabilities the dispatcher was resolved for
    pub enabled: CapabilitySet,
    /// Tiers compiled into this build
    pub compiled: Vec<Tier>,
    /// Selected tier per operation, in declaration order
    pub operations: Vec<(OpId, Tier)>,
}

impl Dispatcher {
    /// Report for this dispatcher
    pub fn info(&self) -> SystemInfo {
        SystemInfo {
            arch: std::env::consts::ARCH,
            version: env!("CARGO_PKG_VERSION"),
            host: CapabilitySet::host(),
            enabled: self.capabilities(),
            compiled: Tier::ALL.into_iter().filter(|t| t.is_compiled()).collect(),
            operations: self.table().tiers().collect(),
        }
    }
}

/// Report for the process-wide dispatcher
pub fn info() -> SystemInfo {
    dispatcher().info()
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "vecdsp {} ({})", self.version, self.arch)?;
        writeln!(f, "host:     {}", self.host)?;
        writeln!(f, "enabled:  {}", self.enabled)?;
        let compiled: Vec<&str> = self.compiled.iter().map(|t| t.name()).collect();
        writeln!(f, "compiled: {}", compiled.join(" "))?;
        writeln!(f)?;

        let width = self
            .operations
            .iter()
            .map(|(op, _)| op.name().len())
            .max()
            .unwrap_or(0);
        for (op, tier) in &self.operations {
            writeln!(f, "  {:<width$}  {}", op.name(), tier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_every_operation() {
        let report = Dispatcher::generic().info();
        assert_eq!(report.operations.len(), OpId::ALL.len());
        assert!(report.compiled.contains(&Tier::Generic));

        let text = report.to_string();
        assert!(text.contains("enabled:  generic"));
        assert!(text.contains("compressor_env"));
        assert!(text.contains("apply_matrix3d_mv1"));
    }
}
