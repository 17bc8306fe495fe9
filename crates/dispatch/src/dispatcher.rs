//! Kernel dispatcher service
//!
//! A [`Dispatcher`] pairs a capability set with the table resolved for it.
//! It can be constructed explicitly (tests, benchmarks, hosts that want a
//! lower tier) or taken from the process-wide instance returned by
//! [`dispatcher()`], which is resolved once on first use.

use std::sync::OnceLock;

use crate::capabilities::CapabilitySet;
use crate::config::DispatchConfig;
use crate::registry::{KernelSet, RegistryError};
use crate::table::DispatchTable;
use crate::tier::Tier;

/// Resolved kernels for one capability set
///
/// Cheap to share: the table is plain function pointers and never changes
/// after construction.
#[derive(Clone)]
pub struct Dispatcher {
    pub(crate) table: DispatchTable,
}

static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

impl Dispatcher {
    /// Builtin kernels for `caps` restricted to what the host supports
    ///
    /// Asking for more than the host has is harmless, the extra
    /// capabilities are dropped.
    pub fn new(caps: CapabilitySet) -> Self {
        // SAFETY: intersected with the host capabilities
        unsafe { Self::new_unchecked(caps & CapabilitySet::host()) }
    }

    /// Builtin kernels for the host, restricted by `config`
    pub fn with_config(config: &DispatchConfig) -> Self {
        Self::new(config.apply(CapabilitySet::host()))
    }

    /// Builtin kernels for exactly `caps`
    ///
    /// Falls back to the generic table (and logs) if the builtin set does
    /// not validate.
    ///
    /// # Safety
    ///
    /// The CPU running any operation of the returned dispatcher must
    /// support every capability in `caps`.
    pub unsafe fn new_unchecked(caps: CapabilitySet) -> Self {
        match DispatchTable::resolve(&KernelSet::builtin(), caps) {
            Ok(table) => Self { table },
            Err(err) => {
                log::error!("builtin kernel set rejected, using generic kernels: {err}");
                Self::generic()
            }
        }
    }

    /// Kernels from a custom set, restricted to the host capabilities
    pub fn with_kernels(caps: CapabilitySet, set: &KernelSet) -> Result<Self, RegistryError> {
        let table = DispatchTable::resolve(set, caps & CapabilitySet::host())?;
        Ok(Self { table })
    }

    /// Every operation bound to its generic reference
    pub fn generic() -> Self {
        Self {
            table: DispatchTable::generic(),
        }
    }

    /// Capabilities the table was resolved for
    pub fn capabilities(&self) -> CapabilitySet {
        self.table.capabilities()
    }

    /// The resolved table
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Highest tier any operation uses
    pub fn best_tier(&self) -> Tier {
        self.table.best_tier()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("capabilities", &self.capabilities())
            .field("best_tier", &self.best_tier())
            .finish()
    }
}

/// Process-wide dispatcher
///
/// Resolved on first call from the host capabilities, the `force-*`
/// features and the `VECDSP_TIER` / `VECDSP_DISABLE` environment. Concurrent
/// first calls block until one initialization finishes; later calls only
/// load a pointer.
pub fn dispatcher() -> &'static Dispatcher {
    DISPATCHER.get_or_init(|| {
        let config = DispatchConfig::from_env().unwrap_or_else(|err| {
            log::warn!("ignoring dispatch configuration: {err}");
            DispatchConfig::forced()
        });
        let dispatcher = Dispatcher::with_config(&config);
        log::info!(
            "vecdsp: host [{}], using [{}], best tier {}",
            CapabilitySet::host(),
            dispatcher.capabilities(),
            dispatcher.best_tier()
        );
        dispatcher
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_dispatcher_is_shared() {
        assert!(std::ptr::eq(dispatcher(), dispatcher()));
    }
}
