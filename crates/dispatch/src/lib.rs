//! Runtime kernel dispatch for vecdsp
//!
//! Detects the CPU's SIMD capabilities once, resolves every operation to
//! the best kernel the CPU can run, and exposes the result as a table of
//! function pointers behind safe, length-checked calls.
//!
//! # Tiers
//!
//! | Tier | Requires | Lanes |
//! |------|----------|-------|
//! | generic | nothing | scalar |
//! | sse2 | SSE, SSE2 | 4 |
//! | neon | NEON | 4 |
//! | avx2 | AVX, AVX2, FMA3 (and SSE2) | 8 → 4 |
//! | avx512 | AVX-512F (and AVX2) | 16 → 8 → 4 |
//!
//! Operations without a kernel for the best tier fall back to the next
//! lower one that has one, ending at the generic reference.
//!
//! # Features
//!
//! - `avx2`, `avx512`, `neon` (default): compile the wider tiers
//! - `force-generic`, `force-sse2`, `force-avx2`, `force-avx512`,
//!   `force-neon`: cap the process-wide dispatcher at one tier regardless
//!   of `VECDSP_TIER`
//!
//! # Example
//!
//! ```
//! let mut gain = [0.0f32; 5];
//! vecdsp_dispatch::lramp_set1(&mut gain, 0.0, 10.0);
//! assert_eq!(gain, [0.0, 2.0, 4.0, 6.0, 8.0]);
//!
//! let mut signal = [0.5f32; 5];
//! vecdsp_dispatch::mul2(&mut signal, &gain);
//! assert_eq!(signal[4], 4.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capabilities;
pub mod config;
pub mod dispatcher;
pub mod dsp;
pub mod info;
pub mod registry;
pub mod table;
pub mod tier;
pub mod verify;

pub use capabilities::CapabilitySet;
pub use config::{ConfigError, DispatchConfig};
pub use dispatcher::{dispatcher, Dispatcher};
pub use dsp::*;
pub use info::{info, SystemInfo};
pub use registry::{KernelDescriptor, KernelSet, RegistryError};
pub use table::{DispatchTable, OpId, Resolved};
pub use tier::Tier;

pub use vecdsp_kernels::{
    CompressorEnv, CompressorKnee, CompressorX2, ExpanderKnee, Matrix3d, Point3d, Vector3d,
};
