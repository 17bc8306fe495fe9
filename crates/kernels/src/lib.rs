#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! vecdsp-kernels: SIMD vector kernels for audio DSP
//!
//! Every operation exists as a portable scalar reference in [`generic`] and,
//! for the instruction sets it benefits from, as a vector kernel in
//! [`tiers`]. The vector kernels are written once in [`simd`] against the
//! [`SimdVector`] trait and instantiated per tier through a typed
//! [`block`] cascade (widest vector, then narrower vectors, then scalar).
//!
//! This crate does no CPU detection. Tier entry points are `unsafe fn`
//! whose only precondition is that the CPU supports the tier's features;
//! `vecdsp-dispatch` discharges that precondition at runtime.
//!
//! ```rust
//! use vecdsp_kernels::generic;
//!
//! let mut dst = [0.0f32; 5];
//! generic::lramp_set1(&mut dst, 0.0, 10.0);
//! assert_eq!(dst, [0.0, 2.0, 4.0, 6.0, 8.0]);
//! ```

#[cfg(test)]
extern crate std;

// Core trait definitions
pub mod traits;

// Backend implementations
pub mod backends;

// Head/body/tail decomposition
pub mod block;

// Vectorized exp / ln
pub mod math;

// Operators and ramps shared by scalar and vector kernels
pub mod ops;

// Parameter and state records
pub mod types;

// Scalar reference kernels
pub mod generic;

// Vector kernels and their per-tier entry points
pub mod simd;
pub mod tiers;

pub use traits::{SimdInt, SimdMask, SimdVector};

pub use types::{
    CompressorEnv, CompressorKnee, CompressorX2, ExpanderKnee, Matrix3d, Point3d, Vector3d,
};
