//! Vector kernels, written once over [`SimdVector`](crate::traits::SimdVector)
//!
//! Everything here is `#[inline(always)]` and generic over a [`Cascade`]
//! (or a 4-lane vector for the 3D ops). Nothing is callable on its own: the
//! [`tiers`](crate::tiers) modules instantiate these inside
//! `#[target_feature]` functions so the backend intrinsics are compiled for
//! the right instruction set.
//!
//! [`Cascade`]: crate::block::Cascade

pub mod dynamics;
pub mod geometry;
pub mod hmath;
pub mod lramp;
pub mod pcomplex;
pub mod pmath;

pub use dynamics::*;
pub use geometry::*;
pub use hmath::*;
pub use lramp::*;
pub use pcomplex::*;
pub use pmath::*;
