//! Portable reference kernels
//!
//! Plain scalar loops that define the semantics every other tier is measured
//! against. They need no CPU feature, so they are always registered and are
//! the fallback when nothing better is available.
//!
//! Every buffer argument is expected to have the length of `dst`; the
//! dispatch layer checks that before calling in.

mod dynamics;
mod geometry;
mod hmath;
mod lramp;
mod pcomplex;
mod pmath;

pub use dynamics::*;
pub use geometry::*;
pub use hmath::*;
pub use lramp::*;
pub use pcomplex::*;
pub use pmath::*;
