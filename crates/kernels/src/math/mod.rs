//! Vectorized transcendental functions
//!
//! The dynamics curves evaluate `exp(poly(ln x))` per sample. These are the
//! vector forms used by the SIMD tiers; the generic tier uses `libm`.
//!
//! - `exp`: natural exponential, input clamped to the finite f32 range
//! - `ln`: natural logarithm, input clamped to `f32::MIN_POSITIVE`

pub mod exp;
pub mod log;

pub use exp::exp;
pub use log::ln;
