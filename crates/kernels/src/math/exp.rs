//! Vectorized exponential
//!
//! Cephes-style range reduction: `exp(x) = 2^n * exp(r)` with
//! `n = round(x / ln 2)` and `|r| <= ln(2) / 2`, a degree 5 polynomial for
//! `exp(r)` and the `2^n` factor built directly in the exponent bits.
//!
//! Relative error against `libm::expf` stays around 2 ulp across the
//! clamped range.

#![allow(clippy::excessive_precision)]

use crate::traits::{SimdInt, SimdVector};

/// Largest input whose result is still finite after rounding `n`
pub const EXP_MAX_INPUT: f32 = 88.0;

/// Smallest input whose result is still a normal number
pub const EXP_MIN_INPUT: f32 = -87.336_544_75;

const LOG2_E: f32 = core::f32::consts::LOG2_E;

// ln(2) split into an exactly representable high part and a correction
const LN2_HI: f32 = 0.693_359_375;
const LN2_LO: f32 = -2.121_944_40e-4;

const P0: f32 = 1.987_569_150_0e-4;
const P1: f32 = 1.398_199_950_7e-3;
const P2: f32 = 8.333_451_907_3e-3;
const P3: f32 = 4.166_579_589_4e-2;
const P4: f32 = 1.666_666_545_9e-1;
const P5: f32 = 5.000_000_120_1e-1;

/// Vectorized `e^x`
///
/// Inputs are clamped to `[EXP_MIN_INPUT, EXP_MAX_INPUT]`, so the result is
/// always a finite normal number.
#[inline(always)]
pub fn exp<V: SimdVector>(x: V) -> V {
    let x = x.max(V::splat(EXP_MIN_INPUT)).min(V::splat(EXP_MAX_INPUT));

    // n = round(x * log2(e))
    let n = x.mul(V::splat(LOG2_E)).add(V::splat(0.5)).floor();

    // r = x - n * ln(2), in two steps to keep the low bits
    let r = x.sub(n.mul(V::splat(LN2_HI))).sub(n.mul(V::splat(LN2_LO)));
    let r2 = r.mul(r);

    let mut y = V::splat(P0);
    y = y.fma(r, V::splat(P1));
    y = y.fma(r, V::splat(P2));
    y = y.fma(r, V::splat(P3));
    y = y.fma(r, V::splat(P4));
    y = y.fma(r, V::splat(P5));
    y = y.fma(r2, r.add(V::splat(1.0)));

    // 2^n from the biased exponent field
    let pow2n = V::from_bits(V::IntBits::from_f32_trunc(n).add_scalar(127).shl(23));
    y.mul(pow2n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_exp<V: SimdVector>() {
        let mut out = [0.0f32; 16];
        for &x in &[-80.0f32, -10.0, -1.0, -0.3, 0.0, 0.25, 1.0, 5.5, 40.0, 87.9] {
            exp(V::splat(x)).to_slice(&mut out);
            let expected = libm::expf(x);
            let rel = ((out[0] - expected) / expected).abs();
            assert!(rel < 1.0e-6, "exp({x}) = {} expected {expected}", out[0]);
        }

        exp(V::splat(1000.0)).to_slice(&mut out);
        assert!(out[0].is_finite());
        exp(V::splat(-1000.0)).to_slice(&mut out);
        assert!(out[0] > 0.0 && out[0] < 1.0e-37);
    }

    #[test]
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    fn test_exp_matches_libm_sse() {
        check_exp::<crate::backends::SseVector>();
    }

    #[test]
    #[cfg(all(feature = "neon", target_arch = "aarch64"))]
    fn test_exp_matches_libm_neon() {
        check_exp::<crate::backends::NeonVector>();
    }
}
