//! Vectorized natural logarithm
//!
//! The input is split into `m * 2^e` with `m` in `[sqrt(1/2), sqrt(2))` and
//! `ln(1 + (m - 1))` is evaluated with a degree 9 Cephes polynomial. The
//! exponent contribution is added back with a two-part `ln(2)`.

#![allow(clippy::excessive_precision)]

use crate::traits::{SimdInt, SimdVector};

const SQRT_HALF: f32 = core::f32::consts::FRAC_1_SQRT_2;

const LN2_HI: f32 = 0.693_359_375;
const LN2_LO: f32 = -2.121_944_40e-4;

const EXPONENT_MASK: u32 = 0x7f80_0000;
const HALF_BITS: u32 = 0x3f00_0000;

const P: [f32; 9] = [
    7.037_683_629_2e-2,
    -1.151_461_031_0e-1,
    1.167_699_874_0e-1,
    -1.242_014_084_6e-1,
    1.424_932_278_7e-1,
    -1.666_805_766_5e-1,
    2.000_071_476_5e-1,
    -2.499_999_399_3e-1,
    3.333_333_117_4e-1,
];

/// Vectorized `ln(x)`
///
/// Non-positive and subnormal inputs are clamped to `f32::MIN_POSITIVE`, so
/// the result is always finite (about -87.34 at the bottom).
#[inline(always)]
pub fn ln<V: SimdVector>(x: V) -> V {
    let one = V::splat(1.0);
    let x = x.max(V::splat(f32::MIN_POSITIVE));

    let bits = x.to_bits();
    // Unbiased exponent for a mantissa in [0.5, 1)
    let mut e = bits.shr(23).sub_scalar(0x7f).to_f32().add(one);
    let mut m = V::from_bits(bits.bitwise_and(!EXPONENT_MASK).bitwise_or(HALF_BITS));

    // Fold [0.5, sqrt(1/2)) up to [1, sqrt(2)) so m - 1 stays small
    let small = m.lt(V::splat(SQRT_HALF));
    let folded = V::select(small, m, V::splat(0.0));
    e = e.sub(V::select(small, one, V::splat(0.0)));
    m = m.sub(one).add(folded);

    let m2 = m.mul(m);
    let mut y = V::splat(P[0]);
    for &c in &P[1..] {
        y = y.fma(m, V::splat(c));
    }
    y = y.mul(m).mul(m2);

    y = y.add(e.mul(V::splat(LN2_LO)));
    y = y.sub(m2.mul(V::splat(0.5)));
    m.add(y).add(e.mul(V::splat(LN2_HI)))
}
