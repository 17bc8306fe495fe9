//! Pointwise binary operators
//!
//! Each operator has a scalar and a vector form with identical IEEE
//! semantics (same operations in the same order, no fusing), so a tier's
//! output matches the reference exactly for the pointwise families.
//!
//! The reversed operators swap their operands: `RSub::apply(a, b) = b - a`.

use crate::traits::SimdVector;

/// A binary operator over f32 lanes
pub trait BinaryOp {
    /// Scalar form
    fn apply(a: f32, b: f32) -> f32;

    /// Vector form
    fn apply_v<V: SimdVector>(a: V, b: V) -> V;
}

/// `a + b`
pub struct Add;
/// `a - b`
pub struct Sub;
/// `b - a`
pub struct RSub;
/// `a * b`
pub struct Mul;
/// `a / b`
pub struct Div;
/// `b / a`
pub struct RDiv;
/// `a - b * trunc(a / b)`
pub struct Mod;
/// `b - a * trunc(b / a)`
pub struct RMod;

impl BinaryOp for Add {
    #[inline(always)]
    fn apply(a: f32, b: f32) -> f32 {
        a + b
    }

    #[inline(always)]
    fn apply_v<V: SimdVector>(a: V, b: V) -> V {
        a.add(b)
    }
}

impl BinaryOp for Sub {
    #[inline(always)]
    fn apply(a: f32, b: f32) -> f32 {
        a - b
    }

    #[inline(always)]
    fn apply_v<V: SimdVector>(a: V, b: V) -> V {
        a.sub(b)
    }
}

impl BinaryOp for RSub {
    #[inline(always)]
    fn apply(a: f32, b: f32) -> f32 {
        b - a
    }

    #[inline(always)]
    fn apply_v<V: SimdVector>(a: V, b: V) -> V {
        b.sub(a)
    }
}

impl BinaryOp for Mul {
    #[inline(always)]
    fn apply(a: f32, b: f32) -> f32 {
        a * b
    }

    #[inline(always)]
    fn apply_v<V: SimdVector>(a: V, b: V) -> V {
        a.mul(b)
    }
}

impl BinaryOp for Div {
    #[inline(always)]
    fn apply(a: f32, b: f32) -> f32 {
        a / b
    }

    #[inline(always)]
    fn apply_v<V: SimdVector>(a: V, b: V) -> V {
        a.div(b)
    }
}

impl BinaryOp for RDiv {
    #[inline(always)]
    fn apply(a: f32, b: f32) -> f32 {
        b / a
    }

    #[inline(always)]
    fn apply_v<V: SimdVector>(a: V, b: V) -> V {
        b.div(a)
    }
}

#[inline(always)]
fn fmod(a: f32, b: f32) -> f32 {
    a - b * libm::truncf(a / b)
}

#[inline(always)]
fn fmod_v<V: SimdVector>(a: V, b: V) -> V {
    a.sub(b.mul(a.div(b).trunc()))
}

impl BinaryOp for Mod {
    #[inline(always)]
    fn apply(a: f32, b: f32) -> f32 {
        fmod(a, b)
    }

    #[inline(always)]
    fn apply_v<V: SimdVector>(a: V, b: V) -> V {
        fmod_v(a, b)
    }
}

impl BinaryOp for RMod {
    #[inline(always)]
    fn apply(a: f32, b: f32) -> f32 {
        fmod(b, a)
    }

    #[inline(always)]
    fn apply_v<V: SimdVector>(a: V, b: V) -> V {
        fmod_v(b, a)
    }
}

/// Linear ramp over `n` samples: `v1 + i * (v2 - v1) / n`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ramp {
    /// `v1 == v2`: every sample gets the same factor, no per-sample index math
    Constant(f32),
    /// `value(i) = start + step * i`
    Linear {
        /// Value at sample 0
        start: f32,
        /// Increment per sample
        step: f32,
    },
}

impl Ramp {
    /// Ramp from `v1` towards `v2` over `n` samples, `None` when `n == 0`
    #[inline(always)]
    pub fn new(v1: f32, v2: f32, n: usize) -> Option<Self> {
        if n == 0 {
            return None;
        }
        if v1 == v2 {
            Some(Ramp::Constant(v1))
        } else {
            let delta = v2 - v1;
            Some(Ramp::Linear {
                start: v1,
                step: delta / n as f32,
            })
        }
    }

    /// Value at sample `i`
    #[inline(always)]
    pub fn at(&self, i: usize) -> f32 {
        match *self {
            Ramp::Constant(k) => k,
            Ramp::Linear { start, step } => start + step * i as f32,
        }
    }

    /// Values at samples `i .. i + V::LANES`
    #[inline(always)]
    pub fn at_v<V: SimdVector>(&self, i: usize) -> V {
        match *self {
            Ramp::Constant(k) => V::splat(k),
            Ramp::Linear { start, step } => {
                let index = V::iota().add(V::splat(i as f32));
                V::splat(start).add(V::splat(step).mul(index))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_operators_swap_operands() {
        assert_eq!(RSub::apply(1.0, 3.0), 2.0);
        assert_eq!(RDiv::apply(2.0, 3.0), 1.5);
        assert_eq!(RMod::apply(2.0, 7.0), 1.0);
    }

    #[test]
    fn test_ramp_shapes() {
        assert_eq!(Ramp::new(0.0, 10.0, 0), None);
        assert_eq!(Ramp::new(3.0, 3.0, 8), Some(Ramp::Constant(3.0)));
        assert_eq!(
            Ramp::new(f32::INFINITY, f32::INFINITY, 4),
            Some(Ramp::Constant(f32::INFINITY))
        );

        let ramp = Ramp::new(0.0, 10.0, 5).unwrap();
        let values: [f32; 5] = core::array::from_fn(|i| ramp.at(i));
        assert_eq!(values, [0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_mod_truncates_toward_zero() {
        assert_eq!(Mod::apply(7.0, 2.0), 1.0);
        assert_eq!(Mod::apply(-7.0, 2.0), -1.0);
        assert_eq!(Mod::apply(7.5, -2.0), 1.5);
    }
}
