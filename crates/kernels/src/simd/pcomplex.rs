//! Packed complex multiply
//!
//! With `A = [ar0, ai0, ar1, ai1, ..]` and `B` likewise:
//!
//! ```text
//! dup_even(A) * B             = [ar*br,  ar*bi, ..]
//! dup_odd(A)  * swap_pairs(B) = [ai*bi,  ai*br, ..]
//! first + neg_even(second)    = [ar*br - ai*bi, ar*bi + ai*br, ..]
//! ```
//!
//! which is the scalar product term for term.

use crate::block::{BlockKernel, Cascade};
use crate::generic;
use crate::traits::SimdVector;

#[inline(always)]
fn cmul_v<V: SimdVector>(a: V, b: V) -> V {
    let direct = a.dup_even().mul(b);
    let crossed = a.dup_odd().mul(b.swap_pairs());
    direct.add(crossed.neg_even())
}

struct Mul<'a> {
    dst: &'a mut [f32],
    a: Option<&'a [f32]>,
    b: &'a [f32],
}

impl BlockKernel for Mul<'_> {
    const STEP: usize = 2;

    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let a = match self.a {
            Some(a) => V::from_slice(&a[i..]),
            None => V::from_slice(&self.dst[i..]),
        };
        let b = V::from_slice(&self.b[i..]);
        cmul_v(a, b).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        let (ar, ai) = match self.a {
            Some(a) => (a[i], a[i + 1]),
            None => (self.dst[i], self.dst[i + 1]),
        };
        let (re, im) = generic::cmul(ar, ai, self.b[i], self.b[i + 1]);
        self.dst[i] = re;
        self.dst[i + 1] = im;
    }
}

/// `dst = dst * src` on interleaved pairs
#[inline(always)]
pub fn pcomplex_mul2<C: Cascade>(dst: &mut [f32], src: &[f32]) {
    C::run(&mut Mul { dst, a: None, b: src })
}

/// `dst = a * b` on interleaved pairs
#[inline(always)]
pub fn pcomplex_mul3<C: Cascade>(dst: &mut [f32], a: &[f32], b: &[f32]) {
    C::run(&mut Mul { dst, a: Some(a), b })
}
