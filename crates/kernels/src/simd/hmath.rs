//! Dot-product family
//!
//! Each vector width keeps its own lane accumulator for the whole body and
//! folds it into the running scalar sum once, so results differ from the
//! sequential reference only by summation order.

use core::marker::PhantomData;

use crate::block::{BlockKernel, Cascade};
use crate::traits::SimdVector;

trait Term {
    fn term(a: f32, b: f32) -> f32;
    fn term_v<V: SimdVector>(a: V, b: V) -> V;
}

struct Plain;
struct Squared;
struct Absolute;

impl Term for Plain {
    #[inline(always)]
    fn term(a: f32, b: f32) -> f32 {
        a * b
    }

    #[inline(always)]
    fn term_v<V: SimdVector>(a: V, b: V) -> V {
        a.mul(b)
    }
}

impl Term for Squared {
    #[inline(always)]
    fn term(a: f32, b: f32) -> f32 {
        (a * a) * (b * b)
    }

    #[inline(always)]
    fn term_v<V: SimdVector>(a: V, b: V) -> V {
        a.mul(a).mul(b.mul(b))
    }
}

impl Term for Absolute {
    #[inline(always)]
    fn term(a: f32, b: f32) -> f32 {
        a.abs() * b.abs()
    }

    #[inline(always)]
    fn term_v<V: SimdVector>(a: V, b: V) -> V {
        a.abs().mul(b.abs())
    }
}

struct Dot<'a, T> {
    a: &'a [f32],
    b: &'a [f32],
    sum: f32,
    term: PhantomData<T>,
}

impl<T: Term> BlockKernel for Dot<'_, T> {
    fn len(&self) -> usize {
        self.a.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let t = T::term_v(V::from_slice(&self.a[i..]), V::from_slice(&self.b[i..]));
        self.sum += t.horizontal_sum();
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        self.sum += T::term(self.a[i], self.b[i]);
    }

    #[inline(always)]
    fn body<V: SimdVector>(&mut self, from: usize) -> usize {
        let len = self.len();
        let mut i = from;
        let mut acc = V::splat(0.0);
        while i + V::LANES <= len {
            let t = T::term_v(V::from_slice(&self.a[i..]), V::from_slice(&self.b[i..]));
            acc = acc.add(t);
            i += V::LANES;
        }
        if i > from {
            self.sum += acc.horizontal_sum();
        }
        i
    }
}

#[inline(always)]
fn dot<C: Cascade, T: Term>(a: &[f32], b: &[f32]) -> f32 {
    let mut kernel = Dot::<T> {
        a,
        b,
        sum: 0.0,
        term: PhantomData,
    };
    C::run(&mut kernel);
    kernel.sum
}

/// `sum(a[i] * b[i])`
#[inline(always)]
pub fn h_dotp<C: Cascade>(a: &[f32], b: &[f32]) -> f32 {
    dot::<C, Plain>(a, b)
}

/// `sum(a[i]^2 * b[i]^2)`
#[inline(always)]
pub fn h_sqr_dotp<C: Cascade>(a: &[f32], b: &[f32]) -> f32 {
    dot::<C, Squared>(a, b)
}

/// `sum(|a[i]| * |b[i]|)`
#[inline(always)]
pub fn h_abs_dotp<C: Cascade>(a: &[f32], b: &[f32]) -> f32 {
    dot::<C, Absolute>(a, b)
}
