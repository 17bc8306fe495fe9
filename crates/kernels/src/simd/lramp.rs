//! Linear ramp family
//!
//! Ramp values are rebuilt per vector from the lane index, never
//! accumulated, so every tier produces exactly `start + step * i`.

use core::marker::PhantomData;

use crate::block::{BlockKernel, Cascade};
use crate::ops::{self, BinaryOp, Ramp};
use crate::traits::SimdVector;

struct Set<'a> {
    dst: &'a mut [f32],
    ramp: Ramp,
}

impl BlockKernel for Set<'_> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        self.ramp.at_v::<V>(i).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        self.dst[i] = self.ramp.at(i);
    }
}

/// `dst = src * ramp`, or `dst *= ramp` when there is no source
struct Scale<'a> {
    dst: &'a mut [f32],
    src: Option<&'a [f32]>,
    ramp: Ramp,
}

impl BlockKernel for Scale<'_> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let x = match self.src {
            Some(src) => V::from_slice(&src[i..]),
            None => V::from_slice(&self.dst[i..]),
        };
        x.mul(self.ramp.at_v::<V>(i)).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        let x = match self.src {
            Some(src) => src[i],
            None => self.dst[i],
        };
        self.dst[i] = x * self.ramp.at(i);
    }
}

/// `dst = OP(a, b * ramp)` where `a` defaults to `dst`
struct Combine<'a, O> {
    dst: &'a mut [f32],
    a: Option<&'a [f32]>,
    b: &'a [f32],
    ramp: Ramp,
    op: PhantomData<O>,
}

impl<O: BinaryOp> BlockKernel for Combine<'_, O> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let a = match self.a {
            Some(a) => V::from_slice(&a[i..]),
            None => V::from_slice(&self.dst[i..]),
        };
        let scaled = V::from_slice(&self.b[i..]).mul(self.ramp.at_v::<V>(i));
        O::apply_v(a, scaled).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        let a = match self.a {
            Some(a) => a[i],
            None => self.dst[i],
        };
        self.dst[i] = O::apply(a, self.b[i] * self.ramp.at(i));
    }
}

/// `dst[i] = ramp(i)`
#[inline(always)]
pub fn lramp_set1<C: Cascade>(dst: &mut [f32], v1: f32, v2: f32) {
    if let Some(ramp) = Ramp::new(v1, v2, dst.len()) {
        C::run(&mut Set { dst, ramp })
    }
}

/// `dst[i] *= ramp(i)`
#[inline(always)]
pub fn lramp1<C: Cascade>(dst: &mut [f32], v1: f32, v2: f32) {
    if let Some(ramp) = Ramp::new(v1, v2, dst.len()) {
        C::run(&mut Scale {
            dst,
            src: None,
            ramp,
        })
    }
}

/// `dst[i] = src[i] * ramp(i)`
#[inline(always)]
pub fn lramp2<C: Cascade>(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
    if let Some(ramp) = Ramp::new(v1, v2, dst.len()) {
        C::run(&mut Scale {
            dst,
            src: Some(src),
            ramp,
        })
    }
}

#[inline(always)]
fn combine<C: Cascade, O: BinaryOp>(
    dst: &mut [f32],
    a: Option<&[f32]>,
    b: &[f32],
    v1: f32,
    v2: f32,
) {
    if let Some(ramp) = Ramp::new(v1, v2, dst.len()) {
        C::run(&mut Combine::<O> {
            dst,
            a,
            b,
            ramp,
            op: PhantomData,
        })
    }
}

macro_rules! lramp_op2_kernels {
    ($($name:ident => $op:ty, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            #[inline(always)]
            pub fn $name<C: Cascade>(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
                combine::<C, $op>(dst, None, src, v1, v2)
            }
        )*
    };
}

macro_rules! lramp_op3_kernels {
    ($($name:ident => $op:ty, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            #[inline(always)]
            pub fn $name<C: Cascade>(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32) {
                combine::<C, $op>(dst, Some(a), b, v1, v2)
            }
        )*
    };
}

lramp_op2_kernels! {
    lramp_add2 => ops::Add, "`dst[i] = dst[i] + src[i] * ramp(i)`";
    lramp_sub2 => ops::Sub, "`dst[i] = dst[i] - src[i] * ramp(i)`";
    lramp_rsub2 => ops::RSub, "`dst[i] = src[i] * ramp(i) - dst[i]`";
    lramp_mul2 => ops::Mul, "`dst[i] = dst[i] * src[i] * ramp(i)`";
    lramp_div2 => ops::Div, "`dst[i] = dst[i] / (src[i] * ramp(i))`";
    lramp_rdiv2 => ops::RDiv, "`dst[i] = src[i] * ramp(i) / dst[i]`";
}

lramp_op3_kernels! {
    lramp_add3 => ops::Add, "`dst[i] = a[i] + b[i] * ramp(i)`";
    lramp_sub3 => ops::Sub, "`dst[i] = a[i] - b[i] * ramp(i)`";
    lramp_rsub3 => ops::RSub, "`dst[i] = b[i] * ramp(i) - a[i]`";
    lramp_mul3 => ops::Mul, "`dst[i] = a[i] * b[i] * ramp(i)`";
    lramp_div3 => ops::Div, "`dst[i] = a[i] / (b[i] * ramp(i))`";
    lramp_rdiv3 => ops::RDiv, "`dst[i] = b[i] * ramp(i) / a[i]`";
}
