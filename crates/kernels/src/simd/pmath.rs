//! Buffer and pointwise arithmetic

use core::marker::PhantomData;

use crate::block::{BlockKernel, Cascade};
use crate::ops::{self, BinaryOp};
use crate::generic;
use crate::traits::SimdVector;

struct CopyKernel<'a> {
    dst: &'a mut [f32],
    src: &'a [f32],
}

impl BlockKernel for CopyKernel<'_> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        V::from_slice(&self.src[i..]).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        self.dst[i] = self.src[i];
    }
}

struct Fill<'a> {
    dst: &'a mut [f32],
    k: f32,
}

impl BlockKernel for Fill<'_> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        V::splat(self.k).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        self.dst[i] = self.k;
    }
}

struct Op2<'a, O> {
    dst: &'a mut [f32],
    src: &'a [f32],
    op: PhantomData<O>,
}

impl<O: BinaryOp> BlockKernel for Op2<'_, O> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let d = V::from_slice(&self.dst[i..]);
        let s = V::from_slice(&self.src[i..]);
        O::apply_v(d, s).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        self.dst[i] = O::apply(self.dst[i], self.src[i]);
    }
}

struct Op3<'a, O> {
    dst: &'a mut [f32],
    a: &'a [f32],
    b: &'a [f32],
    op: PhantomData<O>,
}

impl<O: BinaryOp> BlockKernel for Op3<'_, O> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let a = V::from_slice(&self.a[i..]);
        let b = V::from_slice(&self.b[i..]);
        O::apply_v(a, b).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        self.dst[i] = O::apply(self.a[i], self.b[i]);
    }
}

/// `sqrt(max(x, 0))`, NaN maps to 0 like the scalar form
#[inline(always)]
pub(crate) fn ssqrt_v<V: SimdVector>(x: V) -> V {
    let zero = V::splat(0.0);
    V::select(x.gt(zero), x, zero).sqrt()
}

struct Ssqrt<'a> {
    dst: &'a mut [f32],
    src: Option<&'a [f32]>,
}

impl BlockKernel for Ssqrt<'_> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let x = match self.src {
            Some(src) => V::from_slice(&src[i..]),
            None => V::from_slice(&self.dst[i..]),
        };
        ssqrt_v(x).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        let x = match self.src {
            Some(src) => src[i],
            None => self.dst[i],
        };
        self.dst[i] = generic::ssqrt(x);
    }
}

/// `dst = src`
#[inline(always)]
pub fn copy<C: Cascade>(dst: &mut [f32], src: &[f32]) {
    C::run(&mut CopyKernel { dst, src })
}

/// `dst = k`
#[inline(always)]
pub fn fill<C: Cascade>(dst: &mut [f32], k: f32) {
    C::run(&mut Fill { dst, k })
}

#[inline(always)]
pub(crate) fn op2<C: Cascade, O: BinaryOp>(dst: &mut [f32], src: &[f32]) {
    C::run(&mut Op2::<O> {
        dst,
        src,
        op: PhantomData,
    })
}

#[inline(always)]
pub(crate) fn op3<C: Cascade, O: BinaryOp>(dst: &mut [f32], a: &[f32], b: &[f32]) {
    C::run(&mut Op3::<O> {
        dst,
        a,
        b,
        op: PhantomData,
    })
}

macro_rules! op2_kernels {
    ($($name:ident => $op:ty, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            #[inline(always)]
            pub fn $name<C: Cascade>(dst: &mut [f32], src: &[f32]) {
                op2::<C, $op>(dst, src)
            }
        )*
    };
}

macro_rules! op3_kernels {
    ($($name:ident => $op:ty, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            #[inline(always)]
            pub fn $name<C: Cascade>(dst: &mut [f32], a: &[f32], b: &[f32]) {
                op3::<C, $op>(dst, a, b)
            }
        )*
    };
}

op2_kernels! {
    add2 => ops::Add, "`dst = dst + src`";
    sub2 => ops::Sub, "`dst = dst - src`";
    rsub2 => ops::RSub, "`dst = src - dst`";
    mul2 => ops::Mul, "`dst = dst * src`";
    div2 => ops::Div, "`dst = dst / src`";
    rdiv2 => ops::RDiv, "`dst = src / dst`";
    mod2 => ops::Mod, "`dst = dst - src * trunc(dst / src)`";
    rmod2 => ops::RMod, "`dst = src - dst * trunc(src / dst)`";
}

op3_kernels! {
    add3 => ops::Add, "`dst = a + b`";
    sub3 => ops::Sub, "`dst = a - b`";
    mul3 => ops::Mul, "`dst = a * b`";
    div3 => ops::Div, "`dst = a / b`";
}

/// `dst = sqrt(max(dst, 0))`
#[inline(always)]
pub fn ssqrt1<C: Cascade>(dst: &mut [f32]) {
    C::run(&mut Ssqrt { dst, src: None })
}

/// `dst = sqrt(max(src, 0))`
#[inline(always)]
pub fn ssqrt2<C: Cascade>(dst: &mut [f32], src: &[f32]) {
    C::run(&mut Ssqrt {
        dst,
        src: Some(src),
    })
}
