//! Buffer and pointwise arithmetic

use crate::ops::{self, BinaryOp};

/// `dst = src`
pub fn copy(dst: &mut [f32], src: &[f32]) {
    let n = dst.len();
    dst.copy_from_slice(&src[..n]);
}

/// `dst = k`
pub fn fill(dst: &mut [f32], k: f32) {
    dst.fill(k);
}

macro_rules! op2_kernels {
    ($($name:ident => $op:ty, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            pub fn $name(dst: &mut [f32], src: &[f32]) {
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d = <$op>::apply(*d, s);
                }
            }
        )*
    };
}

macro_rules! op3_kernels {
    ($($name:ident => $op:ty, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            pub fn $name(dst: &mut [f32], a: &[f32], b: &[f32]) {
                for ((d, &x), &y) in dst.iter_mut().zip(a).zip(b) {
                    *d = <$op>::apply(x, y);
                }
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

/// Safe square root: negative inputs give 0
#[inline(always)]
pub(crate) fn ssqrt(x: f32) -> f32 {
    if x > 0.0 {
        libm::sqrtf(x)
    } else {
        0.0
    }
}

/// `dst = sqrt(max(dst, 0))`
pub fn ssqrt1(dst: &mut [f32]) {
    for d in dst.iter_mut() {
        *d = ssqrt(*d);
    }
}

/// `dst = sqrt(max(src, 0))`
pub fn ssqrt2(dst: &mut [f32], src: &[f32]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = ssqrt(s);
    }
}
