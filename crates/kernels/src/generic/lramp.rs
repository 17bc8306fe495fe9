//! Linear ramp family
//!
//! A ramp from `v1` towards `v2` over `n = dst.len()` samples takes the
//! value `v1 + i * (v2 - v1) / n` at sample `i`, so `v2` itself is never
//! reached. With `v1 == v2` each operation reduces to its constant form.

use crate::ops::{self, BinaryOp, Ramp};

/// `dst[i] = ramp(i)`
pub fn lramp_set1(dst: &mut [f32], v1: f32, v2: f32) {
    let Some(ramp) = Ramp::new(v1, v2, dst.len()) else {
        return;
    };
    for (i, d) in dst.iter_mut().enumerate() {
        *d = ramp.at(i);
    }
}

/// `dst[i] *= ramp(i)`
pub fn lramp1(dst: &mut [f32], v1: f32, v2: f32) {
    let Some(ramp) = Ramp::new(v1, v2, dst.len()) else {
        return;
    };
    for (i, d) in dst.iter_mut().enumerate() {
        *d *= ramp.at(i);
    }
}

/// `dst[i] = src[i] * ramp(i)`
pub fn lramp2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
    let Some(ramp) = Ramp::new(v1, v2, dst.len()) else {
        return;
    };
    for (i, (d, &s)) in dst.iter_mut().zip(src).enumerate() {
        *d = s * ramp.at(i);
    }
}

macro_rules! lramp_op2_kernels {
    ($($name:ident => $op:ty, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            pub fn $name(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
                let Some(ramp) = Ramp::new(v1, v2, dst.len()) else {
                    return;
                };
                for (i, (d, &s)) in dst.iter_mut().zip(src).enumerate() {
                    *d = <$op>::apply(*d, s * ramp.at(i));
                }
            }
        )*
    };
}

macro_rules! lramp_op3_kernels {
    ($($name:ident => $op:ty, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            pub fn $name(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32) {
                let Some(ramp) = Ramp::new(v1, v2, dst.len()) else {
                    return;
                };
                for (i, ((d, &x), &y)) in dst.iter_mut().zip(a).zip(b).enumerate() {
                    *d = <$op>::apply(x, y * ramp.at(i));
                }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_excludes_end_value() {
        let mut dst = [1.0f32; 5];
        lramp_set1(&mut dst, 0.0, 10.0);
        assert_eq!(dst, [0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_degenerate_ramp_is_constant_combine() {
        let src = [1.0f32, 2.0, 3.0];
        let mut dst = [10.0f32, 10.0, 10.0];
        lramp_add2(&mut dst, &src, 0.5, 0.5);
        assert_eq!(dst, [10.5, 11.0, 11.5]);

        let mut dst = [9.0f32; 3];
        lramp_set1(&mut dst, 0.25, 0.25);
        assert_eq!(dst, [0.25; 3]);
    }

    #[test]
    fn test_lramp3_leaves_inputs_untouched() {
        let a = [1.0f32, 1.0, 1.0, 1.0];
        let b = [4.0f32, 4.0, 4.0, 4.0];
        let mut dst = [0.0f32; 4];
        lramp_rsub3(&mut dst, &a, &b, 0.0, 1.0);
        assert_eq!(dst, [-1.0, 0.0, 1.0, 2.0]);
        assert_eq!(a, [1.0; 4]);
    }
}
