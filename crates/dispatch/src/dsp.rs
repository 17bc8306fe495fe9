//! Public operation surface
//!
//! Every operation is available as a [`Dispatcher`] method and as a free
//! function on the process-wide [`dispatcher()`]. The element count is
//! always `dst.len()` (or `a.len()` for reductions); every other buffer
//! must have the same length.
//!
//! Length checks are assertions: a mismatch is a caller bug and panics
//! before any kernel runs.

use vecdsp_kernels::{CompressorEnv, CompressorX2, ExpanderKnee, Matrix3d, Vector3d};

use crate::dispatcher::{dispatcher, Dispatcher};

macro_rules! same_len {
    ($op:ident, $dst:ident, $($other:ident),+) => {
        $(
            assert_eq!(
                $dst.len(),
                $other.len(),
                concat!(stringify!($op), ": `", stringify!($other), "` length differs from `", stringify!($dst), "`")
            );
        )+
    };
}

/// Generates a [`Dispatcher`] method and a free function on the shared
/// dispatcher for each operation; the block runs before the kernel
macro_rules! operations {
    ($(
        $(#[doc = $doc:literal])*
        fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)? { $($check:tt)* }
    )*) => {
        impl Dispatcher {
            $(
                $(#[doc = $doc])*
                #[inline]
                pub fn $name(&self, $($arg: $ty),*) $(-> $ret)? {
                    $($check)*
                    // SAFETY: the table only holds entries the resolved capabilities support
                    unsafe { (self.table.$name.entry)($($arg),*) }
                }
            )*
        }

        $(
            $(#[doc = $doc])*
            #[inline]
            pub fn $name($($arg: $ty),*) $(-> $ret)? {
                dispatcher().$name($($arg),*)
            }
        )*
    };
}

operations! {
    /// `dst = src`
    ///
    /// # Panics
    ///
    /// If `src.len() != dst.len()`.
    fn copy(dst: &mut [f32], src: &[f32]) { same_len!(copy, dst, src); }

    /// `dst = k`
    fn fill(dst: &mut [f32], k: f32) {}

    /// `dst = dst + src`, panics if the lengths differ
    fn add2(dst: &mut [f32], src: &[f32]) { same_len!(add2, dst, src); }
    /// `dst = dst - src`, panics if the lengths differ
    fn sub2(dst: &mut [f32], src: &[f32]) { same_len!(sub2, dst, src); }
    /// `dst = src - dst`, panics if the lengths differ
    fn rsub2(dst: &mut [f32], src: &[f32]) { same_len!(rsub2, dst, src); }
    /// `dst = dst * src`, panics if the lengths differ
    fn mul2(dst: &mut [f32], src: &[f32]) { same_len!(mul2, dst, src); }
    /// `dst = dst / src`, panics if the lengths differ
    fn div2(dst: &mut [f32], src: &[f32]) { same_len!(div2, dst, src); }
    /// `dst = src / dst`, panics if the lengths differ
    fn rdiv2(dst: &mut [f32], src: &[f32]) { same_len!(rdiv2, dst, src); }
    /// `dst = dst - src * trunc(dst / src)`, panics if the lengths differ
    fn mod2(dst: &mut [f32], src: &[f32]) { same_len!(mod2, dst, src); }
    /// `dst = src - dst * trunc(src / dst)`, panics if the lengths differ
    fn rmod2(dst: &mut [f32], src: &[f32]) { same_len!(rmod2, dst, src); }

    /// `dst = a + b`, panics if `a` or `b` differs in length from `dst`
    fn add3(dst: &mut [f32], a: &[f32], b: &[f32]) { same_len!(add3, dst, a, b); }
    /// `dst = a - b`, panics if `a` or `b` differs in length from `dst`
    fn sub3(dst: &mut [f32], a: &[f32], b: &[f32]) { same_len!(sub3, dst, a, b); }
    /// `dst = a * b`, panics if `a` or `b` differs in length from `dst`
    fn mul3(dst: &mut [f32], a: &[f32], b: &[f32]) { same_len!(mul3, dst, a, b); }
    /// `dst = a / b`, panics if `a` or `b` differs in length from `dst`
    fn div3(dst: &mut [f32], a: &[f32], b: &[f32]) { same_len!(div3, dst, a, b); }

    /// `dst = sqrt(max(dst, 0))`, NaN gives 0
    fn ssqrt1(dst: &mut [f32]) {}
    /// `dst = sqrt(max(src, 0))`, NaN gives 0; panics if the lengths differ
    fn ssqrt2(dst: &mut [f32], src: &[f32]) { same_len!(ssqrt2, dst, src); }

    /// `dst[i] = v1 + i * (v2 - v1) / dst.len()`
    ///
    /// With `v1 == v2` this is [`Dispatcher::fill`].
    fn lramp_set1(dst: &mut [f32], v1: f32, v2: f32) {}
    /// `dst *= ramp`
    fn lramp1(dst: &mut [f32], v1: f32, v2: f32) {}

    /// `dst = src * ramp`, panics if the lengths differ
    fn lramp2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) { same_len!(lramp2, dst, src); }
    /// `dst = dst + src * ramp`, panics if the lengths differ
    fn lramp_add2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_add2, dst, src);
    }
    /// `dst = dst - src * ramp`, panics if the lengths differ
    fn lramp_sub2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_sub2, dst, src);
    }
    /// `dst = src * ramp - dst`, panics if the lengths differ
    fn lramp_rsub2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_rsub2, dst, src);
    }
    /// `dst = dst * src * ramp`, panics if the lengths differ
    fn lramp_mul2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_mul2, dst, src);
    }
    /// `dst = dst / (src * ramp)`, panics if the lengths differ
    fn lramp_div2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_div2, dst, src);
    }
    /// `dst = src * ramp / dst`, panics if the lengths differ
    fn lramp_rdiv2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_rdiv2, dst, src);
    }

    /// `dst = a + b * ramp`, panics if `a` or `b` differs in length from `dst`
    fn lramp_add3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_add3, dst, a, b);
    }
    /// `dst = a - b * ramp`, panics if `a` or `b` differs in length from `dst`
    fn lramp_sub3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_sub3, dst, a, b);
    }
    /// `dst = b * ramp - a`, panics if `a` or `b` differs in length from `dst`
    fn lramp_rsub3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_rsub3, dst, a, b);
    }
    /// `dst = a * b * ramp`, panics if `a` or `b` differs in length from `dst`
    fn lramp_mul3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_mul3, dst, a, b);
    }
    /// `dst = a / (b * ramp)`, panics if `a` or `b` differs in length from `dst`
    fn lramp_div3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_div3, dst, a, b);
    }
    /// `dst = b * ramp / a`, panics if `a` or `b` differs in length from `dst`
    fn lramp_rdiv3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32) {
        same_len!(lramp_rdiv3, dst, a, b);
    }

    /// Complex `dst = dst * src` on interleaved `(re, im)` pairs
    ///
    /// # Panics
    ///
    /// If the lengths differ or are odd.
    fn pcomplex_mul2(dst: &mut [f32], src: &[f32]) {
        same_len!(pcomplex_mul2, dst, src);
        assert!(dst.len() % 2 == 0, "pcomplex_mul2: odd buffer length {}", dst.len());
    }

    /// Complex `dst = a * b` on interleaved `(re, im)` pairs
    ///
    /// # Panics
    ///
    /// If the lengths differ or are odd.
    fn pcomplex_mul3(dst: &mut [f32], a: &[f32], b: &[f32]) {
        same_len!(pcomplex_mul3, dst, a, b);
        assert!(dst.len() % 2 == 0, "pcomplex_mul3: odd buffer length {}", dst.len());
    }

    /// `sum(a[i] * b[i])`, panics if `a.len() != b.len()`
    fn h_dotp(a: &[f32], b: &[f32]) -> f32 { same_len!(h_dotp, a, b); }
    /// `sum(a[i]^2 * b[i]^2)`, panics if `a.len() != b.len()`
    fn h_sqr_dotp(a: &[f32], b: &[f32]) -> f32 { same_len!(h_sqr_dotp, a, b); }
    /// `sum(|a[i]| * |b[i]|)`, panics if `a.len() != b.len()`
    fn h_abs_dotp(a: &[f32], b: &[f32]) -> f32 { same_len!(h_abs_dotp, a, b); }

    /// Envelope follower
    ///
    /// Per sample, with `k = release` when the envelope is above
    /// `rel_thresh` and the input does not exceed it, `k = attack`
    /// otherwise: `env += k * (src[i] - env)`, `dst[i] = env`. The final
    /// envelope is stored back in `state`.
    ///
    /// # Panics
    ///
    /// If `src.len() != dst.len()`.
    fn compressor_env(dst: &mut [f32], src: &[f32], state: &mut CompressorEnv) {
        same_len!(compressor_env, dst, src);
    }

    /// Sliding-window RMS detector
    ///
    /// On entry `dst` holds the samples entering the window; they are
    /// copied to `head`. `tail` holds the samples leaving it. Per sample
    /// `rms += s^2 - t^2` and `dst = sqrt(max(rms * k, 0))`. Returns the
    /// updated `rms`.
    ///
    /// # Panics
    ///
    /// If `head` or `tail` differs in length from `dst`.
    fn sidechain_rms(dst: &mut [f32], head: &mut [f32], tail: &[f32], rms: f32, k: f32) -> f32 {
        same_len!(sidechain_rms, dst, head, tail);
    }

    /// Two-knee compressor gain for `|src|`, panics if the lengths differ
    fn compressor_x2_gain(dst: &mut [f32], src: &[f32], c: &CompressorX2) {
        same_len!(compressor_x2_gain, dst, src);
    }
    /// Two-knee compressor transfer curve, `gain(|src|) * |src|`
    fn compressor_x2_curve(dst: &mut [f32], src: &[f32], c: &CompressorX2) {
        same_len!(compressor_x2_curve, dst, src);
    }
    /// Downward expander gain for `|src|`, panics if the lengths differ
    fn dexpander_x1_gain(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
        same_len!(dexpander_x1_gain, dst, src);
    }
    /// Downward expander transfer curve, `gain(|src|) * |src|`
    fn dexpander_x1_curve(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
        same_len!(dexpander_x1_curve, dst, src);
    }
    /// Upward expander gain for `|src|`, panics if the lengths differ
    fn uexpander_x1_gain(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
        same_len!(uexpander_x1_gain, dst, src);
    }
    /// Upward expander transfer curve, `gain(|src|) * |src|`
    fn uexpander_x1_curve(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
        same_len!(uexpander_x1_curve, dst, src);
    }

    /// Cosine of the angle between two vectors, in `[-1, 1]`; 0 when either
    /// has zero length
    fn calc_angle3d_v2(v1: &Vector3d, v2: &Vector3d) -> f32 {}
    /// [`Dispatcher::calc_angle3d_v2`] for a stored pair
    fn calc_angle3d_vv(v: &[Vector3d; 2]) -> f32 {}
    /// `r = m * v`
    fn apply_matrix3d_mv2(r: &mut Vector3d, v: &Vector3d, m: &Matrix3d) {}
    /// `v = m * v`
    fn apply_matrix3d_mv1(v: &mut Vector3d, m: &Matrix3d) {}
}
