//! Per-tier kernel entry points
//!
//! Each tier module exposes one `unsafe fn` per operation it implements,
//! compiled with that tier's `#[target_feature]` set. The signatures match
//! the [`generic`](crate::generic) reference exactly so the dispatcher can
//! store either behind the same function pointer type.
//!
//! Not every tier implements every operation; an operation missing from a
//! tier simply resolves to the next tier down.

/// Generates `#[target_feature]` wrappers around kernels generic over a
/// cascade or a single vector type
///
/// ```ignore
/// entries! {
///     "avx,avx2,fma", Avx2Lanes;
///     fn add2(dst: &mut [f32], src: &[f32]);
/// }
/// ```
#[allow(unused_macros)]
macro_rules! entries {
    (
        $features:literal, $lanes:ty;
        $( fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)?; )*
    ) => {
        $(
            #[doc = concat!("[`", stringify!($name), "`](crate::generic::", stringify!($name), ") for this tier")]
            ///
            /// # Safety
            ///
            #[doc = concat!("The CPU must support `", $features, "`.")]
            #[target_feature(enable = $features)]
            pub unsafe fn $name($($arg: $ty),*) $(-> $ret)? {
                crate::simd::$name::<$lanes>($($arg),*)
            }
        )*
    };
}

/// The slice operations every SIMD tier implements
#[allow(unused_macros)]
macro_rules! slice_entries {
    ($features:literal, $lanes:ty) => {
        entries! {
            $features, $lanes;
            fn copy(dst: &mut [f32], src: &[f32]);
            fn fill(dst: &mut [f32], k: f32);

            fn add2(dst: &mut [f32], src: &[f32]);
            fn sub2(dst: &mut [f32], src: &[f32]);
            fn rsub2(dst: &mut [f32], src: &[f32]);
            fn mul2(dst: &mut [f32], src: &[f32]);
            fn div2(dst: &mut [f32], src: &[f32]);
            fn rdiv2(dst: &mut [f32], src: &[f32]);
            fn mod2(dst: &mut [f32], src: &[f32]);
            fn rmod2(dst: &mut [f32], src: &[f32]);
            fn add3(dst: &mut [f32], a: &[f32], b: &[f32]);
            fn sub3(dst: &mut [f32], a: &[f32], b: &[f32]);
            fn mul3(dst: &mut [f32], a: &[f32], b: &[f32]);
            fn div3(dst: &mut [f32], a: &[f32], b: &[f32]);
            fn ssqrt1(dst: &mut [f32]);
            fn ssqrt2(dst: &mut [f32], src: &[f32]);

            fn lramp_set1(dst: &mut [f32], v1: f32, v2: f32);
            fn lramp1(dst: &mut [f32], v1: f32, v2: f32);
            fn lramp2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32);
            fn lramp_add2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32);
            fn lramp_sub2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32);
            fn lramp_rsub2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32);
            fn lramp_mul2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32);
            fn lramp_div2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32);
            fn lramp_rdiv2(dst: &mut [f32], src: &[f32], v1: f32, v2: f32);
            fn lramp_add3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32);
            fn lramp_sub3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32);
            fn lramp_rsub3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32);
            fn lramp_mul3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32);
            fn lramp_div3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32);
            fn lramp_rdiv3(dst: &mut [f32], a: &[f32], b: &[f32], v1: f32, v2: f32);

            fn pcomplex_mul2(dst: &mut [f32], src: &[f32]);
            fn pcomplex_mul3(dst: &mut [f32], a: &[f32], b: &[f32]);

            fn h_dotp(a: &[f32], b: &[f32]) -> f32;
            fn h_sqr_dotp(a: &[f32], b: &[f32]) -> f32;
            fn h_abs_dotp(a: &[f32], b: &[f32]) -> f32;

            fn sidechain_rms(dst: &mut [f32], head: &mut [f32], tail: &[f32], rms: f32, k: f32) -> f32;
            fn compressor_x2_gain(dst: &mut [f32], src: &[f32], c: &crate::types::CompressorX2);
            fn compressor_x2_curve(dst: &mut [f32], src: &[f32], c: &crate::types::CompressorX2);
            fn dexpander_x1_gain(dst: &mut [f32], src: &[f32], c: &crate::types::ExpanderKnee);
            fn dexpander_x1_curve(dst: &mut [f32], src: &[f32], c: &crate::types::ExpanderKnee);
            fn uexpander_x1_gain(dst: &mut [f32], src: &[f32], c: &crate::types::ExpanderKnee);
            fn uexpander_x1_curve(dst: &mut [f32], src: &[f32], c: &crate::types::ExpanderKnee);
        }
    };
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse2;

#[cfg(all(feature = "avx2", any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx2;

#[cfg(all(feature = "avx512", any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx512;

#[cfg(all(feature = "neon", target_arch = "aarch64"))]
pub mod neon;
