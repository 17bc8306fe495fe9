//! SSE2 backend implementation (x86/x86-64)
//!
//! 4-lane (128-bit) operations. SSE2 has no rounding instruction and no
//! blend, so `trunc`, `floor` and `select` are built from conversions and
//! bit masks.
//!
//! This is also the narrowest vector step of the AVX2 and AVX-512 tiers.

#![cfg(any(target_arch = "x86", target_arch = "x86_64"))]

use crate::traits::{SimdInt, SimdMask, SimdVector};

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;

/// Magnitude above which every f32 is already an integer (2^23)
const INTEGRAL_LIMIT: f32 = 8_388_608.0;

/// SSE vector wrapper (4 lanes of f32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct SseVector(__m128);

/// SSE mask wrapper (all-ones / all-zeros lanes)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct SseMask(__m128);

/// SSE integer vector wrapper (4 lanes of u32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct SseInt(__m128i);

impl SimdInt for SseInt {
    type FloatVec = SseVector;

    #[inline(always)]
    fn splat(value: u32) -> Self {
        unsafe { SseInt(_mm_set1_epi32(value as i32)) }
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        unsafe { SseInt(_mm_srl_epi32(self.0, _mm_cvtsi32_si128(count as i32))) }
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        unsafe { SseInt(_mm_sll_epi32(self.0, _mm_cvtsi32_si128(count as i32))) }
    }

    #[inline(always)]
    fn bitwise_and(self, rhs: u32) -> Self {
        unsafe { SseInt(_mm_and_si128(self.0, _mm_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn bitwise_or(self, rhs: u32) -> Self {
        unsafe { SseInt(_mm_or_si128(self.0, _mm_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn add_scalar(self, rhs: u32) -> Self {
        unsafe { SseInt(_mm_add_epi32(self.0, _mm_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn sub_scalar(self, rhs: u32) -> Self {
        unsafe { SseInt(_mm_sub_epi32(self.0, _mm_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn to_f32(self) -> Self::FloatVec {
        unsafe { SseVector(_mm_cvtepi32_ps(self.0)) }
    }

    #[inline(always)]
    fn from_f32_trunc(float_vec: Self::FloatVec) -> Self {
        unsafe { SseInt(_mm_cvttps_epi32(float_vec.0)) }
    }
}

impl SimdVector for SseVector {
    type Mask = SseMask;
    type IntBits = SseInt;

    const LANES: usize = 4;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { SseVector(_mm_set1_ps(value)) }
    }

    #[inline(always)]
    fn iota() -> Self {
        unsafe { SseVector(_mm_setr_ps(0.0, 1.0, 2.0, 3.0)) }
    }

    #[inline(always)]
    fn from_slice(slice: &[f32]) -> Self {
        assert!(slice.len() >= Self::LANES, "Slice too short for SSE load");
        unsafe { SseVector(_mm_loadu_ps(slice.as_ptr())) }
    }

    #[inline(always)]
    fn to_slice(self, slice: &mut [f32]) {
        assert!(slice.len() >= Self::LANES, "Slice too short for SSE store");
        unsafe { _mm_storeu_ps(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_sub_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_mul_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_div_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { SseVector(_mm_xor_ps(self.0, _mm_set1_ps(-0.0))) }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { SseVector(_mm_andnot_ps(_mm_set1_ps(-0.0), self.0)) }
    }

    #[inline(always)]
    fn fma(self, b: Self, c: Self) -> Self {
        // No FMA guarantee at this tier
        self.mul(b).add(c)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { SseVector(_mm_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_min_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_max_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmplt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn gt(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmpgt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn le(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmple_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn ge(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmpge_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn select(mask: Self::Mask, true_val: Self, false_val: Self) -> Self {
        unsafe {
            SseVector(_mm_or_ps(
                _mm_and_ps(mask.0, true_val.0),
                _mm_andnot_ps(mask.0, false_val.0),
            ))
        }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe {
            // [a0+a2, a1+a3, ..] then fold the odd lane
            let high = _mm_movehl_ps(self.0, self.0);
            let sum2 = _mm_add_ps(self.0, high);
            let odd = _mm_shuffle_ps::<0x55>(sum2, sum2);
            _mm_cvtss_f32(_mm_add_ss(sum2, odd))
        }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        let t = self.trunc();
        let one = Self::splat(1.0);
        // trunc rounds negative non-integers up
        Self::select(t.gt(self), t.sub(one), t)
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        unsafe {
            let sign = _mm_set1_ps(-0.0);
            let magnitude = _mm_andnot_ps(sign, self.0);
            let converted = _mm_cvtepi32_ps(_mm_cvttps_epi32(self.0));
            // Keep the sign of zero results such as trunc(-0.5)
            let converted = _mm_or_ps(converted, _mm_and_ps(self.0, sign));
            // Already integral (or NaN/inf): cvtt would saturate
            let passthrough = _mm_cmpnlt_ps(magnitude, _mm_set1_ps(INTEGRAL_LIMIT));
            SseVector(_mm_or_ps(
                _mm_and_ps(passthrough, self.0),
                _mm_andnot_ps(passthrough, converted),
            ))
        }
    }

    #[inline(always)]
    fn swap_pairs(self) -> Self {
        unsafe { SseVector(_mm_shuffle_ps::<0xB1>(self.0, self.0)) }
    }

    #[inline(always)]
    fn dup_even(self) -> Self {
        unsafe { SseVector(_mm_shuffle_ps::<0xA0>(self.0, self.0)) }
    }

    #[inline(always)]
    fn dup_odd(self) -> Self {
        unsafe { SseVector(_mm_shuffle_ps::<0xF5>(self.0, self.0)) }
    }

    #[inline(always)]
    fn neg_even(self) -> Self {
        unsafe { SseVector(_mm_xor_ps(self.0, _mm_setr_ps(-0.0, 0.0, -0.0, 0.0))) }
    }

    #[inline(always)]
    fn to_bits(self) -> Self::IntBits {
        unsafe { SseInt(_mm_castps_si128(self.0)) }
    }

    #[inline(always)]
    fn from_bits(bits: Self::IntBits) -> Self {
        unsafe { SseVector(_mm_castsi128_ps(bits.0)) }
    }
}

impl SimdMask for SseMask {
    #[inline(always)]
    fn all(self) -> bool {
        unsafe { _mm_movemask_ps(self.0) == 0xf }
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { _mm_movemask_ps(self.0) != 0 }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { SseMask(_mm_and_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { SseMask(_mm_or_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        unsafe {
            let ones = _mm_castsi128_ps(_mm_set1_epi32(-1));
            SseMask(_mm_xor_ps(self.0, ones))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(v: SseVector) -> [f32; 4] {
        let mut out = [0.0; 4];
        v.to_slice(&mut out);
        out
    }

    #[test]
    fn test_sse_arithmetic() {
        let a = SseVector::splat(2.0);
        let b = SseVector::splat(3.0);
        assert_eq!(a.add(b).horizontal_sum(), 20.0);
        assert_eq!(a.sub(b).horizontal_sum(), -4.0);
        assert_eq!(a.mul(b).horizontal_sum(), 24.0);
        assert_eq!(SseVector::iota().horizontal_sum(), 6.0);
    }

    #[test]
    fn test_sse_rounding() {
        let v = SseVector::from_slice(&[2.7, -2.7, -0.5, 1.0e9]);
        assert_eq!(lanes(v.trunc()), [2.0, -2.0, 0.0, 1.0e9]);
        assert!(lanes(v.trunc())[2].is_sign_negative());
        assert_eq!(lanes(v.floor()), [2.0, -3.0, -1.0, 1.0e9]);
    }

    #[test]
    fn test_sse_pair_shuffles() {
        let v = SseVector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(lanes(v.swap_pairs()), [2.0, 1.0, 4.0, 3.0]);
        assert_eq!(lanes(v.dup_even()), [1.0, 1.0, 3.0, 3.0]);
        assert_eq!(lanes(v.dup_odd()), [2.0, 2.0, 4.0, 4.0]);
        assert_eq!(lanes(v.neg_even()), [-1.0, 2.0, -3.0, 4.0]);
    }

    #[test]
    fn test_sse_select() {
        let a = SseVector::from_slice(&[1.0, 5.0, 3.0, 7.0]);
        let b = SseVector::splat(4.0);
        let picked = SseVector::select(a.lt(b), a, b);
        assert_eq!(lanes(picked), [1.0, 4.0, 3.0, 4.0]);
        assert!(a.le(a).all());
        assert!(!a.gt(a).any());
    }
}
