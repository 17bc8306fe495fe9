//! AVX-512 backend implementation (x86-64)
//!
//! 16-lane (512-bit) operations. Only AVX-512F instructions are used, so the
//! tier requires nothing beyond the foundation subset on top of AVX2/FMA.

#![cfg(all(feature = "avx512", any(target_arch = "x86", target_arch = "x86_64")))]

use crate::traits::{SimdInt, SimdMask, SimdVector};

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;

/// AVX-512 vector wrapper (16 lanes of f32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx512Vector(__m512);

/// AVX-512 mask wrapper (one bit per lane)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx512Mask(__mmask16);

/// AVX-512 integer vector wrapper (16 lanes of u32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx512Int(__m512i);

impl SimdInt for Avx512Int {
    type FloatVec = Avx512Vector;

    #[inline(always)]
    fn splat(value: u32) -> Self {
        unsafe { Avx512Int(_mm512_set1_epi32(value as i32)) }
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        unsafe {
            let shift_count = _mm_cvtsi32_si128(count as i32);
            Avx512Int(_mm512_srl_epi32(self.0, shift_count))
        }
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        unsafe {
            let shift_count = _mm_cvtsi32_si128(count as i32);
            Avx512Int(_mm512_sll_epi32(self.0, shift_count))
        }
    }

    #[inline(always)]
    fn bitwise_and(self, rhs: u32) -> Self {
        unsafe { Avx512Int(_mm512_and_si512(self.0, _mm512_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn bitwise_or(self, rhs: u32) -> Self {
        unsafe { Avx512Int(_mm512_or_si512(self.0, _mm512_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn add_scalar(self, rhs: u32) -> Self {
        unsafe { Avx512Int(_mm512_add_epi32(self.0, _mm512_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn sub_scalar(self, rhs: u32) -> Self {
        unsafe { Avx512Int(_mm512_sub_epi32(self.0, _mm512_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn to_f32(self) -> Self::FloatVec {
        unsafe { Avx512Vector(_mm512_cvtepi32_ps(self.0)) }
    }

    #[inline(always)]
    fn from_f32_trunc(float_vec: Self::FloatVec) -> Self {
        unsafe { Avx512Int(_mm512_cvttps_epi32(float_vec.0)) }
    }
}

impl Avx512Vector {
    // Float xor is AVX512DQ; go through the integer domain instead
    #[inline(always)]
    fn xor_bits(self, bits: __m512i) -> Self {
        unsafe { Avx512Vector(_mm512_castsi512_ps(_mm512_xor_si512(_mm512_castps_si512(self.0), bits))) }
    }
}

impl SimdVector for Avx512Vector {
    type Mask = Avx512Mask;
    type IntBits = Avx512Int;

    const LANES: usize = 16;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { Avx512Vector(_mm512_set1_ps(value)) }
    }

    #[inline(always)]
    fn iota() -> Self {
        unsafe {
            Avx512Vector(_mm512_setr_ps(
                0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0,
                15.0,
            ))
        }
    }

    #[inline(always)]
    fn from_slice(slice: &[f32]) -> Self {
        assert!(slice.len() >= Self::LANES, "Slice too short for AVX-512 load");
        unsafe { Avx512Vector(_mm512_loadu_ps(slice.as_ptr())) }
    }

    #[inline(always)]
    fn to_slice(self, slice: &mut [f32]) {
        assert!(slice.len() >= Self::LANES, "Slice too short for AVX-512 store");
        unsafe { _mm512_storeu_ps(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Avx512Vector(_mm512_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Avx512Vector(_mm512_sub_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Avx512Vector(_mm512_mul_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Avx512Vector(_mm512_div_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { self.xor_bits(_mm512_set1_epi32(i32::MIN)) }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { Avx512Vector(_mm512_abs_ps(self.0)) }
    }

    #[inline(always)]
    fn fma(self, b: Self, c: Self) -> Self {
        unsafe { Avx512Vector(_mm512_fmadd_ps(self.0, b.0, c.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Avx512Vector(_mm512_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Avx512Vector(_mm512_min_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        unsafe { Avx512Vector(_mm512_max_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> Self::Mask {
        unsafe { Avx512Mask(_mm512_cmp_ps_mask::<_CMP_LT_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn gt(self, rhs: Self) -> Self::Mask {
        unsafe { Avx512Mask(_mm512_cmp_ps_mask::<_CMP_GT_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn le(self, rhs: Self) -> Self::Mask {
        unsafe { Avx512Mask(_mm512_cmp_ps_mask::<_CMP_LE_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn ge(self, rhs: Self) -> Self::Mask {
        unsafe { Avx512Mask(_mm512_cmp_ps_mask::<_CMP_GE_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn select(mask: Self::Mask, true_val: Self, false_val: Self) -> Self {
        unsafe { Avx512Vector(_mm512_mask_blend_ps(mask.0, false_val.0, true_val.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe { _mm512_reduce_add_ps(self.0) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        // 0x09 = round down, suppress exceptions
        unsafe { Avx512Vector(_mm512_roundscale_ps::<0x09>(self.0)) }
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        // 0x0B = round toward zero, suppress exceptions
        unsafe { Avx512Vector(_mm512_roundscale_ps::<0x0B>(self.0)) }
    }

    #[inline(always)]
    fn swap_pairs(self) -> Self {
        unsafe { Avx512Vector(_mm512_permute_ps::<0xB1>(self.0)) }
    }

    #[inline(always)]
    fn dup_even(self) -> Self {
        unsafe { Avx512Vector(_mm512_moveldup_ps(self.0)) }
    }

    #[inline(always)]
    fn dup_odd(self) -> Self {
        unsafe { Avx512Vector(_mm512_movehdup_ps(self.0)) }
    }

    #[inline(always)]
    fn neg_even(self) -> Self {
        // Sign bit in the low dword of every 64-bit pair
        unsafe { self.xor_bits(_mm512_set1_epi64(0x8000_0000)) }
    }

    #[inline(always)]
    fn to_bits(self) -> Self::IntBits {
        unsafe { Avx512Int(_mm512_castps_si512(self.0)) }
    }

    #[inline(always)]
    fn from_bits(bits: Self::IntBits) -> Self {
        unsafe { Avx512Vector(_mm512_castsi512_ps(bits.0)) }
    }
}

impl SimdMask for Avx512Mask {
    #[inline(always)]
    fn all(self) -> bool {
        self.0 == 0xffff
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.0 != 0
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Avx512Mask(self.0 & rhs.0)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Avx512Mask(self.0 | rhs.0)
    }

    #[inline(always)]
    fn not(self) -> Self {
        Avx512Mask(!self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_avx512() -> bool {
        std::is_x86_feature_detected!("avx512f")
            && std::is_x86_feature_detected!("avx2")
            && std::is_x86_feature_detected!("fma")
    }

    #[test]
    fn test_avx512_arithmetic() {
        #[target_feature(enable = "avx512f,avx2,fma,avx")]
        unsafe fn inner() {
            let a = Avx512Vector::splat(2.0);
            let b = Avx512Vector::splat(3.0);
            assert_eq!(a.add(b).horizontal_sum(), 80.0);
            assert_eq!(a.sub(b).horizontal_sum(), -16.0);
            assert_eq!(a.fma(b, Avx512Vector::splat(1.0)).horizontal_sum(), 112.0);
            assert_eq!(a.neg().horizontal_sum(), -32.0);
            assert_eq!(Avx512Vector::iota().horizontal_sum(), 120.0);
        }
        if has_avx512() {
            unsafe { inner() }
        }
    }

    #[test]
    fn test_avx512_pair_shuffles() {
        #[target_feature(enable = "avx512f,avx2,fma,avx")]
        unsafe fn inner() {
            let v = Avx512Vector::iota();
            let mut out = [0.0f32; 16];

            v.swap_pairs().to_slice(&mut out);
            assert_eq!(&out[..4], &[1.0, 0.0, 3.0, 2.0]);

            v.neg_even().to_slice(&mut out);
            assert_eq!(&out[12..], &[-12.0, 13.0, -14.0, 15.0]);

            v.dup_odd().to_slice(&mut out);
            assert_eq!(&out[..4], &[1.0, 1.0, 3.0, 3.0]);
        }
        if has_avx512() {
            unsafe { inner() }
        }
    }

    #[test]
    fn test_avx512_comparison() {
        #[target_feature(enable = "avx512f,avx2,fma,avx")]
        unsafe fn inner() {
            let a = Avx512Vector::splat(2.0);
            let b = Avx512Vector::splat(3.0);
            assert!(a.lt(b).all());
            assert!(!a.gt(b).any());
            assert!(a.lt(b).not().and(a.le(a)).not().all());
        }
        if has_avx512() {
            unsafe { inner() }
        }
    }
}
