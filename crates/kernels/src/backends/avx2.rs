//! AVX2 backend implementation (x86-64)
//!
//! 8-lane (256-bit) operations. The AVX2 tier also guarantees FMA3, so
//! [`SimdVector::fma`] is a single fused instruction here.

#![cfg(all(feature = "avx2", any(target_arch = "x86", target_arch = "x86_64")))]

use crate::traits::{SimdInt, SimdMask, SimdVector};

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;

/// AVX2 vector wrapper (8 lanes of f32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx2Vector(__m256);

/// AVX2 mask wrapper (8-lane mask)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx2Mask(__m256);

/// AVX2 integer vector wrapper (8 lanes of u32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx2Int(__m256i);

impl SimdInt for Avx2Int {
    type FloatVec = Avx2Vector;

    #[inline(always)]
    fn splat(value: u32) -> Self {
        unsafe { Avx2Int(_mm256_set1_epi32(value as i32)) }
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        unsafe {
            // Variable shifts take the count in a 128-bit register
            let shift_count = _mm_cvtsi32_si128(count as i32);
            Avx2Int(_mm256_srl_epi32(self.0, shift_count))
        }
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        unsafe {
            let shift_count = _mm_cvtsi32_si128(count as i32);
            Avx2Int(_mm256_sll_epi32(self.0, shift_count))
        }
    }

    #[inline(always)]
    fn bitwise_and(self, rhs: u32) -> Self {
        unsafe { Avx2Int(_mm256_and_si256(self.0, _mm256_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn bitwise_or(self, rhs: u32) -> Self {
        unsafe { Avx2Int(_mm256_or_si256(self.0, _mm256_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn add_scalar(self, rhs: u32) -> Self {
        unsafe { Avx2Int(_mm256_add_epi32(self.0, _mm256_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn sub_scalar(self, rhs: u32) -> Self {
        unsafe { Avx2Int(_mm256_sub_epi32(self.0, _mm256_set1_epi32(rhs as i32))) }
    }

    #[inline(always)]
    fn to_f32(self) -> Self::FloatVec {
        unsafe { Avx2Vector(_mm256_cvtepi32_ps(self.0)) }
    }

    #[inline(always)]
    fn from_f32_trunc(float_vec: Self::FloatVec) -> Self {
        unsafe { Avx2Int(_mm256_cvttps_epi32(float_vec.0)) }
    }
}

impl SimdVector for Avx2Vector {
    type Mask = Avx2Mask;
    type IntBits = Avx2Int;

    const LANES: usize = 8;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { Avx2Vector(_mm256_set1_ps(value)) }
    }

    #[inline(always)]
    fn iota() -> Self {
        unsafe { Avx2Vector(_mm256_setr_ps(0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0)) }
    }

    #[inline(always)]
    fn from_slice(slice: &[f32]) -> Self {
        assert!(slice.len() >= Self::LANES, "Slice too short for AVX2 load");
        unsafe { Avx2Vector(_mm256_loadu_ps(slice.as_ptr())) }
    }

    #[inline(always)]
    fn to_slice(self, slice: &mut [f32]) {
        assert!(slice.len() >= Self::LANES, "Slice too short for AVX2 store");
        unsafe { _mm256_storeu_ps(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_sub_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_mul_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_div_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { Avx2Vector(_mm256_xor_ps(self.0, _mm256_set1_ps(-0.0))) }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { Avx2Vector(_mm256_andnot_ps(_mm256_set1_ps(-0.0), self.0)) }
    }

    #[inline(always)]
    fn fma(self, b: Self, c: Self) -> Self {
        unsafe { Avx2Vector(_mm256_fmadd_ps(self.0, b.0, c.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Avx2Vector(_mm256_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_min_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        unsafe { Avx2Vector(_mm256_max_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> Self::Mask {
        unsafe { Avx2Mask(_mm256_cmp_ps::<_CMP_LT_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn gt(self, rhs: Self) -> Self::Mask {
        unsafe { Avx2Mask(_mm256_cmp_ps::<_CMP_GT_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn le(self, rhs: Self) -> Self::Mask {
        unsafe { Avx2Mask(_mm256_cmp_ps::<_CMP_LE_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn ge(self, rhs: Self) -> Self::Mask {
        unsafe { Avx2Mask(_mm256_cmp_ps::<_CMP_GE_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn select(mask: Self::Mask, true_val: Self, false_val: Self) -> Self {
        unsafe { Avx2Vector(_mm256_blendv_ps(false_val.0, true_val.0, mask.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe {
            // Fold the high 128-bit half onto the low half
            let high = _mm256_extractf128_ps::<1>(self.0);
            let low = _mm256_castps256_ps128(self.0);
            let sum128 = _mm_add_ps(high, low);

            let shuf = _mm_movehdup_ps(sum128);
            let sums = _mm_add_ps(sum128, shuf);
            let shuf = _mm_movehl_ps(shuf, sums);
            _mm_cvtss_f32(_mm_add_ss(sums, shuf))
        }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { Avx2Vector(_mm256_floor_ps(self.0)) }
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        unsafe { Avx2Vector(_mm256_round_ps::<{ _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC }>(self.0)) }
    }

    #[inline(always)]
    fn swap_pairs(self) -> Self {
        unsafe { Avx2Vector(_mm256_permute_ps::<0xB1>(self.0)) }
    }

    #[inline(always)]
    fn dup_even(self) -> Self {
        unsafe { Avx2Vector(_mm256_moveldup_ps(self.0)) }
    }

    #[inline(always)]
    fn dup_odd(self) -> Self {
        unsafe { Avx2Vector(_mm256_movehdup_ps(self.0)) }
    }

    #[inline(always)]
    fn neg_even(self) -> Self {
        unsafe {
            let signs = _mm256_setr_ps(-0.0, 0.0, -0.0, 0.0, -0.0, 0.0, -0.0, 0.0);
            Avx2Vector(_mm256_xor_ps(self.0, signs))
        }
    }

    #[inline(always)]
    fn to_bits(self) -> Self::IntBits {
        unsafe { Avx2Int(_mm256_castps_si256(self.0)) }
    }

    #[inline(always)]
    fn from_bits(bits: Self::IntBits) -> Self {
        unsafe { Avx2Vector(_mm256_castsi256_ps(bits.0)) }
    }
}

impl SimdMask for Avx2Mask {
    #[inline(always)]
    fn all(self) -> bool {
        unsafe { _mm256_movemask_ps(self.0) == 0xff }
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { _mm256_movemask_ps(self.0) != 0 }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { Avx2Mask(_mm256_and_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { Avx2Mask(_mm256_or_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        unsafe {
            let ones = _mm256_castsi256_ps(_mm256_set1_epi32(-1));
            Avx2Mask(_mm256_xor_ps(self.0, ones))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(v: Avx2Vector) -> [f32; 8] {
        let mut out = [0.0; 8];
        v.to_slice(&mut out);
        out
    }

    #[test]
    fn test_avx2_arithmetic() {
        #[target_feature(enable = "avx,avx2,fma")]
        unsafe fn inner() {
            let a = Avx2Vector::splat(2.0);
            let b = Avx2Vector::splat(3.0);
            assert_eq!(a.add(b).horizontal_sum(), 40.0);
            assert_eq!(a.fma(b, Avx2Vector::splat(1.0)).horizontal_sum(), 56.0);
            assert_eq!(Avx2Vector::iota().horizontal_sum(), 28.0);
        }
        if std::is_x86_feature_detected!("avx2") && std::is_x86_feature_detected!("fma") {
            unsafe { inner() }
        }
    }

    #[test]
    fn test_avx2_pair_shuffles() {
        #[target_feature(enable = "avx,avx2,fma")]
        unsafe fn inner() {
            let v = Avx2Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
            assert_eq!(lanes(v.swap_pairs()), [2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0]);
            assert_eq!(lanes(v.dup_even()), [1.0, 1.0, 3.0, 3.0, 5.0, 5.0, 7.0, 7.0]);
            assert_eq!(lanes(v.dup_odd()), [2.0, 2.0, 4.0, 4.0, 6.0, 6.0, 8.0, 8.0]);
            assert_eq!(
                lanes(v.neg_even()),
                [-1.0, 2.0, -3.0, 4.0, -5.0, 6.0, -7.0, 8.0]
            );
        }
        if std::is_x86_feature_detected!("avx2") && std::is_x86_feature_detected!("fma") {
            unsafe { inner() }
        }
    }

    #[test]
    fn test_avx2_rounding() {
        #[target_feature(enable = "avx,avx2,fma")]
        unsafe fn inner() {
            let v = Avx2Vector::from_slice(&[2.7, -2.7, -0.5, 0.5, 3.0, -3.0, 1.0e9, 0.0]);
            assert_eq!(
                lanes(v.trunc()),
                [2.0, -2.0, 0.0, 0.0, 3.0, -3.0, 1.0e9, 0.0]
            );
            assert_eq!(
                lanes(v.floor()),
                [2.0, -3.0, -1.0, 0.0, 3.0, -3.0, 1.0e9, 0.0]
            );
        }
        if std::is_x86_feature_detected!("avx2") && std::is_x86_feature_detected!("fma") {
            unsafe { inner() }
        }
    }
}
