//! NEON backend implementation (ARM64)
//!
//! 4-lane (128-bit) operations. AArch64 NEON has native division, square
//! root, directed rounding and fused multiply-add, so nothing is emulated.

#![cfg(all(feature = "neon", target_arch = "aarch64"))]

use crate::traits::{SimdInt, SimdMask, SimdVector};
use core::arch::aarch64::*;

const IOTA: [f32; 4] = [0.0, 1.0, 2.0, 3.0];
const EVEN_SIGNS: [u32; 4] = [0x8000_0000, 0, 0x8000_0000, 0];

/// NEON vector wrapper (4 lanes of f32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct NeonVector(float32x4_t);

/// NEON mask wrapper (4-lane mask)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct NeonMask(uint32x4_t);

/// NEON integer vector wrapper (4 lanes of u32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct NeonInt(uint32x4_t);

impl SimdInt for NeonInt {
    type FloatVec = NeonVector;

    #[inline(always)]
    fn splat(value: u32) -> Self {
        unsafe { NeonInt(vdupq_n_u32(value)) }
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        unsafe {
            // Variable right shift is a left shift by a negative count
            let shift_vec = vdupq_n_s32(-(count as i32));
            NeonInt(vshlq_u32(self.0, shift_vec))
        }
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        unsafe {
            let shift_vec = vdupq_n_s32(count as i32);
            NeonInt(vshlq_u32(self.0, shift_vec))
        }
    }

    #[inline(always)]
    fn bitwise_and(self, rhs: u32) -> Self {
        unsafe { NeonInt(vandq_u32(self.0, vdupq_n_u32(rhs))) }
    }

    #[inline(always)]
    fn bitwise_or(self, rhs: u32) -> Self {
        unsafe { NeonInt(vorrq_u32(self.0, vdupq_n_u32(rhs))) }
    }

    #[inline(always)]
    fn add_scalar(self, rhs: u32) -> Self {
        unsafe { NeonInt(vaddq_u32(self.0, vdupq_n_u32(rhs))) }
    }

    #[inline(always)]
    fn sub_scalar(self, rhs: u32) -> Self {
        unsafe { NeonInt(vsubq_u32(self.0, vdupq_n_u32(rhs))) }
    }

    #[inline(always)]
    fn to_f32(self) -> Self::FloatVec {
        unsafe { NeonVector(vcvtq_f32_s32(vreinterpretq_s32_u32(self.0))) }
    }

    #[inline(always)]
    fn from_f32_trunc(float_vec: Self::FloatVec) -> Self {
        unsafe { NeonInt(vreinterpretq_u32_s32(vcvtq_s32_f32(float_vec.0))) }
    }
}

impl SimdVector for NeonVector {
    type Mask = NeonMask;
    type IntBits = NeonInt;

    const LANES: usize = 4;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { NeonVector(vdupq_n_f32(value)) }
    }

    #[inline(always)]
    fn iota() -> Self {
        unsafe { NeonVector(vld1q_f32(IOTA.as_ptr())) }
    }

    #[inline(always)]
    fn from_slice(slice: &[f32]) -> Self {
        assert!(slice.len() >= Self::LANES, "Slice too short for NEON load");
        unsafe { NeonVector(vld1q_f32(slice.as_ptr())) }
    }

    #[inline(always)]
    fn to_slice(self, slice: &mut [f32]) {
        assert!(slice.len() >= Self::LANES, "Slice too short for NEON store");
        unsafe { vst1q_f32(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { NeonVector(vaddq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { NeonVector(vsubq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { NeonVector(vmulq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { NeonVector(vdivq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { NeonVector(vnegq_f32(self.0)) }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { NeonVector(vabsq_f32(self.0)) }
    }

    #[inline(always)]
    fn fma(self, b: Self, c: Self) -> Self {
        // vfmaq computes c + self * b
        unsafe { NeonVector(vfmaq_f32(c.0, self.0, b.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { NeonVector(vsqrtq_f32(self.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { NeonVector(vminnmq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        unsafe { NeonVector(vmaxnmq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> Self::Mask {
        unsafe { NeonMask(vcltq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn gt(self, rhs: Self) -> Self::Mask {
        unsafe { NeonMask(vcgtq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn le(self, rhs: Self) -> Self::Mask {
        unsafe { NeonMask(vcleq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn ge(self, rhs: Self) -> Self::Mask {
        unsafe { NeonMask(vcgeq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn select(mask: Self::Mask, true_val: Self, false_val: Self) -> Self {
        unsafe { NeonVector(vbslq_f32(mask.0, true_val.0, false_val.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe { vaddvq_f32(self.0) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { NeonVector(vrndmq_f32(self.0)) }
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        unsafe { NeonVector(vrndq_f32(self.0)) }
    }

    #[inline(always)]
    fn swap_pairs(self) -> Self {
        unsafe { NeonVector(vrev64q_f32(self.0)) }
    }

    #[inline(always)]
    fn dup_even(self) -> Self {
        unsafe { NeonVector(vtrn1q_f32(self.0, self.0)) }
    }

    #[inline(always)]
    fn dup_odd(self) -> Self {
        unsafe { NeonVector(vtrn2q_f32(self.0, self.0)) }
    }

    #[inline(always)]
    fn neg_even(self) -> Self {
        unsafe {
            let signs = vld1q_u32(EVEN_SIGNS.as_ptr());
            let bits = veorq_u32(vreinterpretq_u32_f32(self.0), signs);
            NeonVector(vreinterpretq_f32_u32(bits))
        }
    }

    #[inline(always)]
    fn to_bits(self) -> Self::IntBits {
        unsafe { NeonInt(vreinterpretq_u32_f32(self.0)) }
    }

    #[inline(always)]
    fn from_bits(bits: Self::IntBits) -> Self {
        unsafe { NeonVector(vreinterpretq_f32_u32(bits.0)) }
    }
}

impl SimdMask for NeonMask {
    #[inline(always)]
    fn all(self) -> bool {
        unsafe { vminvq_u32(self.0) == u32::MAX }
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { vmaxvq_u32(self.0) != 0 }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { NeonMask(vandq_u32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { NeonMask(vorrq_u32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        unsafe { NeonMask(vmvnq_u32(self.0)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(v: NeonVector) -> [f32; 4] {
        let mut out = [0.0; 4];
        v.to_slice(&mut out);
        out
    }

    #[test]
    fn test_neon_arithmetic() {
        let a = NeonVector::splat(2.0);
        let b = NeonVector::splat(3.0);
        assert_eq!(a.add(b).horizontal_sum(), 20.0);
        assert_eq!(a.fma(b, NeonVector::splat(1.0)).horizontal_sum(), 28.0);
        assert_eq!(NeonVector::iota().horizontal_sum(), 6.0);
    }

    #[test]
    fn test_neon_pair_shuffles() {
        let v = NeonVector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(lanes(v.swap_pairs()), [2.0, 1.0, 4.0, 3.0]);
        assert_eq!(lanes(v.dup_even()), [1.0, 1.0, 3.0, 3.0]);
        assert_eq!(lanes(v.dup_odd()), [2.0, 2.0, 4.0, 4.0]);
        assert_eq!(lanes(v.neg_even()), [-1.0, 2.0, -3.0, 4.0]);
    }

    #[test]
    fn test_neon_rounding() {
        let v = NeonVector::from_slice(&[2.7, -2.7, -0.5, 1.0e9]);
        assert_eq!(lanes(v.trunc()), [2.0, -2.0, 0.0, 1.0e9]);
        assert_eq!(lanes(v.floor()), [2.0, -3.0, -1.0, 1.0e9]);
    }
}
