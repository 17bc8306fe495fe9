//! Core SIMD abstraction traits
//!
//! Every instruction-set backend (SSE2, AVX2, AVX-512, NEON) wraps its native
//! register type and implements [`SimdVector`]. Kernels are written once
//! against these traits and monomorphized per backend inside a
//! `#[target_feature]` entry point, so every method here is expected to be
//! `#[inline(always)]` in the implementations.
//!
//! The lane type is always `f32`: the kernel set only deals with single
//! precision sample buffers.

/// Core SIMD vector abstraction trait
///
/// # Example
///
/// ```rust,ignore
/// // Inside a function compiled with the matching target features:
/// let a = SseVector::splat(2.0);
/// let b = SseVector::splat(3.0);
/// assert_eq!(a.add(b).horizontal_sum(), 5.0 * SseVector::LANES as f32);
/// ```
pub trait SimdVector: Copy + Clone + Sized {
    /// Associated mask type for comparison operations
    type Mask: SimdMask;

    /// Associated integer vector type for bit manipulation
    type IntBits: SimdInt<FloatVec = Self>;

    /// Number of f32 lanes (4 for SSE2 and NEON, 8 for AVX2, 16 for AVX-512)
    const LANES: usize;

    // Construction

    /// Broadcast a scalar value to all lanes
    fn splat(value: f32) -> Self;

    /// Lane indices `[0.0, 1.0, 2.0, ...]`
    fn iota() -> Self;

    /// Load from a slice (unaligned)
    ///
    /// # Panics
    ///
    /// Panics if the slice has fewer than `LANES` elements
    fn from_slice(slice: &[f32]) -> Self;

    /// Store to a slice (unaligned)
    ///
    /// # Panics
    ///
    /// Panics if the slice has fewer than `LANES` elements
    fn to_slice(self, slice: &mut [f32]);

    // Arithmetic operations

    /// Element-wise addition
    fn add(self, rhs: Self) -> Self;

    /// Element-wise subtraction
    fn sub(self, rhs: Self) -> Self;

    /// Element-wise multiplication
    fn mul(self, rhs: Self) -> Self;

    /// Element-wise division
    fn div(self, rhs: Self) -> Self;

    /// Element-wise negation
    fn neg(self) -> Self;

    /// Element-wise absolute value
    fn abs(self) -> Self;

    /// Multiply-add: `self * b + c`
    ///
    /// Fused on backends whose tier guarantees FMA (AVX2, AVX-512, NEON),
    /// a separate multiply and add on SSE2. Only use it where the result is
    /// compared with a tolerance.
    fn fma(self, b: Self, c: Self) -> Self;

    /// Element-wise square root
    fn sqrt(self) -> Self;

    // Min/Max operations

    /// Element-wise minimum; a NaN lane in `self` yields `rhs`
    fn min(self, rhs: Self) -> Self;

    /// Element-wise maximum; a NaN lane in `self` yields `rhs`
    fn max(self, rhs: Self) -> Self;

    // Comparison operations (return masks)

    /// Lanes where `self < rhs`
    fn lt(self, rhs: Self) -> Self::Mask;

    /// Lanes where `self > rhs`
    fn gt(self, rhs: Self) -> Self::Mask;

    /// Lanes where `self <= rhs`
    fn le(self, rhs: Self) -> Self::Mask;

    /// Lanes where `self >= rhs`
    fn ge(self, rhs: Self) -> Self::Mask;

    // Blending

    /// For each lane: `mask[i] ? true_val[i] : false_val[i]`
    fn select(mask: Self::Mask, true_val: Self, false_val: Self) -> Self;

    // Horizontal operations

    /// Sum all lanes into a scalar
    fn horizontal_sum(self) -> f32;

    // Rounding operations

    /// Round toward negative infinity
    fn floor(self) -> Self;

    /// Round toward zero
    fn trunc(self) -> Self;

    // Interleaved pair operations (packed complex numbers)

    /// Swap adjacent lanes: `[a0, a1, a2, a3] -> [a1, a0, a3, a2]`
    fn swap_pairs(self) -> Self;

    /// Duplicate even lanes: `[a0, a1, a2, a3] -> [a0, a0, a2, a2]`
    fn dup_even(self) -> Self;

    /// Duplicate odd lanes: `[a0, a1, a2, a3] -> [a1, a1, a3, a3]`
    fn dup_odd(self) -> Self;

    /// Flip the sign of even lanes: `[a0, a1, ...] -> [-a0, a1, ...]`
    fn neg_even(self) -> Self;

    // Bit manipulation (IEEE 754 exponent and mantissa access)

    /// Reinterpret float bits as integer bits
    fn to_bits(self) -> Self::IntBits;

    /// Reinterpret integer bits as float bits
    fn from_bits(bits: Self::IntBits) -> Self;
}

/// Integer SIMD vector for IEEE 754 bit manipulation in the vector
/// `exp`/`ln` kernels.
pub trait SimdInt: Copy + Clone + Sized {
    /// Associated float vector type
    type FloatVec: SimdVector<IntBits = Self>;

    /// Broadcast a scalar u32 value to all lanes
    fn splat(value: u32) -> Self;

    /// Logical right shift
    fn shr(self, count: u32) -> Self;

    /// Left shift
    fn shl(self, count: u32) -> Self;

    /// Bitwise AND with a constant
    fn bitwise_and(self, rhs: u32) -> Self;

    /// Bitwise OR with a constant
    fn bitwise_or(self, rhs: u32) -> Self;

    /// Wrapping add of an integer constant
    fn add_scalar(self, rhs: u32) -> Self;

    /// Wrapping subtract of an integer constant
    fn sub_scalar(self, rhs: u32) -> Self;

    /// Numeric conversion, lanes read as signed i32
    fn to_f32(self) -> Self::FloatVec;

    /// Numeric conversion f32 -> i32 with truncation, stored as u32 bits
    fn from_f32_trunc(float_vec: Self::FloatVec) -> Self;
}

/// Per-lane boolean mask for branchless conditional logic
pub trait SimdMask: Copy + Clone + Sized {
    /// Returns true if all lanes are set
    fn all(self) -> bool;

    /// Returns true if any lane is set
    fn any(self) -> bool;

    /// Lane-wise AND
    fn and(self, rhs: Self) -> Self;

    /// Lane-wise OR
    fn or(self, rhs: Self) -> Self;

    /// Lane-wise NOT
    fn not(self) -> Self;
}
