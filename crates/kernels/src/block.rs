//! Head/body/tail block decomposition
//!
//! A tier kernel walks its buffers with the widest vector first, then each
//! narrower vector, then a scalar remainder:
//!
//! ```text
//! len = 45, AVX-512 tier (16 → 8 → 4 → scalar):
//! [0 ......... 15][16 ........ 31][32 ... 39][40 41 42 43][44]
//!  └─ 16 lanes ──┘└── 16 lanes ──┘└ 8 lanes ┘└─ 4 lanes ─┘ scalar
//! ```
//!
//! The order is encoded in the type ([`Chain`] / [`Tail`]) so every width
//! is monomorphized into the calling `#[target_feature]` function. A
//! [`BlockKernel`] only says what one vector step and one scalar step do.
//!
//! All loads and stores go through slice bounds, so a kernel never touches
//! memory outside the buffers it was given.

use crate::traits::SimdVector;
use core::marker::PhantomData;

/// One operation expressed as a vector step and a scalar step.
pub trait BlockKernel {
    /// Samples a scalar step consumes (2 for interleaved complex data)
    const STEP: usize = 1;

    /// Number of f32 elements to process
    fn len(&self) -> usize;

    /// Process one full vector of `V` starting at element `i`
    fn vector<V: SimdVector>(&mut self, i: usize);

    /// Process `STEP` elements starting at `i` without vector registers
    fn scalar(&mut self, i: usize);

    /// Process every full vector of `V` from `from` on, returning the first
    /// index left unprocessed.
    ///
    /// Kernels that carry vector state across steps (accumulators) override
    /// this to keep the state in registers for the whole body.
    #[inline(always)]
    fn body<V: SimdVector>(&mut self, mut from: usize) -> usize {
        let len = self.len();
        while from + V::LANES <= len {
            self.vector::<V>(from);
            from += V::LANES;
        }
        from
    }
}

/// A sequence of vector widths ending in a scalar remainder.
pub trait Cascade {
    /// Run `kernel` over `[from, kernel.len())`
    fn run_from<K: BlockKernel>(kernel: &mut K, from: usize);

    /// Run `kernel` over its whole length
    #[inline(always)]
    fn run<K: BlockKernel>(kernel: &mut K) {
        Self::run_from(kernel, 0)
    }
}

/// Scalar remainder, end of every cascade
pub struct Tail;

/// Vector width `V` followed by the narrower cascade `N`
pub struct Chain<V, N>(PhantomData<(V, N)>);

impl Cascade for Tail {
    #[inline(always)]
    fn run_from<K: BlockKernel>(kernel: &mut K, mut from: usize) {
        let len = kernel.len();
        while from < len {
            kernel.scalar(from);
            from += K::STEP;
        }
    }
}

impl<V: SimdVector, N: Cascade> Cascade for Chain<V, N> {
    #[inline(always)]
    fn run_from<K: BlockKernel>(kernel: &mut K, from: usize) {
        let next = kernel.body::<V>(from);
        N::run_from(kernel, next)
    }
}

// ============================================================================
// Per-tier cascades
// ============================================================================

/// SSE2: 4 lanes, then scalar
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub type SseLanes = Chain<crate::backends::SseVector, Tail>;

/// AVX2: 8 → 4 lanes, then scalar
#[cfg(all(feature = "avx2", any(target_arch = "x86", target_arch = "x86_64")))]
pub type Avx2Lanes = Chain<crate::backends::Avx2Vector, SseLanes>;

/// AVX-512: 16 → 8 → 4 lanes, then scalar
#[cfg(all(feature = "avx512", any(target_arch = "x86", target_arch = "x86_64")))]
pub type Avx512Lanes = Chain<crate::backends::Avx512Vector, Avx2Lanes>;

/// NEON: 4 lanes, then scalar
#[cfg(all(feature = "neon", target_arch = "aarch64"))]
pub type NeonLanes = Chain<crate::backends::NeonVector, Tail>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    /// Records the vector width that handled each element
    struct WidthRecorder {
        seen: Vec<usize>,
    }

    impl BlockKernel for WidthRecorder {
        fn len(&self) -> usize {
            self.seen.len()
        }

        fn vector<V: SimdVector>(&mut self, i: usize) {
            for slot in &mut self.seen[i..i + V::LANES] {
                assert_eq!(*slot, 0, "element visited twice");
                *slot = V::LANES;
            }
        }

        fn scalar(&mut self, i: usize) {
            assert_eq!(self.seen[i], 0, "element visited twice");
            self.seen[i] = 1;
        }
    }

    /// Pairs are processed together by the scalar step
    struct PairRecorder {
        pairs: usize,
        len: usize,
    }

    impl BlockKernel for PairRecorder {
        const STEP: usize = 2;

        fn len(&self) -> usize {
            self.len
        }

        fn vector<V: SimdVector>(&mut self, _i: usize) {}

        fn scalar(&mut self, i: usize) {
            assert_eq!(i % 2, 0);
            self.pairs += 1;
        }
    }

    #[test]
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    fn test_sse_cascade_covers_every_element_once() {
        for len in [0usize, 1, 3, 4, 5, 8, 13] {
            let mut recorder = WidthRecorder { seen: vec![0; len] };
            SseLanes::run(&mut recorder);
            let vectors = len / 4 * 4;
            assert!(recorder.seen[..vectors].iter().all(|&w| w == 4));
            assert!(recorder.seen[vectors..].iter().all(|&w| w == 1));
        }
    }

    #[test]
    #[cfg(all(feature = "avx512", any(target_arch = "x86", target_arch = "x86_64")))]
    fn test_avx512_cascade_goes_widest_first() {
        // The widths are only recorded, no instructions are executed
        let mut recorder = WidthRecorder { seen: vec![0; 45] };
        Avx512Lanes::run(&mut recorder);
        assert!(recorder.seen[..32].iter().all(|&w| w == 16));
        assert!(recorder.seen[32..40].iter().all(|&w| w == 8));
        assert!(recorder.seen[40..44].iter().all(|&w| w == 4));
        assert_eq!(recorder.seen[44], 1);
    }

    #[test]
    #[cfg(all(feature = "neon", target_arch = "aarch64"))]
    fn test_neon_cascade_covers_every_element_once() {
        let mut recorder = WidthRecorder { seen: vec![0; 11] };
        NeonLanes::run(&mut recorder);
        assert!(recorder.seen[..8].iter().all(|&w| w == 4));
        assert!(recorder.seen[8..].iter().all(|&w| w == 1));
    }

    #[test]
    fn test_tail_steps_by_pairs() {
        let mut recorder = PairRecorder { pairs: 0, len: 6 };
        Tail::run(&mut recorder);
        assert_eq!(recorder.pairs, 3);
    }
}
