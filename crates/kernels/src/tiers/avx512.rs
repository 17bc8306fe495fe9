//! AVX-512 tier: 16 → 8 → 4 lanes, then scalar
//!
//! Only AVX-512F instructions are used, the narrower steps reuse the AVX2
//! and SSE backends.

use crate::block::Avx512Lanes;

slice_entries!("sse,sse2,avx,avx2,fma,avx512f", Avx512Lanes);
