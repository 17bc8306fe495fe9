//! AVX2 tier: 8 → 4 lanes, then scalar

use crate::block::Avx2Lanes;

slice_entries!("sse,sse2,avx,avx2,fma", Avx2Lanes);
