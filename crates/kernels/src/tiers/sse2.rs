//! SSE2 tier: 4 lanes, then scalar
//!
//! Besides the slice operations this tier carries the envelope follower
//! and the 3D ops, which have no wider implementation.

use crate::backends::SseVector;
use crate::block::SseLanes;
use crate::types::{CompressorEnv, Matrix3d, Vector3d};

slice_entries!("sse,sse2", SseLanes);

entries! {
    "sse,sse2", SseLanes;
    fn compressor_env(dst: &mut [f32], src: &[f32], state: &mut CompressorEnv);
}

// The 3D ops work on single registers rather than a cascade
entries! {
    "sse,sse2", SseVector;
    fn calc_angle3d_v2(v1: &Vector3d, v2: &Vector3d) -> f32;
    fn calc_angle3d_vv(v: &[Vector3d; 2]) -> f32;
    fn apply_matrix3d_mv2(r: &mut Vector3d, v: &Vector3d, m: &Matrix3d);
}
