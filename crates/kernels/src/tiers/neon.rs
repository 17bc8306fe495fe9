//! NEON tier: 4 lanes, then scalar

use crate::backends::NeonVector;
use crate::block::NeonLanes;
use crate::types::Vector3d;

slice_entries!("neon", NeonLanes);

entries! {
    "neon", NeonVector;
    fn calc_angle3d_v2(v1: &Vector3d, v2: &Vector3d) -> f32;
    fn calc_angle3d_vv(v: &[Vector3d; 2]) -> f32;
}
