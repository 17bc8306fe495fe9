//! 3D angle and transform kernels on a single 4-lane register

use crate::traits::SimdVector;
use crate::types::{Matrix3d, Vector3d};

/// Load `v`, zeroing the homogeneous lane
#[inline(always)]
fn load_xyz<V: SimdVector>(v: &Vector3d) -> V {
    let lanes = V::from_slice(&v.to_array());
    V::select(V::iota().lt(V::splat(3.0)), lanes, V::splat(0.0))
}

/// Cosine of the angle between `v1` and `v2`, see
/// [`generic::calc_angle3d_v2`](crate::generic::calc_angle3d_v2)
///
/// `V` must be a 4-lane vector.
#[inline(always)]
pub fn calc_angle3d_v2<V: SimdVector>(v1: &Vector3d, v2: &Vector3d) -> f32 {
    debug_assert_eq!(V::LANES, 4);
    let a = load_xyz::<V>(v1);
    let b = load_xyz::<V>(v2);
    let w = libm::sqrtf(a.mul(a).horizontal_sum() * b.mul(b).horizontal_sum());
    if w == 0.0 {
        return 0.0;
    }
    (a.mul(b).horizontal_sum() / w).clamp(-1.0, 1.0)
}

/// [`calc_angle3d_v2`] for a pair stored together
#[inline(always)]
pub fn calc_angle3d_vv<V: SimdVector>(v: &[Vector3d; 2]) -> f32 {
    calc_angle3d_v2::<V>(&v[0], &v[1])
}

/// `r = m * v`, one horizontal sum per row
///
/// `V` must be a 4-lane vector.
#[inline(always)]
pub fn apply_matrix3d_mv2<V: SimdVector>(r: &mut Vector3d, v: &Vector3d, m: &Matrix3d) {
    debug_assert_eq!(V::LANES, 4);
    let x = V::from_slice(&v.to_array());
    let row = |i: usize| V::from_slice(&m.m[i * 4..]).mul(x).horizontal_sum();
    *r = Vector3d::from_array([row(0), row(1), row(2), row(3)]);
}
