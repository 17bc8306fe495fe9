//! 3D angle and transform kernels

use crate::types::{Matrix3d, Vector3d};

/// Cosine of the angle between `v1` and `v2`, clamped to `[-1, 1]`
///
/// Returns 0 when either vector has zero length.
pub fn calc_angle3d_v2(v1: &Vector3d, v2: &Vector3d) -> f32 {
    let w = libm::sqrtf(v1.dot(v1) * v2.dot(v2));
    if w == 0.0 {
        return 0.0;
    }
    (v1.dot(v2) / w).clamp(-1.0, 1.0)
}

/// [`calc_angle3d_v2`] for a pair stored together
pub fn calc_angle3d_vv(v: &[Vector3d; 2]) -> f32 {
    calc_angle3d_v2(&v[0], &v[1])
}

#[inline(always)]
fn row_dot(row: [f32; 4], v: [f32; 4]) -> f32 {
    row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3]
}

/// `r = m * v`
pub fn apply_matrix3d_mv2(r: &mut Vector3d, v: &Vector3d, m: &Matrix3d) {
    let a = v.to_array();
    *r = Vector3d::from_array([
        row_dot(m.row(0), a),
        row_dot(m.row(1), a),
        row_dot(m.row(2), a),
        row_dot(m.row(3), a),
    ]);
}

/// `v = m * v`
pub fn apply_matrix3d_mv1(v: &mut Vector3d, m: &Matrix3d) {
    let src = *v;
    apply_matrix3d_mv2(v, &src, m);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    #[test]
    fn test_angle_after_rotations_is_rotation_angle() {
        let mut phi = 0.0f32;
        while phi < 2.0 * PI {
            let mut rho = 0.0f32;
            while rho < PI {
                let mut v = [Vector3d::new(1.0, 0.0, 0.0); 2];
                apply_matrix3d_mv1(&mut v[1], &Matrix3d::rotate_z(rho));

                let tilt = Matrix3d::rotate_y(phi);
                apply_matrix3d_mv1(&mut v[0], &tilt);
                apply_matrix3d_mv1(&mut v[1], &tilt);

                let expected = libm::cosf(rho);
                assert!((calc_angle3d_v2(&v[0], &v[1]) - expected).abs() < 1e-5);
                assert!((calc_angle3d_vv(&v) - expected).abs() < 1e-5);
                rho += PI * 0.125;
            }
            phi += PI * 0.125;
        }
    }

    #[test]
    fn test_zero_vector_angle_is_zero() {
        let zero = Vector3d::default();
        assert_eq!(calc_angle3d_v2(&zero, &Vector3d::new(1.0, 2.0, 3.0)), 0.0);
    }

    #[test]
    fn test_translation_ignores_directions() {
        let mut v = Vector3d::new(1.0, 2.0, 3.0);
        apply_matrix3d_mv1(&mut v, &Matrix3d::translate(5.0, 5.0, 5.0));
        assert_eq!(v, Vector3d::new(1.0, 2.0, 3.0));
    }
}
