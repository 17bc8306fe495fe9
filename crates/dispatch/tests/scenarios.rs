//! Worked examples with hand-checked results, run on the process-wide
//! dispatcher

use vecdsp_dispatch::{
    self as dsp, CompressorEnv, Dispatcher, Matrix3d, Point3d, Vector3d,
};

#[test]
fn test_envelope_attack_step() {
    let mut state = CompressorEnv {
        env: 0.0,
        rel_thresh: 0.25,
        attack: 0.55,
        release: 0.45,
    };
    let mut dst = [0.0f32];
    dsp::compressor_env(&mut dst, &[0.3], &mut state);
    assert!((dst[0] - 0.165).abs() < 1e-7);
    assert_eq!(state.env, dst[0]);
}

#[test]
fn test_envelope_releases_above_threshold() {
    let mut state = CompressorEnv::new(0.25, 0.5, 0.25);
    state.env = 1.0;
    let mut dst = [0.0f32; 2];
    // Falling input above the threshold releases, rising input attacks
    dsp::compressor_env(&mut dst, &[0.0, 2.0], &mut state);
    assert_eq!(dst, [0.75, 1.375]);
    assert_eq!(state.env, 1.375);
}

#[test]
fn test_linear_ramp_excludes_end_value() {
    let mut dst = [0.0f32; 5];
    dsp::lramp_set1(&mut dst, 0.0, 10.0);
    assert_eq!(dst, [0.0, 2.0, 4.0, 6.0, 8.0]);

    let mut flat = [0.0f32; 33];
    dsp::lramp_set1(&mut flat, 0.5, 0.5);
    assert!(flat.iter().all(|&v| v == 0.5));

    // Empty buffers are a no-op
    dsp::lramp_set1(&mut [], 0.0, 1.0);
}

#[test]
fn test_fade_out_applies_ramp() {
    let mut dst = vec![2.0f32; 4];
    dsp::lramp1(&mut dst, 1.0, 0.0);
    assert_eq!(dst, [2.0, 1.5, 1.0, 0.5]);
}

#[test]
fn test_complex_multiply() {
    // (1 + 2i)(3 + 4i) = -5 + 10i, twice to cover a vector step
    let a = [1.0f32, 2.0, 1.0, 2.0, 1.0, 2.0];
    let b = [3.0f32, 4.0, 3.0, 4.0, 3.0, 4.0];
    let mut dst = [0.0f32; 6];
    dsp::pcomplex_mul3(&mut dst, &a, &b);
    assert_eq!(dst, [-5.0, 10.0, -5.0, 10.0, -5.0, 10.0]);

    let mut acc = a;
    dsp::pcomplex_mul2(&mut acc, &b);
    assert_eq!(acc, dst);
}

#[test]
fn test_signed_sqrt_clamps() {
    let mut dst = [4.0f32, -1.0, f32::NAN, 0.0, 9.0];
    dsp::ssqrt1(&mut dst);
    assert_eq!(dst, [2.0, 0.0, 0.0, 0.0, 3.0]);
}

#[test]
fn test_reversed_operators() {
    let mut dst = [1.0f32, 2.0, 4.0, 8.0, 16.0];
    dsp::rdiv2(&mut dst, &[8.0; 5]);
    assert_eq!(dst, [8.0, 4.0, 2.0, 1.0, 0.5]);

    let mut dst = [2.0f32; 5];
    dsp::rsub2(&mut dst, &[7.0; 5]);
    assert_eq!(dst, [5.0; 5]);
}

#[test]
fn test_sidechain_window() {
    let mut dst = [3.0f32, 4.0];
    let mut head = [0.0f32; 2];
    let rms = dsp::sidechain_rms(&mut dst, &mut head, &[0.0, 3.0], 0.0, 0.5);
    assert_eq!(head, [3.0, 4.0]);
    // 9 -> sqrt(4.5); 9 + 16 - 9 = 16 -> sqrt(8)
    assert_eq!(rms, 16.0);
    assert!((dst[0] - 4.5f32.sqrt()).abs() < 1e-6);
    assert!((dst[1] - 8.0f32.sqrt()).abs() < 1e-6);
}

#[test]
fn test_dot_products() {
    let a = [1.0f32, -2.0, 3.0];
    let b = [4.0f32, 5.0, -6.0];
    assert_eq!(dsp::h_dotp(&a, &b), -24.0);
    assert_eq!(dsp::h_abs_dotp(&a, &b), 32.0);
    assert_eq!(dsp::h_sqr_dotp(&a, &b), 16.0 + 100.0 + 324.0);
    assert_eq!(dsp::h_dotp(&[], &[]), 0.0);
}

#[test]
fn test_rotation_angle_is_cosine() {
    let rho = 0.7f32;
    let v = Vector3d::new(1.0, 0.0, 0.0);
    let mut r = Vector3d::default();
    dsp::apply_matrix3d_mv2(&mut r, &v, &Matrix3d::rotate_z(rho));
    assert!((dsp::calc_angle3d_v2(&v, &r) - rho.cos()).abs() < 1e-6);
    assert!((dsp::calc_angle3d_vv(&[v, r]) - rho.cos()).abs() < 1e-6);

    // Zero-length vectors give 0, not NaN
    assert_eq!(dsp::calc_angle3d_v2(&v, &Vector3d::default()), 0.0);
}

#[test]
fn test_translation_moves_points_not_directions() {
    let m = Matrix3d::translate(1.0, 2.0, 3.0);
    let mut d = Vector3d::new(1.0, 1.0, 1.0);
    dsp::apply_matrix3d_mv1(&mut d, &m);
    assert_eq!(d, Vector3d::new(1.0, 1.0, 1.0));

    let p = Point3d::new(0.0, 0.0, 0.0);
    let mut q = Vector3d { dx: p.x, dy: p.y, dz: p.z, dw: p.w };
    dsp::apply_matrix3d_mv1(&mut q, &m);
    assert_eq!((q.dx, q.dy, q.dz, q.dw), (1.0, 2.0, 3.0, 1.0));
}

#[test]
fn test_generic_dispatcher_agrees_with_free_functions() {
    let generic = Dispatcher::generic();
    let src: Vec<f32> = (0..37).map(|i| i as f32 * 0.25 - 4.0).collect();
    let mut a = vec![1.5f32; 37];
    let mut b = a.clone();
    generic.lramp_mul2(&mut a, &src, 0.0, 1.0);
    dsp::lramp_mul2(&mut b, &src, 0.0, 1.0);
    assert_eq!(a, b);
}
