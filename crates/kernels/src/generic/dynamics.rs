//! Envelope follower, sidechain detector and gain curves

use super::pmath::ssqrt;
use crate::math::exp::{EXP_MAX_INPUT, EXP_MIN_INPUT};
use crate::types::{CompressorEnv, CompressorKnee, CompressorX2, ExpanderKnee};

/// One step of the envelope recurrence
///
/// Attack is used while the envelope is at or below the release threshold,
/// and above it whenever the input rises past the envelope.
#[inline(always)]
pub(crate) fn env_step(env: f32, s: f32, state: &CompressorEnv) -> f32 {
    let k = if env > state.rel_thresh && s <= env {
        state.release
    } else {
        state.attack
    };
    env + k * (s - env)
}

/// Envelope follower: `dst[i]` is the envelope after consuming `src[i]`
///
/// The final envelope is written back to `state.env`.
pub fn compressor_env(dst: &mut [f32], src: &[f32], state: &mut CompressorEnv) {
    let mut env = state.env;
    for (d, &s) in dst.iter_mut().zip(src) {
        env = env_step(env, s, state);
        *d = env;
    }
    state.env = env;
}

/// Running-sum RMS detector over a sliding window
///
/// `dst` holds the samples entering the window; they are saved to `head`.
/// `tail` holds the samples leaving it. Returns the updated sum of squares;
/// `dst` receives `sqrt(max(sum * k, 0))` per sample.
pub fn sidechain_rms(dst: &mut [f32], head: &mut [f32], tail: &[f32], rms: f32, k: f32) -> f32 {
    let mut rms = rms;
    for ((d, h), &t) in dst.iter_mut().zip(head.iter_mut()).zip(tail) {
        let s = *d;
        *h = s;
        rms += s * s - t * t;
        *d = ssqrt(rms * k);
    }
    rms
}

/// `ln` with the input clamped like the vector [`ln`](crate::math::ln),
/// so NaN and non-positive levels give the same finite result on every tier
#[inline(always)]
fn level_ln(x: f32) -> f32 {
    libm::logf(x.max(f32::MIN_POSITIVE))
}

/// `exp` with the argument clamped like the vector [`exp`](crate::math::exp)
#[inline(always)]
fn gain_exp(y: f32) -> f32 {
    libm::expf(y.max(EXP_MIN_INPUT).min(EXP_MAX_INPUT))
}

#[inline(always)]
pub(crate) fn compressor_knee_gain(x: f32, k: &CompressorKnee) -> f32 {
    if x <= k.start {
        return k.gain;
    }
    let lx = level_ln(x);
    if x >= k.end {
        gain_exp(k.tilt[0] * lx + k.tilt[1])
    } else {
        gain_exp((k.herm[0] * lx + k.herm[1]) * lx + k.herm[2])
    }
}

#[inline(always)]
pub(crate) fn dexpander_gain(x: f32, c: &ExpanderKnee) -> f32 {
    if x >= c.end {
        return 1.0;
    }
    if x < c.threshold {
        return 0.0;
    }
    let lx = level_ln(x);
    if x >= c.start {
        gain_exp((c.herm[0] * lx + c.herm[1]) * lx + c.herm[2])
    } else {
        gain_exp(c.tilt[0] * lx + c.tilt[1])
    }
}

#[inline(always)]
pub(crate) fn uexpander_gain(x: f32, c: &ExpanderKnee) -> f32 {
    let x = x.min(c.threshold);
    if x <= c.start {
        return 1.0;
    }
    let lx = level_ln(x);
    if x >= c.end {
        gain_exp(c.tilt[0] * lx + c.tilt[1])
    } else {
        gain_exp((c.herm[0] * lx + c.herm[1]) * lx + c.herm[2])
    }
}

/// Two-knee compressor gain for `|src|`
pub fn compressor_x2_gain(dst: &mut [f32], src: &[f32], c: &CompressorX2) {
    for (d, &s) in dst.iter_mut().zip(src) {
        let x = s.abs();
        *d = compressor_knee_gain(x, &c.k[0]) * compressor_knee_gain(x, &c.k[1]);
    }
}

/// Two-knee compressor transfer curve: `gain(|src|) * |src|`
pub fn compressor_x2_curve(dst: &mut [f32], src: &[f32], c: &CompressorX2) {
    for (d, &s) in dst.iter_mut().zip(src) {
        let x = s.abs();
        *d = compressor_knee_gain(x, &c.k[0]) * compressor_knee_gain(x, &c.k[1]) * x;
    }
}

/// Downward expander gain for `|src|`
pub fn dexpander_x1_gain(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = dexpander_gain(s.abs(), c);
    }
}

/// Downward expander transfer curve: `gain(|src|) * |src|`
pub fn dexpander_x1_curve(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
    for (d, &s) in dst.iter_mut().zip(src) {
        let x = s.abs();
        *d = dexpander_gain(x, c) * x;
    }
}

/// Upward expander gain for `|src|`
pub fn uexpander_x1_gain(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = uexpander_gain(s.abs(), c);
    }
}

/// Upward expander transfer curve: `gain(|src|) * |src|`
pub fn uexpander_x1_curve(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
    for (d, &s) in dst.iter_mut().zip(src) {
        let x = s.abs();
        *d = uexpander_gain(x, c) * x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_below_release_threshold() {
        let mut state = CompressorEnv {
            env: 0.0,
            rel_thresh: 0.25,
            attack: 0.55,
            release: 0.45,
        };
        let mut dst = [0.0f32];
        compressor_env(&mut dst, &[0.3], &mut state);
        assert!((dst[0] - 0.165).abs() < 1e-7);
        assert_eq!(state.env, dst[0]);
    }

    #[test]
    fn test_release_above_threshold_on_falling_input() {
        let mut state = CompressorEnv {
            env: 1.0,
            rel_thresh: 0.25,
            attack: 0.5,
            release: 0.1,
        };
        let mut dst = [0.0f32; 2];
        compressor_env(&mut dst, &[0.0, 2.0], &mut state);
        // falling: release, rising: attack
        assert_eq!(dst[0], 0.9);
        assert_eq!(dst[1], 0.9 + 0.5 * (2.0 - 0.9));
    }

    #[test]
    fn test_sidechain_rms_window() {
        let mut dst = [1.0f32, 2.0, 2.0];
        let mut head = [0.0f32; 3];
        let tail = [0.0f32, 0.0, 1.0];
        let rms = sidechain_rms(&mut dst, &mut head, &tail, 0.0, 0.25);
        assert_eq!(head, [1.0, 2.0, 2.0]);
        assert_eq!(rms, 1.0 + 4.0 + 4.0 - 1.0);
        assert_eq!(dst, [0.5, libm::sqrtf(5.0 * 0.25), libm::sqrtf(2.0)]);
    }

    #[test]
    fn test_sidechain_rms_clamps_negative_sum() {
        let mut dst = [0.0f32];
        let mut head = [0.0f32];
        let rms = sidechain_rms(&mut dst, &mut head, &[1.0], 0.5, 1.0);
        assert_eq!(rms, -0.5);
        assert_eq!(dst, [0.0]);
    }

    #[test]
    fn test_dexpander_regions() {
        let knee = ExpanderKnee {
            start: 0.031_622_782,
            end: 0.125_892_55,
            threshold: 0.01,
            herm: [-0.361_912_07, -1.499_999_9, -1.554_244_6],
            tilt: [1.0, 2.763_102],
        };
        let src = [1.0f32, -0.2, 0.001, 0.05, 0.02];
        let mut dst = [0.0f32; 5];
        dexpander_x1_gain(&mut dst, &src, &knee);
        assert_eq!(&dst[..3], &[1.0, 1.0, 0.0]);
        assert!(dst[3] > 0.0 && dst[3] < 1.0);
        assert!(dst[4] > 0.0 && dst[4] < dst[3]);
    }

    #[test]
    fn test_uexpander_holds_below_threshold() {
        let knee = ExpanderKnee {
            start: 0.1,
            end: 0.5,
            threshold: 2.0,
            herm: [0.0, 0.0, 0.0],
            tilt: [0.0, 0.0],
        };
        let src = [0.05f32, 3.0];
        let mut dst = [0.0f32; 2];
        uexpander_x1_gain(&mut dst, &src, &knee);
        assert_eq!(dst, [1.0, 1.0]);
        uexpander_x1_curve(&mut dst, &src, &knee);
        assert_eq!(dst, [0.05, 3.0]);
    }

    #[test]
    fn test_curves_stay_finite_on_silence_and_nan() {
        let knee = ExpanderKnee {
            start: 0.031_622_782,
            end: 0.125_892_55,
            threshold: 0.0,
            herm: [-0.361_912_07, -1.499_999_9, -1.554_244_6],
            tilt: [1.0, 2.763_102],
        };
        let mut dst = [0.0f32; 3];
        dexpander_x1_gain(&mut dst, &[f32::NAN, 0.0, -0.0], &knee);
        // All three sit on the tilt segment at the clamped level
        assert!(dst.iter().all(|g| g.is_finite() && *g > 0.0));
        assert_eq!(dst[0], dst[1]);
        assert_eq!(dst[1], dst[2]);

        let comp = CompressorX2 {
            k: [CompressorKnee {
                start: -1.0,
                end: 0.5,
                gain: 1.0,
                herm: [-0.1, -0.4, -0.2],
                tilt: [-0.5, -0.35],
            }; 2],
        };
        compressor_x2_gain(&mut dst, &[f32::NAN, 0.0, 1.0e30], &comp);
        assert!(dst.iter().all(|g| g.is_finite()));
    }
}
