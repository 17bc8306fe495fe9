//! Envelope follower, sidechain detector and gain curves
//!
//! The envelope and running-sum recurrences are serial, so their vector
//! steps only batch the loads and stores (and, for the sidechain, the
//! squaring) and then walk the lanes in order. Gain curves are fully
//! vectorized with the polynomial [`ln`] / [`exp`].

use crate::block::{BlockKernel, Cascade};
use crate::generic;
use crate::math::{exp, ln};
use crate::traits::SimdVector;
use crate::types::{CompressorEnv, CompressorKnee, CompressorX2, ExpanderKnee};

use super::pmath::ssqrt_v;

/// Widest register in lanes, sizes the staging buffers
const MAX_LANES: usize = 16;

struct Env<'a> {
    dst: &'a mut [f32],
    src: &'a [f32],
    state: &'a mut CompressorEnv,
}

impl BlockKernel for Env<'_> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let mut lanes = [0.0f32; MAX_LANES];
        V::from_slice(&self.src[i..]).to_slice(&mut lanes);
        let mut env = self.state.env;
        for lane in &mut lanes[..V::LANES] {
            env = generic::env_step(env, *lane, self.state);
            *lane = env;
        }
        self.state.env = env;
        V::from_slice(&lanes).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        let env = generic::env_step(self.state.env, self.src[i], self.state);
        self.state.env = env;
        self.dst[i] = env;
    }
}

/// Envelope follower, see [`generic::compressor_env`]
#[inline(always)]
pub fn compressor_env<C: Cascade>(dst: &mut [f32], src: &[f32], state: &mut CompressorEnv) {
    C::run(&mut Env { dst, src, state })
}

struct Sidechain<'a> {
    dst: &'a mut [f32],
    head: &'a mut [f32],
    tail: &'a [f32],
    rms: f32,
    k: f32,
}

impl BlockKernel for Sidechain<'_> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let s = V::from_slice(&self.dst[i..]);
        let t = V::from_slice(&self.tail[i..]);
        s.to_slice(&mut self.head[i..]);

        let mut lanes = [0.0f32; MAX_LANES];
        s.mul(s).sub(t.mul(t)).to_slice(&mut lanes);
        let mut rms = self.rms;
        for lane in &mut lanes[..V::LANES] {
            rms += *lane;
            *lane = rms * self.k;
        }
        self.rms = rms;
        ssqrt_v(V::from_slice(&lanes)).to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        let s = self.dst[i];
        let t = self.tail[i];
        self.head[i] = s;
        self.rms += s * s - t * t;
        self.dst[i] = generic::ssqrt(self.rms * self.k);
    }
}

/// Running-sum RMS detector, see [`generic::sidechain_rms`]
#[inline(always)]
pub fn sidechain_rms<C: Cascade>(
    dst: &mut [f32],
    head: &mut [f32],
    tail: &[f32],
    rms: f32,
    k: f32,
) -> f32 {
    let mut kernel = Sidechain {
        dst,
        head,
        tail,
        rms,
        k,
    };
    C::run(&mut kernel);
    kernel.rms
}

// ============================================================================
// Gain curves
// ============================================================================

#[inline(always)]
fn hermite<V: SimdVector>(lx: V, herm: &[f32; 3]) -> V {
    V::splat(herm[0])
        .mul(lx)
        .add(V::splat(herm[1]))
        .mul(lx)
        .add(V::splat(herm[2]))
}

#[inline(always)]
fn tilt<V: SimdVector>(lx: V, tilt: &[f32; 2]) -> V {
    V::splat(tilt[0]).mul(lx).add(V::splat(tilt[1]))
}

#[inline(always)]
fn compressor_knee_gain_v<V: SimdVector>(x: V, k: &CompressorKnee) -> V {
    let lx = ln(x);
    let above = x.ge(V::splat(k.end));
    let g = exp(V::select(above, tilt(lx, &k.tilt), hermite(lx, &k.herm)));
    V::select(x.le(V::splat(k.start)), V::splat(k.gain), g)
}

#[inline(always)]
fn dexpander_gain_v<V: SimdVector>(x: V, c: &ExpanderKnee) -> V {
    let lx = ln(x);
    let inside = x.ge(V::splat(c.start));
    let g = exp(V::select(inside, hermite(lx, &c.herm), tilt(lx, &c.tilt)));
    let g = V::select(x.lt(V::splat(c.threshold)), V::splat(0.0), g);
    V::select(x.ge(V::splat(c.end)), V::splat(1.0), g)
}

#[inline(always)]
fn uexpander_gain_v<V: SimdVector>(x: V, c: &ExpanderKnee) -> V {
    let x = x.min(V::splat(c.threshold));
    let lx = ln(x);
    let above = x.ge(V::splat(c.end));
    let g = exp(V::select(above, tilt(lx, &c.tilt), hermite(lx, &c.herm)));
    V::select(x.le(V::splat(c.start)), V::splat(1.0), g)
}

/// Gain as a function of input level
trait Curve {
    fn gain(&self, x: f32) -> f32;
    fn gain_v<V: SimdVector>(&self, x: V) -> V;
}

impl Curve for CompressorX2 {
    #[inline(always)]
    fn gain(&self, x: f32) -> f32 {
        generic::compressor_knee_gain(x, &self.k[0]) * generic::compressor_knee_gain(x, &self.k[1])
    }

    #[inline(always)]
    fn gain_v<V: SimdVector>(&self, x: V) -> V {
        compressor_knee_gain_v(x, &self.k[0]).mul(compressor_knee_gain_v(x, &self.k[1]))
    }
}

struct Downward<'a>(&'a ExpanderKnee);
struct Upward<'a>(&'a ExpanderKnee);

impl Curve for Downward<'_> {
    #[inline(always)]
    fn gain(&self, x: f32) -> f32 {
        generic::dexpander_gain(x, self.0)
    }

    #[inline(always)]
    fn gain_v<V: SimdVector>(&self, x: V) -> V {
        dexpander_gain_v(x, self.0)
    }
}

impl Curve for Upward<'_> {
    #[inline(always)]
    fn gain(&self, x: f32) -> f32 {
        generic::uexpander_gain(x, self.0)
    }

    #[inline(always)]
    fn gain_v<V: SimdVector>(&self, x: V) -> V {
        uexpander_gain_v(x, self.0)
    }
}

struct Shape<'a, G> {
    dst: &'a mut [f32],
    src: &'a [f32],
    curve: G,
    /// Multiply the gain by the input level
    transfer: bool,
}

impl<G: Curve> BlockKernel for Shape<'_, G> {
    fn len(&self) -> usize {
        self.dst.len()
    }

    #[inline(always)]
    fn vector<V: SimdVector>(&mut self, i: usize) {
        let x = V::from_slice(&self.src[i..]).abs();
        let g = self.curve.gain_v(x);
        let out = if self.transfer { g.mul(x) } else { g };
        out.to_slice(&mut self.dst[i..]);
    }

    #[inline(always)]
    fn scalar(&mut self, i: usize) {
        let x = self.src[i].abs();
        let g = self.curve.gain(x);
        self.dst[i] = if self.transfer { g * x } else { g };
    }
}

#[inline(always)]
fn shape<C: Cascade, G: Curve>(dst: &mut [f32], src: &[f32], curve: G, transfer: bool) {
    C::run(&mut Shape {
        dst,
        src,
        curve,
        transfer,
    })
}

/// Two-knee compressor gain for `|src|`
#[inline(always)]
pub fn compressor_x2_gain<C: Cascade>(dst: &mut [f32], src: &[f32], c: &CompressorX2) {
    shape::<C, _>(dst, src, *c, false)
}

/// Two-knee compressor transfer curve
#[inline(always)]
pub fn compressor_x2_curve<C: Cascade>(dst: &mut [f32], src: &[f32], c: &CompressorX2) {
    shape::<C, _>(dst, src, *c, true)
}

/// Downward expander gain for `|src|`
#[inline(always)]
pub fn dexpander_x1_gain<C: Cascade>(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
    shape::<C, _>(dst, src, Downward(c), false)
}

/// Downward expander transfer curve
#[inline(always)]
pub fn dexpander_x1_curve<C: Cascade>(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
    shape::<C, _>(dst, src, Downward(c), true)
}

/// Upward expander gain for `|src|`
#[inline(always)]
pub fn uexpander_x1_gain<C: Cascade>(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
    shape::<C, _>(dst, src, Upward(c), false)
}

/// Upward expander transfer curve
#[inline(always)]
pub fn uexpander_x1_curve<C: Cascade>(dst: &mut [f32], src: &[f32], c: &ExpanderKnee) {
    shape::<C, _>(dst, src, Upward(c), true)
}
