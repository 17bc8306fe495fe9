//! Cross-tier verification
//!
//! Runs every operation of a dispatcher against the generic reference on
//! deterministic pseudo-random data, over lengths that exercise each
//! vector width's body and remainder and with buffers shifted off their
//! natural alignment. Used by the integration tests and `vecdsp selftest`.

use std::fmt;

use vecdsp_kernels::{
    CompressorEnv, CompressorKnee, CompressorX2, ExpanderKnee, Matrix3d, Vector3d,
};

use crate::capabilities::CapabilitySet;
use crate::dispatcher::Dispatcher;
use crate::table::OpId;
use crate::tier::Tier;

/// Acceptance bound between a kernel and the reference
///
/// A value passes if it is within `abs` of the reference or within `rel`
/// of the larger magnitude. NaN only matches NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Absolute bound
    pub abs: f32,
    /// Relative bound
    pub rel: f32,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            abs: 1e-6,
            rel: 1e-4,
        }
    }
}

impl Tolerance {
    /// Bit-for-bit equality (NaN still matches NaN)
    pub const EXACT: Tolerance = Tolerance { abs: 0.0, rel: 0.0 };

    /// Whether `actual` is close enough to `expected`
    pub fn accepts(&self, expected: f32, actual: f32) -> bool {
        self.accepts_scaled(expected, actual, expected.abs().max(actual.abs()))
    }

    /// Like [`Tolerance::accepts`], relative to `scale` instead of the
    /// values themselves (for sums that may cancel)
    pub fn accepts_scaled(&self, expected: f32, actual: f32, scale: f32) -> bool {
        if expected.is_nan() || actual.is_nan() {
            return expected.is_nan() && actual.is_nan();
        }
        if expected == actual {
            return true;
        }
        let diff = (expected - actual).abs();
        diff <= self.abs || diff <= self.rel * scale
    }
}

/// PCG32 generator (XSH-RR), deterministic across platforms
#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Generator for `seed`
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x2C92_77B5_27D4_EB2D),
        }
    }

    /// Next 32 random bits
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let xor_shifted = (((old >> 18) ^ old) >> 27) as u32;
        xor_shifted.rotate_right((old >> 59) as u32)
    }

    /// Uniform in `[0, 1]`
    #[inline]
    pub fn unit(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16_777_215.0
    }

    /// Uniform in `[lo, hi]`
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }

    /// Magnitude in `[0.25, 1.25]` with a random sign, safe as a divisor
    #[inline]
    pub fn nonzero(&mut self) -> f32 {
        let magnitude = self.range(0.25, 1.25);
        if self.next_u32() & 1 == 0 {
            magnitude
        } else {
            -magnitude
        }
    }
}

/// Buffer lengths covering every head/body/tail split up to 16 lanes
pub fn lengths() -> Vec<usize> {
    (0..=17).chain([32, 33, 64, 65, 100, 999, 4095]).collect()
}

/// Element offsets applied to every buffer
pub const OFFSETS: [usize; 2] = [0, 1];

/// One value outside tolerance
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Operation
    pub op: OpId,
    /// Tier of the kernel under test
    pub tier: Tier,
    /// Buffer length
    pub len: usize,
    /// Buffer offset
    pub offset: usize,
    /// What differed (`dst[3]`, `return`, `head[0]`, ...)
    pub location: String,
    /// Reference value
    pub expected: f32,
    /// Kernel value
    pub actual: f32,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] len {} offset {}: {} expected {:e}, got {:e}",
            self.op.name(),
            self.tier,
            self.len,
            self.offset,
            self.location,
            self.expected,
            self.actual
        )
    }
}

/// Outcome of checking one dispatcher
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Operations compared against the reference
    pub operations: usize,
    /// `(length, offset)` cases run
    pub cases: usize,
    /// First mismatch per failing case
    pub mismatches: Vec<Mismatch>,
}

impl Report {
    /// No mismatches
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compiled tiers (other than generic) that can run with `caps`
pub fn eligible_tiers(caps: CapabilitySet) -> Vec<Tier> {
    Tier::ALL
        .into_iter()
        .filter(|&t| t != Tier::Generic && t.is_compiled() && t.is_supported_by(caps))
        .collect()
}

/// Check every non-generic operation of `candidate` against the reference
pub fn check_dispatcher(candidate: &Dispatcher, tolerance: Tolerance) -> Report {
    let reference = Dispatcher::generic();
    let mut report = Report::default();
    for &op in OpId::ALL {
        if candidate.table().tier(op) == Tier::Generic {
            continue;
        }
        report.operations += 1;
        for len in lengths() {
            for offset in OFFSETS {
                report.cases += 1;
                let seed = ((op as u64) << 32) | ((len as u64) << 1) | offset as u64;
                let mut case = Case {
                    op,
                    tier: candidate.table().tier(op),
                    candidate,
                    reference: &reference,
                    len,
                    offset,
                    rng: Rng::new(seed),
                    tolerance,
                };
                if let Err(mismatch) = case.run() {
                    log::debug!("{mismatch}");
                    report.mismatches.push(mismatch);
                }
            }
        }
    }
    report
}

/// Check each eligible tier of `caps` in turn, lowest first
///
/// Each tier is checked through a dispatcher capped at that tier, so
/// operations without a kernel of that tier run the next lower one.
pub fn sweep(caps: CapabilitySet, tolerance: Tolerance) -> Vec<(Tier, Report)> {
    eligible_tiers(caps)
        .into_iter()
        .map(|tier| {
            let dispatcher = Dispatcher::new(caps & tier.requires());
            let report = check_dispatcher(&dispatcher, tolerance);
            log::info!(
                "{tier}: {} operations, {} cases, {} mismatches",
                report.operations,
                report.cases,
                report.mismatches.len()
            );
            (tier, report)
        })
        .collect()
}

// ============================================================================
// Per-operation cases
// ============================================================================

type Slice2 = fn(&Dispatcher, &mut [f32], &[f32]);
type Slice3 = fn(&Dispatcher, &mut [f32], &[f32], &[f32]);
type Ramp1 = fn(&Dispatcher, &mut [f32], f32, f32);
type Ramp2 = fn(&Dispatcher, &mut [f32], &[f32], f32, f32);
type Ramp3 = fn(&Dispatcher, &mut [f32], &[f32], &[f32], f32, f32);
type Dot = fn(&Dispatcher, &[f32], &[f32]) -> f32;
type Curve<P> = fn(&Dispatcher, &mut [f32], &[f32], &P);

/// Knees spanning the usual level range
fn compressor() -> CompressorX2 {
    let knee = CompressorKnee {
        start: 0.125,
        end: 0.5,
        gain: 1.0,
        herm: [-0.1, -0.4, -0.2],
        tilt: [-0.5, -0.35],
    };
    CompressorX2 {
        k: [
            knee,
            CompressorKnee {
                start: 0.25,
                end: 1.0,
                gain: 0.9,
                ..knee
            },
        ],
    }
}

fn expander(threshold: f32) -> ExpanderKnee {
    ExpanderKnee {
        start: 0.031_622_782,
        end: 0.125_892_55,
        threshold,
        herm: [-0.361_912_07, -1.499_999_9, -1.554_244_6],
        tilt: [1.0, 2.763_102],
    }
}

struct Case<'a> {
    op: OpId,
    tier: Tier,
    candidate: &'a Dispatcher,
    reference: &'a Dispatcher,
    len: usize,
    offset: usize,
    rng: Rng,
    tolerance: Tolerance,
}

impl Case<'_> {
    fn run(&mut self) -> Result<(), Mismatch> {
        match self.op {
            OpId::Copy => self.slice2(Dispatcher::copy),
            OpId::Fill => {
                let k = self.rng.nonzero();
                self.ramp1(|d, dst, v, _| d.fill(dst, v), k, k)
            }
            OpId::Add2 => self.slice2(Dispatcher::add2),
            OpId::Sub2 => self.slice2(Dispatcher::sub2),
            OpId::RSub2 => self.slice2(Dispatcher::rsub2),
            OpId::Mul2 => self.slice2(Dispatcher::mul2),
            OpId::Div2 => self.slice2(Dispatcher::div2),
            OpId::RDiv2 => self.slice2(Dispatcher::rdiv2),
            OpId::Mod2 => self.slice2(Dispatcher::mod2),
            OpId::RMod2 => self.slice2(Dispatcher::rmod2),
            OpId::Add3 => self.slice3(Dispatcher::add3),
            OpId::Sub3 => self.slice3(Dispatcher::sub3),
            OpId::Mul3 => self.slice3(Dispatcher::mul3),
            OpId::Div3 => self.slice3(Dispatcher::div3),
            OpId::Ssqrt1 => self.slice2(|d, dst, _| d.ssqrt1(dst)),
            OpId::Ssqrt2 => self.slice2(Dispatcher::ssqrt2),

            OpId::LrampSet1 => self.ramps1(Dispatcher::lramp_set1),
            OpId::Lramp1 => self.ramps1(Dispatcher::lramp1),
            OpId::Lramp2 => self.ramps2(Dispatcher::lramp2),
            OpId::LrampAdd2 => self.ramps2(Dispatcher::lramp_add2),
            OpId::LrampSub2 => self.ramps2(Dispatcher::lramp_sub2),
            OpId::LrampRSub2 => self.ramps2(Dispatcher::lramp_rsub2),
            OpId::LrampMul2 => self.ramps2(Dispatcher::lramp_mul2),
            OpId::LrampDiv2 => self.ramps2(Dispatcher::lramp_div2),
            OpId::LrampRDiv2 => self.ramps2(Dispatcher::lramp_rdiv2),
            OpId::LrampAdd3 => self.ramps3(Dispatcher::lramp_add3),
            OpId::LrampSub3 => self.ramps3(Dispatcher::lramp_sub3),
            OpId::LrampRSub3 => self.ramps3(Dispatcher::lramp_rsub3),
            OpId::LrampMul3 => self.ramps3(Dispatcher::lramp_mul3),
            OpId::LrampDiv3 => self.ramps3(Dispatcher::lramp_div3),
            OpId::LrampRDiv3 => self.ramps3(Dispatcher::lramp_rdiv3),

            OpId::PcomplexMul2 => self.even().slice2(Dispatcher::pcomplex_mul2),
            OpId::PcomplexMul3 => self.even().slice3(Dispatcher::pcomplex_mul3),

            OpId::HDotp => self.dot(Dispatcher::h_dotp),
            OpId::HSqrDotp => self.dot(Dispatcher::h_sqr_dotp),
            OpId::HAbsDotp => self.dot(Dispatcher::h_abs_dotp),

            OpId::CompressorEnv => self.envelope(),
            OpId::SidechainRms => self.sidechain(),
            OpId::CompressorX2Gain => self.curve(Dispatcher::compressor_x2_gain, &compressor()),
            OpId::CompressorX2Curve => self.curve(Dispatcher::compressor_x2_curve, &compressor()),
            OpId::DexpanderX1Gain => self.curve(Dispatcher::dexpander_x1_gain, &expander(0.01)),
            OpId::DexpanderX1Curve => self.curve(Dispatcher::dexpander_x1_curve, &expander(0.01)),
            OpId::UexpanderX1Gain => self.curve(Dispatcher::uexpander_x1_gain, &expander(0.5)),
            OpId::UexpanderX1Curve => self.curve(Dispatcher::uexpander_x1_curve, &expander(0.5)),

            OpId::CalcAngle3dV2 => self.angles(false),
            OpId::CalcAngle3dVv => self.angles(true),
            OpId::ApplyMatrix3dMv2 => self.transforms(false),
            OpId::ApplyMatrix3dMv1 => self.transforms(true),
        }
    }

    /// Complex ops work on whole pairs
    fn even(&mut self) -> &mut Self {
        self.len &= !1;
        self
    }

    fn buffer(&mut self) -> Vec<f32> {
        (0..self.len + self.offset).map(|_| self.rng.nonzero()).collect()
    }

    fn mismatch(&self, location: String, expected: f32, actual: f32) -> Mismatch {
        Mismatch {
            op: self.op,
            tier: self.tier,
            len: self.len,
            offset: self.offset,
            location,
            expected,
            actual,
        }
    }

    fn compare(&self, name: &str, expected: &[f32], actual: &[f32]) -> Result<(), Mismatch> {
        for (i, (&e, &a)) in expected.iter().zip(actual).enumerate() {
            if !self.tolerance.accepts(e, a) {
                return Err(self.mismatch(format!("{name}[{i}]"), e, a));
            }
        }
        Ok(())
    }

    fn compare_value(&self, name: &str, expected: f32, actual: f32) -> Result<(), Mismatch> {
        if self.tolerance.accepts(expected, actual) {
            Ok(())
        } else {
            Err(self.mismatch(name.to_string(), expected, actual))
        }
    }

    fn slice2(&mut self, f: Slice2) -> Result<(), Mismatch> {
        let o = self.offset;
        let src = self.buffer();
        let mut want = self.buffer();
        let mut got = want.clone();
        f(self.reference, &mut want[o..], &src[o..]);
        f(self.candidate, &mut got[o..], &src[o..]);
        self.compare("dst", &want, &got)
    }

    fn slice3(&mut self, f: Slice3) -> Result<(), Mismatch> {
        let o = self.offset;
        let a = self.buffer();
        let b = self.buffer();
        let mut want = vec![0.0f32; self.len + o];
        let mut got = want.clone();
        f(self.reference, &mut want[o..], &a[o..], &b[o..]);
        f(self.candidate, &mut got[o..], &a[o..], &b[o..]);
        self.compare("dst", &want, &got)
    }

    fn ramp1(&mut self, f: Ramp1, v1: f32, v2: f32) -> Result<(), Mismatch> {
        let o = self.offset;
        let mut want = self.buffer();
        let mut got = want.clone();
        f(self.reference, &mut want[o..], v1, v2);
        f(self.candidate, &mut got[o..], v1, v2);
        self.compare("dst", &want, &got)
    }

    /// Ramps are checked both sloped and flat
    fn ramp_ends(&mut self) -> [(f32, f32); 2] {
        let v1 = self.rng.range(-2.0, 2.0);
        let v2 = self.rng.range(-2.0, 2.0);
        [(v1, v2), (v1, v1)]
    }

    fn ramps1(&mut self, f: Ramp1) -> Result<(), Mismatch> {
        for (v1, v2) in self.ramp_ends() {
            self.ramp1(f, v1, v2)?;
        }
        Ok(())
    }

    fn ramps2(&mut self, f: Ramp2) -> Result<(), Mismatch> {
        let o = self.offset;
        for (v1, v2) in self.ramp_ends() {
            let src = self.buffer();
            let mut want = self.buffer();
            let mut got = want.clone();
            f(self.reference, &mut want[o..], &src[o..], v1, v2);
            f(self.candidate, &mut got[o..], &src[o..], v1, v2);
            self.compare("dst", &want, &got)?;
        }
        Ok(())
    }

    fn ramps3(&mut self, f: Ramp3) -> Result<(), Mismatch> {
        let o = self.offset;
        for (v1, v2) in self.ramp_ends() {
            let a = self.buffer();
            let b = self.buffer();
            let mut want = vec![0.0f32; self.len + o];
            let mut got = want.clone();
            f(self.reference, &mut want[o..], &a[o..], &b[o..], v1, v2);
            f(self.candidate, &mut got[o..], &a[o..], &b[o..], v1, v2);
            self.compare("dst", &want, &got)?;
        }
        Ok(())
    }

    fn dot(&mut self, f: Dot) -> Result<(), Mismatch> {
        let o = self.offset;
        let a = self.buffer();
        let b = self.buffer();
        let expected = f(self.reference, &a[o..], &b[o..]);
        let actual = f(self.candidate, &a[o..], &b[o..]);
        // Signed sums may cancel; bound the error by the sum of magnitudes
        let scale = a[o..]
            .iter()
            .zip(&b[o..])
            .map(|(x, y)| (x * y).abs().max((x * x) * (y * y)))
            .sum::<f32>();
        if self.tolerance.accepts_scaled(expected, actual, scale) {
            Ok(())
        } else {
            Err(self.mismatch("return".into(), expected, actual))
        }
    }

    fn envelope(&mut self) -> Result<(), Mismatch> {
        let o = self.offset;
        let src: Vec<f32> = (0..self.len + o).map(|_| self.rng.unit()).collect();
        let mut want_state = CompressorEnv::new(0.25, 0.55, 0.05);
        want_state.env = self.rng.unit();
        let mut got_state = want_state;
        let mut want = vec![0.0f32; self.len + o];
        let mut got = want.clone();
        self.reference
            .compressor_env(&mut want[o..], &src[o..], &mut want_state);
        self.candidate
            .compressor_env(&mut got[o..], &src[o..], &mut got_state);
        self.compare("dst", &want, &got)?;
        self.compare_value("env", want_state.env, got_state.env)
    }

    fn sidechain(&mut self) -> Result<(), Mismatch> {
        let o = self.offset;
        let tail = self.buffer();
        let mut want = self.buffer();
        let mut got = want.clone();
        let mut want_head = vec![0.0f32; self.len + o];
        let mut got_head = want_head.clone();
        let rms = self.rng.range(0.0, 4.0);
        let k = 1.0 / 64.0;
        let r1 = self
            .reference
            .sidechain_rms(&mut want[o..], &mut want_head[o..], &tail[o..], rms, k);
        let r2 = self
            .candidate
            .sidechain_rms(&mut got[o..], &mut got_head[o..], &tail[o..], rms, k);
        self.compare("dst", &want, &got)?;
        self.compare("head", &want_head, &got_head)?;
        self.compare_value("return", r1, r2)
    }

    fn curve<P>(&mut self, f: Curve<P>, params: &P) -> Result<(), Mismatch> {
        let o = self.offset;
        let mut src: Vec<f32> = (0..self.len + o).map(|_| self.rng.range(-1.5, 1.5)).collect();
        // Silence and NaN take the clamped-log path
        for (i, edge) in [f32::NAN, 0.0, -0.0].into_iter().enumerate() {
            if let Some(s) = src.get_mut(o + i * 5) {
                *s = edge;
            }
        }
        let mut want = vec![0.0f32; self.len + o];
        let mut got = want.clone();
        f(self.reference, &mut want[o..], &src[o..], params);
        f(self.candidate, &mut got[o..], &src[o..], params);
        self.compare("dst", &want, &got)
    }

    fn vector(&mut self) -> Vector3d {
        Vector3d::new(self.rng.nonzero(), self.rng.nonzero(), self.rng.nonzero())
    }

    fn angles(&mut self, paired: bool) -> Result<(), Mismatch> {
        for i in 0..self.len.max(1) {
            let v = [self.vector(), self.vector()];
            let (expected, actual) = if paired {
                (
                    self.reference.calc_angle3d_vv(&v),
                    self.candidate.calc_angle3d_vv(&v),
                )
            } else {
                (
                    self.reference.calc_angle3d_v2(&v[0], &v[1]),
                    self.candidate.calc_angle3d_v2(&v[0], &v[1]),
                )
            };
            self.compare_value(&format!("angle #{i}"), expected, actual)?;
        }
        Ok(())
    }

    fn transforms(&mut self, in_place: bool) -> Result<(), Mismatch> {
        for i in 0..self.len.max(1) {
            let m = Matrix3d::rotate_x(self.rng.range(-3.0, 3.0))
                .compose(&Matrix3d::rotate_z(self.rng.range(-3.0, 3.0)))
                .compose(&Matrix3d::translate(
                    self.rng.nonzero(),
                    self.rng.nonzero(),
                    self.rng.nonzero(),
                ));
            let mut v = self.vector();
            v.dw = self.rng.unit();
            let (mut want, mut got) = (v, v);
            if in_place {
                self.reference.apply_matrix3d_mv1(&mut want, &m);
                self.candidate.apply_matrix3d_mv1(&mut got, &m);
            } else {
                self.reference.apply_matrix3d_mv2(&mut want, &v, &m);
                self.candidate.apply_matrix3d_mv2(&mut got, &v, &m);
            }
            let expected = [want.dx, want.dy, want.dz, want.dw];
            let actual = [got.dx, got.dy, got.dz, got.dw];
            self.compare(&format!("r#{i}"), &expected, &actual)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_rules() {
        let tol = Tolerance::default();
        assert!(tol.accepts(1.0, 1.0 + 1e-5));
        assert!(!tol.accepts(1.0, 1.001));
        assert!(tol.accepts(0.0, 1e-7));
        assert!(tol.accepts(f32::NAN, f32::NAN));
        assert!(!tol.accepts(f32::NAN, 0.0));
        assert!(tol.accepts(f32::INFINITY, f32::INFINITY));
        assert!(!Tolerance::EXACT.accepts(1.0, 1.0 + f32::EPSILON));
    }

    #[test]
    fn test_rng_is_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            let x = a.nonzero();
            assert_eq!(x, b.nonzero());
            assert!((0.25..=1.25).contains(&x.abs()));
        }
    }

    #[test]
    fn test_generic_matches_itself() {
        // Every operation is skipped: the generic table has nothing to check
        let report = check_dispatcher(&Dispatcher::generic(), Tolerance::EXACT);
        assert_eq!(report.operations, 0);
        assert!(report.is_ok());
    }

    #[test]
    fn test_lengths_cover_remainders() {
        let lens = lengths();
        assert!(lens.contains(&0) && lens.contains(&17) && lens.contains(&4095));
        assert!(eligible_tiers(CapabilitySet::empty()).is_empty());
    }
}
