//! Parameter and state records shared by every tier
//!
//! All records are `#[repr(C)]` plain data so they can cross an FFI
//! boundary unchanged. Only [`CompressorEnv`] is mutated by a kernel.

// ============================================================================
// Dynamics
// ============================================================================

/// Envelope follower state
///
/// `env` is carried from one call to the next. `attack` and `release` are
/// smoothing coefficients in `[0, 1]`; `rel_thresh` is the level above which
/// falling input uses the release coefficient.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompressorEnv {
    /// Current envelope value
    pub env: f32,
    /// Release threshold
    pub rel_thresh: f32,
    /// Attack coefficient
    pub attack: f32,
    /// Release coefficient
    pub release: f32,
}

impl CompressorEnv {
    /// New follower starting from a zero envelope
    pub const fn new(rel_thresh: f32, attack: f32, release: f32) -> Self {
        Self {
            env: 0.0,
            rel_thresh,
            attack,
            release,
        }
    }
}

/// One compressor knee
///
/// Gain curve in the log domain:
///
/// ```text
/// x <= start        gain
/// x >= end          exp(tilt[0] * ln x + tilt[1])
/// otherwise         exp((herm[0] * ln x + herm[1]) * ln x + herm[2])
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompressorKnee {
    /// Knee start (linear amplitude)
    pub start: f32,
    /// Knee end (linear amplitude)
    pub end: f32,
    /// Gain below the knee
    pub gain: f32,
    /// Hermite interpolation coefficients inside the knee
    pub herm: [f32; 3],
    /// Log-linear segment above the knee
    pub tilt: [f32; 2],
}

/// Two compressor knees applied together (the gains multiply)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompressorX2 {
    /// Knees
    pub k: [CompressorKnee; 2],
}

/// One expander knee
///
/// Downward expanders attenuate below `start`, muting below `threshold`;
/// upward expanders boost below `start`, holding the boost below
/// `threshold`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExpanderKnee {
    /// Knee start (linear amplitude)
    pub start: f32,
    /// Knee end (linear amplitude)
    pub end: f32,
    /// Mute (downward) or hold (upward) level
    pub threshold: f32,
    /// Hermite interpolation coefficients inside the knee
    pub herm: [f32; 3],
    /// Log-linear segment outside the knee
    pub tilt: [f32; 2],
}

// ============================================================================
// 3D geometry
// ============================================================================

/// Direction vector (`dw` is normally 0)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3d {
    /// X component
    pub dx: f32,
    /// Y component
    pub dy: f32,
    /// Z component
    pub dz: f32,
    /// Homogeneous component
    pub dw: f32,
}

/// Point in homogeneous coordinates (`w` is normally 1)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3d {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate
    pub z: f32,
    /// Homogeneous coordinate
    pub w: f32,
}

/// 4x4 transform, row-major: `m[row * 4 + col]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3d {
    /// Elements, row-major
    pub m: [f32; 16],
}

impl Vector3d {
    /// Direction vector with `dw = 0`
    pub const fn new(dx: f32, dy: f32, dz: f32) -> Self {
        Self { dx, dy, dz, dw: 0.0 }
    }

    /// Vector from `from` to `to`
    pub fn between(from: &Point3d, to: &Point3d) -> Self {
        Self::new(to.x - from.x, to.y - from.y, to.z - from.z)
    }

    /// Dot product of the xyz components
    pub fn dot(&self, rhs: &Self) -> f32 {
        self.dx * rhs.dx + self.dy * rhs.dy + self.dz * rhs.dz
    }

    /// Cross product
    pub fn cross(&self, rhs: &Self) -> Self {
        Self::new(
            self.dy * rhs.dz - self.dz * rhs.dy,
            self.dz * rhs.dx - self.dx * rhs.dz,
            self.dx * rhs.dy - self.dy * rhs.dx,
        )
    }

    /// Euclidean length of the xyz components
    pub fn length(&self) -> f32 {
        libm::sqrtf(self.dot(self))
    }

    /// Unit vector in the same direction; a zero vector stays zero
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len <= 0.0 {
            return *self;
        }
        let inv = 1.0 / len;
        Self {
            dx: self.dx * inv,
            dy: self.dy * inv,
            dz: self.dz * inv,
            dw: self.dw,
        }
    }

    pub(crate) fn to_array(self) -> [f32; 4] {
        [self.dx, self.dy, self.dz, self.dw]
    }

    pub(crate) fn from_array(a: [f32; 4]) -> Self {
        Self {
            dx: a[0],
            dy: a[1],
            dz: a[2],
            dw: a[3],
        }
    }
}

impl Point3d {
    /// Point with `w = 1`
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }
}

impl Default for Matrix3d {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3d {
    /// Identity transform
    pub const fn identity() -> Self {
        Self {
            m: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Rotation by `angle` radians about the x axis
    pub fn rotate_x(angle: f32) -> Self {
        let (s, c) = (libm::sinf(angle), libm::cosf(angle));
        let mut r = Self::identity();
        r.m[5] = c;
        r.m[6] = -s;
        r.m[9] = s;
        r.m[10] = c;
        r
    }

    /// Rotation by `angle` radians about the y axis
    pub fn rotate_y(angle: f32) -> Self {
        let (s, c) = (libm::sinf(angle), libm::cosf(angle));
        let mut r = Self::identity();
        r.m[0] = c;
        r.m[2] = s;
        r.m[8] = -s;
        r.m[10] = c;
        r
    }

    /// Rotation by `angle` radians about the z axis
    pub fn rotate_z(angle: f32) -> Self {
        let (s, c) = (libm::sinf(angle), libm::cosf(angle));
        let mut r = Self::identity();
        r.m[0] = c;
        r.m[1] = -s;
        r.m[4] = s;
        r.m[5] = c;
        r
    }

    /// Axis-aligned scale
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut r = Self::identity();
        r.m[0] = sx;
        r.m[5] = sy;
        r.m[10] = sz;
        r
    }

    /// Translation (affects points, not direction vectors)
    pub fn translate(dx: f32, dy: f32, dz: f32) -> Self {
        let mut r = Self::identity();
        r.m[3] = dx;
        r.m[7] = dy;
        r.m[11] = dz;
        r
    }

    /// Matrix product `self * rhs` (apply `rhs` first)
    pub fn compose(&self, rhs: &Self) -> Self {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = (0..4).map(|k| self.m[row * 4 + k] * rhs.m[k * 4 + col]).sum();
            }
        }
        Self { m: out }
    }

    /// Row `i` as an array
    pub(crate) fn row(&self, i: usize) -> [f32; 4] {
        let r = &self.m[i * 4..i * 4 + 4];
        [r[0], r[1], r[2], r[3]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_z_quarter_turn() {
        let m = Matrix3d::rotate_z(core::f32::consts::FRAC_PI_2);
        // row 1 · (1, 0, 0, 0) = sin
        assert!((m.m[4] - 1.0).abs() < 1e-6);
        assert!(m.m[0].abs() < 1e-6);
    }

    #[test]
    fn test_identity_is_neutral_for_mul() {
        let r = Matrix3d::rotate_x(0.3);
        assert_eq!(Matrix3d::identity().compose(&r), r);
        assert_eq!(r.compose(&Matrix3d::identity()), r);
    }

    #[test]
    fn test_vector_helpers() {
        let x = Vector3d::new(1.0, 0.0, 0.0);
        let y = Vector3d::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector3d::new(0.0, 0.0, 1.0));
        assert_eq!(Vector3d::new(3.0, 4.0, 0.0).length(), 5.0);
        assert_eq!(Vector3d::default().normalized(), Vector3d::default());
        let d = Vector3d::between(&Point3d::new(1.0, 1.0, 1.0), &Point3d::new(2.0, 3.0, 4.0));
        assert_eq!(d, Vector3d::new(1.0, 2.0, 3.0));
    }
}
