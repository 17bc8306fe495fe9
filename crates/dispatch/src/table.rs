//! Logical operations and the resolved dispatch table
//!
//! The operation list is declared once in [`define_operations!`]; it
//! generates [`OpId`], the per-operation descriptor lists of
//! [`KernelSet`](crate::registry::KernelSet) and the [`DispatchTable`]
//! fields, so adding an operation is a single line here plus its
//! registrations.

use vecdsp_kernels::{CompressorEnv, CompressorX2, ExpanderKnee, Matrix3d, Vector3d};

use crate::capabilities::CapabilitySet;
use crate::registry::{select, KernelDescriptor, RegistryError};
use crate::tier::Tier;

// Kernel entry signatures. `unsafe` because a tier entry may only run on a
// CPU with that tier's capabilities.

/// `copy`, `*2` pointwise ops, `ssqrt2`, `pcomplex_mul2`
pub type SliceFn = unsafe fn(&mut [f32], &[f32]);
/// `fill`
pub type FillFn = unsafe fn(&mut [f32], f32);
/// `*3` pointwise ops, `pcomplex_mul3`
pub type Slice3Fn = unsafe fn(&mut [f32], &[f32], &[f32]);
/// `ssqrt1`
pub type InPlaceFn = unsafe fn(&mut [f32]);
/// `lramp_set1`, `lramp1`
pub type RampFn = unsafe fn(&mut [f32], f32, f32);
/// `lramp2`, `lramp_*2`
pub type Ramp2Fn = unsafe fn(&mut [f32], &[f32], f32, f32);
/// `lramp_*3`
pub type Ramp3Fn = unsafe fn(&mut [f32], &[f32], &[f32], f32, f32);
/// `h_*dotp`
pub type DotFn = unsafe fn(&[f32], &[f32]) -> f32;
/// `compressor_env`
pub type EnvFn = unsafe fn(&mut [f32], &[f32], &mut CompressorEnv);
/// `sidechain_rms`
pub type SidechainFn = unsafe fn(&mut [f32], &mut [f32], &[f32], f32, f32) -> f32;
/// `compressor_x2_*`
pub type CompressorFn = unsafe fn(&mut [f32], &[f32], &CompressorX2);
/// `dexpander_x1_*`, `uexpander_x1_*`
pub type ExpanderFn = unsafe fn(&mut [f32], &[f32], &ExpanderKnee);
/// `calc_angle3d_v2`
pub type AngleFn = unsafe fn(&Vector3d, &Vector3d) -> f32;
/// `calc_angle3d_vv`
pub type AnglePairFn = unsafe fn(&[Vector3d; 2]) -> f32;
/// `apply_matrix3d_mv2`
pub type MatrixFn = unsafe fn(&mut Vector3d, &Vector3d, &Matrix3d);
/// `apply_matrix3d_mv1`
pub type MatrixInPlaceFn = unsafe fn(&mut Vector3d, &Matrix3d);

/// A selected kernel
#[derive(Clone, Copy)]
pub struct Resolved<F> {
    /// Entry point
    pub entry: F,
    /// Tier the entry belongs to
    pub tier: Tier,
}

macro_rules! define_operations {
    ($( $field:ident => $variant:ident: $sig:ty, )*) => {
        /// Logical operation identifier
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum OpId {
            $(
                #[doc = concat!("`", stringify!($field), "`")]
                $variant,
            )*
        }

        impl OpId {
            /// Every operation, in declaration order
            pub const ALL: &'static [OpId] = &[$(OpId::$variant,)*];

            /// Function name of the operation
            pub const fn name(self) -> &'static str {
                match self {
                    $(OpId::$variant => stringify!($field),)*
                }
            }

            /// Look an operation up by function name
            pub fn from_name(name: &str) -> Option<OpId> {
                OpId::ALL.iter().copied().find(|op| op.name() == name)
            }
        }

        /// Candidate kernels, one list per operation
        ///
        /// Lists are in registration order, which breaks rank ties.
        #[derive(Clone, Default)]
        pub struct KernelSet {
            $(
                #[doc = concat!("Candidates for `", stringify!($field), "`")]
                pub $field: Vec<KernelDescriptor<$sig>>,
            )*
        }

        impl KernelSet {
            /// Check every operation's list, see [`RegistryError`]
            pub fn validate(&self) -> Result<(), RegistryError> {
                $( crate::registry::check(OpId::$variant, &self.$field)?; )*
                Ok(())
            }

            /// Tiers with a kernel for `op`, in registration order
            pub fn tiers_for(&self, op: OpId) -> Vec<Tier> {
                match op {
                    $(OpId::$variant => self.$field.iter().map(|d| d.tier).collect(),)*
                }
            }
        }

        /// One resolved kernel per operation, fixed after construction
        #[derive(Clone)]
        pub struct DispatchTable {
            capabilities: CapabilitySet,
            $( pub(crate) $field: Resolved<$sig>, )*
        }

        impl DispatchTable {
            /// Validate `set` and pick, per operation, the highest-ranked
            /// kernel whose requirements `caps` satisfies
            ///
            /// `caps` is trusted: the table may hand out entries that only
            /// run on a CPU with those capabilities.
            pub fn resolve(set: &KernelSet, caps: CapabilitySet) -> Result<Self, RegistryError> {
                set.validate()?;
                Ok(Self {
                    capabilities: caps,
                    $( $field: select(OpId::$variant, &set.$field, caps)?, )*
                })
            }

            /// Every operation bound to its generic reference
            ///
            /// Cannot fail and runs on any CPU.
            pub fn generic() -> Self {
                Self {
                    capabilities: CapabilitySet::empty(),
                    $(
                        $field: Resolved {
                            entry: vecdsp_kernels::generic::$field,
                            tier: Tier::Generic,
                        },
                    )*
                }
            }

            /// Tier selected for `op`
            pub fn tier(&self, op: OpId) -> Tier {
                match op {
                    $(OpId::$variant => self.$field.tier,)*
                }
            }
        }
    };
}

define_operations! {
    copy => Copy: SliceFn,
    fill => Fill: FillFn,

    add2 => Add2: SliceFn,
    sub2 => Sub2: SliceFn,
    rsub2 => RSub2: SliceFn,
    mul2 => Mul2: SliceFn,
    div2 => Div2: SliceFn,
    rdiv2 => RDiv2: SliceFn,
    mod2 => Mod2: SliceFn,
    rmod2 => RMod2: SliceFn,
    add3 => Add3: Slice3Fn,
    sub3 => Sub3: Slice3Fn,
    mul3 => Mul3: Slice3Fn,
    div3 => Div3: Slice3Fn,
    ssqrt1 => Ssqrt1: InPlaceFn,
    ssqrt2 => Ssqrt2: SliceFn,

    lramp_set1 => LrampSet1: RampFn,
    lramp1 => Lramp1: RampFn,
    lramp2 => Lramp2: Ramp2Fn,
    lramp_add2 => LrampAdd2: Ramp2Fn,
    lramp_sub2 => LrampSub2: Ramp2Fn,
    lramp_rsub2 => LrampRSub2: Ramp2Fn,
    lramp_mul2 => LrampMul2: Ramp2Fn,
    lramp_div2 => LrampDiv2: Ramp2Fn,
    lramp_rdiv2 => LrampRDiv2: Ramp2Fn,
    lramp_add3 => LrampAdd3: Ramp3Fn,
    lramp_sub3 => LrampSub3: Ramp3Fn,
    lramp_rsub3 => LrampRSub3: Ramp3Fn,
    lramp_mul3 => LrampMul3: Ramp3Fn,
    lramp_div3 => LrampDiv3: Ramp3Fn,
    lramp_rdiv3 => LrampRDiv3: Ramp3Fn,

    pcomplex_mul2 => PcomplexMul2: SliceFn,
    pcomplex_mul3 => PcomplexMul3: Slice3Fn,

    h_dotp => HDotp: DotFn,
    h_sqr_dotp => HSqrDotp: DotFn,
    h_abs_dotp => HAbsDotp: DotFn,

    compressor_env => CompressorEnv: EnvFn,
    sidechain_rms => SidechainRms: SidechainFn,
    compressor_x2_gain => CompressorX2Gain: CompressorFn,
    compressor_x2_curve => CompressorX2Curve: CompressorFn,
    dexpander_x1_gain => DexpanderX1Gain: ExpanderFn,
    dexpander_x1_curve => DexpanderX1Curve: ExpanderFn,
    uexpander_x1_gain => UexpanderX1Gain: ExpanderFn,
    uexpander_x1_curve => UexpanderX1Curve: ExpanderFn,

    calc_angle3d_v2 => CalcAngle3dV2: AngleFn,
    calc_angle3d_vv => CalcAngle3dVv: AnglePairFn,
    apply_matrix3d_mv2 => ApplyMatrix3dMv2: MatrixFn,
    apply_matrix3d_mv1 => ApplyMatrix3dMv1: MatrixInPlaceFn,
}

impl DispatchTable {
    /// Capabilities the table was resolved for
    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// `(operation, selected tier)` for every operation
    pub fn tiers(&self) -> impl Iterator<Item = (OpId, Tier)> + '_ {
        OpId::ALL.iter().map(move |&op| (op, self.tier(op)))
    }

    /// Highest tier selected for any operation
    pub fn best_tier(&self) -> Tier {
        self.tiers()
            .map(|(_, tier)| tier)
            .max_by_key(|tier| tier.rank())
            .unwrap_or(Tier::Generic)
    }
}
