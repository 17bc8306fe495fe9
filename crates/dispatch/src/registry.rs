//! Kernel descriptors, registration and selection
//!
//! A [`KernelSet`] holds every candidate implementation per operation. It is
//! checked once ([`KernelSet::validate`]) and then reduced to a
//! [`DispatchTable`](crate::table::DispatchTable) for one capability set.

use thiserror::Error;
use vecdsp_kernels::{generic, tiers};

use crate::capabilities::CapabilitySet;
use crate::table::{OpId, Resolved};
use crate::tier::Tier;

pub use crate::table::KernelSet;

/// One candidate implementation of an operation
#[derive(Debug, Clone, Copy)]
pub struct KernelDescriptor<F> {
    /// Operation the entry implements
    pub op: OpId,
    /// Tier the entry belongs to
    pub tier: Tier,
    /// Capabilities the entry needs
    pub requires: CapabilitySet,
    /// Selection priority, higher wins
    pub rank: u32,
    /// Entry point
    pub entry: F,
}

impl<F> KernelDescriptor<F> {
    /// Descriptor with the tier's default requirements and rank
    pub fn new(op: OpId, tier: Tier, entry: F) -> Self {
        Self {
            op,
            tier,
            requires: tier.requires(),
            rank: tier.rank(),
            entry,
        }
    }

    /// Same descriptor with another rank
    pub fn with_rank(self, rank: u32) -> Self {
        Self { rank, ..self }
    }

    /// Whether the entry can run with `caps`
    pub fn is_eligible(&self, caps: CapabilitySet) -> bool {
        caps.contains(self.requires)
    }
}

/// A kernel set that cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No descriptor without requirements, so some CPUs would have no kernel
    #[error("operation `{}` has no generic kernel", .0.name())]
    MissingGeneric(OpId),

    /// More than one descriptor without requirements
    #[error("operation `{}` has more than one generic kernel", .0.name())]
    DuplicateGeneric(OpId),

    /// Two descriptors with the same rank, selection would depend on order
    #[error("operation `{}` has several kernels of rank {rank}", .op.name())]
    AmbiguousRank {
        /// Operation
        op: OpId,
        /// Shared rank
        rank: u32,
    },

    /// A descriptor was filed under the wrong operation
    #[error("{tier} kernel for `{}` registered under `{}`", .found.name(), .expected.name())]
    MismatchedOp {
        /// List the descriptor was found in
        expected: OpId,
        /// Operation the descriptor claims
        found: OpId,
        /// Tier of the descriptor
        tier: Tier,
    },
}

/// Check the candidates of one operation
pub(crate) fn check<F>(op: OpId, list: &[KernelDescriptor<F>]) -> Result<(), RegistryError> {
    if let Some(stray) = list.iter().find(|d| d.op != op) {
        return Err(RegistryError::MismatchedOp {
            expected: op,
            found: stray.op,
            tier: stray.tier,
        });
    }

    match list.iter().filter(|d| d.requires.is_empty()).count() {
        0 => return Err(RegistryError::MissingGeneric(op)),
        1 => {}
        _ => return Err(RegistryError::DuplicateGeneric(op)),
    }

    for (i, a) in list.iter().enumerate() {
        if list[i + 1..].iter().any(|b| b.rank == a.rank) {
            return Err(RegistryError::AmbiguousRank { op, rank: a.rank });
        }
    }
    Ok(())
}

/// Highest-ranked candidate whose requirements `caps` satisfies
///
/// On equal ranks the first registered candidate wins. Fails only when no
/// candidate is eligible, which a validated list rules out.
pub fn select<F: Copy>(
    op: OpId,
    list: &[KernelDescriptor<F>],
    caps: CapabilitySet,
) -> Result<Resolved<F>, RegistryError> {
    let mut best: Option<&KernelDescriptor<F>> = None;
    for candidate in list.iter().filter(|d| d.is_eligible(caps)) {
        if best.is_none_or(|b| candidate.rank > b.rank) {
            best = Some(candidate);
        }
    }
    let chosen = best.ok_or(RegistryError::MissingGeneric(op))?;
    log::debug!("{}: {} (rank {})", op.name(), chosen.tier, chosen.rank);
    Ok(Resolved {
        entry: chosen.entry,
        tier: chosen.tier,
    })
}

/// Push one descriptor per listed operation, taking each entry from the
/// module of the same name
macro_rules! register {
    ($set:ident, $tier:expr, $($module:ident)::+; $($field:ident => $op:ident),* $(,)?) => {
        {
            use $($module)::+ as kernels;
            $(
                $set.$field.push(KernelDescriptor::new(OpId::$op, $tier, kernels::$field));
            )*
        }
    };
}

/// Operations every compiled SIMD tier implements
#[allow(unused_macros)]
macro_rules! register_slice_ops {
    ($set:ident, $tier:expr, $($module:ident)::+) => {
        register! {
            $set, $tier, $($module)::+;
            copy => Copy,
            fill => Fill,
            add2 => Add2,
            sub2 => Sub2,
            rsub2 => RSub2,
            mul2 => Mul2,
            div2 => Div2,
            rdiv2 => RDiv2,
            mod2 => Mod2,
            rmod2 => RMod2,
            add3 => Add3,
            sub3 => Sub3,
            mul3 => Mul3,
            div3 => Div3,
            ssqrt1 => Ssqrt1,
            ssqrt2 => Ssqrt2,
            lramp_set1 => LrampSet1,
            lramp1 => Lramp1,
            lramp2 => Lramp2,
            lramp_add2 => LrampAdd2,
            lramp_sub2 => LrampSub2,
            lramp_rsub2 => LrampRSub2,
            lramp_mul2 => LrampMul2,
            lramp_div2 => LrampDiv2,
            lramp_rdiv2 => LrampRDiv2,
            lramp_add3 => LrampAdd3,
            lramp_sub3 => LrampSub3,
            lramp_rsub3 => LrampRSub3,
            lramp_mul3 => LrampMul3,
            lramp_div3 => LrampDiv3,
            lramp_rdiv3 => LrampRDiv3,
            pcomplex_mul2 => PcomplexMul2,
            pcomplex_mul3 => PcomplexMul3,
            h_dotp => HDotp,
            h_sqr_dotp => HSqrDotp,
            h_abs_dotp => HAbsDotp,
            sidechain_rms => SidechainRms,
            compressor_x2_gain => CompressorX2Gain,
            compressor_x2_curve => CompressorX2Curve,
            dexpander_x1_gain => DexpanderX1Gain,
            dexpander_x1_curve => DexpanderX1Curve,
            uexpander_x1_gain => UexpanderX1Gain,
            uexpander_x1_curve => UexpanderX1Curve,
        }
    };
}

impl KernelSet {
    /// Empty set, every list has to be filled before it validates
    pub fn new() -> Self {
        Self::default()
    }

    /// The generic reference for every operation and nothing else
    pub fn generic_only() -> Self {
        let mut set = Self::new();
        register_slice_ops!(set, Tier::Generic, generic);
        register! {
            set, Tier::Generic, generic;
            compressor_env => CompressorEnv,
            calc_angle3d_v2 => CalcAngle3dV2,
            calc_angle3d_vv => CalcAngle3dVv,
            apply_matrix3d_mv2 => ApplyMatrix3dMv2,
            apply_matrix3d_mv1 => ApplyMatrix3dMv1,
        }
        set
    }

    /// Every kernel compiled into this build
    ///
    /// Coverage differs per operation: the envelope follower only has an
    /// SSE2 kernel, the 3D ops only 4-lane kernels, and
    /// `apply_matrix3d_mv1` only the generic one.
    pub fn builtin() -> Self {
        #[allow(unused_mut)]
        let mut set = Self::generic_only();

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            register_slice_ops!(set, Tier::Sse2, tiers::sse2);
            register! {
                set, Tier::Sse2, tiers::sse2;
                compressor_env => CompressorEnv,
                calc_angle3d_v2 => CalcAngle3dV2,
                calc_angle3d_vv => CalcAngle3dVv,
                apply_matrix3d_mv2 => ApplyMatrix3dMv2,
            }
        }

        #[cfg(all(feature = "avx2", any(target_arch = "x86", target_arch = "x86_64")))]
        register_slice_ops!(set, Tier::Avx2, tiers::avx2);

        #[cfg(all(feature = "avx512", any(target_arch = "x86", target_arch = "x86_64")))]
        register_slice_ops!(set, Tier::Avx512, tiers::avx512);

        #[cfg(all(feature = "neon", target_arch = "aarch64"))]
        {
            register_slice_ops!(set, Tier::Neon, tiers::neon);
            register! {
                set, Tier::Neon, tiers::neon;
                calc_angle3d_v2 => CalcAngle3dV2,
                calc_angle3d_vv => CalcAngle3dVv,
            }
        }

        set
    }
}
