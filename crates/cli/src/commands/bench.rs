//! Smoke run of the benchmarked kernels on each supported tier
//!
//! Drives every operation once per tier at the requested length so a new
//! machine can be checked quickly. Timing lives in the criterion benches:
//! `cargo bench -p vecdsp-dispatch --bench kernels`.

use std::hint::black_box;

use anyhow::{bail, ensure, Result};
use vecdsp_dispatch::verify::{eligible_tiers, Rng};
use vecdsp_dispatch::{CapabilitySet, Dispatcher, ExpanderKnee, OpId, Tier};

/// Operations the command knows how to drive
const BENCHED: [OpId; 7] = [
    OpId::Mul2,
    OpId::Add3,
    OpId::LrampAdd3,
    OpId::PcomplexMul3,
    OpId::HDotp,
    OpId::SidechainRms,
    OpId::DexpanderX1Curve,
];

struct Buffers {
    a: Vec<f32>,
    b: Vec<f32>,
    dst: Vec<f32>,
    head: Vec<f32>,
}

impl Buffers {
    fn new(len: usize) -> Self {
        let mut rng = Rng::new(len as u64);
        let mut noise = || (0..len).map(|_| rng.nonzero()).collect::<Vec<f32>>();
        Self {
            a: noise(),
            b: noise(),
            dst: noise(),
            head: vec![0.0; len],
        }
    }
}

fn run(d: &Dispatcher, op: OpId, buf: &mut Buffers, knee: &ExpanderKnee) -> Result<()> {
    let Buffers { a, b, dst, head } = buf;
    match op {
        OpId::Mul2 => d.mul2(dst, a),
        OpId::Add3 => d.add3(dst, a, b),
        OpId::LrampAdd3 => d.lramp_add3(dst, a, b, 0.0, 1.0),
        OpId::PcomplexMul3 => d.pcomplex_mul3(dst, a, b),
        OpId::HDotp => {
            black_box(d.h_dotp(a, b));
        }
        OpId::SidechainRms => {
            black_box(d.sidechain_rms(dst, head, b, 0.0, 1.0 / 64.0));
        }
        OpId::DexpanderX1Curve => d.dexpander_x1_curve(dst, a, knee),
        other => bail!("{} is not benchmarked here", other.name()),
    }
    Ok(())
}

/// Run `op` (or every benchmarked op) on the generic reference and each
/// supported tier, returning the number of (operation, tier) runs
pub fn execute(len: usize, op: Option<&str>) -> Result<usize> {
    ensure!(len % 2 == 0, "Buffer length must be even (complex operations use pairs)");

    let ops = match op {
        Some(name) => match OpId::from_name(name) {
            Some(op) if BENCHED.contains(&op) => vec![op],
            Some(_) => bail!(
                "{name} is not benchmarked, choose one of: {}",
                BENCHED.map(OpId::name).join(", ")
            ),
            None => bail!("Unknown operation: {name}"),
        },
        None => BENCHED.to_vec(),
    };

    let knee = ExpanderKnee {
        start: 0.031_622_782,
        end: 0.125_892_55,
        threshold: 0.01,
        herm: [-0.361_912_07, -1.499_999_9, -1.554_244_6],
        tilt: [1.0, 2.763_102],
    };

    let mut tiers = vec![(Tier::Generic, Dispatcher::generic())];
    for tier in eligible_tiers(CapabilitySet::host()) {
        tiers.push((tier, Dispatcher::new(tier.requires())));
    }

    let mut buffers = Buffers::new(len);
    let mut runs = 0;
    for op in ops {
        for (tier, d) in &tiers {
            run(d, op, &mut buffers, &knee)?;
            log::debug!("{} ran on {tier}", op.name());
            runs += 1;
        }
        let names: Vec<&str> = tiers.iter().map(|(t, _)| t.name()).collect();
        println!("{:<20} ok on {}", op.name(), names.join(", "));
    }

    println!();
    println!("Timings: cargo bench -p vecdsp-dispatch --bench kernels");
    Ok(runs)
}
