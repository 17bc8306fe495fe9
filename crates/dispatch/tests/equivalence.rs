//! Every tier the host supports produces the reference results
//!
//! The sweep covers all operations at fixed lengths and offsets; the
//! property tests add arbitrary data for the hot pointwise paths.

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use vecdsp_dispatch::verify::{self, Tolerance};
use vecdsp_dispatch::{CapabilitySet, Dispatcher, ExpanderKnee, Tier};

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    }
}

fn pairs() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (0usize..300).prop_flat_map(|n| {
        (
            prop::collection::vec(-1000.0f32..1000.0, n),
            prop::collection::vec(prop_oneof![-64.0f32..-0.01, 0.01f32..64.0], n),
        )
    })
}

#[test]
fn test_sweep_every_supported_tier() {
    let host = CapabilitySet::host();
    for (tier, report) in verify::sweep(host, Tolerance::default()) {
        assert!(report.operations > 0, "{tier}: nothing checked");
        assert!(
            report.is_ok(),
            "{tier}: {} mismatches, first: {}",
            report.mismatches.len(),
            report.mismatches[0]
        );
    }
}

#[test]
fn test_best_dispatcher_matches_reference() {
    let report = verify::check_dispatcher(&Dispatcher::new(CapabilitySet::host()), Tolerance::default());
    assert!(report.is_ok(), "{:?}", report.mismatches.first());
}

#[test]
fn test_pointwise_matches_reference() {
    let best = Dispatcher::new(CapabilitySet::host());
    let reference = Dispatcher::generic();

    proptest!(proptest_config(), |((a, b) in pairs())| {
        type Op = fn(&Dispatcher, &mut [f32], &[f32]);
        let ops: [Op; 8] = [
            Dispatcher::add2,
            Dispatcher::sub2,
            Dispatcher::rsub2,
            Dispatcher::mul2,
            Dispatcher::div2,
            Dispatcher::rdiv2,
            Dispatcher::mod2,
            Dispatcher::ssqrt2,
        ];
        for op in ops {
            let mut want = a.clone();
            let mut got = a.clone();
            op(&reference, &mut want, &b);
            op(&best, &mut got, &b);
            for (w, g) in want.iter().zip(&got) {
                prop_assert!(w.to_bits() == g.to_bits() || (w.is_nan() && g.is_nan()));
            }
        }
    });
}

#[test]
fn test_ramped_mix_matches_reference() {
    let best = Dispatcher::new(CapabilitySet::host());
    let reference = Dispatcher::generic();

    proptest!(proptest_config(), |(
        (a, b) in pairs(),
        v1 in -4.0f32..4.0,
        v2 in -4.0f32..4.0,
    )| {
        let mut want = vec![0.0f32; a.len()];
        let mut got = want.clone();
        reference.lramp_add3(&mut want, &a, &b, v1, v2);
        best.lramp_add3(&mut got, &a, &b, v1, v2);
        prop_assert_eq!(want, got);
    });
}

#[test]
fn test_dot_product_within_tolerance() {
    let best = Dispatcher::new(CapabilitySet::host());
    let tol = Tolerance::default();

    proptest!(proptest_config(), |((a, b) in pairs())| {
        let want = vecdsp_kernels::generic::h_dotp(&a, &b);
        let got = best.h_dotp(&a, &b);
        let scale = vecdsp_kernels::generic::h_abs_dotp(&a, &b);
        prop_assert!(tol.accepts_scaled(want, got, scale), "{want} vs {got}");
    });
}

#[test]
fn test_each_tier_only_uses_its_own_capabilities() {
    let host = CapabilitySet::host();
    for tier in verify::eligible_tiers(host) {
        let dispatcher = Dispatcher::new(tier.requires());
        for (op, selected) in dispatcher.table().tiers() {
            assert!(
                tier.requires().contains(selected.requires()),
                "{}: {selected} selected under a {tier} ceiling",
                op.name()
            );
        }
        assert!(Tier::ALL.contains(&dispatcher.best_tier()));
    }
}

#[test]
fn test_gain_curves_agree_on_silence_and_nan() {
    let knee = ExpanderKnee {
        start: 0.031_622_782,
        end: 0.125_892_55,
        threshold: 0.0,
        herm: [-0.361_912_07, -1.499_999_9, -1.554_244_6],
        tilt: [1.0, 2.763_102],
    };
    // Long enough to put edge values in vector bodies and in the tail
    let src: Vec<f32> = [f32::NAN, 0.0, -0.0, 0.05, 0.2]
        .into_iter()
        .cycle()
        .take(37)
        .collect();
    let tol = Tolerance::default();

    let mut want = vec![0.0f32; src.len()];
    Dispatcher::generic().dexpander_x1_gain(&mut want, &src, &knee);
    assert!(want.iter().all(|g| g.is_finite()));

    for tier in verify::eligible_tiers(CapabilitySet::host()) {
        let d = Dispatcher::new(tier.requires());
        let mut got = vec![0.0f32; src.len()];
        d.dexpander_x1_gain(&mut got, &src, &knee);
        for (i, (&w, &g)) in want.iter().zip(&got).enumerate() {
            assert!(tol.accepts(w, g), "{tier} [{i}] src {}: {w} vs {g}", src[i]);
        }
        d.uexpander_x1_curve(&mut got, &src, &knee);
        Dispatcher::generic().uexpander_x1_curve(&mut want, &src, &knee);
        for (&w, &g) in want.iter().zip(&got) {
            assert!(tol.accepts(w, g), "{tier}: {w} vs {g}");
        }
    }
}
