//! Dispatcher construction, sharing and argument checks

use std::sync::Barrier;
use std::thread;

use vecdsp_dispatch::{
    dispatcher, CapabilitySet, DispatchConfig, Dispatcher, OpId, Tier,
};

#[test]
fn test_no_capabilities_selects_generic() {
    let d = Dispatcher::new(CapabilitySet::empty());
    assert!(d.table().tiers().all(|(_, tier)| tier == Tier::Generic));
    assert_eq!(d.best_tier(), Tier::Generic);
    assert_eq!(d.capabilities(), CapabilitySet::empty());
}

#[test]
fn test_selection_never_exceeds_host() {
    let host = CapabilitySet::host();
    let d = Dispatcher::new(CapabilitySet::all());
    assert_eq!(d.capabilities(), host);
    for (op, tier) in d.table().tiers() {
        assert!(tier.is_supported_by(host), "{}: {tier}", op.name());
        assert!(tier.is_compiled());
    }
}

#[test]
fn test_sse2_ceiling_on_wider_host() {
    let host = CapabilitySet::host();
    if !Tier::Avx2.is_supported_by(host) || !Tier::Avx2.is_compiled() {
        return;
    }
    let d = Dispatcher::with_config(&DispatchConfig::default().with_ceiling(Tier::Sse2));
    assert_eq!(d.best_tier(), Tier::Sse2);
    assert_eq!(d.table().tier(OpId::Add2), Tier::Sse2);
    assert_eq!(d.table().tier(OpId::ApplyMatrix3dMv1), Tier::Generic);

    let full = Dispatcher::new(host);
    assert!(full.table().tier(OpId::Add2).rank() >= Tier::Avx2.rank());
    // Envelope has no wider kernel than SSE2
    assert_eq!(full.table().tier(OpId::CompressorEnv), Tier::Sse2);
}

#[test]
fn test_masking_a_capability_drops_its_tiers() {
    let host = CapabilitySet::host();
    let config = DispatchConfig::default().without(CapabilitySet::AVX2 | CapabilitySet::SSE2);
    let d = Dispatcher::with_config(&config);
    assert!(!d.capabilities().contains(CapabilitySet::AVX2));
    if !host.contains(CapabilitySet::NEON) {
        assert_eq!(d.best_tier(), Tier::Generic);
    }
}

#[test]
fn test_concurrent_first_use_yields_one_dispatcher() {
    const THREADS: usize = 8;
    let barrier = Barrier::new(THREADS);
    let addresses: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    dispatcher() as *const Dispatcher as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(addresses[0], dispatcher() as *const Dispatcher as usize);
}

#[test]
fn test_dispatchers_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Dispatcher>();

    let d = Dispatcher::new(CapabilitySet::host());
    let results: Vec<f32> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let d = &d;
                s.spawn(move || {
                    let a = vec![i as f32; 100];
                    d.h_dotp(&a, &a)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results, [0.0, 100.0, 400.0, 900.0]);
}

#[test]
#[should_panic(expected = "add2")]
fn test_length_mismatch_panics() {
    let mut dst = [0.0f32; 4];
    Dispatcher::generic().add2(&mut dst, &[1.0; 3]);
}

#[test]
#[should_panic(expected = "lramp_add3")]
fn test_second_source_length_checked() {
    let mut dst = [0.0f32; 4];
    Dispatcher::generic().lramp_add3(&mut dst, &[0.0; 4], &[0.0; 5], 0.0, 1.0);
}

#[test]
#[should_panic(expected = "odd buffer length")]
fn test_complex_requires_pairs() {
    let mut dst = [0.0f32; 3];
    vecdsp_dispatch::pcomplex_mul2(&mut dst, &[0.0; 3]);
}
