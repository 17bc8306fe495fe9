//! Kernel set validation and selection

use vecdsp_dispatch::registry::select;
use vecdsp_dispatch::table::SliceFn;
use vecdsp_dispatch::{
    CapabilitySet, DispatchTable, Dispatcher, KernelDescriptor, KernelSet, OpId, RegistryError,
    Tier,
};

/// Stand-in kernel; plain Rust, so it runs whatever it is registered as
unsafe fn fill_marker(dst: &mut [f32], _src: &[f32]) {
    dst.fill(42.0);
}

unsafe fn other_marker(dst: &mut [f32], _src: &[f32]) {
    dst.fill(-42.0);
}

#[test]
fn test_builtin_set_validates() {
    let set = KernelSet::builtin();
    assert_eq!(set.validate(), Ok(()));
    for &op in OpId::ALL {
        let tiers = set.tiers_for(op);
        assert_eq!(tiers.iter().filter(|&&t| t == Tier::Generic).count(), 1, "{}", op.name());
    }
    assert_eq!(set.tiers_for(OpId::ApplyMatrix3dMv1), vec![Tier::Generic]);
}

#[test]
fn test_empty_set_is_rejected() {
    assert_eq!(
        KernelSet::new().validate(),
        Err(RegistryError::MissingGeneric(OpId::Copy))
    );
}

#[test]
fn test_missing_generic_is_rejected() {
    let mut set = KernelSet::generic_only();
    set.add2.clear();
    set.add2
        .push(KernelDescriptor::new(OpId::Add2, Tier::Sse2, fill_marker));
    assert_eq!(
        set.validate(),
        Err(RegistryError::MissingGeneric(OpId::Add2))
    );
    assert!(Dispatcher::with_kernels(CapabilitySet::host(), &set).is_err());
}

#[test]
fn test_duplicate_generic_is_rejected() {
    let mut set = KernelSet::generic_only();
    set.mul2
        .push(KernelDescriptor::new(OpId::Mul2, Tier::Generic, fill_marker as SliceFn).with_rank(5));
    assert_eq!(
        set.validate(),
        Err(RegistryError::DuplicateGeneric(OpId::Mul2))
    );
}

#[test]
fn test_equal_ranks_are_rejected() {
    let mut set = KernelSet::generic_only();
    set.sub2
        .push(KernelDescriptor::new(OpId::Sub2, Tier::Sse2, fill_marker));
    set.sub2
        .push(KernelDescriptor::new(OpId::Sub2, Tier::Neon, other_marker));
    let err = set.validate().unwrap_err();
    assert_eq!(
        err,
        RegistryError::AmbiguousRank {
            op: OpId::Sub2,
            rank: 10
        }
    );
    assert!(err.to_string().contains("sub2"));
}

#[test]
fn test_misfiled_descriptor_is_rejected() {
    let mut set = KernelSet::generic_only();
    set.copy
        .push(KernelDescriptor::new(OpId::Add2, Tier::Avx2, fill_marker));
    assert_eq!(
        set.validate(),
        Err(RegistryError::MismatchedOp {
            expected: OpId::Copy,
            found: OpId::Add2,
            tier: Tier::Avx2,
        })
    );
}

#[test]
fn test_highest_eligible_rank_wins() {
    let mut set = KernelSet::generic_only();
    set.add2
        .push(KernelDescriptor::new(OpId::Add2, Tier::Avx512, fill_marker));

    let table = DispatchTable::resolve(&set, Tier::Avx512.requires()).unwrap();
    assert_eq!(table.tier(OpId::Add2), Tier::Avx512);
    assert_eq!(table.tier(OpId::Sub2), Tier::Generic);

    let table = DispatchTable::resolve(&set, Tier::Avx2.requires()).unwrap();
    assert_eq!(table.tier(OpId::Add2), Tier::Generic);
}

#[test]
fn test_custom_rank_overrides_tier_default() {
    let list: Vec<KernelDescriptor<SliceFn>> = vec![
        KernelDescriptor::new(OpId::Add2, Tier::Generic, other_marker as SliceFn),
        KernelDescriptor::new(OpId::Add2, Tier::Sse2, fill_marker as SliceFn).with_rank(50),
        KernelDescriptor::new(OpId::Add2, Tier::Avx2, other_marker as SliceFn),
    ];
    let chosen = select(OpId::Add2, &list, Tier::Avx2.requires()).unwrap();
    assert_eq!(chosen.tier, Tier::Sse2);

    let mut dst = [0.0f32; 3];
    // SAFETY: the marker kernels need no capabilities
    unsafe { (chosen.entry)(&mut dst, &[0.0; 3]) };
    assert_eq!(dst, [42.0; 3]);
}

#[test]
fn test_selection_ties_keep_registration_order() {
    let all = CapabilitySet::all();
    let sse_first: Vec<KernelDescriptor<SliceFn>> = vec![
        KernelDescriptor::new(OpId::Mul2, Tier::Generic, other_marker as SliceFn),
        KernelDescriptor::new(OpId::Mul2, Tier::Sse2, fill_marker as SliceFn),
        KernelDescriptor::new(OpId::Mul2, Tier::Neon, other_marker as SliceFn),
    ];
    let neon_first: Vec<KernelDescriptor<SliceFn>> =
        vec![sse_first[0], sse_first[2], sse_first[1]];

    for _ in 0..10 {
        assert_eq!(select(OpId::Mul2, &sse_first, all).unwrap().tier, Tier::Sse2);
        assert_eq!(select(OpId::Mul2, &neon_first, all).unwrap().tier, Tier::Neon);
    }
}

#[test]
fn test_selection_without_candidates_fails() {
    let list: Vec<KernelDescriptor<SliceFn>> =
        vec![KernelDescriptor::new(OpId::Copy, Tier::Avx2, fill_marker as SliceFn)];
    assert_eq!(
        select(OpId::Copy, &list, CapabilitySet::empty()).err(),
        Some(RegistryError::MissingGeneric(OpId::Copy))
    );
}
