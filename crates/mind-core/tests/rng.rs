use mind_core::rng::derive_seed;
use mind_core::{AgentId, DeterministicRng, SplitMix64, TickContext};

#[test]
fn same_seed_same_stream() {
    let mut a = SplitMix64::new(42);
    let mut b = SplitMix64::new(42);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn unit_samples_stay_in_range() {
    let mut rng = SplitMix64::new(7);
    for _ in 0..1000 {
        let x = rng.next_f32_unit();
        assert!((0.0..1.0).contains(&x));
    }
}

#[test]
fn pick_weighted_never_draws_zero_weights() {
    let mut rng = SplitMix64::new(99);
    for _ in 0..500 {
        let i = rng.pick_weighted(&[0.0, 1.0, f32::NAN, 2.0, -3.0]).unwrap();
        assert!(i == 1 || i == 3, "drew {i}");
    }
    assert_eq!(rng.pick_weighted(&[0.0, -1.0]), None);
    assert_eq!(rng.pick_weighted(&[]), None);
}

#[test]
fn pick_weighted_roughly_follows_weights() {
    let mut rng = SplitMix64::new(1234);
    let mut counts = [0u32; 2];
    for _ in 0..10_000 {
        counts[rng.pick_weighted(&[1.0, 3.0]).unwrap()] += 1;
    }
    let share = counts[1] as f32 / 10_000.0;
    assert!((share - 0.75).abs() < 0.03, "share={share}");
}

#[test]
fn agent_streams_differ_but_are_reproducible() {
    let ctx = TickContext::new(0, 0.1).with_seed(5);
    let a1 = ctx.rng_for_agent(1u64, 0).next_u64();
    let a2 = ctx.rng_for_agent(1u64, 0).next_u64();
    let b = ctx.rng_for_agent(2u64.stable_id(), 0).next_u64();
    assert_eq!(a1, a2);
    assert_ne!(a1, b);
}

#[test]
fn derived_seeds_keep_roles_apart() {
    assert_ne!(derive_seed(1, 2, 3), derive_seed(1, 3, 2));
    assert_ne!(derive_seed(7, 0, 0), 7);
    assert_eq!(derive_seed(7, 4, 1), derive_seed(7, 4, 1));
    assert_eq!(
        SplitMix64::for_agent(7, 4, 1),
        SplitMix64::new(derive_seed(7, 4, 1))
    );
}
