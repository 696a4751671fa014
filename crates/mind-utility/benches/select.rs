use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mind_bt::{ActionLeaf, BehaviorTree, Node};
use mind_core::{Brain, ExecContext, ManualClock, Status, TickContext, WorldMut, WorldView};
use mind_utility::{softmax, Consideration, ResponseCurve, UtilityAction, UtilitySelector};

#[derive(Default)]
struct World {
    fatigue: f32,
}

impl WorldView for World {
    type Agent = u64;
}

impl WorldMut for World {}

fn options(count: usize) -> Vec<UtilityAction<World>> {
    (0..count)
        .map(|i| {
            let leaf = Node::new(
                format!("act{i}"),
                ActionLeaf::new(|_ctx: &mut ExecContext<'_, World>| Status::Success),
            );
            UtilityAction::new(format!("act{i}"), leaf, 0.5 + i as f32 * 0.01).with_consideration(
                Consideration::new(
                    "fatigue",
                    |ctx: &mut ExecContext<'_, World>| 1.0 - ctx.world.fatigue,
                    ResponseCurve::Logistic {
                        steepness: 8.0,
                        midpoint: 0.5,
                    },
                ),
            )
        })
        .collect()
}

fn bench_softmax(c: &mut Criterion) {
    let scores: Vec<f32> = (0..64).map(|i| i as f32 * 0.1).collect();
    c.bench_function("mind-utility/softmax(n=64)", |b| {
        b.iter(|| black_box(softmax(black_box(&scores), 0.7)))
    });
}

fn bench_select(c: &mut Criterion) {
    let clock = ManualClock::new();
    let root = Node::new("utility", UtilitySelector::new(options(16)).with_seed(7));
    let mut brain = Brain::with_clock(1u64, clock.shared(), Box::new(BehaviorTree::new(root)));
    let mut world = World::default();

    let mut tick: u64 = 0;
    c.bench_function("mind-utility/select(actions=16)", |b| {
        b.iter(|| {
            world.fatigue = (tick % 10) as f32 / 10.0;
            let ctx = TickContext::new(tick, 0.1);
            black_box(brain.tick(&ctx, &mut world));
            tick = tick.wrapping_add(1);
        })
    });
}

criterion_group!(benches, bench_softmax, bench_select);
criterion_main!(benches);
