use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use horde_collision::*;
use std::hint::black_box;

/// Enemies on a jittered lattice around a player, walled in on four sides.
fn prepare_engine(enemy_count: usize, parallel: bool) -> CollisionEngine {
    let config = EngineConfig::default().with_parallel(parallel);
    let mut engine = CollisionEngine::new(config).expect("default config is valid");
    engine.add_body(Body::new(Vec2::ZERO, Collider::circle(16.0).player().build()));

    let side = (enemy_count as f32).sqrt().ceil() as usize;
    for i in 0..enemy_count {
        let jitter = ((i * 7919) % 13) as f32;
        let position = Vec2::new(
            (i % side) as f32 * 18.0 - side as f32 * 9.0 + jitter,
            (i / side) as f32 * 18.0 - side as f32 * 9.0 - jitter,
        );
        engine.add_body(
            Body::builder()
                .position(position)
                .desired_velocity(-position.normalize_or_zero() * 60.0)
                .collider(Collider::circle(12.0).enemy().build())
                .build(),
        );
    }

    let extent = side as f32 * 9.0 + 64.0;
    for (position, size) in [
        (Vec2::new(0.0, -extent), Vec2::new(extent * 2.0, 32.0)),
        (Vec2::new(0.0, extent), Vec2::new(extent * 2.0, 32.0)),
        (Vec2::new(-extent, 0.0), Vec2::new(32.0, extent * 2.0)),
        (Vec2::new(extent, 0.0), Vec2::new(32.0, extent * 2.0)),
    ] {
        engine.add_body(Body::new(
            position,
            Collider::rect(size.x, size.y).environment().build(),
        ));
    }
    engine
}

fn bench_strategy_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_tick");
    for &count in &[256usize, 1024, 4096] {
        for strategy in CollisionStrategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), count),
                &count,
                |b, &count| {
                    let mut engine = prepare_engine(count, true);
                    engine.set_collision_strategy(strategy);
                    b.iter(|| black_box(engine.tick()))
                },
            );
        }
    }
    group.finish();
}

fn bench_detection_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");
    for strategy in [CollisionStrategy::RecordList, CollisionStrategy::SpatialHash] {
        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(strategy.name(), label), &parallel, |b, &parallel| {
                let mut engine = prepare_engine(2048, parallel);
                engine.set_collision_strategy(strategy);
                engine.on_bodies_moved();
                b.iter(|| {
                    engine.run_detection();
                    let pairs = engine.profiler().detected_pairs;
                    engine.run_cleanup();
                    black_box(pairs)
                })
            });
        }
    }
    group.finish();
}

fn bench_grid_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_update");
    for &count in &[1024usize, 8192] {
        group.bench_with_input(BenchmarkId::new("rebuild", count), &count, |b, &count| {
            let engine = prepare_engine(count, false);
            let mut grid = SpatialHashingGrid::new(32.0, Vec2::ZERO);
            b.iter(|| {
                grid.rebuild(&engine.world().bodies);
                black_box(grid.cell_count())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_strategy_tick,
    bench_detection_only,
    bench_grid_update
);
criterion_main!(benches);
