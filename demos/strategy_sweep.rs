//! Runs every collision strategy over the same horde and logs how each fares.
//!
//! `cargo run --example strategy_sweep -- [enemy count] [strategy name]`

use horde_collision::*;
use std::time::Duration;

const FRAMES: usize = 300;

fn spawn_horde(engine: &mut CollisionEngine, enemy_count: usize) -> EntityId {
    let player = engine.add_body(Body::new(Vec2::ZERO, Collider::circle(16.0).player().build()));

    // enemies spawn on rings around the player and walk towards it
    for i in 0..enemy_count {
        let angle = i as f32 * 2.399_963;
        let radius = 120.0 + (i % 97) as f32 * 6.0;
        let position = Vec2::new(angle.cos(), angle.sin()) * radius;
        engine.add_body(
            Body::builder()
                .position(position)
                .desired_velocity(-position.normalize_or_zero() * 80.0)
                .acceleration_speed(4.0)
                .collider(Collider::circle(12.0).enemy().build())
                .build(),
        );
    }

    for x in [-300.0, 300.0] {
        engine.add_body(Body::new(
            Vec2::new(x, 0.0),
            Collider::rect(48.0, 240.0).environment().build(),
        ));
    }
    player
}

fn run(strategy: CollisionStrategy, enemy_count: usize) -> Result<(), ConfigError> {
    let mut engine = CollisionEngine::new(EngineConfig::default())?;
    let player = spawn_horde(&mut engine, enemy_count);
    engine.set_collision_strategy(strategy);

    let mut recorder: PerfRecorder = PerfRecorder::default();
    let mut player_hits = 0;
    recorder.start_recording();
    for _ in 0..FRAMES {
        recorder.start_live_recording();
        engine.tick();
        recorder.stop_live_recording();
        recorder.save_frame(&engine);
        player_hits += engine.profiler().significant_pairs;
    }
    recorder.stop_recording();

    let frames = recorder.frames();
    let physics: Duration = frames.iter().map(|frame| frame.physics_time).sum();
    log::info!(
        "{:<36} {:>6} bodies  {:>8.3} ms/frame  {:>7.1} fps  {} significant hits",
        strategy.name(),
        engine.world().body_count(),
        physics.as_secs_f64() * 1000.0 / frames.len().max(1) as f64,
        recorder.average_fps(),
        player_hits
    );
    if let Some(body) = engine.body(player) {
        log::debug!("player ended at {:?}", body.position);
    }
    engine.profiler().report();
    Ok(())
}

fn main() -> Result<(), ConfigError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let enemy_count = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(2000);
    let strategies: Vec<CollisionStrategy> = match args.next() {
        Some(name) => match CollisionStrategy::from_name(&name) {
            Some(strategy) => vec![strategy],
            None => {
                log::error!("unknown strategy {name}");
                return Ok(());
            }
        },
        None => CollisionStrategy::ALL.to_vec(),
    };

    log::info!("sweeping {} strategies over {enemy_count} enemies", strategies.len());
    for strategy in strategies {
        run(strategy, enemy_count)?;
    }
    Ok(())
}
