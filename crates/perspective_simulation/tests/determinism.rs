//! Тесты детерминизма
//!
//! Один и тот же скрипт input/pointer → bit-identical aim и PVRow'ы

use bevy::math::Ray3d;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use perspective_simulation::camera::PV_ROW_NAMES;
use perspective_simulation::character::MovementInput;
use perspective_simulation::{
    create_headless_app, spawn_default_player, DisplayAim, GameConfig, ParameterCollections, Player, PointerRay,
    LOS_COLLECTION,
};

#[test]
fn test_determinism_same_script() {
    const TICK_COUNT: u32 = 300;

    let snapshot1 = run_simulation(TICK_COUNT);
    let snapshot2 = run_simulation(TICK_COUNT);

    assert_eq!(snapshot1, snapshot2, "Одинаковый скрипт дал разные результаты");
}

#[test]
fn test_determinism_multiple_runs() {
    const TICK_COUNT: u32 = 120;

    // Запускаем 3 раза — все должны быть идентичны
    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(snapshots[0], *snapshot, "Прогон {} отличается от прогона 0", i);
    }
}

/// Прогон со скриптованным бегом и pointer sweep, snapshot = f32 bits
fn run_simulation(tick_count: u32) -> Vec<u32> {
    let mut app = create_headless_app(GameConfig::default());
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_systems(Startup, spawn_default_player);

    for tick in 0..tick_count {
        let phase = tick as f32 / 30.0;
        let world = app.world_mut();

        let mut players = world.query_filtered::<&mut MovementInput, With<Player>>();
        for mut input in players.iter_mut(world) {
            input.move_right = if tick < tick_count / 2 { 1.0 } else { -1.0 };
            input.jump = tick % 90 < 3;
        }

        let origin = Vec3::new(phase.cos() * 4.0, 1.0 + phase.sin() * 2.0, -5.0);
        world.insert_resource(PointerRay(Some(Ray3d::new(origin, Dir3::Z))));

        app.update();
    }

    snapshot(app.world_mut())
}

fn snapshot(world: &mut World) -> Vec<u32> {
    let mut bits = Vec::new();

    let mut roots = world.query_filtered::<&Transform, With<Player>>();
    for transform in roots.iter(world) {
        bits.extend(transform.translation.to_array().map(f32::to_bits));
    }

    let mut aims = world.query::<&DisplayAim>();
    for aim in aims.iter(world) {
        bits.push(aim.yaw.to_bits());
        bits.push(aim.pitch.to_bits());
    }

    let collection = world
        .resource::<ParameterCollections>()
        .get(LOS_COLLECTION)
        .expect("LOS collection registered");
    for name in PV_ROW_NAMES {
        let row = collection.vector(name).expect("declared slot");
        bits.extend(row.to_array().map(f32::to_bits));
    }

    bits
}
