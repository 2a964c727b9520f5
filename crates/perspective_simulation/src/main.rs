//! Headless симуляция Perspective
//!
//! Персонаж бежит вправо, pointer ray сканирует gameplay plane. Каждые 60
//! тиков логируем display offset и проекцию marker точки через
//! экспортированные PVRow'ы.
//!
//! Usage: `perspective_simulation [config.toml]`

use bevy::math::Ray3d;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::path::Path;
use std::time::Duration;

use perspective_simulation::camera::{project_to_screen, PV_ROW_NAMES};
use perspective_simulation::character::MovementInput;
use perspective_simulation::{
    create_headless_app, log_error, log_info, spawn_default_player, DisplayAim, GameConfig, ParameterCollections,
    Player, PointerRay, LOS_COLLECTION,
};

const TICKS: u32 = 600;
const MARKER: Vec3 = Vec3::new(2.0, 1.0, 0.0);

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                perspective_simulation::logger::init_logger();
                log_error(&format!("Config error: {}", e));
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    let mut app = create_headless_app(config);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_systems(Startup, spawn_default_player);

    log_info(&format!("Starting Perspective headless simulation ({} ticks)", TICKS));

    for tick in 0..TICKS {
        script_frame(app.world_mut(), tick);
        app.update();

        if tick % 60 == 0 {
            report(app.world_mut(), tick);
        }
    }

    log_info("Simulation complete!");
}

/// Бег вправо + pointer по кругу перед камерой
fn script_frame(world: &mut World, tick: u32) {
    let phase = tick as f32 / 60.0;

    let mut players = world.query_filtered::<&mut MovementInput, With<Player>>();
    for mut input in players.iter_mut(world) {
        input.move_right = 1.0;
        input.jump = tick % 120 < 5;
    }

    let origin = Vec3::new(phase.cos() * 3.0, 1.0 + phase.sin(), -5.0);
    world.insert_resource(PointerRay(Some(Ray3d::new(origin, Dir3::Z))));
}

fn report(world: &mut World, tick: u32) {
    let mut aims = world.query::<&DisplayAim>();
    for aim in aims.iter(world) {
        log_info(&format!("Tick {}: display yaw {:.2}°, pitch {:.2}°", tick, aim.yaw, aim.pitch));
    }

    let Some(collection) = world
        .get_resource::<ParameterCollections>()
        .and_then(|registry| registry.get(LOS_COLLECTION))
    else {
        return;
    };

    let mut rows = [Vec4::ZERO; 4];
    for (row, name) in rows.iter_mut().zip(PV_ROW_NAMES) {
        *row = collection.vector(name).unwrap_or(Vec4::ZERO);
    }

    match project_to_screen(MARKER, &rows) {
        Some(ndc) => log_info(&format!("Tick {}: marker {:?} → screen {:?}", tick, MARKER, ndc)),
        None => log_info(&format!("Tick {}: marker {:?} behind eye", tick, MARKER)),
    }
}
