use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use perspective_simulation::character::MovementBackend;
use perspective_simulation::{spawn_default_player, GameConfig, ParameterCollections, PerspectivePlugin};
use std::path::Path;

mod camera;
mod input;
mod rendering;
mod trace;

use camera::CameraPlugin;
use input::InputPlugin;
use rendering::{LineOfSightMaterial, RenderingSyncPlugin};
use trace::RapierTracePlugin;

fn main() {
    perspective_simulation::logger::init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                perspective_simulation::log_error(&format!("Config error: {}", e));
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    App::new()
        // Bevy defaults (rendering, input, time, etc.)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Perspective".to_string(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // Rapier шагает в FixedUpdate: один step на один movement tick
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .insert_resource(MovementBackend::Rapier)
        .insert_resource(config)
        // Line-of-sight shader parameters (trace идёт через rapier, не plane)
        .insert_resource(ParameterCollections::with_line_of_sight())
        // Simulation (headless ECS logic)
        .add_plugins(PerspectivePlugin)
        // Rendering sync (simulation → visuals)
        .add_plugins(RenderingSyncPlugin)
        .add_plugins((CameraPlugin, InputPlugin, RapierTracePlugin))
        .add_systems(Startup, (setup_scene, spawn_default_player))
        .run();
}

/// Level blocks (collider + LOS material), lights
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<LineOfSightMaterial>>,
) {
    // Ground strip вдоль −X/+X (top = y 0)
    spawn_block(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(80.0, 1.0, 4.0),
        Color::srgb(0.35, 0.45, 0.35),
    );

    // Backdrop wall (pointer trace попадает сюда)
    spawn_block(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::new(0.0, 6.0, 2.5),
        Vec3::new(80.0, 14.0, 1.0),
        Color::srgb(0.5, 0.5, 0.6),
    );

    // Платформы и колонны
    for (x, y, w, h) in [(-6.0, 1.0, 3.0, 2.0), (-14.0, 2.5, 4.0, 1.0), (8.0, 1.5, 2.0, 3.0), (16.0, 4.0, 5.0, 0.5)] {
        spawn_block(
            &mut commands,
            &mut meshes,
            &mut materials,
            Vec3::new(x, y, 1.0),
            Vec3::new(w, h, 2.0),
            Color::srgb(0.7, 0.55, 0.35),
        );
    }

    // Directional light (sun)
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4)),
    ));

    // Ambient light
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.3,
        affects_lightmapped_meshes: false,
    });
}

fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<LineOfSightMaterial>,
    center: Vec3,
    size: Vec3,
    color: Color,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        MeshMaterial3d(materials.add(LineOfSightMaterial::new(color))),
        Transform::from_translation(center),
        RigidBody::Fixed,
        Collider::cuboid(size.x * 0.5, size.y * 0.5, size.z * 0.5),
    ));
}
