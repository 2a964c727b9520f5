//! Интеграционные тесты движения персонажа и sprite состояния

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use perspective_simulation::character::{
    AnimationKind, CharacterMovement, CharacterSprite, CharacterVelocity, CurrentAnimation, MovementInput,
};
use perspective_simulation::{create_headless_app, spawn_default_player, GameConfig, Player};

fn headless_app() -> App {
    let mut app = create_headless_app(GameConfig::default());
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 64.0)))
        .add_systems(Startup, spawn_default_player);
    app.update();
    app
}

fn player(app: &mut App) -> Entity {
    let mut query = app.world_mut().query_filtered::<Entity, With<Player>>();
    query.single(app.world()).expect("one player")
}

fn set_input(app: &mut App, input: MovementInput) {
    let entity = player(app);
    app.world_mut().entity_mut(entity).insert(input);
}

fn animation(app: &mut App) -> AnimationKind {
    let mut query = app.world_mut().query_filtered::<&CurrentAnimation, With<CharacterSprite>>();
    query.single(app.world()).expect("one sprite").0
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

#[test]
fn test_move_right_runs_along_negative_x() {
    let mut app = headless_app();
    let entity = player(&mut app);
    let start = app.world().get::<Transform>(entity).expect("transform").translation;

    set_input(
        &mut app,
        MovementInput {
            move_right: 1.0,
            ..default()
        },
    );
    run(&mut app, 128);

    let end = app.world().get::<Transform>(entity).expect("transform").translation;
    assert!(end.x < start.x - 5.0, "start = {:?}, end = {:?}", start, end);
    assert!((end.z - start.z).abs() < 1e-4);

    let velocity = app.world().get::<CharacterVelocity>(entity).expect("velocity").0;
    let speed = GameConfig::default().movement.max_walk_speed;
    assert!((velocity.x + speed).abs() < 1e-3, "velocity = {:?}", velocity);
    assert_eq!(animation(&mut app), AnimationKind::Running);
}

#[test]
fn test_stops_and_returns_to_idle() {
    let mut app = headless_app();

    set_input(
        &mut app,
        MovementInput {
            move_right: -1.0,
            ..default()
        },
    );
    run(&mut app, 64);
    assert_eq!(animation(&mut app), AnimationKind::Running);

    set_input(&mut app, MovementInput::default());
    run(&mut app, 64);

    let entity = player(&mut app);
    assert_eq!(app.world().get::<CharacterVelocity>(entity).expect("velocity").0, Vec3::ZERO);
    assert_eq!(animation(&mut app), AnimationKind::Idle);
}

#[test]
fn test_jump_leaves_ground_and_lands() {
    let mut app = headless_app();
    let entity = player(&mut app);
    let floor = app.world().get::<Transform>(entity).expect("transform").translation.y;

    set_input(
        &mut app,
        MovementInput {
            jump: true,
            ..default()
        },
    );
    run(&mut app, 4);
    set_input(&mut app, MovementInput::default());
    run(&mut app, 8);

    let airborne = app.world().get::<Transform>(entity).expect("transform").translation.y;
    assert!(airborne > floor + 0.5, "floor = {}, y = {}", floor, airborne);
    assert!(!app.world().get::<CharacterMovement>(entity).expect("movement").grounded);

    // v = 10, g = 19.62 → в воздухе ~1 sec
    run(&mut app, 96);
    let landed = app.world().get::<Transform>(entity).expect("transform").translation.y;
    assert!((landed - floor).abs() < 1e-3, "floor = {}, y = {}", floor, landed);
    assert!(app.world().get::<CharacterMovement>(entity).expect("movement").grounded);
}

#[test]
fn test_root_never_rotates_sprite_faces_movement() {
    let mut app = headless_app();
    let entity = player(&mut app);

    set_input(
        &mut app,
        MovementInput {
            move_right: 1.0,
            ..default()
        },
    );
    run(&mut app, 64);

    let root_rotation = app.world().get::<Transform>(entity).expect("transform").rotation;
    assert_eq!(root_rotation, Quat::IDENTITY);

    let mut query = app.world_mut().query_filtered::<&Transform, With<CharacterSprite>>();
    let sprite = query.single(app.world()).expect("one sprite");
    let facing = sprite.rotation * Vec3::NEG_Z;
    assert!((facing - Vec3::NEG_X).length() < 1e-3, "facing = {:?}", facing);
}

#[test]
fn test_animation_written_only_on_state_change() {
    let mut app = headless_app();
    let sprite = {
        let mut query = app.world_mut().query_filtered::<Entity, With<CharacterSprite>>();
        query.single(app.world()).expect("one sprite")
    };
    let last_changed = |app: &App| {
        app.world()
            .entity(sprite)
            .get_ref::<CurrentAnimation>()
            .expect("current animation")
            .last_changed()
    };

    // Стоим: Idle каждый tick, но компонент не перезаписывается
    let spawned = last_changed(&app);
    run(&mut app, 16);
    assert_eq!(last_changed(&app), spawned);
    assert_eq!(animation(&mut app), AnimationKind::Idle);

    set_input(
        &mut app,
        MovementInput {
            move_right: 1.0,
            ..default()
        },
    );

    let mut changes = 0;
    let mut previous = last_changed(&app);
    for _ in 0..32 {
        app.update();
        let current = last_changed(&app);
        if current != previous {
            changes += 1;
            previous = current;
        }
    }

    assert_eq!(changes, 1, "Idle → Running должен записаться ровно один раз");
    assert_eq!(animation(&mut app), AnimationKind::Running);
}
