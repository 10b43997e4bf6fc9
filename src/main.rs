use avian2d::prelude::*;
use bevy::{prelude::*, window::PrimaryWindow};
use bevy_enhanced_input::prelude::*;
use bevy_grapple::prelude::*;

/// Hook launch speed in m/s
const LAUNCH_SPEED: f32 = 16.0;

const SHOOT_COLOR: Color = Color::srgb(0.95, 0.85, 0.3);
const REST_COLOR: Color = Color::srgb(0.3, 0.85, 0.95);

/// Fire the hook toward the cursor
#[derive(Debug, InputAction)]
#[action_output(bool)]
struct FireAction;

/// Let go of whatever the hook holds
#[derive(Debug, InputAction)]
#[action_output(bool)]
struct DetachAction;

/// Put the hook away
#[derive(Debug, InputAction)]
#[action_output(bool)]
struct StowAction;

/// Launch point for the sandbox hook (also used as input context)
#[derive(Component)]
struct Launcher {
    hook: Entity,
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Grapple Sandbox".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((BevyGrapplePlugin, EnhancedInputPlugin))
        .add_input_context::<Launcher>()
        .add_observer(fire_hook)
        .add_observer(detach_hook)
        .add_observer(stow_hook)
        .add_systems(Startup, setup)
        .add_systems(Update, (tint_hook, log_attachments))
        .run();
}

fn platform(size: Vec2, at: Vec2, color: Color) -> impl Bundle {
    (
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(GameLayer::Platform, LayerMask::ALL),
        Sprite::from_color(color, size),
        Transform::from_translation(at.extend(0.0)),
    )
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 0.02,
            ..OrthographicProjection::default_2d()
        }),
    ));

    // Floor and a wall to stick to
    commands.spawn((
        RigidBody::Static,
        platform(Vec2::new(30.0, 1.0), Vec2::new(0.0, -6.0), Color::srgb(0.3, 0.3, 0.35)),
    ));
    commands.spawn((
        RigidBody::Static,
        platform(Vec2::new(1.0, 8.0), Vec2::new(9.0, 0.0), Color::srgb(0.4, 0.4, 0.45)),
    ));

    // Crate the hook springs onto
    commands.spawn((
        RigidBody::Dynamic,
        platform(Vec2::new(1.5, 1.5), Vec2::new(3.0, -4.5), Color::srgb(0.6, 0.4, 0.2)),
    ));

    // Belt running right along its top surface, ending at its right edge
    commands.spawn((
        RigidBody::Static,
        platform(Vec2::new(8.0, 0.5), Vec2::new(-2.0, 2.0), Color::srgb(0.25, 0.5, 0.3)),
        ConveyorBelt::new(vec![Vec2::new(-4.0, 0.25), Vec2::new(4.0, 0.25)], 2.5),
    ));

    // Anchors: a moving one the hook springs to, a fixed one it locks onto
    for (body, at) in [
        (RigidBody::Kinematic, Vec2::new(-6.0, 5.0)),
        (RigidBody::Static, Vec2::new(5.0, 5.0)),
    ] {
        commands.spawn((
            body,
            Collider::circle(0.4),
            Sensor,
            GrappleAnchor,
            CollisionLayers::new(GameLayer::Trigger, LayerMask::ALL),
            Sprite::from_color(Color::srgb(0.8, 0.3, 0.6), Vec2::splat(0.8)),
            Transform::from_translation(at.extend(0.0)),
        ));
    }

    let launch_point = Vec2::new(-10.0, -4.0);
    let config = GrappleConfig::default();
    let hook = match spawn_hook(&mut commands, config, launch_point) {
        Ok(hook) => hook,
        Err(err) => {
            error!("invalid grapple config: {err}");
            return;
        }
    };
    commands
        .entity(hook)
        .insert(Sprite::from_color(SHOOT_COLOR, Vec2::splat(config.radius * 2.0)));
    commands.trigger(StowHook { entity: hook });

    commands.spawn((
        Launcher { hook },
        Transform::from_translation(launch_point.extend(0.0)),
        actions!(Launcher[
            (
                Action::<FireAction>::new(),
                bindings![KeyCode::KeyF, GamepadButton::RightTrigger],
            ),
            (
                Action::<DetachAction>::new(),
                bindings![KeyCode::Space, GamepadButton::South],
            ),
            (
                Action::<StowAction>::new(),
                bindings![KeyCode::KeyR, GamepadButton::East],
            ),
        ]),
    ));
}

/// Arms the hook at the launcher and throws it toward the cursor
fn fire_hook(
    trigger: On<Start<FireAction>>,
    launchers: Query<(&Launcher, &Transform)>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut commands: Commands,
) {
    let Ok((launcher, transform)) = launchers.get(trigger.event_target()) else {
        return;
    };
    let origin = transform.translation.truncate();

    let cursor = windows.single().ok().and_then(Window::cursor_position);
    let aim = cursor
        .zip(cameras.single().ok())
        .and_then(|(cursor, (camera, camera_transform))| {
            camera.viewport_to_world_2d(camera_transform, cursor).ok()
        })
        .map(|target| (target - origin).normalize_or_zero())
        .filter(|dir| *dir != Vec2::ZERO)
        .unwrap_or(Vec2::new(1.0, 1.0).normalize());

    commands.trigger(ArmHook {
        entity: launcher.hook,
    });
    commands
        .entity(launcher.hook)
        .insert((Position(origin), LinearVelocity(aim * LAUNCH_SPEED)));
}

fn detach_hook(
    trigger: On<Start<DetachAction>>,
    launchers: Query<&Launcher>,
    mut commands: Commands,
) {
    if let Ok(launcher) = launchers.get(trigger.event_target()) {
        commands.trigger(DetachHook {
            entity: launcher.hook,
        });
    }
}

fn stow_hook(
    trigger: On<Start<StowAction>>,
    launchers: Query<&Launcher>,
    mut commands: Commands,
) {
    if let Ok(launcher) = launchers.get(trigger.event_target()) {
        commands.trigger(StowHook {
            entity: launcher.hook,
        });
    }
}

fn tint_hook(mut hooks: Query<(&HookLook, &mut Sprite), Changed<HookLook>>) {
    for (look, mut sprite) in &mut hooks {
        sprite.color = match look {
            HookLook::Shoot => SHOOT_COLOR,
            HookLook::Rest => REST_COLOR,
        };
    }
}

fn log_attachments(mut attached: MessageReader<GrappleAttached>) {
    for msg in attached.read() {
        info!("{msg:?}");
    }
}
