use avian2d::prelude::*;
use bevy::prelude::*;

use super::attach::attach_on_contact;
use super::config::{GrappleConfig, GrappleConfigError};
use super::contact::{gather_hook_contacts, record_flight_trails};
use super::control::{on_arm, on_detach, on_stow};
use super::events::{GrappleAttached, HookContact};
use super::follow::follow_conveyor;
use super::glide::advance_glide;
use super::spring::drop_orphaned_springs;
use super::state::*;
use crate::physics::GameLayer;

/// Ordering handles for the grapple systems
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrappleSystems {
    /// Fixed tick: contact gathering, classification and joint upkeep
    Attach,
    /// Fixed tick: conveyor riding and flight tracking, after attachment
    Follow,
    /// Frame tick: anchor glides
    Glide,
}

/// Plugin for the grapple hook attachment controller.
///
/// Expects Avian to be installed separately (see `PhysicsPlugin`).
pub struct GrapplePlugin;

impl Plugin for GrapplePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<CollisionStart>();
        app.add_message::<HookContact>();
        app.add_message::<GrappleAttached>();

        // Commands act immediately through observers
        app.add_observer(on_arm);
        app.add_observer(on_detach);
        app.add_observer(on_stow);

        app.configure_sets(
            FixedUpdate,
            (GrappleSystems::Attach, GrappleSystems::Follow).chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                (gather_hook_contacts, attach_on_contact, drop_orphaned_springs)
                    .chain()
                    .in_set(GrappleSystems::Attach),
                (follow_conveyor, record_flight_trails)
                    .chain()
                    .in_set(GrappleSystems::Follow),
            ),
        );

        app.add_systems(Update, advance_glide.in_set(GrappleSystems::Glide));
    }
}

/// Controller state and body settings of a hook in flight, without a collider
pub fn hook_bundle(config: GrappleConfig) -> Result<impl Bundle, GrappleConfigError> {
    config.validate()?;

    Ok((
        (
            GrappleHook,
            config,
            Attachment::Flight,
            HookLook::Shoot,
            ConveyorCursor::default(),
            JointTarget::default(),
            SurfaceNormal::default(),
            FlightTrail::default(),
        ),
        (
            RigidBody::Dynamic,
            LockedAxes::new(),
            LinearVelocity::default(),
            Mass(config.flight_mass),
            GravityScale(config.flight_gravity_scale),
        ),
    ))
}

/// Spawns a flying hook at `position` with a circular collider that reports
/// collision events
pub fn spawn_hook(
    commands: &mut Commands,
    config: GrappleConfig,
    position: Vec2,
) -> Result<Entity, GrappleConfigError> {
    let hook = hook_bundle(config)?;

    Ok(commands
        .spawn(hook)
        .insert((
            Collider::circle(config.radius),
            CollisionLayers::new(GameLayer::Hook, LayerMask::ALL),
            CollisionEventsEnabled,
            Transform::from_translation(position.extend(0.0)),
        ))
        .id())
}
