use avian2d::prelude::*;
use bevy::ecs::query::QueryData;
use bevy::prelude::*;

use super::config::GrappleConfig;
use super::spring::release_spring;
use super::state::*;

/// Everything the controller writes on a hook entity
#[derive(QueryData)]
#[query_data(mutable)]
pub struct HookQuery {
    pub entity: Entity,
    pub config: &'static GrappleConfig,
    pub attachment: &'static mut Attachment,
    pub look: &'static mut HookLook,
    pub cursor: &'static mut ConveyorCursor,
    pub joint_target: &'static mut JointTarget,
    pub surface_normal: &'static mut SurfaceNormal,
    pub trail: &'static mut FlightTrail,
    pub position: &'static mut Position,
    pub velocity: &'static mut LinearVelocity,
    pub body: &'static mut RigidBody,
    pub locked_axes: &'static mut LockedAxes,
    pub mass: &'static mut Mass,
    pub gravity_scale: &'static mut GravityScale,
    pub spring: Option<&'static SpringLink>,
}

/// Physical modes the controller moves the hook between.
///
/// Each mode sets the body type, axis locks and velocity together so the hook
/// is never left kinematic with dynamics enabled, or frozen while moving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Dynamic with nothing locked, velocity kept
    Free,
    /// Kinematic, driven by velocity writes, starts at rest
    Carried,
    /// Static with every axis locked
    Frozen,
}

pub fn set_motion(
    motion: Motion,
    body: &mut RigidBody,
    locked_axes: &mut LockedAxes,
    velocity: &mut LinearVelocity,
) {
    match motion {
        Motion::Free => {
            *body = RigidBody::Dynamic;
            *locked_axes = LockedAxes::new();
        }
        Motion::Carried => {
            *body = RigidBody::Kinematic;
            *locked_axes = LockedAxes::new();
            velocity.0 = Vec2::ZERO;
        }
        Motion::Frozen => {
            velocity.0 = Vec2::ZERO;
            *locked_axes = LockedAxes::ALL_LOCKED;
            *body = RigidBody::Static;
        }
    }
}

/// Records a fresh attachment: solid collider becomes a sensor, the look
/// switches to rest and the rest presets apply.
pub fn fasten(
    hook: &mut HookQueryItem,
    commands: &mut Commands,
    joint_target: Option<Entity>,
    surface_normal: Vec2,
) {
    commands.entity(hook.entity).insert(Sensor);
    *hook.look = HookLook::Rest;
    hook.joint_target.0 = joint_target;
    hook.surface_normal.0 = surface_normal;
    hook.trail.0 = None;
    hook.mass.0 = hook.config.rest_mass;
    hook.gravity_scale.0 = hook.config.rest_gravity_scale;
}

/// Returns the hook to flight: no surface, no joint, no glide, solid collider,
/// dynamic body and flight presets. A stowed hook rejoins the simulation.
pub fn reset_to_flight(hook: &mut HookQueryItem, commands: &mut Commands) {
    if let Some(spring) = hook.spring {
        release_spring(commands, hook.entity, spring);
    }

    commands
        .entity(hook.entity)
        .remove::<(
            Sensor,
            Glide,
            HookStowed,
            RigidBodyDisabled,
            ColliderDisabled,
        )>();

    *hook.attachment = Attachment::Flight;
    hook.cursor.0 = None;
    hook.joint_target.0 = None;
    hook.surface_normal.0 = Vec2::ZERO;
    hook.trail.0 = None;
    *hook.look = HookLook::Shoot;
    set_motion(
        Motion::Free,
        &mut hook.body,
        &mut hook.locked_axes,
        &mut hook.velocity,
    );
    hook.mass.0 = hook.config.flight_mass;
    hook.gravity_scale.0 = hook.config.flight_gravity_scale;
}
