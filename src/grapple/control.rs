use std::f32::consts::TAU;

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

use super::body::{reset_to_flight, HookQuery};
use super::events::{ArmHook, DetachHook, StowHook};
use super::state::*;
use crate::physics::{measure_separation, PlacedCollider};

/// Weight of the random part of the detach direction against the surface normal
const DETACH_SCATTER: f32 = 0.75;

/// Kick-off impulse for a detaching hook: a random direction pushed away from
/// the surface by `normal`, scaled by `force` per unit of `mass`
pub fn detach_impulse(angle: f32, normal: Vec2, mass: f32, force: f32) -> Vec2 {
    (Vec2::from_angle(angle) * DETACH_SCATTER + normal) * mass * force
}

/// Resets a hook to flight, waking it if it was stowed
pub fn on_arm(
    event: On<ArmHook>,
    mut hooks: Query<HookQuery, With<GrappleHook>>,
    mut commands: Commands,
) {
    let Ok(mut hook) = hooks.get_mut(event.event_target()) else {
        return;
    };

    reset_to_flight(&mut hook, &mut commands);
    debug!("hook {} armed", hook.entity);
}

/// Releases a hook from any attachment mode and kicks it off the surface.
///
/// The outward normal comes from the separation between the hook and the
/// surface it is fastened to. When the hook centre sits right on the surface
/// that separation has no direction, so the normal recorded at impact is used
/// instead; without either the kick is purely random. An in-progress glide is
/// dropped before it can connect anything.
pub fn on_detach(
    event: On<DetachHook>,
    mut hooks: Query<HookQuery, With<GrappleHook>>,
    hook_shapes: Query<(&Collider, &Rotation), With<GrappleHook>>,
    surfaces: Query<(&Collider, &Position, &Rotation), Without<GrappleHook>>,
    mut commands: Commands,
) {
    let Ok(mut hook) = hooks.get_mut(event.event_target()) else {
        return;
    };

    let hook_position = *hook.position;
    let normal = hook
        .attachment
        .surface()
        .and_then(|surface| {
            let (hook_collider, hook_rotation) = hook_shapes.get(hook.entity).ok()?;
            let (surface_collider, surface_position, surface_rotation) =
                surfaces.get(surface).ok()?;
            let separation = measure_separation(
                PlacedCollider::new(hook_collider, &hook_position, hook_rotation),
                PlacedCollider::new(surface_collider, surface_position, surface_rotation),
            );
            Some(separation.normal)
        })
        .filter(|normal| *normal != Vec2::ZERO)
        .unwrap_or(hook.surface_normal.0);

    let release_mass = hook.mass.0;
    let angle = rand::thread_rng().gen_range(0.0..TAU);
    let impulse = detach_impulse(angle, normal, release_mass, hook.config.detach_force);

    let was = *hook.attachment;
    reset_to_flight(&mut hook, &mut commands);

    // The impulse lands on the freed body, at the mass it was released with
    if release_mass > 0.0 {
        hook.velocity.0 += impulse / release_mass;
    }

    debug!("hook {} detached from {was:?}", hook.entity);
}

/// Puts a hook away: drops whatever it is fastened to, then takes its body
/// and collider out of the simulation until re-armed or detached
pub fn on_stow(
    event: On<StowHook>,
    mut hooks: Query<HookQuery, With<GrappleHook>>,
    mut commands: Commands,
) {
    let Ok(mut hook) = hooks.get_mut(event.event_target()) else {
        return;
    };

    reset_to_flight(&mut hook, &mut commands);
    hook.velocity.0 = Vec2::ZERO;
    commands
        .entity(hook.entity)
        .insert((HookStowed, RigidBodyDisabled, ColliderDisabled));

    debug!("hook {} stowed", hook.entity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_scales_with_mass_and_force() {
        let impulse = detach_impulse(0.0, Vec2::ZERO, 2.0, 3.0);
        assert!((impulse - Vec2::new(4.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn normal_biases_the_kick_away_from_the_surface() {
        // Whatever the random angle, a unit normal outweighs the scatter
        for step in 0..16 {
            let angle = step as f32 / 16.0 * TAU;
            let impulse = detach_impulse(angle, Vec2::Y, 1.0, 1.0);
            assert!(impulse.y >= 0.25 - 1e-5);
        }
    }

    #[test]
    fn no_force_means_no_kick() {
        assert_eq!(detach_impulse(1.0, Vec2::X, 1.0, 0.0), Vec2::ZERO);
    }
}
