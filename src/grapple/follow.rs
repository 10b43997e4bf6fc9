use avian2d::prelude::*;
use bevy::prelude::*;

use super::body::{set_motion, HookQuery, Motion};
use super::state::*;
use crate::conveyor::ConveyorBelt;
use crate::physics::{measure_separation, PlacedCollider};

/// Next hook velocity while riding a belt, `None` once the belt no longer
/// carries it.
///
/// The velocity only moves halfway toward the belt's each tick, which damps
/// oscillation while still tracking the belt.
pub fn conveyor_step(current: Vec2, surface: Vec2) -> Option<Vec2> {
    (surface != Vec2::ZERO).then(|| (current + surface) / 2.0)
}

/// Carries conveyor-riding hooks along their belt.
///
/// Coverage is looked up at the belt point closest to the hook, with a
/// tolerance of twice the squared gap so a hook drifting off the surface is
/// not stranded by a small separation. Losing coverage (end stop, drifted
/// away, belt gone) leaves the hook frozen where it is until detached.
pub fn follow_conveyor(
    mut hooks: Query<HookQuery, (With<GrappleHook>, Without<HookStowed>, Without<Glide>)>,
    hook_shapes: Query<(&Collider, &Rotation), With<GrappleHook>>,
    surfaces: Query<(&Collider, &Position, &Rotation), Without<GrappleHook>>,
    belts: Query<(&ConveyorBelt, &GlobalTransform), Without<GrappleHook>>,
) {
    for mut hook in &mut hooks {
        let Attachment::ConveyorRide { surface } = *hook.attachment else {
            continue;
        };

        let hook_position = *hook.position;
        let surface_velocity = match (
            hook_shapes.get(hook.entity),
            surfaces.get(surface),
            belts.get(surface),
        ) {
            (
                Ok((hook_collider, hook_rotation)),
                Ok((surface_collider, surface_position, surface_rotation)),
                Ok((belt, belt_transform)),
            ) => {
                let separation = measure_separation(
                    PlacedCollider::new(hook_collider, &hook_position, hook_rotation),
                    PlacedCollider::new(surface_collider, surface_position, surface_rotation),
                );
                let d = separation.distance;

                belt.effective_direction(
                    belt_transform,
                    separation.surface_point,
                    &mut hook.cursor.0,
                    2.0 * d * d,
                )
            }
            _ => Vec2::ZERO,
        };

        match conveyor_step(hook.velocity.0, surface_velocity) {
            Some(velocity) => {
                hook.velocity.0 = velocity;
                trace!("hook {} riding {surface} at {velocity}", hook.entity);
            }
            None => {
                set_motion(
                    Motion::Frozen,
                    &mut hook.body,
                    &mut hook.locked_axes,
                    &mut hook.velocity,
                );
                hook.cursor.0 = None;
                *hook.attachment = Attachment::RigidLock { surface };
                debug!("hook {} left conveyor {surface}, locking in place", hook.entity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blends_halfway_toward_the_belt() {
        assert_eq!(
            conveyor_step(Vec2::new(4.0, 0.0), Vec2::new(2.0, 2.0)),
            Some(Vec2::new(3.0, 1.0))
        );
    }

    #[test]
    fn converges_on_belt_speed() {
        let belt = Vec2::new(1.5, 0.0);
        let mut velocity = Vec2::ZERO;
        for _ in 0..30 {
            velocity = conveyor_step(velocity, belt).unwrap();
        }
        assert!((velocity - belt).length() < 1e-6);
    }

    #[test]
    fn no_coverage_stops_the_ride() {
        assert_eq!(conveyor_step(Vec2::new(3.0, 1.0), Vec2::ZERO), None);
    }
}
