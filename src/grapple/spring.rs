use avian2d::prelude::*;
use bevy::prelude::*;

use super::body::{set_motion, HookQuery, Motion};
use super::config::GrappleConfig;
use super::state::*;

/// Spawns a spring joint from the hook to `target`, resting at the current
/// distance between the two so connecting it does not yank either body.
pub fn connect_spring(
    commands: &mut Commands,
    hook: Entity,
    hook_position: Vec2,
    target: Entity,
    target_position: Vec2,
    config: &GrappleConfig,
) -> Entity {
    let rest_length = hook_position.distance(target_position);

    let joint = commands
        .spawn(
            DistanceJoint::new(hook, target)
                .with_limits(rest_length, rest_length + config.spring_slack)
                .with_compliance(config.spring_compliance),
        )
        .id();

    commands.entity(hook).insert(SpringLink(joint));
    joint
}

/// Tears down the hook's spring joint, if the joint entity still exists
pub fn release_spring(commands: &mut Commands, hook: Entity, spring: &SpringLink) {
    commands.entity(spring.0).try_despawn();
    commands.entity(hook).remove::<SpringLink>();
}

/// Freezes swinging hooks whose joint target has been despawned.
///
/// A joint must never hang off a body that is gone, so the hook falls back to
/// a rigid lock where it is.
pub fn drop_orphaned_springs(
    mut commands: Commands,
    mut hooks: Query<HookQuery, (With<GrappleHook>, Without<HookStowed>)>,
    bodies: Query<(), (With<RigidBody>, Without<GrappleHook>)>,
) {
    for mut hook in &mut hooks {
        let Attachment::JointSwing { surface } = *hook.attachment else {
            continue;
        };

        if hook.joint_target.is_some_and(|target| bodies.contains(target)) {
            continue;
        }

        if let Some(spring) = hook.spring {
            release_spring(&mut commands, hook.entity, spring);
        }
        hook.joint_target.0 = None;
        set_motion(
            Motion::Frozen,
            &mut hook.body,
            &mut hook.locked_axes,
            &mut hook.velocity,
        );
        *hook.attachment = Attachment::RigidLock { surface };

        debug!("hook {} lost its spring target, locking in place", hook.entity);
    }
}
