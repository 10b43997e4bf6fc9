use avian2d::prelude::*;
use bevy::prelude::*;

use super::body::{set_motion, HookQuery, HookQueryItem, Motion};
use super::spring::connect_spring;
use super::state::*;

/// Glide progress left after `dt` seconds
pub fn decay_progress(progress: f32, rate: f32, dt: f32) -> f32 {
    progress * (-rate * dt.max(0.0)).exp()
}

/// Hook position after one glide frame: `progress` is the share of the
/// remaining distance the hook keeps
pub fn glide_toward(position: Vec2, anchor: Vec2, progress: f32) -> Vec2 {
    anchor + (position - anchor) * progress
}

/// Eases gliding hooks onto their anchor, once per frame.
///
/// Once progress has decayed to the finish threshold the hook snaps onto the
/// anchor, becomes dynamic again and either connects its spring (anchor body
/// can move) or freezes in place. Detaching removes [`Glide`] first, so none
/// of that runs for an interrupted glide.
pub fn advance_glide(
    mut commands: Commands,
    mut hooks: Query<(HookQuery, &mut Glide), (With<GrappleHook>, Without<HookStowed>)>,
    anchors: Query<&Position, Without<GrappleHook>>,
    bodies: Query<(&RigidBody, &Position), Without<GrappleHook>>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut hook, mut glide) in &mut hooks {
        let Ok(anchor_position) = anchors.get(glide.anchor).map(|position| position.0) else {
            debug!("hook {} lost its anchor mid-glide, stopping in place", hook.entity);
            finish_glide(&mut hook, &mut commands, None);
            continue;
        };

        if glide.progress > hook.config.glide_finish_progress {
            hook.position.0 = glide_toward(hook.position.0, anchor_position, glide.progress);
            glide.progress = decay_progress(glide.progress, hook.config.glide_rate, dt);
            trace!("hook {} glide progress {:.3}", hook.entity, glide.progress);
            continue;
        }

        hook.position.0 = anchor_position;

        let spring = hook.joint_target.0.and_then(|target| {
            bodies
                .get(target)
                .ok()
                .filter(|(rigid_body, _)| !rigid_body.is_static())
                .map(|(_, position)| (target, position.0))
        });
        finish_glide(&mut hook, &mut commands, spring);
    }
}

fn finish_glide(hook: &mut HookQueryItem, commands: &mut Commands, spring: Option<(Entity, Vec2)>) {
    commands.entity(hook.entity).remove::<Glide>();
    set_motion(
        Motion::Free,
        &mut hook.body,
        &mut hook.locked_axes,
        &mut hook.velocity,
    );

    let Attachment::GlideToAnchor { surface } = *hook.attachment else {
        return;
    };

    match spring {
        Some((target, target_position)) => {
            connect_spring(
                commands,
                hook.entity,
                hook.position.0,
                target,
                target_position,
                hook.config,
            );
            *hook.attachment = Attachment::JointSwing { surface };
        }
        None => {
            hook.joint_target.0 = None;
            set_motion(
                Motion::Frozen,
                &mut hook.body,
                &mut hook.locked_axes,
                &mut hook.velocity,
            );
            *hook.attachment = Attachment::RigidLock { surface };
        }
    }

    debug!("hook {} settled on anchor: {:?}", hook.entity, *hook.attachment);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_matches_one_thirtieth_per_frame_at_60hz() {
        let progress = decay_progress(1.0, 2.034, 1.0 / 60.0);
        assert!((progress - 29.0 / 30.0).abs() < 1e-4);
    }

    #[test]
    fn decay_is_frame_rate_independent() {
        let mut fast = 1.0;
        for _ in 0..120 {
            fast = decay_progress(fast, 2.034, 1.0 / 120.0);
        }
        let mut slow = 1.0;
        for _ in 0..30 {
            slow = decay_progress(slow, 2.034, 1.0 / 30.0);
        }
        assert!((fast - slow).abs() < 1e-4);
    }

    #[test]
    fn progress_strictly_decreases() {
        let mut progress = 1.0;
        for _ in 0..200 {
            let next = decay_progress(progress, 2.034, 1.0 / 60.0);
            assert!(next < progress);
            progress = next;
        }
    }

    #[test]
    fn negative_delta_does_not_grow_progress() {
        assert_eq!(decay_progress(0.5, 2.034, -1.0), 0.5);
    }

    #[test]
    fn glide_keeps_progress_share_of_remaining_distance() {
        let anchor = Vec2::new(10.0, 0.0);
        assert_eq!(glide_toward(Vec2::ZERO, anchor, 1.0), Vec2::ZERO);
        assert_eq!(glide_toward(Vec2::ZERO, anchor, 0.75), Vec2::new(2.5, 0.0));
        assert_eq!(glide_toward(Vec2::ZERO, anchor, 0.0), anchor);
    }
}
