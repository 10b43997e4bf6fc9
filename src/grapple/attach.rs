use avian2d::prelude::*;
use bevy::prelude::*;

use super::body::{fasten, set_motion, HookQuery, Motion};
use super::events::{GrappleAttached, HookContact};
use super::spring::connect_spring;
use super::state::*;
use crate::conveyor::ConveyorBelt;

/// Classifies the first qualifying contact of each flying hook and fastens it.
///
/// Solid hits on platform layers:
/// - conveyor belt: ride it as a kinematic body
/// - moving body: connect the spring joint now
/// - anything else: freeze as a static body
///
/// Anchor overlaps start a glide; the spring waits until the glide is done.
/// A hook already showing its rest look ignores further contacts.
pub fn attach_on_contact(
    mut commands: Commands,
    mut contacts: MessageReader<HookContact>,
    mut hooks: Query<HookQuery, (With<GrappleHook>, Without<HookStowed>)>,
    belts: Query<(), With<ConveyorBelt>>,
    bodies: Query<(&RigidBody, &Position), Without<GrappleHook>>,
    mut attached: MessageWriter<GrappleAttached>,
) {
    // Only bodies that still exist and can move take a spring
    let spring_target_of = |body: Entity| {
        bodies
            .get(body)
            .ok()
            .filter(|(rigid_body, _)| !rigid_body.is_static())
            .map(|(_, position)| (body, position.0))
    };

    for contact in contacts.read() {
        let Ok(mut hook) = hooks.get_mut(contact.hook()) else {
            continue;
        };

        // Contacts are taken once per arm/detach cycle
        if *hook.look == HookLook::Rest {
            trace!("hook {} already at rest, ignoring {contact:?}", hook.entity);
            continue;
        }

        match *contact {
            HookContact::Solid {
                surface,
                body,
                layers,
                point,
                normal,
                ..
            } => {
                if (layers & hook.config.platform_layers) == LayerMask::NONE {
                    continue;
                }

                hook.position.0 = point;
                let spring_target = body.and_then(spring_target_of);
                fasten(
                    &mut hook,
                    &mut commands,
                    spring_target.map(|(body, _)| body),
                    normal,
                );

                let (attachment, target) = if belts.contains(surface) {
                    set_motion(
                        Motion::Carried,
                        &mut hook.body,
                        &mut hook.locked_axes,
                        &mut hook.velocity,
                    );
                    hook.cursor.0 = None;
                    (Attachment::ConveyorRide { surface }, hook.entity)
                } else if let Some((target, target_position)) = spring_target {
                    connect_spring(
                        &mut commands,
                        hook.entity,
                        point,
                        target,
                        target_position,
                        hook.config,
                    );
                    (Attachment::JointSwing { surface }, target)
                } else {
                    set_motion(
                        Motion::Frozen,
                        &mut hook.body,
                        &mut hook.locked_axes,
                        &mut hook.velocity,
                    );
                    (Attachment::RigidLock { surface }, hook.entity)
                };

                *hook.attachment = attachment;
                attached.write(GrappleAttached {
                    hook: hook.entity,
                    target,
                    attachment,
                });

                debug!("hook {} attached to {surface}: {attachment:?}", hook.entity);
            }
            HookContact::Anchor { anchor, body, .. } => {
                let joint_target = spring_target_of(body).map(|(body, _)| body);
                fasten(&mut hook, &mut commands, joint_target, Vec2::ZERO);

                set_motion(
                    Motion::Carried,
                    &mut hook.body,
                    &mut hook.locked_axes,
                    &mut hook.velocity,
                );
                commands.entity(hook.entity).insert(Glide::new(anchor));

                let attachment = Attachment::GlideToAnchor { surface: anchor };
                *hook.attachment = attachment;
                attached.write(GrappleAttached {
                    hook: hook.entity,
                    target: body,
                    attachment,
                });

                debug!("hook {} gliding onto anchor {anchor}", hook.entity);
            }
        }
    }
}
