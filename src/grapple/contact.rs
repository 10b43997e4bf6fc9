use avian2d::prelude::*;
use bevy::prelude::*;

use super::config::GrappleConfig;
use super::events::HookContact;
use super::state::*;
use crate::physics::{locate_impact, Impact, PlacedCollider};

/// Turns physics collision events involving a hook into [`HookContact`]s.
///
/// The hook's collider is expected on the hook entity itself. When either
/// side is a sensor the contact is an overlap, which only matters for
/// anchors that belong to a rigid body; otherwise it is a solid hit, located
/// by tracing the hook's path from where it was before the physics step.
pub fn gather_hook_contacts(
    mut collisions: MessageReader<CollisionStart>,
    hooks: Query<(&Position, &FlightTrail, &GrappleConfig, Has<Sensor>), With<GrappleHook>>,
    others: Query<
        (
            Option<&CollisionLayers>,
            Option<&Collider>,
            Option<&Position>,
            Option<&Rotation>,
            Has<Sensor>,
            Has<GrappleAnchor>,
        ),
        Without<GrappleHook>,
    >,
    mut contacts: MessageWriter<HookContact>,
) {
    for event in collisions.read() {
        let (hook, other, other_body) = if hooks.contains(event.collider1) {
            (event.collider1, event.collider2, event.body2)
        } else if hooks.contains(event.collider2) {
            (event.collider2, event.collider1, event.body1)
        } else {
            continue;
        };

        let Ok((hook_position, trail, config, hook_is_sensor)) = hooks.get(hook) else {
            continue;
        };
        let Ok((layers, collider, position, rotation, other_is_sensor, is_anchor)) =
            others.get(other)
        else {
            continue;
        };

        if hook_is_sensor || other_is_sensor {
            match (is_anchor, other_body) {
                (true, Some(body)) => {
                    contacts.write(HookContact::Anchor {
                        hook,
                        anchor: other,
                        body,
                    });
                }
                (true, None) => {
                    warn!(
                        "hook {hook} overlapped anchor {other} without a rigid body, ignoring"
                    );
                }
                _ => {}
            }
            continue;
        }

        let impact = match (collider, position, rotation) {
            (Some(collider), Some(position), Some(rotation)) => locate_impact(
                trail.0,
                hook_position.0,
                config.radius,
                PlacedCollider::new(collider, position, rotation),
            ),
            _ => Impact {
                point: hook_position.0,
                normal: Vec2::ZERO,
            },
        };

        let layers = layers.map_or_else(
            || CollisionLayers::default().memberships,
            |layers| layers.memberships,
        );

        contacts.write(HookContact::Solid {
            hook,
            surface: other,
            body: other_body,
            layers,
            point: impact.point,
            normal: impact.normal,
        });
    }
}

/// Remembers where each flying hook is before the physics step moves it, so
/// a collision in that step can be traced along the hook's path
pub fn record_flight_trails(
    mut hooks: Query<
        (&Attachment, &Position, &mut FlightTrail),
        (With<GrappleHook>, Without<HookStowed>),
    >,
) {
    for (attachment, position, mut trail) in &mut hooks {
        trail.0 = (!attachment.is_attached()).then_some(position.0);
    }
}
