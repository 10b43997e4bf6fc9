use avian2d::prelude::*;
use bevy::prelude::*;

use super::state::Attachment;

/// A contact between a hook and something else, distilled from the physics
/// collision events.
#[derive(Message, Clone, Copy, Debug)]
pub enum HookContact {
    /// Both colliders are solid
    Solid {
        hook: Entity,
        /// Collider that was hit
        surface: Entity,
        /// Rigid body the hit collider belongs to
        body: Option<Entity>,
        /// Layer memberships of the hit collider
        layers: LayerMask,
        /// World-space contact point
        point: Vec2,
        /// Outward normal of the hit surface at `point`, zero when unknown
        normal: Vec2,
    },
    /// Hook overlapped an anchor sensor
    Anchor {
        hook: Entity,
        anchor: Entity,
        body: Entity,
    },
}

impl HookContact {
    pub fn hook(&self) -> Entity {
        match *self {
            Self::Solid { hook, .. } | Self::Anchor { hook, .. } => hook,
        }
    }
}

/// Emitted when a hook fastens to something.
///
/// `target` depends on the attachment: the hook itself for rigid and conveyor
/// attachments, the hit body for spring attachments and the anchor body for
/// anchor glides. Anchor glides report as soon as the glide starts.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrappleAttached {
    pub hook: Entity,
    pub target: Entity,
    pub attachment: Attachment,
}

/// Reset a hook to flight, waking it if stowed
#[derive(EntityEvent, Clone, Copy, Debug)]
pub struct ArmHook {
    pub entity: Entity,
}

/// Release a hook from whatever it is fastened to, with a kick-off impulse
#[derive(EntityEvent, Clone, Copy, Debug)]
pub struct DetachHook {
    pub entity: Entity,
}

/// Put a hook away: back to flight, out of the simulation until armed
#[derive(EntityEvent, Clone, Copy, Debug)]
pub struct StowHook {
    pub entity: Entity,
}
