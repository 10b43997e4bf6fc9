pub mod conveyor;
pub mod grapple;
pub mod physics;

pub use grapple::GrapplePlugin;
pub use physics::PhysicsPlugin;

use bevy::prelude::*;

/// Unified plugin that adds physics and the grapple hook controller.
pub struct BevyGrapplePlugin;

impl Plugin for BevyGrapplePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<PhysicsPlugin>() {
            app.add_plugins(PhysicsPlugin);
        }
        if !app.is_plugin_added::<GrapplePlugin>() {
            app.add_plugins(GrapplePlugin);
        }
    }
}

pub mod prelude {
    pub use crate::conveyor::ConveyorBelt;
    pub use crate::grapple::{
        hook_bundle, spawn_hook, ArmHook, Attachment, ConveyorCursor, DetachHook, FlightTrail,
        Glide, GrappleAnchor, GrappleAttached, GrappleConfig, GrappleConfigError, GrappleHook,
        GrapplePlugin, GrappleSystems, HookContact, HookLook, HookStowed, JointTarget,
        SpringLink, StowHook, SurfaceNormal,
    };
    pub use crate::physics::{GameLayer, PhysicsPlugin};
    pub use crate::BevyGrapplePlugin;
}
