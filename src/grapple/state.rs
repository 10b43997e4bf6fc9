use bevy::prelude::*;

/// Marker component for a grapple hook projectile
#[derive(Component, Default)]
pub struct GrappleHook;

/// Capability marker for colliders the hook glides onto instead of sticking
/// where it hits.
///
/// Anchors should use `Sensor` colliders on `GameLayer::Trigger` and belong to
/// a rigid body.
#[derive(Component, Default)]
pub struct GrappleAnchor;

/// How the hook is currently fastened.
///
/// Every fastened mode carries the collider the hook is attached to. The
/// entity is a handle only: it may have been despawned since.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Attachment {
    #[default]
    Flight,
    /// Frozen in place as a static body
    RigidLock { surface: Entity },
    /// Held to a moving body by a spring joint
    JointSwing { surface: Entity },
    /// Carried along a conveyor belt as a kinematic body
    ConveyorRide { surface: Entity },
    /// Gliding onto an anchor, joint not yet connected
    GlideToAnchor { surface: Entity },
}

impl Attachment {
    pub fn surface(&self) -> Option<Entity> {
        match *self {
            Self::Flight => None,
            Self::RigidLock { surface }
            | Self::JointSwing { surface }
            | Self::ConveyorRide { surface }
            | Self::GlideToAnchor { surface } => Some(surface),
        }
    }

    pub fn is_attached(&self) -> bool {
        !matches!(self, Self::Flight)
    }
}

/// Appearance signal for whatever draws the hook
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HookLook {
    #[default]
    Shoot,
    Rest,
}

/// Last conveyor segment the hook rode on, `None` until the next lookup
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct ConveyorCursor(pub Option<usize>);

/// Body the spring joint connects to once enabled, recorded on attach
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct JointTarget(pub Option<Entity>);

/// Outward normal of the surface at the point the hook struck it, zero when
/// unknown or not attached
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Deref, DerefMut)]
pub struct SurfaceNormal(pub Vec2);

/// Where a flying hook was before the latest physics step
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Deref, DerefMut)]
pub struct FlightTrail(pub Option<Vec2>);

/// Live spring joint entity holding the hook
#[derive(Component, Clone, Copy, Debug)]
#[component(storage = "SparseSet")]
pub struct SpringLink(pub Entity);

/// Hook is gliding onto an anchor.
///
/// `progress` is the fraction of the remaining distance kept each frame, so
/// the hook closes in quickly at first and eases out near the anchor.
/// Removing this component cancels the glide.
#[derive(Component, Clone, Copy, Debug)]
#[component(storage = "SparseSet")]
pub struct Glide {
    pub anchor: Entity,
    pub progress: f32,
}

impl Glide {
    pub fn new(anchor: Entity) -> Self {
        Self {
            anchor,
            progress: 1.0,
        }
    }
}

/// Marker: hook is put away and ignores contacts until re-armed
#[derive(Component)]
#[component(storage = "SparseSet")]
pub struct HookStowed;
