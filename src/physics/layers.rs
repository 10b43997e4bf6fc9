use avian2d::prelude::*;

/// Collision layers for the grapple sandbox
#[derive(PhysicsLayer, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// The grapple hook projectile
    Hook,
    /// Surfaces a hook may fasten to
    Platform,
    /// Anchor targets and other sensors
    Trigger,
}
