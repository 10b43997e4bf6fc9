mod layers;
mod plugin;
mod separation;

pub use layers::GameLayer;
pub use plugin::PhysicsPlugin;
pub use separation::*;
