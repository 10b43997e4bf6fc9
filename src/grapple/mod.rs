mod attach;
mod body;
mod config;
mod contact;
mod control;
mod events;
mod follow;
mod glide;
mod plugin;
mod spring;
mod state;

pub use attach::attach_on_contact;
pub use body::{set_motion, HookQuery, Motion};
pub use config::{GrappleConfig, GrappleConfigError};
pub use contact::{gather_hook_contacts, record_flight_trails};
pub use control::{detach_impulse, on_arm, on_detach, on_stow};
pub use events::*;
pub use follow::{conveyor_step, follow_conveyor};
pub use glide::{advance_glide, decay_progress, glide_toward};
pub use plugin::{hook_bundle, spawn_hook, GrapplePlugin, GrappleSystems};
pub use spring::{connect_spring, drop_orphaned_springs, release_spring};
pub use state::*;
