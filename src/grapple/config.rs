use avian2d::prelude::*;
use bevy::prelude::*;
use thiserror::Error;

use crate::physics::GameLayer;

/// Problems with a [`GrappleConfig`] that would leave the hook in an
/// undefined physical state
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrappleConfigError {
    #[error("{name} mass must be positive, got {value}")]
    NonPositiveMass { name: &'static str, value: f32 },
    #[error("{name} gravity scale must be within 0..=1, got {value}")]
    GravityScaleOutOfRange { name: &'static str, value: f32 },
    #[error("detach force must not be negative, got {0}")]
    NegativeDetachForce(f32),
    #[error("glide rate must be positive, got {0}")]
    NonPositiveGlideRate(f32),
    #[error("glide finish progress must be within (0, 1), got {0}")]
    GlideFinishOutOfRange(f32),
    #[error("{name} must not be negative, got {value}")]
    NegativeSetting { name: &'static str, value: f32 },
}

/// Grapple hook tuning, fixed for the lifetime of the hook
#[derive(Component, Clone, Copy, Debug)]
pub struct GrappleConfig {
    /// Mass while flying
    pub flight_mass: f32,
    /// Mass once fastened to something
    pub rest_mass: f32,
    /// Gravity scale while flying (0.0-1.0)
    pub flight_gravity_scale: f32,
    /// Gravity scale once fastened (0.0-1.0)
    pub rest_gravity_scale: f32,
    /// Kick-off impulse per unit of mass when detaching
    pub detach_force: f32,
    /// Layers the hook may fasten to on a solid hit
    pub platform_layers: LayerMask,
    /// Glide progress decays as exp(-rate * t). 2.034/s matches shedding
    /// 1/30 of the remaining progress every frame at 60 Hz.
    pub glide_rate: f32,
    /// The glide snaps onto the anchor once progress drops to this
    pub glide_finish_progress: f32,
    /// Slack added to the spring's rest length when it connects
    pub spring_slack: f32,
    /// Spring softness (inverse stiffness), 0.0 = rigid
    pub spring_compliance: f32,
    /// Collider radius of the hook
    pub radius: f32,
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self {
            flight_mass: 1.0,
            rest_mass: 0.2,
            flight_gravity_scale: 0.6,
            rest_gravity_scale: 1.0,
            detach_force: 4.0,
            platform_layers: LayerMask::from(GameLayer::Platform),
            glide_rate: 2.034,
            glide_finish_progress: 0.1,
            spring_slack: 0.0,
            spring_compliance: 0.001,
            radius: 0.15,
        }
    }
}

impl GrappleConfig {
    pub fn validate(&self) -> Result<(), GrappleConfigError> {
        for (name, value) in [("flight", self.flight_mass), ("rest", self.rest_mass)] {
            if !(value > 0.0) {
                return Err(GrappleConfigError::NonPositiveMass { name, value });
            }
        }

        for (name, value) in [
            ("flight", self.flight_gravity_scale),
            ("rest", self.rest_gravity_scale),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GrappleConfigError::GravityScaleOutOfRange { name, value });
            }
        }

        if !(self.detach_force >= 0.0) {
            return Err(GrappleConfigError::NegativeDetachForce(self.detach_force));
        }
        if !(self.glide_rate > 0.0) {
            return Err(GrappleConfigError::NonPositiveGlideRate(self.glide_rate));
        }
        if !(self.glide_finish_progress > 0.0 && self.glide_finish_progress < 1.0) {
            return Err(GrappleConfigError::GlideFinishOutOfRange(
                self.glide_finish_progress,
            ));
        }

        for (name, value) in [
            ("spring slack", self.spring_slack),
            ("spring compliance", self.spring_compliance),
            ("radius", self.radius),
        ] {
            if !(value >= 0.0) {
                return Err(GrappleConfigError::NegativeSetting { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GrappleConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_rest_mass() {
        let config = GrappleConfig {
            rest_mass: 0.0,
            ..default()
        };
        assert_eq!(
            config.validate(),
            Err(GrappleConfigError::NonPositiveMass {
                name: "rest",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_gravity_scale_above_one() {
        let config = GrappleConfig {
            flight_gravity_scale: 1.5,
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(GrappleConfigError::GravityScaleOutOfRange { name: "flight", .. })
        ));
    }

    #[test]
    fn rejects_nan_glide_rate() {
        let config = GrappleConfig {
            glide_rate: f32::NAN,
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(GrappleConfigError::NonPositiveGlideRate(_))
        ));
    }

    #[test]
    fn rejects_finish_threshold_of_one() {
        let config = GrappleConfig {
            glide_finish_progress: 1.0,
            ..default()
        };
        assert_eq!(
            config.validate(),
            Err(GrappleConfigError::GlideFinishOutOfRange(1.0))
        );
    }

    #[test]
    fn error_messages_name_the_setting() {
        let err = GrappleConfigError::NegativeSetting {
            name: "spring compliance",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "spring compliance must not be negative, got -1");
    }
}
