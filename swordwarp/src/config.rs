/*!
Per-session configuration.

All values are supplied by the host and stay immutable for the session. `Default` impls pull
from [`crate::constants`]; [`SessionConfig::validate`] runs once at session build time so that
bad tuning fails fast instead of producing silent incorrect physics later.
*/

use crate::{
    constants::*,
    curve::EaseCurve,
    error::ConfigError,
    layers::{LayerMask, ground_mask},
    types::{Pose, Vec3},
};

#[derive(Clone, Debug, PartialEq)]
pub struct MovementConfig {
    pub max_speed: f32,
    pub jump_speed: f32,
    pub air_acceleration: f32,
    /// Normalized-dot cutoff for air control (see [`DEFAULT_AIR_CONTROL_THRESHOLD`]).
    pub air_control_threshold: f32,
    pub gravity: Vec3,
    pub ground_probe_radius: f32,
    /// Feet marker relative to the body pivot; its length is the probe distance.
    pub feet_offset: Vec3,
    pub ground_mask: LayerMask,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_speed: DEFAULT_MAX_SPEED_MPS,
            jump_speed: DEFAULT_JUMP_SPEED_MPS,
            air_acceleration: DEFAULT_AIR_ACCELERATION_MPS2,
            air_control_threshold: DEFAULT_AIR_CONTROL_THRESHOLD,
            gravity: Vec3::new(0.0, -GRAVITY_MPS2, 0.0),
            ground_probe_radius: DEFAULT_GROUND_PROBE_RADIUS,
            feet_offset: Vec3::new(0.0, DEFAULT_FEET_OFFSET_Y, 0.0),
            ground_mask: ground_mask(),
        }
    }
}

impl MovementConfig {
    /// Probe length: distance from the body pivot to the feet marker.
    #[inline]
    pub fn ground_probe_distance(&self) -> f32 {
        self.feet_offset.norm()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub sensitivity: f32,
    /// When set, moving the pointer up looks down.
    pub invert_y: bool,
    pub max_pitch_deg: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_LOOK_SENSITIVITY,
            invert_y: false,
            max_pitch_deg: DEFAULT_MAX_PITCH_DEG,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WarpConfig {
    pub curve: EaseCurve,
    /// Warp length in curve-domain units.
    pub duration: f32,
    pub ground_impact_intensity: f32,
    pub surface_impact_intensity: f32,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            curve: EaseCurve::default(),
            duration: DEFAULT_WARP_DURATION,
            ground_impact_intensity: GROUND_IMPACT_INTENSITY,
            surface_impact_intensity: SURFACE_IMPACT_INTENSITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponConfig {
    /// Launch impulse; the resulting speed depends on the host body's mass.
    pub throw_force: f32,
    pub animation_reenable_delay: f32,
    /// Weapon pivot to tip marker; its length becomes the embed offset.
    pub tip_offset: Vec3,
    /// Hand anchor relative to the player body pivot.
    pub hand_offset: Pose,
    /// Weapon rest pose relative to the hand anchor.
    pub rest_pose: Pose,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            throw_force: DEFAULT_THROW_FORCE,
            animation_reenable_delay: DEFAULT_ANIMATION_REENABLE_DELAY,
            tip_offset: Vec3::from(DEFAULT_TIP_OFFSET),
            hand_offset: Pose::from_translation(Vec3::from(DEFAULT_HAND_OFFSET)),
            rest_pose: Pose::from_translation(Vec3::from(DEFAULT_HAND_REST_OFFSET)),
        }
    }
}

impl WeaponConfig {
    /// Distance from the weapon pivot to its tip marker.
    #[inline]
    pub fn embed_offset_distance(&self) -> f32 {
        self.tip_offset.norm()
    }
}

/// Player body turning toward the camera heading.
#[derive(Clone, Debug, PartialEq)]
pub struct FacingConfig {
    pub max_degrees_per_second: f32,
    pub ease_in: bool,
    pub ease_factor: f32,
}

impl Default for FacingConfig {
    fn default() -> Self {
        Self {
            max_degrees_per_second: DEFAULT_FACING_TURN_RATE_DEG,
            ease_in: true,
            ease_factor: DEFAULT_FACING_EASE_FACTOR,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub warp: WarpConfig,
    pub weapon: WeaponConfig,
    pub facing: FacingConfig,
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn finite(field: &'static str, v: &Vec3) -> Result<(), ConfigError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        non_negative("movement.max_speed", m.max_speed)?;
        non_negative("movement.jump_speed", m.jump_speed)?;
        non_negative("movement.air_acceleration", m.air_acceleration)?;
        if !m.air_control_threshold.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "movement.air_control_threshold",
            });
        }
        finite("movement.gravity", &m.gravity)?;
        positive("movement.ground_probe_radius", m.ground_probe_radius)?;
        finite("movement.feet_offset", &m.feet_offset)?;
        positive("movement.feet_offset (length)", m.ground_probe_distance())?;
        if m.ground_mask.is_empty() {
            return Err(ConfigError::EmptyGroundMask);
        }

        let c = &self.camera;
        non_negative("camera.sensitivity", c.sensitivity)?;
        non_negative("camera.max_pitch_deg", c.max_pitch_deg)?;

        let w = &self.warp;
        positive("warp.duration", w.duration)?;
        w.curve.validate().map_err(ConfigError::Curve)?;
        non_negative("warp.ground_impact_intensity", w.ground_impact_intensity)?;
        non_negative("warp.surface_impact_intensity", w.surface_impact_intensity)?;

        let wp = &self.weapon;
        non_negative("weapon.throw_force", wp.throw_force)?;
        non_negative("weapon.animation_reenable_delay", wp.animation_reenable_delay)?;
        finite("weapon.tip_offset", &wp.tip_offset)?;
        finite("weapon.hand_offset", &wp.hand_offset.translation)?;
        finite("weapon.rest_pose", &wp.rest_pose.translation)?;

        let f = &self.facing;
        non_negative("facing.max_degrees_per_second", f.max_degrees_per_second)?;
        non_negative("facing.ease_factor", f.ease_factor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn derived_distances_come_from_marker_offsets() {
        let mut cfg = SessionConfig::default();
        cfg.movement.feet_offset = Vec3::new(0.0, -0.9, 0.0);
        cfg.weapon.tip_offset = Vec3::new(0.0, 0.3, -0.4);
        assert!((cfg.movement.ground_probe_distance() - 0.9).abs() < 1.0e-6);
        assert!((cfg.weapon.embed_offset_distance() - 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn bad_values_are_reported_by_field() {
        let mut cfg = SessionConfig::default();
        cfg.warp.duration = 0.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                field: "warp.duration",
                value: 0.0
            })
        );

        let mut cfg = SessionConfig::default();
        cfg.movement.ground_mask = LayerMask::empty();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyGroundMask));

        let mut cfg = SessionConfig::default();
        cfg.warp.curve = EaseCurve::Keys(vec![]);
        assert!(matches!(cfg.validate(), Err(ConfigError::Curve(_))));
    }
}
