//! Default tuning values.
//!
//! Units are meters, seconds and degrees. These only seed the `Default` impls in
//! [`crate::config`]; hosts override them per session.

/// Grounded horizontal speed (meters per second).
pub const DEFAULT_MAX_SPEED_MPS: f32 = 7.0;

/// Vertical speed written on a grounded jump (meters per second).
pub const DEFAULT_JUMP_SPEED_MPS: f32 = 6.5;

/// Lateral acceleration available while airborne (meters per second squared).
pub const DEFAULT_AIR_ACCELERATION_MPS2: f32 = 20.0;

/// Air control only adds thrust when the desired direction and the current lateral velocity
/// direction have a normalized dot product below this value.
///
/// - 1.0 = always allow (runaway acceleration possible)
/// - 0.8 = allow redirects, refuse pushing further the way we already go
pub const DEFAULT_AIR_CONTROL_THRESHOLD: f32 = 0.8;

/// Gravity magnitude in meters per second squared (positive value, applied along -Y).
pub const GRAVITY_MPS2: f32 = 9.81;

/// Radius of the downward grounded probe (meters).
pub const DEFAULT_GROUND_PROBE_RADIUS: f32 = 0.3;

/// Feet marker relative to the player body pivot (meters). Its length is the probe distance.
pub const DEFAULT_FEET_OFFSET_Y: f32 = -1.0;

/// Degrees of camera rotation per unit of look input.
pub const DEFAULT_LOOK_SENSITIVITY: f32 = 0.15;

/// Camera pitch clamp (degrees, symmetric).
pub const DEFAULT_MAX_PITCH_DEG: f32 = 80.0;

/// Length of the warp in curve-domain units (seconds at a 1:1 mapping).
pub const DEFAULT_WARP_DURATION: f32 = 1.0;

/// Impulse applied along the weapon's forward axis on launch (newton seconds).
pub const DEFAULT_THROW_FORCE: f32 = 40.0;

/// Delay before the weapon's own animation is switched back on after a throw (seconds).
pub const DEFAULT_ANIMATION_REENABLE_DELAY: f32 = 0.5;

/// Weapon tip marker relative to its pivot (meters). Its length is the embed offset.
pub const DEFAULT_TIP_OFFSET: [f32; 3] = [0.0, 0.0, -0.5];

/// Weapon rest pose relative to the player hand anchor (meters).
pub const DEFAULT_HAND_REST_OFFSET: [f32; 3] = [0.4, 0.2, -0.3];

/// Hand anchor relative to the player body pivot (meters).
pub const DEFAULT_HAND_OFFSET: [f32; 3] = [0.35, 0.3, -0.2];

/// Impact effect intensity after warping onto the ground.
pub const GROUND_IMPACT_INTENSITY: f32 = 2.0;

/// Impact effect intensity after warping onto any other surface.
pub const SURFACE_IMPACT_INTENSITY: f32 = 1.0;

/// Player body turn rate toward the camera heading (degrees per second).
pub const DEFAULT_FACING_TURN_RATE_DEG: f32 = 720.0;

/// Proportional gain used by eased orientation matching (1/second).
pub const DEFAULT_FACING_EASE_FACTOR: f32 = 10.0;
