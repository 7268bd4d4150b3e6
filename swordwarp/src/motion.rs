use crate::types::{DIR_EPS_SQ, Quat, Vec2, Vec3, forward_of, planar, right_of};

// NOTE: Pure velocity math only. Nothing here reads input, bodies or probes; the locomotion
// controller feeds state in and commits what comes out.

/// Camera orientation from Euler angles in degrees (roll is always zero).
///
/// Positive yaw turns right (toward +X from -Z). Positive pitch looks down.
#[inline]
pub fn camera_rotation(pitch_deg: f32, yaw_deg: f32) -> Quat {
    let yaw = Quat::from_axis_angle(&Vec3::y_axis(), -yaw_deg.to_radians());
    let pitch = Quat::from_axis_angle(&Vec3::x_axis(), -pitch_deg.to_radians());
    yaw * pitch
}

/// Yaw-only orientation facing the camera heading.
#[inline]
pub fn heading_rotation(yaw_deg: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), -yaw_deg.to_radians())
}

/// Horizontal movement basis derived from a camera orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl MoveBasis {
    /// Project camera forward/right onto the horizontal plane and re-normalize, so looking up
    /// or down never changes ground speed. A degenerate axis collapses to zero.
    pub fn from_camera(camera: &Quat) -> Self {
        let flat = |v: Vec3| {
            planar(v)
                .try_normalize(DIR_EPS_SQ.sqrt())
                .unwrap_or_else(Vec3::zeros)
        };
        Self {
            forward: flat(forward_of(camera)),
            right: flat(right_of(camera)),
        }
    }

    /// `input.y` drives forward, `input.x` drives right.
    #[inline]
    pub fn direction(&self, input: Vec2) -> Vec3 {
        self.forward * input.y + self.right * input.x
    }
}

/// Grounded velocity: horizontal part set from input, vertical part kept.
#[inline]
pub fn grounded_velocity(current: Vec3, basis: &MoveBasis, input: Vec2, max_speed: f32) -> Vec3 {
    let horizontal = basis.direction(input) * max_speed;
    Vec3::new(horizontal.x, current.y, horizontal.z)
}

/// Parameters for one airborne control step.
#[derive(Clone, Copy, Debug)]
pub struct AirControlParams {
    pub velocity: Vec3,
    pub input: Vec2,
    pub air_acceleration: f32,
    /// Normalized-dot cutoff; at or above it no thrust is added.
    pub threshold: f32,
    pub dt_seconds: f32,
}

/// Velocity after one airborne control step.
///
/// The desired delta is added in full only when its direction differs enough from the current
/// lateral velocity direction. Pushing further the way we are already going is refused, which
/// stops runaway air acceleration but keeps redirects.
pub fn air_control(basis: &MoveBasis, params: AirControlParams) -> Vec3 {
    let AirControlParams {
        velocity,
        input,
        air_acceleration,
        threshold,
        dt_seconds,
    } = params;

    let desired = basis.direction(input) * air_acceleration * dt_seconds.max(0.0);
    let Some(desired_dir) = desired.try_normalize(DIR_EPS_SQ.sqrt()) else {
        return velocity;
    };

    // No lateral motion yet counts as "not aligned".
    let alignment = planar(velocity)
        .try_normalize(DIR_EPS_SQ.sqrt())
        .map(|lateral_dir| lateral_dir.dot(&desired_dir))
        .unwrap_or(0.0);

    if alignment < threshold {
        velocity + desired
    } else {
        velocity
    }
}
