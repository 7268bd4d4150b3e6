use crate::types::Quat;

/// Rotates a follower orientation toward a target orientation.
///
/// Without ease-in the follower turns at a constant `max_degrees_per_second`. With ease-in the
/// rate is `min(max, angle_remaining * ease_factor)`, a proportional controller that slows
/// down on approach. A step never overshoots the target.
#[derive(Clone, Debug, PartialEq)]
pub struct OrientationMatcher {
    pub max_degrees_per_second: f32,
    pub ease_in: bool,
    pub ease_factor: f32,
}

impl OrientationMatcher {
    pub fn new(max_degrees_per_second: f32, ease_in: bool, ease_factor: f32) -> Self {
        Self {
            max_degrees_per_second,
            ease_in,
            ease_factor,
        }
    }

    /// Degrees the follower may turn this step.
    pub fn step_degrees(&self, follower: &Quat, target: &Quat, dt: f32) -> f32 {
        let max = self.max_degrees_per_second.max(0.0);
        let rate = if self.ease_in {
            let remaining = follower.angle_to(target).to_degrees();
            max.min(remaining * self.ease_factor.max(0.0))
        } else {
            max
        };
        rate * dt.max(0.0)
    }

    /// Returns the follower's orientation after one step of `dt` seconds.
    pub fn tick(&self, follower: &Quat, target: &Quat, dt: f32) -> Quat {
        rotate_towards(follower, target, self.step_degrees(follower, target, dt))
    }

    /// Snap the follower onto the target with no interpolation. Independent of any rate.
    #[inline]
    pub fn instant_match(target: &Quat) -> Quat {
        *target
    }
}

/// Rotate `from` toward `to` by at most `max_degrees`, clamped at `to`.
pub fn rotate_towards(from: &Quat, to: &Quat, max_degrees: f32) -> Quat {
    let angle = from.angle_to(to).to_degrees();
    if angle <= f32::EPSILON || max_degrees >= angle {
        return *to;
    }
    if max_degrees <= 0.0 {
        return *from;
    }
    let t = max_degrees / angle;
    from.try_slerp(to, t, 1.0e-6).unwrap_or(*to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;

    fn yaw(deg: f32) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), deg.to_radians())
    }

    #[test]
    fn constant_rate_turns_exactly_rate_times_dt() {
        let m = OrientationMatcher::new(90.0, false, 0.0);
        let out = m.tick(&yaw(0.0), &yaw(90.0), 0.5);
        assert!((out.angle_to(&yaw(45.0))).to_degrees() < 1.0e-3);
    }

    #[test]
    fn never_overshoots_target() {
        let m = OrientationMatcher::new(1000.0, false, 0.0);
        let target = yaw(30.0);
        let out = m.tick(&yaw(0.0), &target, 1.0);
        assert_eq!(out, target);
    }

    #[test]
    fn ease_in_slows_down_near_target() {
        let m = OrientationMatcher::new(360.0, true, 2.0);
        let far = m.step_degrees(&yaw(0.0), &yaw(170.0), 0.1);
        let near = m.step_degrees(&yaw(0.0), &yaw(10.0), 0.1);
        // 170 * 2 = 340 < 360, and 10 * 2 = 20.
        assert!((far - 34.0).abs() < 1.0e-2);
        assert!((near - 2.0).abs() < 1.0e-2);

        let mut q = yaw(0.0);
        let target = yaw(90.0);
        let mut last_gap = q.angle_to(&target);
        for _ in 0..50 {
            q = m.tick(&q, &target, 0.05);
            let gap = q.angle_to(&target);
            assert!(gap <= last_gap + 1.0e-6);
            last_gap = gap;
        }
    }

    #[test]
    fn instant_match_copies_target() {
        let target = Quat::from_euler_angles(0.1, 0.2, 0.3);
        assert_eq!(OrientationMatcher::instant_match(&target), target);
    }
}
