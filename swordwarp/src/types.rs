/*!
Core math aliases and the rigid pose type shared by every module.

This module intentionally contains no simulation logic. Conventions:
- Right-handed, +Y up.
- Local forward is -Z, local right is +X (so a yaw of 0 looks down -Z).
- Angles stored in state are degrees; nalgebra calls take radians.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Below this squared length a direction is treated as zero.
pub const DIR_EPS_SQ: f32 = 1.0e-10;

/// A rigid transform (position + orientation) in world or parent space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_translation(Vec3::zeros())
    }
}

impl Pose {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
        }
    }

    /// Convert to nalgebra `Isometry3` for use with rapier/parry queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }

    #[inline]
    pub fn from_iso(iso: &Iso) -> Self {
        Self {
            translation: iso.translation.vector,
            rotation: iso.rotation,
        }
    }

    /// `self ∘ local`: place a child pose expressed in this pose's space into world space.
    #[inline]
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose::from_iso(&(self.iso() * local.iso()))
    }

    /// Express a world pose in this pose's local space.
    #[inline]
    pub fn localize(&self, world: &Pose) -> Pose {
        Pose::from_iso(&(self.iso().inverse() * world.iso()))
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_of(&self.rotation)
    }
}

#[inline]
pub fn forward_of(rotation: &Quat) -> Vec3 {
    rotation * -Vec3::z()
}

#[inline]
pub fn right_of(rotation: &Quat) -> Vec3 {
    rotation * Vec3::x()
}

/// Rotation whose local forward (-Z) points along `forward`.
///
/// Returns `None` for a zero direction. When `forward` is (anti)parallel to +Y the roll
/// reference falls back to -Z so the result stays well defined.
pub fn look_rotation(forward: Vec3) -> Option<Quat> {
    let dir = forward.try_normalize(DIR_EPS_SQ.sqrt())?;
    let up = if dir.y.abs() > 0.999 {
        -Vec3::z()
    } else {
        Vec3::y()
    };
    // `face_towards` maps local +Z onto its argument, so aim +Z backwards.
    Some(Quat::face_towards(&(-dir), &up))
}

/// Drop the vertical component of `v`.
#[inline]
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).norm() < 1.0e-5
    }

    #[test]
    fn look_rotation_points_forward_axis_along_direction() {
        for dir in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.3, -0.4, 0.8).normalize(),
        ] {
            let rot = look_rotation(dir).unwrap();
            assert!(close(forward_of(&rot), dir), "dir {dir:?}");
        }
        assert!(look_rotation(Vec3::zeros()).is_none());
    }

    #[test]
    fn compose_then_localize_recovers_local_pose() {
        let parent = Pose::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(&Vec3::y_axis(), 0.7),
        );
        let local = Pose::new(
            Vec3::new(0.0, 0.5, -1.0),
            Quat::from_axis_angle(&Vec3::x_axis(), 0.2),
        );
        let world = parent.compose(&local);
        let back = parent.localize(&world);
        assert!(close(back.translation, local.translation));
        assert!(back.rotation.angle_to(&local.rotation) < 1.0e-5);
    }
}
