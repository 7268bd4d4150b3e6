//! Boundaries to the host engine.
//!
//! The simulation core never talks to a physics engine, animator or VFX system directly. It
//! consumes these traits, so the logic can be driven headless (tests, replays) or bound to any
//! engine.

use crate::{
    layers::{Layer, LayerMask},
    owner::Owner,
    types::{Pose, Quat, Vec3},
};

/// "Is there ground under this point?" Queried fresh every tick, never cached.
pub trait GroundProbe {
    /// Sweep a sphere of `radius` from `origin` straight down up to `max_distance`, against
    /// colliders whose layer is in `mask`.
    fn query_grounded(&self, origin: Vec3, radius: f32, max_distance: f32, mask: LayerMask)
    -> bool;
}

impl<F> GroundProbe for F
where
    F: Fn(Vec3, f32, f32, LayerMask) -> bool,
{
    fn query_grounded(
        &self,
        origin: Vec3,
        radius: f32,
        max_distance: f32,
        mask: LayerMask,
    ) -> bool {
        self(origin, radius, max_distance, mask)
    }
}

/// A rigid body simulated by the host.
///
/// The host integrates position from velocity and resolves collisions; the core only reads the
/// pose and writes velocity, impulses and the kinematic switch.
pub trait PhysicsBody {
    fn pose(&self) -> Pose;
    /// Teleport. Used for attached (kinematic) placement and facing.
    fn set_pose(&mut self, pose: Pose);
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn is_kinematic(&self) -> bool;
    fn set_kinematic(&mut self, kinematic: bool);
    fn apply_impulse(&mut self, impulse: Vec3);

    #[inline]
    fn position(&self) -> Vec3 {
        self.pose().translation
    }

    #[inline]
    fn rotation(&self) -> Quat {
        self.pose().rotation
    }

    /// Turn in place.
    fn set_rotation(&mut self, rotation: Quat) {
        let translation = self.position();
        self.set_pose(Pose::new(translation, rotation));
    }
}

/// One contact reported by the host's collision pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub point: Vec3,
    /// Surface normal at the contact, pointing away from the struck object.
    pub normal: Vec3,
    pub layer: Layer,
    /// The struck object.
    pub owner: Owner,
    /// World pose of the struck object at contact time.
    pub owner_pose: Pose,
}

/// Named one-way animation signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationSignal {
    Attacking,
    Blocking(bool),
    Throw,
    ReturnSword,
    Embed,
}

pub trait AnimationSink {
    fn trigger(&mut self, signal: AnimationSignal);
    /// Toggle the weapon's own animation playback.
    fn set_weapon_animation(&mut self, enabled: bool);
}

/// Fire-and-forget visual effect spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectRequest {
    pub position: Vec3,
    pub facing: Quat,
    pub intensity: f32,
}

pub trait EffectSink {
    fn spawn(&mut self, request: EffectRequest);
}

/// Presentation stand-in when the host wires no animation or effect output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl AnimationSink for NullSink {
    fn trigger(&mut self, _signal: AnimationSignal) {}
    fn set_weapon_animation(&mut self, _enabled: bool) {}
}

impl EffectSink for NullSink {
    fn spawn(&mut self, _request: EffectRequest) {}
}
