use crate::{
    ports::PhysicsBody,
    types::{Pose, Vec3},
};

/// Minimal rigid body for headless runs and tests.
///
/// Integration is explicit Euler on position only: the locomotion controller already owns
/// gravity for the player, and a thrown weapon carries whatever velocity its impulse gave it.
/// No collision response; the host's contact reports drive embedding instead.
#[derive(Clone, Debug, PartialEq)]
pub struct SimBody {
    pose: Pose,
    velocity: Vec3,
    kinematic: bool,
    inv_mass: f32,
}

impl SimBody {
    pub fn new(pose: Pose, mass: f32, kinematic: bool) -> Self {
        Self {
            pose,
            velocity: Vec3::zeros(),
            kinematic,
            inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
        }
    }

    /// Advance position by one step. Kinematic bodies only move when teleported.
    pub fn integrate(&mut self, dt: f32) {
        if self.kinematic || dt <= 0.0 {
            return;
        }
        self.pose.translation += self.velocity * dt;
    }
}

impl PhysicsBody for SimBody {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        if self.kinematic {
            return;
        }
        self.velocity += impulse * self.inv_mass;
    }
}
