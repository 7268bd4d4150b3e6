/*!
Player locomotion: look, gravity, ground/air movement, jump, and the warp pull.

One fixed step runs either normal movement or warp integration, never both:

- Normal: gravity → grounded probe → grounded (set horizontal, one-shot jump) or airborne
  (gated air control).
- Warp: velocity is *derived* from the next eased position toward the weapon, so a body that
  is still integrated by the host engine tracks the curve exactly.

Velocity is read back from the body at the start of each step (to pick up the host's collision
response) and written back at the end. Nothing else writes it.
*/

use log::{debug, trace};

use crate::{
    config::{CameraConfig, MovementConfig, WarpConfig},
    motion::{AirControlParams, MoveBasis, air_control, camera_rotation, grounded_velocity},
    ports::{GroundProbe, PhysicsBody},
    types::{Quat, Vec2, Vec3},
};

/// Mutable per-player state owned by the [`LocomotionController`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerMotionState {
    pub velocity: Vec3,
    pub move_input: Vec2,
    pub wants_jump: bool,
    pub camera_yaw: f32,
    /// Clamped to `±max_pitch_deg`.
    pub camera_pitch: f32,
    pub is_warping: bool,
    /// In `[0, warp.duration]`.
    pub warp_elapsed: f32,
    pub warp_start_position: Vec3,
    pub blocking: bool,
    /// Result of the most recent probe. Informational; every step probes again.
    pub grounded: bool,
}

impl Default for PlayerMotionState {
    fn default() -> Self {
        Self {
            velocity: Vec3::zeros(),
            move_input: Vec2::zeros(),
            wants_jump: false,
            camera_yaw: 0.0,
            camera_pitch: 0.0,
            is_warping: false,
            warp_elapsed: 0.0,
            warp_start_position: Vec3::zeros(),
            blocking: false,
            grounded: false,
        }
    }
}

/// What a single [`LocomotionController::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Non-positive step; nothing changed.
    Skipped,
    Moved { grounded: bool },
    /// Mid-warp. `t0`/`t1` are the curve samples at now and one step ahead.
    Warping { t0: f32, t1: f32 },
    /// The warp ended this step; velocity is zero. The owner must release the weapon.
    WarpCompleted,
}

#[derive(Clone, Debug)]
pub struct LocomotionController {
    state: PlayerMotionState,
    movement: MovementConfig,
    camera: CameraConfig,
    warp: WarpConfig,
    camera_rotation: Quat,
}

impl LocomotionController {
    pub fn new(movement: MovementConfig, camera: CameraConfig, warp: WarpConfig) -> Self {
        Self {
            state: PlayerMotionState::default(),
            movement,
            camera,
            warp,
            camera_rotation: Quat::identity(),
        }
    }

    pub fn state(&self) -> &PlayerMotionState {
        &self.state
    }

    /// Current camera orientation, set directly by [`Self::apply_look`].
    pub fn camera_rotation(&self) -> Quat {
        self.camera_rotation
    }

    pub fn set_move_input(&mut self, input: Vec2) {
        self.state.move_input = input;
    }

    pub fn request_jump(&mut self) {
        self.state.wants_jump = true;
    }

    pub fn set_blocking(&mut self, blocking: bool) {
        self.state.blocking = blocking;
    }

    /// Apply one look event. Direct assignment, no smoothing.
    pub fn apply_look(&mut self, delta_x: f32, delta_y: f32) {
        let sens = self.camera.sensitivity;
        // Pointer up (positive y) looks up unless inverted; positive pitch looks down.
        let sign = if self.camera.invert_y { 1.0 } else { -1.0 };
        let max_pitch = self.camera.max_pitch_deg.abs();

        self.state.camera_yaw += delta_x * sens;
        self.state.camera_pitch =
            (self.state.camera_pitch + sign * delta_y * sens).clamp(-max_pitch, max_pitch);
        self.camera_rotation = camera_rotation(self.state.camera_pitch, self.state.camera_yaw);
    }

    /// Start pulling the player toward the weapon from `player_position`.
    ///
    /// Velocity is left alone; the next [`Self::tick`] takes over.
    pub fn begin_warp(&mut self, player_position: Vec3) {
        if self.state.is_warping {
            debug!("warp restarted while already warping");
        }
        self.state.is_warping = true;
        self.state.warp_elapsed = 0.0;
        self.state.warp_start_position = player_position;
        debug!("warp begin at {player_position:?}");
    }

    /// The single per-physics-step entry point.
    ///
    /// `warp_target` is the weapon's live position; only read while warping. When absent the
    /// warp holds at its start position and still runs to completion.
    pub fn tick(
        &mut self,
        dt: f32,
        body: &mut dyn PhysicsBody,
        probe: &dyn GroundProbe,
        warp_target: Option<Vec3>,
    ) -> TickOutcome {
        if dt <= 0.0 || !dt.is_finite() {
            return TickOutcome::Skipped;
        }

        self.state.velocity = body.linear_velocity();
        let outcome = if self.state.is_warping {
            self.integrate_warp(dt, body.position(), warp_target)
        } else {
            self.integrate_movement(dt, body.position(), probe)
        };
        body.set_linear_velocity(self.state.velocity);
        outcome
    }

    fn integrate_movement(&mut self, dt: f32, position: Vec3, probe: &dyn GroundProbe) -> TickOutcome {
        let cfg = &self.movement;

        // Gravity is continuous, grounded or not.
        self.state.velocity += cfg.gravity * dt;

        let grounded = probe.query_grounded(
            position,
            cfg.ground_probe_radius,
            cfg.ground_probe_distance(),
            cfg.ground_mask,
        );
        self.state.grounded = grounded;

        let basis = MoveBasis::from_camera(&self.camera_rotation);
        if grounded {
            self.state.velocity = grounded_velocity(
                self.state.velocity,
                &basis,
                self.state.move_input,
                cfg.max_speed,
            );
            if self.state.wants_jump {
                self.state.velocity.y = cfg.jump_speed;
                trace!("jump");
            }
        } else {
            self.state.velocity = air_control(
                &basis,
                AirControlParams {
                    velocity: self.state.velocity,
                    input: self.state.move_input,
                    air_acceleration: cfg.air_acceleration,
                    threshold: cfg.air_control_threshold,
                    dt_seconds: dt,
                },
            );
        }
        // One-shot: a request never outlives the step that saw it.
        self.state.wants_jump = false;

        TickOutcome::Moved { grounded }
    }

    fn integrate_warp(&mut self, dt: f32, position: Vec3, warp_target: Option<Vec3>) -> TickOutcome {
        let duration = self.warp.duration;
        self.state.warp_elapsed += dt;

        if self.state.warp_elapsed >= duration {
            self.state.warp_elapsed = duration;
            self.state.is_warping = false;
            self.state.velocity = Vec3::zeros();
            debug!("warp complete at {position:?}");
            return TickOutcome::WarpCompleted;
        }

        let start = self.state.warp_start_position;
        let target = warp_target.unwrap_or(start);
        let t0 = self.warp.curve.sample(self.state.warp_elapsed / duration);
        let t1 = self.warp.curve.sample((self.state.warp_elapsed + dt) / duration);

        let next = start.lerp(&target, t1);
        self.state.velocity = (next - position) / dt;
        trace!("warp t0={t0:.3} t1={t1:.3} v={:?}", self.state.velocity);

        TickOutcome::Warping { t0, t1 }
    }
}
