/*!
One player's simulation session.

The session owns the locomotion controller, the weapon state machine, the scheduler and the
anchor table, and wires the cross-component callbacks synchronously:

- weapon embed → [`LocomotionController::begin_warp`]
- warp completion → [`WeaponStateMachine::release`] plus the impact effect

Everything is driven from three entry points the host calls on a single thread:
[`Session::handle_input`] (between ticks, flag setters only), [`Session::on_collision`]
(from the host's collision pass) and [`Session::fixed_step`].

```ignore
let mut session = Session::builder()
    .config(SessionConfig::default())
    .player_body(player)
    .weapon_body(weapon)
    .ground_probe(probe)
    .build()?;

session.handle_input(InputEvent::pressed(InputAction::Jump));
session.fixed_step(1.0 / 60.0);
```
*/

use log::{debug, info, trace, warn};

use crate::{
    attachment::AnchorPoses,
    config::SessionConfig,
    error::SetupError,
    input::{ButtonPhase, InputAction, InputEvent},
    locomotion::{LocomotionController, TickOutcome},
    motion::heading_rotation,
    orientation::OrientationMatcher,
    owner::{
        Owner, OwnerKind, pack_owner, try_unpack_owner_kind, unpack_owner_id, validate_owner,
    },
    ports::{
        AnimationSignal, AnimationSink, Contact, EffectRequest, EffectSink, GroundProbe, NullSink,
        PhysicsBody,
    },
    scheduler::Scheduler,
    types::{Pose, Vec2},
    weapon::{EmbedEvent, EmbedKind, WeaponPhase, WeaponState, WeaponStateMachine, WeaponTask},
};

/// Anchor id of the local player's weapon hand.
pub const PLAYER_HAND: Owner = pack_owner(0, OwnerKind::Player);

struct WeaponRig<B> {
    machine: WeaponStateMachine,
    body: B,
}

pub struct Session<B: PhysicsBody> {
    config: SessionConfig,
    locomotion: LocomotionController,
    facing: OrientationMatcher,
    player: B,
    weapon: Option<WeaponRig<B>>,
    probe: Box<dyn GroundProbe>,
    animation: Box<dyn AnimationSink>,
    effects: Box<dyn EffectSink>,
    scheduler: Scheduler<WeaponTask>,
    anchors: AnchorPoses,
}

pub struct SessionBuilder<B: PhysicsBody> {
    config: SessionConfig,
    player: Option<B>,
    weapon: Option<B>,
    probe: Option<Box<dyn GroundProbe>>,
    animation: Option<Box<dyn AnimationSink>>,
    effects: Option<Box<dyn EffectSink>>,
}

impl<B: PhysicsBody> Default for SessionBuilder<B> {
    fn default() -> Self {
        Self {
            config: SessionConfig::default(),
            player: None,
            weapon: None,
            probe: None,
            animation: None,
            effects: None,
        }
    }
}

impl<B: PhysicsBody> SessionBuilder<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn player_body(mut self, body: B) -> Self {
        self.player = Some(body);
        self
    }

    /// Optional. Without a weapon, throws do nothing and no warp can start.
    pub fn weapon_body(mut self, body: B) -> Self {
        self.weapon = Some(body);
        self
    }

    pub fn ground_probe(mut self, probe: impl GroundProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    pub fn animation_sink(mut self, sink: impl AnimationSink + 'static) -> Self {
        self.animation = Some(Box::new(sink));
        self
    }

    pub fn effect_sink(mut self, sink: impl EffectSink + 'static) -> Self {
        self.effects = Some(Box::new(sink));
        self
    }

    /// Validate and assemble. Fails on invalid configuration, a missing player body or a
    /// missing ground probe.
    pub fn build(self) -> Result<Session<B>, SetupError> {
        self.config.validate()?;
        let player = self.player.ok_or(SetupError::MissingBody("player"))?;
        let probe = self.probe.ok_or(SetupError::MissingGroundProbe)?;

        let config = self.config;
        let locomotion = LocomotionController::new(
            config.movement.clone(),
            config.camera.clone(),
            config.warp.clone(),
        );
        let facing = OrientationMatcher::new(
            config.facing.max_degrees_per_second,
            config.facing.ease_in,
            config.facing.ease_factor,
        );

        let mut anchors = AnchorPoses::new();
        anchors.set(PLAYER_HAND, player.pose().compose(&config.weapon.hand_offset));

        let weapon = match self.weapon {
            Some(mut body) => {
                let mut machine = WeaponStateMachine::new(config.weapon.clone(), PLAYER_HAND);
                body.set_kinematic(true);
                machine.fixed_step(&mut body, &anchors);
                Some(WeaponRig { machine, body })
            }
            None => {
                info!("session built without a weapon body; throws are disabled");
                None
            }
        };

        Ok(Session {
            config,
            locomotion,
            facing,
            player,
            weapon,
            probe,
            animation: self.animation.unwrap_or_else(|| Box::new(NullSink)),
            effects: self.effects.unwrap_or_else(|| Box::new(NullSink)),
            scheduler: Scheduler::new(),
            anchors,
        })
    }
}

impl<B: PhysicsBody> Session<B> {
    pub fn builder() -> SessionBuilder<B> {
        SessionBuilder::new()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn weapon_state(&self) -> Option<&WeaponState> {
        self.weapon.as_ref().map(|rig| rig.machine.state())
    }

    pub fn player_body(&self) -> &B {
        &self.player
    }

    /// For the host's integrator.
    pub fn player_body_mut(&mut self) -> &mut B {
        &mut self.player
    }

    pub fn weapon_body(&self) -> Option<&B> {
        self.weapon.as_ref().map(|rig| &rig.body)
    }

    pub fn weapon_body_mut(&mut self) -> Option<&mut B> {
        self.weapon.as_mut().map(|rig| &mut rig.body)
    }

    /// Report where an attachable object (surface, enemy) currently is.
    pub fn set_anchor_pose(&mut self, owner: Owner, pose: Pose) {
        self.anchors.set(owner, pose);
    }

    pub fn remove_anchor(&mut self, owner: Owner) {
        self.anchors.remove(owner);
    }

    pub fn anchors(&self) -> &AnchorPoses {
        &self.anchors
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_len()
    }

    /// Apply one input event. Only sets flags and look angles; physics is left to the step.
    pub fn handle_input(&mut self, event: InputEvent) {
        let pressed = event.phase == ButtonPhase::Pressed;
        match event.action {
            InputAction::Move(v) => {
                self.locomotion
                    .set_move_input(if pressed { v } else { Vec2::zeros() });
            }
            InputAction::Look(delta) => {
                if pressed {
                    self.locomotion.apply_look(delta.x, delta.y);
                }
            }
            InputAction::Jump => {
                if pressed {
                    self.locomotion.request_jump();
                }
            }
            InputAction::AltAttack => {
                self.locomotion.set_blocking(pressed);
                self.animation.trigger(AnimationSignal::Blocking(pressed));
            }
            InputAction::PrimaryAttack => {
                if !pressed {
                    return;
                }
                let weapon_idle = self
                    .weapon
                    .as_ref()
                    .is_some_and(|rig| rig.machine.phase() == WeaponPhase::Idle);
                if self.locomotion.state().blocking && weapon_idle {
                    self.throw_weapon();
                } else {
                    self.animation.trigger(AnimationSignal::Attacking);
                }
            }
        }
    }

    /// Throw the weapon along the camera's aim. Returns `false` when there is no idle weapon.
    pub fn throw_weapon(&mut self) -> bool {
        let Some(rig) = self.weapon.as_mut() else {
            debug!("throw ignored: no weapon");
            return false;
        };
        let camera = self.locomotion.camera_rotation();
        let thrown = rig.machine.throw(
            &camera,
            &mut rig.body,
            self.animation.as_mut(),
            &mut self.scheduler,
        );
        if thrown {
            self.animation.trigger(AnimationSignal::Throw);
        }
        thrown
    }

    /// Feed one contact on the weapon from the host's collision pass.
    pub fn on_collision(&mut self, contact: Contact) -> Option<EmbedEvent> {
        if let Err(reason) = validate_owner(contact.owner) {
            warn!("contact ignored, owner {:#x}: {reason}", contact.owner);
            return None;
        }
        let rig = self.weapon.as_mut()?;
        let event = rig
            .machine
            .on_collision(&contact, &mut rig.body, &mut self.scheduler)?;
        trace!(
            "anchored to {:?} #{}",
            try_unpack_owner_kind(contact.owner),
            unpack_owner_id(contact.owner)
        );

        self.anchors.set(contact.owner, contact.owner_pose);
        self.animation.trigger(AnimationSignal::Embed);
        self.locomotion.begin_warp(self.player.position());
        Some(event)
    }

    /// The host's return animation has finished.
    pub fn on_return_animation_complete(&mut self) -> bool {
        let Some(rig) = self.weapon.as_mut() else {
            return false;
        };
        rig.machine.on_return_animation_complete(
            &mut rig.body,
            &self.anchors,
            self.animation.as_mut(),
        )
    }

    /// Advance the whole session by one fixed physics step.
    pub fn fixed_step(&mut self, dt: f32) -> TickOutcome {
        if dt <= 0.0 || !dt.is_finite() {
            return TickOutcome::Skipped;
        }

        for task in self.scheduler.advance(dt) {
            if let Some(rig) = self.weapon.as_mut() {
                rig.machine.run_task(task, self.animation.as_mut());
            }
        }

        self.anchors.set(
            PLAYER_HAND,
            self.player.pose().compose(&self.config.weapon.hand_offset),
        );

        let warp_target = match self.weapon.as_mut() {
            Some(rig) => {
                rig.machine.fixed_step(&mut rig.body, &self.anchors);
                Some(rig.body.position())
            }
            None => None,
        };

        let outcome = self
            .locomotion
            .tick(dt, &mut self.player, self.probe.as_ref(), warp_target);

        if outcome == TickOutcome::WarpCompleted {
            self.finish_warp();
        }

        let heading = heading_rotation(self.locomotion.state().camera_yaw);
        let facing = self.facing.tick(&self.player.rotation(), &heading, dt);
        self.player.set_rotation(facing);

        trace!("step {outcome:?}");
        outcome
    }

    /// End the session. Pending deferred work is dropped and no more can be scheduled.
    pub fn shutdown(&mut self) {
        let dropped = self.scheduler.shutdown();
        info!("session shut down ({dropped} pending task(s) dropped)");
    }

    fn finish_warp(&mut self) {
        let Some(rig) = self.weapon.as_mut() else {
            return;
        };
        let kind = rig.machine.embed_kind();
        if !rig.machine.release(&mut rig.body, &self.anchors) {
            return;
        }
        self.animation.trigger(AnimationSignal::ReturnSword);

        let intensity = if kind == EmbedKind::Ground {
            self.config.warp.ground_impact_intensity
        } else {
            self.config.warp.surface_impact_intensity
        };
        self.effects.spawn(EffectRequest {
            position: self.player.position(),
            facing: self.player.rotation(),
            intensity,
        });
    }
}

/// Owner id for a level surface collider.
pub fn surface_owner(id: u32) -> Owner {
    pack_owner(id, OwnerKind::Surface)
}

/// Owner id for an enemy.
pub fn enemy_owner(id: u32) -> Owner {
    pack_owner(id, OwnerKind::Enemy)
}
