//! Thrown-weapon state machine.
//!
//! `Idle → Thrown → Embedded → Returning → Idle`, forever. Every operation is guarded on the
//! phase it is valid from; anything else is a silent no-op. Exactly one party governs the
//! weapon's placement at a time, recorded in [`WeaponState::attachment`]:
//!
//! | phase     | placement                                   |
//! |-----------|---------------------------------------------|
//! | Idle      | player hand, rest pose                      |
//! | Thrown    | free flight (dynamic body)                  |
//! | Embedded  | struck surface or enemy                     |
//! | Returning | player hand, pose kept from the moment of release |

use log::{debug, trace, warn};

use crate::{
    attachment::{AnchorPoses, Attachment},
    config::WeaponConfig,
    layers::Layer,
    orientation::OrientationMatcher,
    owner::Owner,
    ports::{AnimationSink, Contact, PhysicsBody},
    scheduler::{Scheduler, TaskId},
    types::{DIR_EPS_SQ, Pose, Quat, Vec3, forward_of, look_rotation},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WeaponPhase {
    #[default]
    Idle,
    Thrown,
    Embedded,
    Returning,
}

/// What the weapon is stuck in. `None` outside the Embedded phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EmbedKind {
    #[default]
    None,
    Wall,
    Ground,
    Ceiling,
    Enemy,
}

impl EmbedKind {
    /// Fixed layer lookup. Layers without an entry never embed.
    pub fn from_layer(layer: Layer) -> Option<EmbedKind> {
        match layer {
            Layer::Ground => Some(EmbedKind::Ground),
            Layer::Wall => Some(EmbedKind::Wall),
            Layer::Ceiling => Some(EmbedKind::Ceiling),
            Layer::Enemy => Some(EmbedKind::Enemy),
            Layer::Default | Layer::Player | Layer::Weapon => None,
        }
    }
}

/// Deferred work the weapon hands to the session scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponTask {
    ReenableAnimation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponState {
    pub phase: WeaponPhase,
    pub embed_kind: EmbedKind,
    pub attachment: Attachment,
    /// Pivot-to-tip distance, fixed at construction.
    pub embed_offset_distance: f32,
    /// Set by a throw; the next fixed step applies the launch impulse.
    pub pending_launch: bool,
    /// Mirrors the last value sent through [`AnimationSink::set_weapon_animation`].
    pub animation_enabled: bool,
    pub reenable_task: Option<TaskId>,
}

/// Reported by [`WeaponStateMachine::on_collision`] when the weapon sticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmbedEvent {
    pub kind: EmbedKind,
    pub owner: Owner,
    pub position: Vec3,
}

#[derive(Clone, Debug)]
pub struct WeaponStateMachine {
    state: WeaponState,
    config: WeaponConfig,
    hand: Owner,
}

impl WeaponStateMachine {
    /// A weapon resting in `hand`.
    pub fn new(config: WeaponConfig, hand: Owner) -> Self {
        let state = WeaponState {
            phase: WeaponPhase::Idle,
            embed_kind: EmbedKind::None,
            attachment: Attachment::AttachedTo {
                owner: hand,
                local: config.rest_pose,
            },
            embed_offset_distance: config.embed_offset_distance(),
            pending_launch: false,
            animation_enabled: true,
            reenable_task: None,
        };
        Self {
            state,
            config,
            hand,
        }
    }

    pub fn state(&self) -> &WeaponState {
        &self.state
    }

    pub fn phase(&self) -> WeaponPhase {
        self.state.phase
    }

    pub fn embed_kind(&self) -> EmbedKind {
        self.state.embed_kind
    }

    pub fn hand(&self) -> Owner {
        self.hand
    }

    /// Launch the weapon along `camera`'s forward axis. Returns `false` unless Idle.
    ///
    /// The body goes dynamic now but the impulse waits for the next [`Self::fixed_step`], so the
    /// detach has taken effect before any force is applied.
    pub fn throw(
        &mut self,
        camera: &Quat,
        body: &mut dyn PhysicsBody,
        animation: &mut dyn AnimationSink,
        scheduler: &mut Scheduler<WeaponTask>,
    ) -> bool {
        if self.state.phase != WeaponPhase::Idle {
            debug!("throw ignored in {:?}", self.state.phase);
            return false;
        }

        animation.set_weapon_animation(false);
        self.state.animation_enabled = false;
        self.cancel_reenable(scheduler);

        // Detach in place; only the orientation snaps to the aim.
        let rotation = OrientationMatcher::instant_match(camera);
        body.set_pose(Pose::new(body.position(), rotation));
        self.state.attachment = Attachment::Free;
        body.set_kinematic(false);
        self.state.pending_launch = true;
        self.state.phase = WeaponPhase::Thrown;

        self.state.reenable_task = match scheduler
            .schedule(self.config.animation_reenable_delay, WeaponTask::ReenableAnimation)
        {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("animation re-enable not scheduled: {err}");
                None
            }
        };

        debug!("weapon thrown toward {:?}", forward_of(&rotation));
        true
    }

    /// Per-step upkeep: launch impulse, then placement from the attachment.
    pub fn fixed_step(&mut self, body: &mut dyn PhysicsBody, anchors: &AnchorPoses) {
        if self.state.pending_launch {
            self.state.pending_launch = false;
            if self.state.phase == WeaponPhase::Thrown {
                let impulse = forward_of(&body.rotation()) * self.config.throw_force;
                body.apply_impulse(impulse);
                trace!("launch impulse {impulse:?}");
            }
        }

        if let Some(pose) = self.state.attachment.resolve(anchors) {
            body.set_pose(pose);
        }
    }

    fn cancel_reenable(&mut self, scheduler: &mut Scheduler<WeaponTask>) {
        let cancelled = self.state.reenable_task.take().and_then(|id| scheduler.cancel(id));
        if cancelled.is_some() {
            trace!("pending animation re-enable cancelled");
        }
    }

    pub fn run_task(&mut self, task: WeaponTask, animation: &mut dyn AnimationSink) {
        match task {
            WeaponTask::ReenableAnimation => {
                self.state.reenable_task = None;
                if self.state.phase == WeaponPhase::Embedded {
                    trace!("animation stays off while embedded");
                    return;
                }
                animation.set_weapon_animation(true);
                self.state.animation_enabled = true;
            }
        }
    }

    /// Stick into whatever was hit, if the layer embeds. Only valid while Thrown.
    ///
    /// A re-enable still pending from the throw is cancelled; animation stays off until the
    /// return completes.
    pub fn on_collision(
        &mut self,
        contact: &Contact,
        body: &mut dyn PhysicsBody,
        scheduler: &mut Scheduler<WeaponTask>,
    ) -> Option<EmbedEvent> {
        if self.state.phase != WeaponPhase::Thrown {
            return None;
        }
        let Some(kind) = EmbedKind::from_layer(contact.layer) else {
            trace!("collision with {:?} passes through", contact.layer);
            return None;
        };

        let normal = contact
            .normal
            .try_normalize(DIR_EPS_SQ.sqrt())
            .unwrap_or_else(Vec3::zeros);
        let position = contact.point + normal * self.state.embed_offset_distance;
        // Forward points into the surface.
        let rotation = look_rotation(-normal).unwrap_or_else(|| body.rotation());
        let world = Pose::new(position, rotation);

        body.set_linear_velocity(Vec3::zeros());
        body.set_kinematic(true);
        body.set_pose(world);
        self.cancel_reenable(scheduler);

        self.state.attachment = Attachment::keep_world(contact.owner, &contact.owner_pose, &world);
        self.state.embed_kind = kind;
        self.state.phase = WeaponPhase::Embedded;

        debug!("weapon embedded in {kind:?} at {position:?}");
        Some(EmbedEvent {
            kind,
            owner: contact.owner,
            position,
        })
    }

    /// Hand the weapon back to the player after the warp. Only valid while Embedded.
    pub fn release(&mut self, body: &mut dyn PhysicsBody, anchors: &AnchorPoses) -> bool {
        if self.state.phase != WeaponPhase::Embedded {
            debug!("release ignored in {:?}", self.state.phase);
            return false;
        }

        body.set_kinematic(true);
        self.state.attachment = match anchors.get(self.hand) {
            Some(hand_pose) => Attachment::keep_world(self.hand, &hand_pose, &body.pose()),
            None => Attachment::AttachedTo {
                owner: self.hand,
                local: self.config.rest_pose,
            },
        };
        self.state.embed_kind = EmbedKind::None;
        self.state.phase = WeaponPhase::Returning;
        debug!("weapon returning");
        true
    }

    /// The return animation finished; snap back to the rest pose. Only valid while Returning.
    ///
    /// Weapon animation comes back on here if the embed cancelled the deferred re-enable.
    pub fn on_return_animation_complete(
        &mut self,
        body: &mut dyn PhysicsBody,
        anchors: &AnchorPoses,
        animation: &mut dyn AnimationSink,
    ) -> bool {
        if self.state.phase != WeaponPhase::Returning {
            return false;
        }
        if !self.state.animation_enabled {
            animation.set_weapon_animation(true);
            self.state.animation_enabled = true;
        }

        self.state.attachment = Attachment::AttachedTo {
            owner: self.hand,
            local: self.config.rest_pose,
        };
        body.set_kinematic(true);
        if let Some(pose) = self.state.attachment.resolve(anchors) {
            body.set_pose(pose);
        }
        self.state.phase = WeaponPhase::Idle;
        debug!("weapon idle");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        body::SimBody,
        owner::{OwnerKind, pack_owner},
        ports::{AnimationSignal, NullSink},
    };

    #[derive(Default)]
    struct Recorder {
        enabled: Vec<bool>,
    }

    impl AnimationSink for Recorder {
        fn trigger(&mut self, _signal: AnimationSignal) {}

        fn set_weapon_animation(&mut self, enabled: bool) {
            self.enabled.push(enabled);
        }
    }

    struct Rig {
        weapon: WeaponStateMachine,
        body: SimBody,
        anchors: AnchorPoses,
        scheduler: Scheduler<WeaponTask>,
    }

    fn hand() -> Owner {
        pack_owner(0, OwnerKind::Player)
    }

    fn ground() -> Owner {
        pack_owner(1, OwnerKind::Surface)
    }

    fn rig() -> Rig {
        let mut anchors = AnchorPoses::new();
        anchors.set(hand(), Pose::from_translation(Vec3::new(0.0, 1.5, 0.0)));
        let mut weapon = WeaponStateMachine::new(WeaponConfig::default(), hand());
        let mut body = SimBody::new(Pose::default(), 1.0, true);
        weapon.fixed_step(&mut body, &anchors);
        Rig {
            weapon,
            body,
            anchors,
            scheduler: Scheduler::new(),
        }
    }

    fn contact(layer: Layer, point: Vec3, normal: Vec3) -> Contact {
        Contact {
            point,
            normal,
            layer,
            owner: ground(),
            owner_pose: Pose::default(),
        }
    }

    fn thrown() -> Rig {
        let mut r = rig();
        assert!(r.weapon.throw(&Quat::identity(), &mut r.body, &mut NullSink, &mut r.scheduler));
        r.weapon.fixed_step(&mut r.body, &r.anchors);
        r
    }

    #[test]
    fn idle_weapon_rests_in_hand() {
        let r = rig();
        assert_eq!(r.weapon.phase(), WeaponPhase::Idle);
        let expected = Vec3::new(0.0, 1.5, 0.0) + WeaponConfig::default().rest_pose.translation;
        assert!((r.body.position() - expected).norm() < 1.0e-5);
    }

    #[test]
    fn throw_detaches_then_launches_on_next_step() {
        let mut r = rig();
        let start = r.body.position();
        let mut anim = Recorder::default();
        let camera = Quat::from_axis_angle(&Vec3::y_axis(), -std::f32::consts::FRAC_PI_2);

        assert!(r.weapon.throw(&camera, &mut r.body, &mut anim, &mut r.scheduler));
        assert_eq!(anim.enabled, vec![false]);
        assert_eq!(r.weapon.state().attachment, Attachment::Free);
        assert!(!r.body.is_kinematic());
        assert_eq!(r.body.position(), start);
        assert_eq!(r.body.rotation(), camera, "aim snaps to the camera");
        assert_eq!(r.body.linear_velocity(), Vec3::zeros(), "no impulse before the step");

        r.weapon.fixed_step(&mut r.body, &r.anchors);
        let force = WeaponConfig::default().throw_force;
        assert!((r.body.linear_velocity() - Vec3::new(force, 0.0, 0.0)).norm() < 1.0e-3);
        assert!(!r.weapon.state().pending_launch);
    }

    #[test]
    fn launch_speed_comes_from_the_body_mass() {
        let mut r = rig();
        let mut heavy = SimBody::new(r.body.pose(), 4.0, true);
        assert!(r.weapon.throw(&Quat::identity(), &mut heavy, &mut NullSink, &mut r.scheduler));
        r.weapon.fixed_step(&mut heavy, &r.anchors);

        let force = WeaponConfig::default().throw_force;
        let expected = Vec3::new(0.0, 0.0, -force / 4.0);
        assert!((heavy.linear_velocity() - expected).norm() < 1.0e-3);
    }

    #[test]
    fn throw_is_rejected_unless_idle() {
        let mut r = thrown();
        r.body.integrate(0.1);
        let before = (r.body.pose(), r.body.linear_velocity());
        assert!(!r.weapon.throw(&Quat::identity(), &mut r.body, &mut NullSink, &mut r.scheduler));
        assert_eq!(r.weapon.phase(), WeaponPhase::Thrown);
        assert_eq!((r.body.pose(), r.body.linear_velocity()), before);

        r.weapon.on_collision(
            &contact(Layer::Wall, Vec3::zeros(), Vec3::z()),
            &mut r.body,
            &mut r.scheduler,
        );
        let before = (r.body.pose(), r.body.linear_velocity());
        assert!(!r.weapon.throw(&Quat::identity(), &mut r.body, &mut NullSink, &mut r.scheduler));
        assert_eq!(r.weapon.phase(), WeaponPhase::Embedded);
        assert_eq!((r.body.pose(), r.body.linear_velocity()), before);
    }

    #[test]
    fn embed_places_weapon_off_the_surface_pointing_in() {
        let mut r = thrown();
        let event = r
            .weapon
            .on_collision(
                &contact(Layer::Ground, Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0)),
                &mut r.body,
                &mut r.scheduler,
            )
            .unwrap();

        assert_eq!(event.kind, EmbedKind::Ground);
        assert!((r.body.position() - Vec3::new(0.0, 0.5, 0.0)).norm() < 1.0e-5);
        assert!((r.body.pose().forward() - Vec3::new(0.0, -1.0, 0.0)).norm() < 1.0e-5);
        assert!(r.body.is_kinematic());
        assert_eq!(r.body.linear_velocity(), Vec3::zeros());
        assert_eq!(r.weapon.state().attachment.owner(), Some(ground()));
    }

    #[test]
    fn second_collision_while_embedded_changes_nothing() {
        let mut r = thrown();
        r.weapon.on_collision(
            &contact(Layer::Wall, Vec3::new(0.0, 1.0, -5.0), Vec3::z()),
            &mut r.body,
            &mut r.scheduler,
        );
        let state = r.weapon.state().clone();
        let pose = r.body.pose();

        let mut other = contact(Layer::Enemy, Vec3::new(3.0, 0.0, 0.0), Vec3::x());
        other.owner = pack_owner(7, OwnerKind::Enemy);
        assert_eq!(r.weapon.on_collision(&other, &mut r.body, &mut r.scheduler), None);
        assert_eq!(r.weapon.state(), &state);
        assert_eq!(r.body.pose(), pose);
    }

    #[test]
    fn unmapped_layers_pass_through() {
        let mut r = thrown();
        for layer in [Layer::Default, Layer::Player, Layer::Weapon] {
            let hit = contact(layer, Vec3::zeros(), Vec3::y());
            assert_eq!(r.weapon.on_collision(&hit, &mut r.body, &mut r.scheduler), None);
            assert_eq!(r.weapon.phase(), WeaponPhase::Thrown);
        }
    }

    #[test]
    fn embed_cancels_pending_reenable() {
        let mut r = rig();
        let mut anim = Recorder::default();
        r.weapon
            .throw(&Quat::identity(), &mut r.body, &mut anim, &mut r.scheduler);
        r.weapon.fixed_step(&mut r.body, &r.anchors);
        assert_eq!(r.scheduler.pending_len(), 1);

        r.weapon.on_collision(
            &contact(Layer::Ground, Vec3::zeros(), Vec3::y()),
            &mut r.body,
            &mut r.scheduler,
        );
        assert_eq!(r.scheduler.pending_len(), 0);
        assert_eq!(r.weapon.state().reenable_task, None);

        for task in r.scheduler.advance(10.0) {
            r.weapon.run_task(task, &mut anim);
        }
        assert_eq!(anim.enabled, vec![false]);
        assert!(!r.weapon.state().animation_enabled);
    }

    #[test]
    fn second_throw_reenables_on_its_own_delay() {
        let mut r = rig();
        r.weapon.config.animation_reenable_delay = 3.0;
        let mut anim = Recorder::default();
        let dt = 0.02;
        let run = |r: &mut Rig, anim: &mut Recorder, steps: usize| {
            for _ in 0..steps {
                for task in r.scheduler.advance(dt) {
                    r.weapon.run_task(task, anim);
                }
            }
        };

        r.weapon
            .throw(&Quat::identity(), &mut r.body, &mut anim, &mut r.scheduler);
        run(&mut r, &mut anim, 10);
        r.weapon.on_collision(
            &contact(Layer::Wall, Vec3::new(0.0, 1.0, -5.0), Vec3::z()),
            &mut r.body,
            &mut r.scheduler,
        );
        run(&mut r, &mut anim, 40);
        r.weapon.release(&mut r.body, &r.anchors);
        assert!(r.weapon.on_return_animation_complete(&mut r.body, &r.anchors, &mut anim));
        assert_eq!(anim.enabled, vec![false, true]);

        // The first throw's delay would have expired partway through this flight.
        r.weapon
            .throw(&Quat::identity(), &mut r.body, &mut anim, &mut r.scheduler);
        assert_eq!(r.scheduler.pending_len(), 1);
        run(&mut r, &mut anim, 140);
        assert_eq!(anim.enabled, vec![false, true, false]);
        run(&mut r, &mut anim, 20);
        assert_eq!(anim.enabled, vec![false, true, false, true]);
    }

    #[test]
    fn reenable_fires_while_still_in_flight() {
        let mut r = rig();
        let mut anim = Recorder::default();
        r.weapon
            .throw(&Quat::identity(), &mut r.body, &mut anim, &mut r.scheduler);
        for task in r.scheduler.advance(10.0) {
            r.weapon.run_task(task, &mut anim);
        }
        assert_eq!(anim.enabled, vec![false, true]);
    }

    #[test]
    fn full_cycle_returns_to_idle_in_hand() {
        let mut r = thrown();
        assert!(!r.weapon.release(&mut r.body, &r.anchors), "not embedded yet");

        r.weapon.on_collision(
            &contact(Layer::Ceiling, Vec3::new(0.0, 4.0, 0.0), -Vec3::y()),
            &mut r.body,
            &mut r.scheduler,
        );
        assert_eq!(r.weapon.embed_kind(), EmbedKind::Ceiling);
        let embedded_at = r.body.position();

        assert!(!r.weapon.on_return_animation_complete(&mut r.body, &r.anchors, &mut NullSink));
        assert!(r.weapon.release(&mut r.body, &r.anchors));
        assert_eq!(r.weapon.phase(), WeaponPhase::Returning);
        assert_eq!(r.weapon.embed_kind(), EmbedKind::None);
        assert_eq!(r.weapon.state().attachment.owner(), Some(hand()));
        // Released in place; the return animation carries it home.
        r.weapon.fixed_step(&mut r.body, &r.anchors);
        assert!((r.body.position() - embedded_at).norm() < 1.0e-4);

        assert!(r.weapon.on_return_animation_complete(&mut r.body, &r.anchors, &mut NullSink));
        assert_eq!(r.weapon.phase(), WeaponPhase::Idle);
        assert!(r.body.is_kinematic());
        let rest = Vec3::new(0.0, 1.5, 0.0) + WeaponConfig::default().rest_pose.translation;
        assert!((r.body.position() - rest).norm() < 1.0e-5);
    }
}
