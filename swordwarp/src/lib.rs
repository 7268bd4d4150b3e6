pub mod attachment;
pub mod body;
pub mod config;
pub mod constants;
pub mod curve;
pub mod error;
pub mod input;
pub mod layers;
pub mod locomotion;
pub mod motion;
pub mod orientation;
pub mod owner;
pub mod ports;
pub mod rapier_world;
pub mod scheduler;
pub mod session;
pub mod types;
pub mod weapon;

pub use attachment::{AnchorPoses, Attachment};
pub use body::SimBody;
pub use config::{
    CameraConfig, FacingConfig, MovementConfig, SessionConfig, WarpConfig, WeaponConfig,
};
pub use curve::EaseCurve;
pub use error::{ConfigError, SchedulerError, SetupError};
pub use input::{ButtonPhase, InputAction, InputEvent};
pub use layers::{Layer, LayerMask};
pub use locomotion::{LocomotionController, PlayerMotionState, TickOutcome};
pub use orientation::OrientationMatcher;
pub use owner::{
    Owner, OwnerKind, pack_owner, try_unpack_owner_kind, unpack_owner_id, validate_owner,
};
pub use ports::{
    AnimationSignal, AnimationSink, Contact, EffectRequest, EffectSink, GroundProbe, NullSink,
    PhysicsBody,
};
pub use rapier_world::{ColliderShapeDef, RapierGroundProbe, WorldStaticDef};
pub use scheduler::{Scheduler, TaskId};
pub use session::{PLAYER_HAND, Session, SessionBuilder, enemy_owner, surface_owner};
pub use types::{Pose, Quat, Vec2, Vec3};
pub use weapon::{EmbedEvent, EmbedKind, WeaponPhase, WeaponState, WeaponStateMachine};
