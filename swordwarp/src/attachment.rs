//! Explicit attachment of one body's placement to another object's pose.
//!
//! Instead of a live parent pointer, an attached body stores the owner it follows plus a local
//! pose. The world pose is recomputed from the owner's current pose every tick.

use std::collections::HashMap;

use crate::{
    owner::Owner,
    types::Pose,
};

/// Who currently governs a body's placement.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Attachment {
    /// Placement comes from the body's own kinematics.
    #[default]
    Free,
    /// Placement is `owner_pose ∘ local`.
    AttachedTo { owner: Owner, local: Pose },
}

impl Attachment {
    /// Attach to `owner` while keeping the current world pose.
    pub fn keep_world(owner: Owner, owner_pose: &Pose, world: &Pose) -> Self {
        Attachment::AttachedTo {
            owner,
            local: owner_pose.localize(world),
        }
    }

    pub fn owner(&self) -> Option<Owner> {
        match self {
            Attachment::Free => None,
            Attachment::AttachedTo { owner, .. } => Some(*owner),
        }
    }

    /// World pose dictated by this attachment.
    ///
    /// `None` when free, or when the owner has no known pose (the caller keeps the body where it
    /// is).
    pub fn resolve(&self, anchors: &AnchorPoses) -> Option<Pose> {
        match self {
            Attachment::Free => None,
            Attachment::AttachedTo { owner, local } => {
                anchors.get(*owner).map(|pose| pose.compose(local))
            }
        }
    }
}

/// Latest world pose for every object something can attach to.
///
/// The host updates surface and enemy poses when they move; the session refreshes the player
/// hand each step.
#[derive(Clone, Debug, Default)]
pub struct AnchorPoses {
    poses: HashMap<Owner, Pose>,
}

impl AnchorPoses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, owner: Owner, pose: Pose) {
        self.poses.insert(owner, pose);
    }

    pub fn remove(&mut self, owner: Owner) -> Option<Pose> {
        self.poses.remove(&owner)
    }

    pub fn get(&self, owner: Owner) -> Option<Pose> {
        self.poses.get(&owner).copied()
    }
}
