//! Rapier-backed ground probe over immutable level geometry.
//!
//! Hosts without their own physics scene (servers, replays, tests) can describe static level
//! colliders with [`WorldStaticDef`] and probe them through [`RapierGroundProbe`].
//!
//! - Deterministic: defs are sorted by `id` before insertion, so the same input builds the same
//!   sets.
//! - Layered: every [`Layer`] gets its own query world, and a probe only sweeps the worlds its
//!   mask selects.
//! - Immutable: statics do not move after construction.

pub use rapier3d;

use log::trace;
use rapier3d::na::Translation3;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::parry::shape::Ball;
use rapier3d::prelude::*;

use crate::{
    layers::{Layer, LayerMask},
    ports::GroundProbe,
    types::{Quat, Vec3},
};

/// Definition of one immutable level collider.
///
/// Units are meters. For planes the normal is `rotation * +Y` and the surface passes through
/// `translation`, shifted by `offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used for insertion order.
    pub id: u32,
    pub layer: Layer,
    pub translation: Vec3,
    pub rotation: Quat,
    pub shape: ColliderShapeDef,
}

#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite half-space.
    Plane { offset_along_normal: f32 },
    Cuboid { half_extents: Vec3 },
    Sphere { radius: f32 },
    CapsuleY { radius: f32, half_height: f32 },
    CylinderY { radius: f32, half_height: f32 },
    RoundCuboid { half_extents: Vec3, border_radius: f32 },
}

/// Rapier sets for one layer's statics.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in defs.iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);
            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);
            colliders.insert_with_parent(collider_from_def(def), rb_handle, &mut bodies);
        }

        // Collision detection only, no dynamics: brings the broad/narrow phases up to date so
        // queries can run.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();
        let hooks = ();
        let events = ();
        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &hooks,
            &events,
        );

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// Borrowed query view; use it within the scope of the borrow.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Time of impact of a ball swept from `origin` by `motion`, if anything is struck.
    ///
    /// A ball already overlapping geometry reports an impact at zero.
    pub fn cast_ball(&self, origin: Vec3, radius: f32, motion: Vec3, max_toi: f32) -> Option<f32> {
        let ball = Ball::new(radius);
        let pos = Isometry::translation(origin.x, origin.y, origin.z);
        self.query_pipeline(QueryFilter::default())
            .cast_shape(
                &pos,
                &motion,
                &ball,
                ShapeCastOptions::with_max_time_of_impact(max_toi),
            )
            .map(|(_, hit)| hit.time_of_impact)
    }
}

/// Colliders are created with identity local transform; the parent body carries the pose.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => ColliderBuilder::new(SharedShape::new(HalfSpace::new(Vector::y_axis())))
            .translation(Vector::y() * *offset_along_normal)
            .build(),

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius).build(),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius).build(),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius).build(),

        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
            *border_radius,
        )
        .build(),
    }
}

/// [`GroundProbe`] that sweeps a ball straight down through layered Rapier worlds.
pub struct RapierGroundProbe {
    layers: Vec<(Layer, RapierQueryWorld)>,
}

impl RapierGroundProbe {
    pub fn build(defs: Vec<WorldStaticDef>) -> Self {
        let layers = Layer::ALL
            .iter()
            .filter_map(|&layer| {
                let on_layer: Vec<_> = defs.iter().filter(|d| d.layer == layer).cloned().collect();
                (!on_layer.is_empty()).then(|| (layer, RapierQueryWorld::build(on_layer)))
            })
            .collect();
        Self { layers }
    }

    pub fn world(&self, layer: Layer) -> Option<&RapierQueryWorld> {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, world)| world)
    }
}

impl GroundProbe for RapierGroundProbe {
    fn query_grounded(
        &self,
        origin: Vec3,
        radius: f32,
        max_distance: f32,
        mask: LayerMask,
    ) -> bool {
        let down = Vec3::new(0.0, -1.0, 0.0);
        let hit = self
            .layers
            .iter()
            .filter(|(layer, _)| mask.has(*layer))
            .find_map(|(layer, world)| {
                world
                    .cast_ball(origin, radius, down, max_distance)
                    .map(|toi| (layer, toi))
            });
        if let Some((layer, toi)) = hit {
            trace!("ground probe hit {layer:?} at {toi:.3}");
        }
        hit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::ground_mask;

    fn floor(id: u32, layer: Layer, y: f32) -> WorldStaticDef {
        WorldStaticDef {
            id,
            layer,
            translation: Vec3::new(0.0, y, 0.0),
            rotation: Quat::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        }
    }

    #[test]
    fn ground_within_probe_distance_is_detected() {
        let probe = RapierGroundProbe::build(vec![floor(1, Layer::Ground, 0.0)]);
        let mask = ground_mask();
        assert!(probe.query_grounded(Vec3::new(0.0, 1.0, 0.0), 0.3, 1.0, mask));
        assert!(!probe.query_grounded(Vec3::new(0.0, 3.0, 0.0), 0.3, 1.0, mask));
    }

    #[test]
    fn geometry_on_unmasked_layers_is_ignored() {
        let probe = RapierGroundProbe::build(vec![
            floor(1, Layer::Enemy, 0.0),
            WorldStaticDef {
                id: 2,
                layer: Layer::Wall,
                translation: Vec3::new(0.0, 0.0, 0.0),
                rotation: Quat::identity(),
                shape: ColliderShapeDef::Cuboid {
                    half_extents: Vec3::new(1.0, 0.5, 1.0),
                },
            },
        ]);
        let origin = Vec3::new(0.0, 1.2, 0.0);
        assert!(!probe.query_grounded(origin, 0.3, 1.0, LayerMask::from(Layer::Ground)));
        assert!(probe.query_grounded(origin, 0.3, 1.0, LayerMask::from(Layer::Wall)));
        assert!(probe.world(Layer::Ground).is_none());
    }

    #[test]
    fn raised_box_counts_as_ground() {
        let probe = RapierGroundProbe::build(vec![WorldStaticDef {
            id: 7,
            layer: Layer::Ground,
            translation: Vec3::new(5.0, 2.0, 0.0),
            rotation: Quat::identity(),
            shape: ColliderShapeDef::Cuboid {
                half_extents: Vec3::new(1.0, 0.5, 1.0),
            },
        }]);
        let mask = ground_mask();
        assert!(probe.query_grounded(Vec3::new(5.0, 3.5, 0.0), 0.3, 1.0, mask));
        assert!(!probe.query_grounded(Vec3::new(0.0, 3.5, 0.0), 0.3, 1.0, mask));
    }
}
