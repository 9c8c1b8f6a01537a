//! In-process notifications produced by the physics step.
//!
//! The step appends to a caller-owned `Vec<PhysicsEvent>`; publishing them on
//! whatever bus the game uses is the caller's business. Nothing here is a
//! wire format.

use glam::Vec3;

use crate::terrain::SurfaceType;

/// Why an entity was snapped back by the boundary enforcer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    OutOfBounds,
    OutOfBoundsDamage,
}

/// Everything the physics core reports to the rest of the game.
#[derive(Debug, Clone)]
pub enum PhysicsEvent {
    /// A non-trigger contact was resolved. `impulse` is zero when the pair
    /// was already separating.
    Collision {
        entity_a: hecs::Entity,
        entity_b: hecs::Entity,
        position: Vec3,
        normal: Vec3,
        impulse: Vec3,
    },
    /// A projectile rebounded off a surface.
    ProjectileBounce {
        projectile: hecs::Entity,
        bounce_count: u32,
        hit_point: Vec3,
        hit_normal: Vec3,
        new_velocity: Vec3,
    },
    /// A projectile hit with its bounce budget exhausted (or bouncing
    /// disabled). `hit_entity` is `None` for environment hits.
    ProjectileImpact {
        projectile: hecs::Entity,
        hit_entity: Option<hecs::Entity>,
        point: Vec3,
        normal: Vec3,
    },
    /// A projectile exceeded its travel distance and was retired.
    ProjectileExpired {
        projectile: hecs::Entity,
        distance_traveled: f32,
    },
    /// An airborne entity touched down.
    MovementLand {
        entity: hecs::Entity,
        position: Vec3,
        velocity: Vec3,
        impact_force: f32,
        surface_type: SurfaceType,
    },
    /// An entity started overlapping a trigger zone.
    TriggerEnter {
        trigger: hecs::Entity,
        other: hecs::Entity,
    },
    /// An entity stopped overlapping a trigger zone.
    TriggerExit {
        trigger: hecs::Entity,
        other: hecs::Entity,
    },
    /// The boundary enforcer snapped the entity to its reset position.
    EntityReset {
        entity: hecs::Entity,
        reason: ResetReason,
    },
    /// One-shot warning that an entity is leaving the play volume.
    BoundaryWarning {
        entity: hecs::Entity,
        out_of_bounds_time: f32,
    },
    /// The entity returned into the play volume.
    EntityInBounds { entity: hecs::Entity },
}
