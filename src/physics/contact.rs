//! Contact data produced by narrow-phase detection.

use glam::Vec3;

/// A single shape-pair overlap. Transient: produced fresh each detection call
/// and never kept across frames.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Contact point in world space.
    pub point: Vec3,
    /// Unit normal pointing from the second shape toward the first.
    pub normal: Vec3,
    /// Overlap distance along the normal, never negative.
    pub penetration: f32,
    /// `v_first - v_second`, filled in by the resolver when at least one side
    /// exposes a velocity.
    pub relative_velocity: Option<Vec3>,
}

impl Contact {
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration: penetration.max(0.0),
            relative_velocity: None,
        }
    }
}

/// A detected contact bound to its entity pair, queued for resolution within
/// the same fixed step.
#[derive(Debug, Clone, Copy)]
pub struct PairContact {
    pub entity_a: hecs::Entity,
    pub entity_b: hecs::Entity,
    pub contact: Contact,
}
