//! Transform component for ECS entities.

use glam::{Quat, Vec3};

/// World-space position and facing of an entity.
///
/// The physics core reads and writes `position`; `rotation` is carried for
/// movement and rendering code and is not consulted by collision tests
/// (collision shapes are axis-aligned, with translation-only offsets).
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    /// Create an identity transform at the origin.
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
