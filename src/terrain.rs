//! Terrain sampling, an external collaborator.
//!
//! The game's terrain system implements [`TerrainSampler`]; the physics core
//! only consumes samples, to populate grounded state and surface friction.
//! Sampling failures degrade to a flat default with a logged warning.

use glam::Vec3;

/// Kind of surface under an entity, reported in landing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceType {
    #[default]
    Dirt,
    Grass,
    Stone,
    Sand,
    Ice,
}

/// What the terrain provider knows about one position.
#[derive(Debug, Clone, Copy)]
pub struct TerrainSample {
    pub normal: Vec3,
    pub surface_type: SurfaceType,
    pub friction: f32,
    /// Slope steepness in radians.
    pub slope_angle: f32,
    /// Downhill direction, zero on flat ground.
    pub slope_direction: Vec3,
}

impl Default for TerrainSample {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            surface_type: SurfaceType::default(),
            friction: 0.5,
            slope_angle: 0.0,
            slope_direction: Vec3::ZERO,
        }
    }
}

/// Read-only terrain lookup supplied by the surrounding game.
pub trait TerrainSampler {
    fn sample(&self, position: Vec3) -> anyhow::Result<TerrainSample>;
}

/// Trivial sampler for games (and tests) without terrain: everything is flat
/// default ground.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatTerrain;

impl TerrainSampler for FlatTerrain {
    fn sample(&self, _position: Vec3) -> anyhow::Result<TerrainSample> {
        Ok(TerrainSample::default())
    }
}
