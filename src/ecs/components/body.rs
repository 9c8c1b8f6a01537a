//! Velocity and health capabilities.
//!
//! These are independent components looked up by entity id; an entity missing
//! one simply does not expose that capability, and callers degrade to a no-op.

use glam::Vec3;
use tracing::warn;

/// Minimum body mass. Non-positive configured masses are clamped here.
pub const MIN_MASS: f32 = 1e-3;

/// Velocity-bearing capability: anything that can be pushed by contacts,
/// enforced at boundaries, or flown as a projectile.
#[derive(Debug, Clone)]
pub struct Body {
    pub velocity: Vec3,
    mass: f32,
    /// Kinematic bodies are driven externally and immovable by contact.
    pub kinematic: bool,
}

impl Body {
    /// Create a dynamic body with the given mass.
    pub fn new(mass: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: checked_mass(mass),
            kinematic: false,
        }
    }

    /// Create a kinematic body: position driven externally, unaffected by
    /// contact impulses.
    pub fn new_kinematic() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: 1.0,
            kinematic: true,
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = checked_mass(mass);
    }

    /// Apply a contact impulse directly to velocity.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse;
    }
}

fn checked_mass(mass: f32) -> f32 {
    if !(mass > 0.0) {
        warn!(mass, "non-positive mass clamped to minimum");
    }
    mass.max(MIN_MASS)
}

/// Health capability consumed by the boundary enforcer's damage policy.
#[derive(Debug, Clone, Copy)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Subtract `amount`, saturating at zero. Returns the remaining health.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        self.current = (self.current - amount.max(0.0)).max(0.0);
        self.current
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}
