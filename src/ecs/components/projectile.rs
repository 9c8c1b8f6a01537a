//! Projectile flight state: aerodynamics, spin, and bounce budget.
//!
//! A projectile entity carries this component alongside a [`Body`] for its
//! velocity and mass, and usually a [`ShapeDescriptor`] for collision.
//!
//! [`Body`]: super::body::Body
//! [`ShapeDescriptor`]: super::shape::ShapeDescriptor

use glam::Vec3;
use tracing::warn;

use super::shape::MIN_DIMENSION;

/// Projectile aerodynamic profile. Only discs generate drag and lift; balls
/// fly purely ballistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    Ball,
    Disc,
}

/// Per-projectile flight state.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub kind: ProjectileKind,
    /// Radius used for the aerodynamic reference area and the ground check.
    pub size: f32,
    pub affected_by_gravity: bool,
    pub drag_coeff: f32,
    pub lift_coeff: f32,
    /// Spin rate in rad/s around `spin_axis`.
    pub spin_rate: f32,
    spin_axis: Vec3,
    /// Accumulated rotation angle, wrapped to [0, 2π).
    pub rotation: f32,
    pub bounces: bool,
    pub max_bounces: u32,
    bounce_count: u32,
    pub bounce_factor: f32,
    pub distance_traveled: f32,
    /// Projectiles beyond this travel distance are retired.
    pub expire_distance: f32,
    /// Cleared when the projectile expires or lands its final impact.
    pub active: bool,
}

impl Projectile {
    /// A plain ballistic projectile: gravity only, no aerodynamic forces,
    /// no bouncing.
    pub fn ball(size: f32) -> Self {
        Self {
            kind: ProjectileKind::Ball,
            size: checked_size(size),
            affected_by_gravity: true,
            drag_coeff: 0.0,
            lift_coeff: 0.0,
            spin_rate: 0.0,
            spin_axis: Vec3::Y,
            rotation: 0.0,
            bounces: false,
            max_bounces: 0,
            bounce_count: 0,
            bounce_factor: 0.5,
            distance_traveled: 0.0,
            expire_distance: 500.0,
            active: true,
        }
    }

    /// A spinning disc: quadratic drag, spin-induced lift, Magnus curvature,
    /// and a bounce budget.
    pub fn disc(size: f32) -> Self {
        Self {
            kind: ProjectileKind::Disc,
            size: checked_size(size),
            affected_by_gravity: true,
            drag_coeff: 0.3,
            lift_coeff: 0.35,
            spin_rate: 12.0,
            spin_axis: Vec3::Y,
            rotation: 0.0,
            bounces: true,
            max_bounces: 2,
            bounce_count: 0,
            bounce_factor: 0.5,
            distance_traveled: 0.0,
            expire_distance: 500.0,
            active: true,
        }
    }

    pub fn spin_axis(&self) -> Vec3 {
        self.spin_axis
    }

    /// Reassign the spin axis; the stored axis is always unit length.
    pub fn set_spin_axis(&mut self, axis: Vec3) {
        self.spin_axis = axis.try_normalize().unwrap_or(Vec3::Y);
    }

    /// Angular velocity vector derived from the spin axis and rate.
    pub fn angular_velocity(&self) -> Vec3 {
        self.spin_axis * self.spin_rate
    }

    pub fn bounce_count(&self) -> u32 {
        self.bounce_count
    }

    /// Whether the bounce budget allows another rebound.
    pub fn can_bounce(&self) -> bool {
        self.bounces && self.bounce_count < self.max_bounces
    }

    /// Count a rebound. The count never exceeds `max_bounces`.
    pub fn record_bounce(&mut self) {
        self.bounce_count = (self.bounce_count + 1).min(self.max_bounces);
    }

    /// Re-arm the bounce budget, e.g. when a projectile is recycled.
    pub fn reset_bounces(&mut self) {
        self.bounce_count = 0;
    }

    /// Advance the rotation angle by `spin_rate * dt`, wrapped to [0, 2π).
    pub fn advance_rotation(&mut self, dt: f32) {
        self.rotation = (self.rotation + self.spin_rate * dt).rem_euclid(std::f32::consts::TAU);
    }
}

fn checked_size(size: f32) -> f32 {
    if !(size > 0.0) {
        warn!(size, "non-positive projectile size clamped to minimum");
    }
    size.max(MIN_DIMENSION)
}
