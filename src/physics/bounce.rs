//! Projectile bounce handling: reflection off a contacted surface, with a
//! bounce budget and a final-impact fallthrough.

use glam::Vec3;

use crate::ecs::components::body::Body;
use crate::ecs::components::projectile::{Projectile, ProjectileKind};
use crate::ecs::components::transform::Transform;

/// Offset along the contact normal applied after a bounce, so the projectile
/// does not re-penetrate the surface on the next step.
const REBOUND_OFFSET: f32 = 0.1;

/// Upper bound of the disc's random lateral perturbation, as a fraction of
/// post-bounce speed.
const PERTURBATION_LIMIT: f32 = 0.1;

/// What the handler did with the contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BounceOutcome {
    /// The projectile rebounded; the new velocity is already applied.
    Bounced { new_velocity: Vec3 },
    /// Bounce budget exhausted (or bouncing disabled): the caller reports the
    /// impact instead.
    Impact,
}

/// Handle a projectile/surface contact at `point` with surface `normal`
/// (pointing away from the surface, toward the projectile).
pub fn handle_surface_contact(
    projectile: &mut Projectile,
    body: &mut Body,
    transform: &mut Transform,
    point: Vec3,
    normal: Vec3,
    rng: &mut fastrand::Rng,
) -> BounceOutcome {
    if !projectile.can_bounce() {
        return BounceOutcome::Impact;
    }

    let normal = normal.try_normalize().unwrap_or(Vec3::Y);
    let incoming = body.velocity;

    // Reflect across the surface and damp by the bounce factor
    let reflected = incoming - normal * (2.0 * incoming.dot(normal));
    let mut velocity = reflected * projectile.bounce_factor.clamp(0.0, 1.0);

    // Discs wobble: a bounded lateral nudge that preserves speed
    if projectile.kind == ProjectileKind::Disc {
        velocity = perturb_laterally(velocity, rng);
    }

    body.velocity = velocity;
    transform.position = point + normal * REBOUND_OFFSET;
    projectile.record_bounce();

    // Spin realigns with the rebound plane
    let new_axis = velocity.cross(normal).try_normalize().unwrap_or(Vec3::Y);
    projectile.set_spin_axis(new_axis);

    BounceOutcome::Bounced {
        new_velocity: velocity,
    }
}

/// Nudge `velocity` sideways by up to [`PERTURBATION_LIMIT`] of its length,
/// then rescale so speed is preserved exactly.
fn perturb_laterally(velocity: Vec3, rng: &mut fastrand::Rng) -> Vec3 {
    let speed = velocity.length();
    if speed < 1e-6 {
        return velocity;
    }
    let direction = velocity / speed;

    let tangent = direction.any_orthonormal_vector();
    let bitangent = direction.cross(tangent);
    let angle = rng.f32() * std::f32::consts::TAU;
    let magnitude = rng.f32() * PERTURBATION_LIMIT * speed;
    let offset = (tangent * angle.cos() + bitangent * angle.sin()) * magnitude;

    match (velocity + offset).try_normalize() {
        Some(new_direction) => new_direction * speed,
        None => velocity,
    }
}
