//! Projectile aerodynamics: gravity, quadratic drag, spin-induced lift, and
//! Magnus curvature, integrated with semi-implicit Euler.
//!
//! Stable only for the small fixed timesteps the simulation loop uses; there
//! is no sub-stepping.

use glam::Vec3;

use crate::ecs::components::body::Body;
use crate::ecs::components::projectile::Projectile;
use crate::ecs::components::transform::Transform;

use super::PhysicsConfig;

/// Scale of the Magnus velocity term.
const MAGNUS_SCALE: f32 = 0.01;

/// Whether the projectile is still in flight after an integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightStatus {
    Flying,
    /// Travel distance exceeded; the projectile was retired.
    Expired,
}

/// Advance one projectile by `dt`: apply gravity and aerodynamic forces to
/// its velocity, spin its rotation angle, and integrate position.
pub fn integrate(
    projectile: &mut Projectile,
    body: &mut Body,
    transform: &mut Transform,
    config: &PhysicsConfig,
    dt: f32,
) -> FlightStatus {
    if !projectile.active {
        return FlightStatus::Expired;
    }

    if projectile.affected_by_gravity {
        body.velocity += config.gravity * dt;
    }

    let speed = body.velocity.length();
    let has_aero = projectile.drag_coeff > 0.0 || projectile.lift_coeff > 0.0;
    if has_aero && speed > config.aero_speed_threshold {
        let direction = body.velocity / speed;
        let dynamic_pressure = 0.5 * config.air_density * speed * speed;
        let area = std::f32::consts::PI * projectile.size * projectile.size;

        // Drag opposes motion
        let mut force = -direction * (projectile.drag_coeff * dynamic_pressure * area);

        // Lift acts perpendicular to motion, in the spin plane
        if projectile.lift_coeff > 0.0 {
            if let Some(spin_vector) = direction.cross(projectile.spin_axis()).try_normalize() {
                force += spin_vector * (projectile.lift_coeff * dynamic_pressure * area);
            }
        }

        body.velocity += force * (dt / body.mass());

        // Magnus curvature, added straight to velocity
        body.velocity +=
            projectile.angular_velocity().cross(direction) * (MAGNUS_SCALE * dt);
    }

    projectile.advance_rotation(dt);

    let displacement = body.velocity * dt;
    transform.position += displacement;
    projectile.distance_traveled += displacement.length();

    if projectile.distance_traveled >= projectile.expire_distance {
        projectile.active = false;
        return FlightStatus::Expired;
    }

    FlightStatus::Flying
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::projectile::ProjectileKind;

    fn config() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    #[test]
    fn test_pure_gravity_matches_ballistic_arc() {
        // drag = 0, lift = 0: vertical motion must follow
        // y(t) = y0 + v0*t + 0.5*g*t^2 up to integration error
        let mut projectile = Projectile::ball(0.1);
        let mut body = Body::new(1.0);
        body.velocity = Vec3::new(3.0, 5.0, 0.0);
        let mut transform = Transform::from_position(Vec3::new(0.0, 2.0, 0.0));

        let dt = 1.0 / 240.0;
        let steps = 240;
        for _ in 0..steps {
            integrate(&mut projectile, &mut body, &mut transform, &config(), dt);
        }

        let t = dt * steps as f32;
        let expected_y = 2.0 + 5.0 * t + 0.5 * (-9.81) * t * t;
        assert!(
            (transform.position.y - expected_y).abs() < 0.05,
            "y = {}, expected {}",
            transform.position.y,
            expected_y
        );
        // Horizontal velocity untouched without drag
        assert!((body.velocity.x - 3.0).abs() < 1e-4);
        assert!((transform.position.x - 3.0 * t).abs() < 1e-3);
    }

    #[test]
    fn test_drag_slows_horizontal_flight() {
        let mut projectile = Projectile::disc(0.2);
        projectile.affected_by_gravity = false;
        projectile.lift_coeff = 0.0;
        let mut body = Body::new(0.2);
        body.velocity = Vec3::new(20.0, 0.0, 0.0);
        let mut transform = Transform::default();

        let dt = 1.0 / 60.0;
        for _ in 0..60 {
            integrate(&mut projectile, &mut body, &mut transform, &config(), dt);
        }

        assert!(
            body.velocity.x < 20.0 && body.velocity.x > 0.0,
            "vx = {}",
            body.velocity.x
        );
    }

    #[test]
    fn test_below_speed_threshold_skips_aero() {
        let mut projectile = Projectile::disc(0.2);
        projectile.affected_by_gravity = false;
        let mut body = Body::new(0.2);
        body.velocity = Vec3::new(0.5, 0.0, 0.0);
        let mut transform = Transform::default();

        integrate(&mut projectile, &mut body, &mut transform, &config(), 1.0 / 60.0);
        assert_eq!(body.velocity, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_lift_curves_trajectory() {
        // A disc spinning around +Y moving along +X gets pushed sideways;
        // with gravity off any Z drift comes from lift/Magnus alone.
        let mut projectile = Projectile::disc(0.2);
        projectile.affected_by_gravity = false;
        projectile.drag_coeff = 0.0;
        let mut body = Body::new(0.2);
        body.velocity = Vec3::new(15.0, 0.0, 0.0);
        let mut transform = Transform::default();

        let dt = 1.0 / 60.0;
        for _ in 0..30 {
            integrate(&mut projectile, &mut body, &mut transform, &config(), dt);
        }

        assert!(
            body.velocity.z.abs() > 1e-3,
            "expected lateral curvature, vz = {}",
            body.velocity.z
        );
        assert_eq!(projectile.kind, ProjectileKind::Disc);
    }

    #[test]
    fn test_rotation_accumulates_and_wraps() {
        let mut projectile = Projectile::disc(0.2);
        projectile.spin_rate = 10.0;
        let mut body = Body::new(0.2);
        let mut transform = Transform::default();

        for _ in 0..120 {
            integrate(
                &mut projectile,
                &mut body,
                &mut transform,
                &config(),
                1.0 / 60.0,
            );
        }
        assert!(projectile.rotation >= 0.0 && projectile.rotation < std::f32::consts::TAU);
    }

    #[test]
    fn test_expiry_retires_projectile() {
        let mut projectile = Projectile::ball(0.1);
        projectile.affected_by_gravity = false;
        projectile.expire_distance = 10.0;
        let mut body = Body::new(1.0);
        body.velocity = Vec3::new(100.0, 0.0, 0.0);
        let mut transform = Transform::default();

        let mut expired = false;
        for _ in 0..60 {
            if integrate(
                &mut projectile,
                &mut body,
                &mut transform,
                &config(),
                1.0 / 60.0,
            ) == FlightStatus::Expired
            {
                expired = true;
                break;
            }
        }
        assert!(expired);
        assert!(!projectile.active);
        assert!(projectile.distance_traveled >= 10.0);
    }
}
