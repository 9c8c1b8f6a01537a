//! CPU physics and collision core.
//!
//! # Pipeline
//!
//! Each fixed step runs, in this order (the ordering is a correctness
//! requirement, not an optimization):
//!
//! 1. Integrate projectile aerodynamics (gravity, drag, lift, Magnus)
//! 2. Narrow-phase detection over all active shape pairs
//! 3. Resolve contacts (impulse + correction), or bounce projectiles
//! 4. Ground-plane check for projectiles
//! 5. Grounded-state bookkeeping and landing events
//! 6. Trigger enter/exit set diffing
//! 7. World-boundary enforcement
//!
//! Everything is single-threaded and synchronous; scratch buffers are owned
//! by [`PhysicsWorld`] and reused across frames without holding entity
//! references.

pub mod aerodynamics;
pub mod bounce;
pub mod bounds;
pub mod contact;
pub mod narrowphase;
pub mod resolver;
pub mod trigger;

use std::collections::HashMap;

use glam::Vec3;
use tracing::warn;

use crate::ecs::components::body::Body;
use crate::ecs::components::projectile::Projectile;
use crate::ecs::components::shape::ShapeDescriptor;
use crate::ecs::components::transform::Transform;
use crate::events::PhysicsEvent;
use crate::terrain::{TerrainSample, TerrainSampler};

use self::aerodynamics::FlightStatus;
use self::bounce::BounceOutcome;
use self::bounds::{BoundsConfig, BoundsTracker};
use self::contact::PairContact;
use self::trigger::TriggerTracker;

/// Minimum upward normal component for a contact to count as ground.
const GROUND_NORMAL_MIN_Y: f32 = 0.7;

/// Slack below the floor plane before an entity counts as standing on it.
const GROUND_EPS: f32 = 1e-3;

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81, 0).
    pub gravity: Vec3,
    /// Fixed timestep for physics updates in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of sub-steps per frame. Default: 4.
    pub max_substeps: u32,
    /// Air density used by projectile drag and lift. Default: 1.2.
    pub air_density: f32,
    /// Speed below which aerodynamic forces are skipped. Default: 1.0.
    pub aero_speed_threshold: f32,
    /// Radius used by the symmetric fallback test for shape pairs without a
    /// specialized overlap test. Default: 0.5.
    pub fallback_radius: f32,
    /// Play volume; `None` disables boundary enforcement.
    pub bounds: Option<BoundsConfig>,
    /// Seed for the bounce perturbation RNG, so runs are reproducible.
    pub rng_seed: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            air_density: 1.2,
            aero_speed_threshold: 1.0,
            fallback_radius: 0.5,
            bounds: None,
            rng_seed: 0,
        }
    }
}

/// Snapshot of one collidable entity, taken at the top of the detection pass
/// so detection never holds world borrows.
#[derive(Debug, Clone)]
struct ColliderEntry {
    entity: hecs::Entity,
    position: Vec3,
    shape: ShapeDescriptor,
}

/// The physics world: owns configuration, per-frame scratch storage, and the
/// cross-frame trigger/boundary tracking state.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: f64,
    colliders: Vec<ColliderEntry>,
    contacts: Vec<PairContact>,
    triggers: TriggerTracker,
    bounds: BoundsTracker,
    ground_normals: HashMap<hecs::Entity, Vec3>,
    rng: fastrand::Rng,
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        let rng = fastrand::Rng::with_seed(config.rng_seed);
        Self {
            config,
            accumulator: 0.0,
            colliders: Vec::new(),
            contacts: Vec::new(),
            triggers: TriggerTracker::new(),
            bounds: BoundsTracker::new(),
            ground_normals: HashMap::new(),
            rng,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Drop all cross-frame tracking for a despawned entity.
    pub fn forget_entity(&mut self, entity: hecs::Entity) {
        self.triggers.forget(entity);
        self.bounds.forget(entity);
    }

    /// Step the simulation forward by `delta_time` seconds, appending
    /// produced notifications to `events`.
    ///
    /// Uses a fixed timestep accumulator so simulation stays deterministic
    /// regardless of frame pacing.
    pub fn step(
        &mut self,
        world: &mut hecs::World,
        terrain: Option<&dyn TerrainSampler>,
        delta_time: f64,
        events: &mut Vec<PhysicsEvent>,
    ) {
        self.accumulator += delta_time;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            let dt = self.config.fixed_timestep as f32;
            self.fixed_step(world, terrain, dt, events);
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f64 {
            self.accumulator = 0.0;
        }
    }

    fn fixed_step(
        &mut self,
        world: &mut hecs::World,
        terrain: Option<&dyn TerrainSampler>,
        dt: f32,
        events: &mut Vec<PhysicsEvent>,
    ) {
        self.integrate_projectiles(world, dt, events);
        self.detect_contacts(world);
        self.resolve_or_bounce(world, events);
        self.ground_plane_pass(world, events);
        self.update_grounded(world, terrain, events);
        self.triggers.finish_frame(events);
        if let Some(bounds_config) = self.config.bounds {
            bounds::enforce(world, &bounds_config, &mut self.bounds, dt, events);
        }
    }

    /// 1. Aerodynamics integration for every active projectile.
    fn integrate_projectiles(
        &mut self,
        world: &mut hecs::World,
        dt: f32,
        events: &mut Vec<PhysicsEvent>,
    ) {
        for (entity, (projectile, body, transform)) in
            world.query_mut::<(&mut Projectile, &mut Body, &mut Transform)>()
        {
            if !projectile.active {
                continue;
            }
            let status = aerodynamics::integrate(projectile, body, transform, &self.config, dt);
            if status == FlightStatus::Expired {
                events.push(PhysicsEvent::ProjectileExpired {
                    projectile: entity,
                    distance_traveled: projectile.distance_traveled,
                });
            }
        }
    }

    /// 2. Narrow-phase detection over all filtered shape pairs. Trigger
    /// overlaps are recorded for the diff pass; physical contacts are queued
    /// for resolution.
    fn detect_contacts(&mut self, world: &mut hecs::World) {
        self.colliders.clear();
        for (entity, (shape, transform, projectile)) in world
            .query::<(&ShapeDescriptor, &Transform, Option<&Projectile>)>()
            .iter()
        {
            // Retired projectiles keep their shape but no longer collide
            if projectile.is_some_and(|p| !p.active) {
                continue;
            }
            self.colliders.push(ColliderEntry {
                entity,
                position: transform.position,
                shape: shape.clone(),
            });
        }

        self.contacts.clear();
        self.triggers.begin_frame();

        for i in 0..self.colliders.len() {
            for j in (i + 1)..self.colliders.len() {
                let (a, b) = (&self.colliders[i], &self.colliders[j]);

                // Layer filtering is the sole gate before geometry
                if !(a.shape.collides_with_group(b.shape.layer)
                    || b.shape.collides_with_group(a.shape.layer))
                {
                    continue;
                }

                let Some(detected) = narrowphase::detect_collision(
                    &a.shape,
                    a.position,
                    &b.shape,
                    b.position,
                    self.config.fallback_radius,
                ) else {
                    continue;
                };

                if a.shape.is_trigger || b.shape.is_trigger {
                    if a.shape.is_trigger {
                        self.triggers.record_overlap(a.entity, b.entity);
                    }
                    if b.shape.is_trigger {
                        self.triggers.record_overlap(b.entity, a.entity);
                    }
                    continue;
                }

                self.contacts.push(PairContact {
                    entity_a: a.entity,
                    entity_b: b.entity,
                    contact: detected,
                });
            }
        }
    }

    /// 3. Physical response: projectiles bounce off whatever they hit,
    /// everything else goes through the impulse resolver. A failure in one
    /// pair never aborts the rest.
    fn resolve_or_bounce(&mut self, world: &mut hecs::World, events: &mut Vec<PhysicsEvent>) {
        for index in 0..self.contacts.len() {
            let pair = self.contacts[index];
            let projectile_a = is_active_projectile(world, pair.entity_a);
            let projectile_b = is_active_projectile(world, pair.entity_b);

            // Exactly one projectile side: that is a projectile/surface hit.
            // Projectile-projectile pairs deflect through the resolver.
            if projectile_a != projectile_b {
                let (projectile_entity, hit_entity, surface_normal) = if projectile_a {
                    (pair.entity_a, pair.entity_b, pair.contact.normal)
                } else {
                    (pair.entity_b, pair.entity_a, -pair.contact.normal)
                };
                self.bounce_projectile(
                    world,
                    projectile_entity,
                    Some(hit_entity),
                    pair.contact.point,
                    surface_normal,
                    events,
                );
            } else if let Err(err) = resolver::resolve_contact(world, &pair, events) {
                warn!(
                    entity_a = ?pair.entity_a,
                    entity_b = ?pair.entity_b,
                    "contact resolution skipped: {err}"
                );
            }
        }
    }

    /// 4. Floor crossing for projectiles, fed to the bounce handler exactly
    /// like a narrow-phase contact.
    fn ground_plane_pass(&mut self, world: &mut hecs::World, events: &mut Vec<PhysicsEvent>) {
        let mut crossings: Vec<(hecs::Entity, Vec3)> = Vec::new();
        for (entity, (projectile, body, transform)) in
            world.query::<(&Projectile, &Body, &Transform)>().iter()
        {
            if projectile.active
                && transform.position.y - projectile.size < 0.0
                && body.velocity.y < 0.0
            {
                let p = transform.position;
                crossings.push((entity, Vec3::new(p.x, 0.0, p.z)));
            }
        }
        for (entity, point) in crossings {
            self.bounce_projectile(world, entity, None, point, Vec3::Y, events);
        }
    }

    fn bounce_projectile(
        &mut self,
        world: &mut hecs::World,
        entity: hecs::Entity,
        hit_entity: Option<hecs::Entity>,
        point: Vec3,
        normal: Vec3,
        events: &mut Vec<PhysicsEvent>,
    ) {
        let Ok((projectile, body, transform)) =
            world.query_one_mut::<(&mut Projectile, &mut Body, &mut Transform)>(entity)
        else {
            // The projectile lost a capability mid-frame; nothing to do
            return;
        };

        match bounce::handle_surface_contact(
            projectile,
            body,
            transform,
            point,
            normal,
            &mut self.rng,
        ) {
            BounceOutcome::Bounced { new_velocity } => {
                events.push(PhysicsEvent::ProjectileBounce {
                    projectile: entity,
                    bounce_count: projectile.bounce_count(),
                    hit_point: point,
                    hit_normal: normal,
                    new_velocity,
                });
            }
            BounceOutcome::Impact => {
                projectile.active = false;
                events.push(PhysicsEvent::ProjectileImpact {
                    projectile: entity,
                    hit_entity,
                    point,
                    normal,
                });
            }
        }
    }

    /// 5. Grounded-state bookkeeping: ground evidence comes from upward
    /// contact normals and the floor plane; landings query the terrain
    /// provider for surface data.
    fn update_grounded(
        &mut self,
        world: &mut hecs::World,
        terrain: Option<&dyn TerrainSampler>,
        events: &mut Vec<PhysicsEvent>,
    ) {
        self.ground_normals.clear();
        for pair in &self.contacts {
            let normal = pair.contact.normal;
            if normal.y > GROUND_NORMAL_MIN_Y {
                self.ground_normals.insert(pair.entity_a, normal);
            }
            if -normal.y > GROUND_NORMAL_MIN_Y {
                self.ground_normals.insert(pair.entity_b, -normal);
            }
        }

        for (entity, (shape, transform, body, projectile)) in world.query_mut::<(
            &mut ShapeDescriptor,
            &Transform,
            Option<&Body>,
            Option<&Projectile>,
        )>() {
            // Projectiles bounce instead of standing, and trigger zones do
            // not land
            if projectile.is_some() || shape.is_trigger {
                continue;
            }

            let mut ground_normal = self.ground_normals.get(&entity).copied();
            if ground_normal.is_none() {
                let bottom =
                    shape.world_center(transform.position).y - shape.kind.bottom_extent();
                let falling = body.as_ref().map_or(true, |b| b.velocity.y <= 0.0);
                if bottom <= GROUND_EPS && falling {
                    ground_normal = Some(Vec3::Y);
                }
            }

            match ground_normal {
                Some(normal) => {
                    if shape.set_grounded(true, normal) {
                        let sample = sample_terrain(terrain, transform.position);
                        shape.set_ground_friction(sample.friction);
                        let velocity = body.as_ref().map_or(Vec3::ZERO, |b| b.velocity);
                        let mass = body.as_ref().map_or(0.0, |b| b.mass());
                        events.push(PhysicsEvent::MovementLand {
                            entity,
                            position: transform.position,
                            velocity,
                            impact_force: velocity.dot(normal).abs() * mass,
                            surface_type: sample.surface_type,
                        });
                    }
                }
                None => {
                    shape.set_grounded(false, Vec3::ZERO);
                }
            }
        }
    }
}

fn is_active_projectile(world: &hecs::World, entity: hecs::Entity) -> bool {
    world
        .get::<&Projectile>(entity)
        .map(|p| p.active)
        .unwrap_or(false)
}

fn sample_terrain(terrain: Option<&dyn TerrainSampler>, position: Vec3) -> TerrainSample {
    match terrain {
        Some(sampler) => sampler.sample(position).unwrap_or_else(|err| {
            warn!(?position, "terrain sample failed: {err}; using flat default");
            TerrainSample::default()
        }),
        None => TerrainSample::default(),
    }
}
