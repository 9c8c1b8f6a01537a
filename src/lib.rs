//! Ruckus physics core
//!
//! The physics and collision heart of the Ruckus arena game: narrow-phase
//! shape overlap, impulse-based contact resolution, trigger zone tracking,
//! projectile aerodynamics with bouncing, and world-boundary enforcement.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **ecs** - hecs components: transforms, collision shapes, bodies,
//!    projectiles
//! 2. **physics** - the simulation core: detection, resolution, triggers,
//!    aerodynamics, bounce handling, boundary enforcement
//! 3. **events** - notifications the step produces for the rest of the game
//! 4. **terrain** - the external terrain-sampling seam
//!
//! Rendering, entity lifecycle, input, and the game's event bus live
//! elsewhere; this crate is a pure function of (world, dt) → events plus the
//! state it mutates in place.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use ruckus::{Body, PhysicsConfig, PhysicsWorld, ShapeDescriptor, ShapeKind, Transform};
//!
//! let mut world = hecs::World::new();
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//!
//! world.spawn((
//!     Transform::from_position(Vec3::new(0.0, 3.0, 0.0)),
//!     ShapeDescriptor::new(ShapeKind::Sphere { radius: 0.5 }),
//!     Body::new(1.0),
//! ));
//!
//! let mut events = Vec::new();
//! physics.step(&mut world, None, 1.0 / 60.0, &mut events);
//! ```

pub mod ecs;
pub mod events;
pub mod physics;
pub mod terrain;

// Re-export commonly used types
pub use ecs::components::{
    Body, Health, Projectile, ProjectileKind, ShapeDescriptor, ShapeKind, Transform, MIN_MASS,
};

pub use events::{PhysicsEvent, ResetReason};

pub use physics::bounce::BounceOutcome;
pub use physics::bounds::{BoundsBehavior, BoundsConfig, RESET_DELAY};
pub use physics::contact::{Contact, PairContact};
pub use physics::{PhysicsConfig, PhysicsWorld};

pub use terrain::{FlatTerrain, SurfaceType, TerrainSample, TerrainSampler};

// Re-export the math and ECS crates for convenience
pub use glam;
pub use hecs;
