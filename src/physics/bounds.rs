//! World-boundary enforcement: five policies with time-based hysteresis.
//!
//! The play volume is centered at the world origin on X/Z with its floor at
//! Y = 0. Entities are tracked individually; excursion time and the one-shot
//! warning reset whenever an entity re-enters bounds.

use std::collections::HashMap;

use glam::Vec3;
use tracing::warn;

use crate::ecs::components::body::{Body, Health};
use crate::ecs::components::shape::ShapeDescriptor;
use crate::ecs::components::transform::Transform;
use crate::events::{PhysicsEvent, ResetReason};

/// Accumulated out-of-bounds seconds before Reset/Damage trip. Shared so
/// brief excursions are never punished.
pub const RESET_DELAY: f32 = 3.0;

/// What happens to an entity while it is outside the play volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundsBehavior {
    /// Clamp the out-of-range axes and zero their velocity components.
    Block,
    /// Clamp and reflect the velocity component, scaled by `factor`. Falls
    /// back to Block when the entity exposes no velocity.
    Bounce { factor: f32 },
    /// Wrap horizontal overflow to the opposite edge; the vertical axis is
    /// clamped, never wrapped.
    Teleport,
    /// After [`RESET_DELAY`] seconds outside, snap to `position` and zero
    /// velocity.
    Reset { position: Vec3 },
    /// Reset, plus `amount` damage through the health capability.
    Damage { amount: f32, position: Vec3 },
}

/// Play volume extents and policy.
#[derive(Debug, Clone, Copy)]
pub struct BoundsConfig {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    /// Margin inside the volume where the one-shot warning already fires.
    pub warning_distance: f32,
    pub behavior: BoundsBehavior,
}

impl BoundsConfig {
    pub fn new(width: f32, depth: f32, height: f32, behavior: BoundsBehavior) -> Self {
        if width <= 0.0 || depth <= 0.0 || height <= 0.0 {
            warn!(width, depth, height, "non-positive bounds extent clamped");
        }
        Self {
            width: width.max(1.0),
            depth: depth.max(1.0),
            height: height.max(1.0),
            warning_distance: 0.0,
            behavior,
        }
    }

    fn min(&self) -> Vec3 {
        Vec3::new(-self.width * 0.5, 0.0, -self.depth * 0.5)
    }

    fn max(&self) -> Vec3 {
        Vec3::new(self.width * 0.5, self.height, self.depth * 0.5)
    }

    fn contains(&self, position: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        position.cmpge(min).all() && position.cmple(max).all()
    }

    /// Inside the volume but within `warning_distance` of some bound.
    fn near_edge(&self, position: Vec3) -> bool {
        if self.warning_distance <= 0.0 {
            return false;
        }
        let margin = Vec3::splat(self.warning_distance);
        let (min, max) = (self.min() + margin, self.max() - margin);
        !(position.cmpge(min).all() && position.cmple(max).all())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ExcursionState {
    out_of_bounds_time: f32,
    warned: bool,
}

/// Per-entity boundary tracking, owned by the physics world across frames.
#[derive(Debug, Default)]
pub struct BoundsTracker {
    states: HashMap<hecs::Entity, ExcursionState>,
}

impl BoundsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds the entity has currently spent out of bounds.
    pub fn out_of_bounds_time(&self, entity: hecs::Entity) -> f32 {
        self.states
            .get(&entity)
            .map_or(0.0, |s| s.out_of_bounds_time)
    }

    pub fn forget(&mut self, entity: hecs::Entity) {
        self.states.remove(&entity);
    }
}

/// Enforce the configured bounds on every positioned, non-trigger entity.
pub fn enforce(
    world: &mut hecs::World,
    config: &BoundsConfig,
    tracker: &mut BoundsTracker,
    dt: f32,
    events: &mut Vec<PhysicsEvent>,
) {
    for (entity, (transform, shape, body, health)) in world
        .query_mut::<(
            &mut Transform,
            Option<&ShapeDescriptor>,
            Option<&mut Body>,
            Option<&mut Health>,
        )>()
    {
        if shape.is_some_and(|s| s.is_trigger) {
            continue;
        }

        let position = transform.position;
        if config.contains(position) {
            if let Some(state) = tracker.states.remove(&entity) {
                if state.out_of_bounds_time > 0.0 {
                    events.push(PhysicsEvent::EntityInBounds { entity });
                }
                // Near-edge warnings re-arm only once the entity leaves the
                // warning margin; excursion time does not carry back inside
                if config.near_edge(position) && state.warned {
                    tracker.states.insert(
                        entity,
                        ExcursionState {
                            out_of_bounds_time: 0.0,
                            warned: true,
                        },
                    );
                }
            }
            if config.near_edge(position) {
                let state = tracker.states.entry(entity).or_default();
                if !state.warned {
                    state.warned = true;
                    events.push(PhysicsEvent::BoundaryWarning {
                        entity,
                        out_of_bounds_time: 0.0,
                    });
                }
            }
            continue;
        }

        // Out of bounds: accumulate time, warn once, apply the policy
        let state = tracker.states.entry(entity).or_default();
        state.out_of_bounds_time += dt;
        if !state.warned {
            state.warned = true;
            events.push(PhysicsEvent::BoundaryWarning {
                entity,
                out_of_bounds_time: state.out_of_bounds_time,
            });
        }
        let out_of_bounds_time = state.out_of_bounds_time;

        match config.behavior {
            BoundsBehavior::Block => {
                clamp_axes(transform, body, config, 0.0);
            }
            BoundsBehavior::Bounce { factor } => {
                clamp_axes(transform, body, config, -factor.clamp(0.0, 1.0));
            }
            BoundsBehavior::Teleport => {
                let (min, max) = (config.min(), config.max());
                let p = &mut transform.position;
                if p.x > max.x {
                    p.x = min.x + (p.x - max.x);
                } else if p.x < min.x {
                    p.x = max.x - (min.x - p.x);
                }
                if p.z > max.z {
                    p.z = min.z + (p.z - max.z);
                } else if p.z < min.z {
                    p.z = max.z - (min.z - p.z);
                }
                if p.y < min.y || p.y > max.y {
                    p.y = p.y.clamp(min.y, max.y);
                    if let Some(body) = body {
                        body.velocity.y = 0.0;
                    }
                }
            }
            BoundsBehavior::Reset { position } => {
                if out_of_bounds_time >= RESET_DELAY {
                    reset_entity(transform, body, position);
                    tracker.states.remove(&entity);
                    events.push(PhysicsEvent::EntityReset {
                        entity,
                        reason: ResetReason::OutOfBounds,
                    });
                }
            }
            BoundsBehavior::Damage { amount, position } => {
                if out_of_bounds_time >= RESET_DELAY {
                    if let Some(health) = health {
                        health.apply_damage(amount);
                    }
                    reset_entity(transform, body, position);
                    tracker.states.remove(&entity);
                    events.push(PhysicsEvent::EntityReset {
                        entity,
                        reason: ResetReason::OutOfBoundsDamage,
                    });
                }
            }
        }
    }
}

/// Clamp every out-of-range axis to its bound and scale that axis's velocity
/// by `velocity_scale` (0 for Block, −factor for Bounce).
fn clamp_axes(
    transform: &mut Transform,
    body: Option<&mut Body>,
    config: &BoundsConfig,
    velocity_scale: f32,
) {
    let (min, max) = (config.min(), config.max());
    let p = &mut transform.position;
    let mut scale = Vec3::ONE;

    for axis in 0..3 {
        if p[axis] < min[axis] {
            p[axis] = min[axis];
            scale[axis] = velocity_scale;
        } else if p[axis] > max[axis] {
            p[axis] = max[axis];
            scale[axis] = velocity_scale;
        }
    }

    if let Some(body) = body {
        body.velocity *= scale;
    }
}

fn reset_entity(transform: &mut Transform, body: Option<&mut Body>, position: Vec3) {
    transform.position = position;
    if let Some(body) = body {
        body.velocity = Vec3::ZERO;
    }
}
