//! Contact resolution: impulse response and positional correction.

use glam::Vec3;
use thiserror::Error;
use tracing::warn;

use crate::ecs::components::body::Body;
use crate::ecs::components::shape::ShapeDescriptor;
use crate::ecs::components::transform::Transform;
use crate::events::PhysicsEvent;

use super::contact::PairContact;

/// Fraction of the penetration depth corrected per step. Deliberate
/// under-correction, so stacked contacts settle instead of oscillating.
pub const POSITION_CORRECTION: f32 = 0.8;

/// Failure inside one pair's resolution. Caught by the caller at pair
/// granularity; the frame always continues.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("non-finite relative velocity between {0:?} and {1:?}")]
    NonFiniteVelocity(hecs::Entity, hecs::Entity),
    #[error("non-finite contact normal between {0:?} and {1:?}")]
    NonFiniteNormal(hecs::Entity, hecs::Entity),
}

/// Resolve one detected contact: skip triggers and kinematic bodies, apply an
/// impulse to the first entity when the pair is approaching, and always
/// correct the first entity's position out of penetration.
///
/// Missing capabilities (no `Body`, no `Transform`) degrade to skipping that
/// part of the response; they are not errors.
pub fn resolve_contact(
    world: &mut hecs::World,
    pair: &PairContact,
    events: &mut Vec<PhysicsEvent>,
) -> Result<(), ResolveError> {
    let PairContact {
        entity_a,
        entity_b,
        mut contact,
    } = *pair;

    // Snapshot shape response data, then drop the borrows before mutating.
    let (trigger, restitution) = {
        let shape_a = match world.get::<&ShapeDescriptor>(entity_a) {
            Ok(shape) => shape,
            Err(_) => return Ok(()),
        };
        let shape_b = match world.get::<&ShapeDescriptor>(entity_b) {
            Ok(shape) => shape,
            Err(_) => return Ok(()),
        };
        (
            shape_a.is_trigger || shape_b.is_trigger,
            (shape_a.restitution() + shape_b.restitution()) * 0.5,
        )
    };
    if trigger {
        return Ok(());
    }

    let velocity_a = world.get::<&Body>(entity_a).ok().map(|b| (b.velocity, b.kinematic));
    let velocity_b = world.get::<&Body>(entity_b).ok().map(|b| (b.velocity, b.kinematic));

    // Kinematic bodies are immovable by contact; skip the whole response.
    if velocity_a.is_some_and(|(_, kinematic)| kinematic)
        || velocity_b.is_some_and(|(_, kinematic)| kinematic)
    {
        return Ok(());
    }

    if !contact.normal.is_finite() {
        return Err(ResolveError::NonFiniteNormal(entity_a, entity_b));
    }

    let relative_velocity = velocity_a.map_or(Vec3::ZERO, |(v, _)| v)
        - velocity_b.map_or(Vec3::ZERO, |(v, _)| v);
    if !relative_velocity.is_finite() {
        return Err(ResolveError::NonFiniteVelocity(entity_a, entity_b));
    }
    contact.relative_velocity = Some(relative_velocity);

    // Impulse only while the pair is approaching; separating pairs are left
    // alone so restitution does not pump energy in.
    let velocity_along_normal = relative_velocity.dot(contact.normal);
    let impulse = if velocity_along_normal < 0.0 {
        contact.normal * (-(1.0 + restitution) * velocity_along_normal)
    } else {
        Vec3::ZERO
    };

    if impulse != Vec3::ZERO {
        if let Ok(mut body) = world.get::<&mut Body>(entity_a) {
            body.apply_impulse(impulse);
        }
    }

    // Positional correction always runs, impulse or not, so resting pairs do
    // not sink into each other.
    if let Ok(mut transform) = world.get::<&mut Transform>(entity_a) {
        transform.position += contact.normal * (contact.penetration * POSITION_CORRECTION);
    }

    events.push(PhysicsEvent::Collision {
        entity_a,
        entity_b,
        position: contact.point,
        normal: contact.normal,
        impulse,
    });

    Ok(())
}

/// Resolve a batch of contacts, containing each pair's failure to that pair.
pub fn resolve_contacts(
    world: &mut hecs::World,
    contacts: &[PairContact],
    events: &mut Vec<PhysicsEvent>,
) {
    for pair in contacts {
        if let Err(err) = resolve_contact(world, pair, events) {
            warn!(
                entity_a = ?pair.entity_a,
                entity_b = ?pair.entity_b,
                "contact resolution skipped: {err}"
            );
        }
    }
}
