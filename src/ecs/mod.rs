//! Entity Component System integration with hecs.
//!
//! hecs doubles as the capability registry: `world.get::<&Body>(entity)`
//! looks up the velocity capability on an arbitrary entity, and an `Err`
//! result is the normal "capability absent" outcome, not a failure.

pub mod components;

pub mod prelude {
    pub use super::components::*;
}
