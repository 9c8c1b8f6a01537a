//! ECS components (transform, shape, body, projectile).

pub mod body;
pub mod projectile;
pub mod shape;
pub mod transform;

pub use body::*;
pub use projectile::*;
pub use shape::*;
pub use transform::*;
