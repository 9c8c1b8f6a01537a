//! Collision shape component: geometry, layer filtering, surface state.

use glam::Vec3;
use tracing::warn;

/// Smallest accepted shape dimension. Non-positive radii and extents are
/// clamped here instead of failing.
pub const MIN_DIMENSION: f32 = 1e-3;

/// Collision geometry. The set of supported shapes is closed; collision
/// dispatch matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    Capsule { radius: f32, half_height: f32 },
}

impl ShapeKind {
    /// Clamp dimensions to [`MIN_DIMENSION`], logging when a value had to be
    /// corrected.
    fn sanitized(self) -> Self {
        match self {
            ShapeKind::Sphere { radius } => {
                if radius < MIN_DIMENSION {
                    warn!(radius, "sphere radius clamped to minimum");
                }
                ShapeKind::Sphere {
                    radius: radius.max(MIN_DIMENSION),
                }
            }
            ShapeKind::Box { half_extents } => {
                if half_extents.min_element() < MIN_DIMENSION {
                    warn!(?half_extents, "box half extents clamped to minimum");
                }
                ShapeKind::Box {
                    half_extents: half_extents.max(Vec3::splat(MIN_DIMENSION)),
                }
            }
            ShapeKind::Capsule {
                radius,
                half_height,
            } => {
                if radius < MIN_DIMENSION || half_height < MIN_DIMENSION {
                    warn!(radius, half_height, "capsule dimensions clamped to minimum");
                }
                ShapeKind::Capsule {
                    radius: radius.max(MIN_DIMENSION),
                    half_height: half_height.max(MIN_DIMENSION),
                }
            }
        }
    }

    /// Distance from the shape center to its lowest point, used by the
    /// ground-plane check.
    pub fn bottom_extent(&self) -> f32 {
        match self {
            ShapeKind::Sphere { radius } => *radius,
            ShapeKind::Box { half_extents } => half_extents.y,
            ShapeKind::Capsule {
                radius,
                half_height,
            } => half_height + radius,
        }
    }
}

/// Per-entity collision shape with layer filtering and surface response data.
///
/// Grounded state is mutated only through [`ShapeDescriptor::set_grounded`],
/// which reports the landing transition to the caller.
#[derive(Debug, Clone)]
pub struct ShapeDescriptor {
    pub kind: ShapeKind,
    /// Offset from the entity's position, applied before any world-space test.
    pub offset: Vec3,
    /// Collision layer this shape lives on (0..32).
    pub layer: u8,
    /// Bitset of layers this shape reacts to.
    pub mask: u32,
    /// Overlap detection only, no physical response.
    pub is_trigger: bool,
    restitution: f32,
    friction: f32,
    grounded: bool,
    ground_normal: Vec3,
    ground_friction: f32,
}

impl ShapeDescriptor {
    /// Create a shape on layer 0, reacting to every layer.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind: kind.sanitized(),
            offset: Vec3::ZERO,
            layer: 0,
            mask: u32::MAX,
            is_trigger: false,
            restitution: 0.3,
            friction: 0.5,
            grounded: false,
            ground_normal: Vec3::Y,
            ground_friction: 0.5,
        }
    }

    /// World-space shape center for an entity at `position`.
    pub fn world_center(&self, position: Vec3) -> Vec3 {
        position + self.offset
    }

    /// Whether this shape reacts to shapes on `layer`. This is the sole
    /// filtering gate consulted before any geometric test.
    pub fn collides_with_group(&self, layer: u8) -> bool {
        1u32.checked_shl(layer as u32)
            .map(|bit| self.mask & bit != 0)
            .unwrap_or(false)
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Set restitution, clamped to [0, 1] with a logged warning.
    pub fn set_restitution(&mut self, restitution: f32) {
        if !(0.0..=1.0).contains(&restitution) {
            warn!(restitution, "restitution clamped to [0, 1]");
        }
        self.restitution = restitution.clamp(0.0, 1.0);
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Set friction, clamped to [0, 1] with a logged warning.
    pub fn set_friction(&mut self, friction: f32) {
        if !(0.0..=1.0).contains(&friction) {
            warn!(friction, "friction clamped to [0, 1]");
        }
        self.friction = friction.clamp(0.0, 1.0);
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    /// Normal of the surface the entity stands on. World-up while airborne.
    pub fn ground_normal(&self) -> Vec3 {
        self.ground_normal
    }

    /// Friction of the surface the entity stands on, populated from the
    /// terrain provider on landing.
    pub fn ground_friction(&self) -> f32 {
        self.ground_friction
    }

    pub fn set_ground_friction(&mut self, friction: f32) {
        self.ground_friction = friction.clamp(0.0, 1.0);
    }

    /// Update grounded state. Returns `true` exactly on the airborne→grounded
    /// transition with a usable normal, which is the landing event.
    pub fn set_grounded(&mut self, grounded: bool, normal: Vec3) -> bool {
        let landed = grounded && !self.grounded && normal.length_squared() > 0.0;
        self.grounded = grounded;
        self.ground_normal = if grounded {
            normal.try_normalize().unwrap_or(Vec3::Y)
        } else {
            Vec3::Y
        };
        landed
    }
}
