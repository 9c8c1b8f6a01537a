//! Narrow-phase collision detection: pairwise shape overlap tests.
//!
//! Every test is stateless and independent: inputs are world-space shape
//! centers (the owning entity's position plus the shape's local offset) and
//! dimensions, the output is an `Option<Contact>`. `None` means no collision.
//! Normals point from the second shape toward the first.

use glam::Vec3;

use crate::ecs::components::shape::{ShapeDescriptor, ShapeKind};

use super::contact::Contact;

/// Centers closer than this are treated as coincident and get the world-up
/// fallback normal.
const SAME_CENTER_EPS: f32 = 1e-4;

/// Sphere-sphere overlap. Collision iff the center distance is strictly less
/// than the radius sum.
pub fn sphere_sphere(
    center_a: Vec3,
    radius_a: f32,
    center_b: Vec3,
    radius_b: f32,
) -> Option<Contact> {
    let delta = center_a - center_b;
    let dist = delta.length();
    let radius_sum = radius_a + radius_b;

    if dist >= radius_sum {
        return None;
    }

    let normal = if dist > SAME_CENTER_EPS {
        delta / dist
    } else {
        Vec3::Y
    };

    Some(Contact::new(
        center_b + normal * radius_b,
        normal,
        radius_sum - dist,
    ))
}

/// Sphere-box overlap, sphere first. The closest point on the box is the
/// sphere center clamped to the box bounds; when the center is inside the
/// box, the normal is the outward direction of the nearest face.
pub fn sphere_box(
    sphere_center: Vec3,
    radius: f32,
    box_center: Vec3,
    half_extents: Vec3,
) -> Option<Contact> {
    let box_min = box_center - half_extents;
    let box_max = box_center + half_extents;
    let closest = sphere_center.clamp(box_min, box_max);

    let delta = sphere_center - closest;
    let dist = delta.length();

    if dist >= radius {
        return None;
    }

    let normal = if dist > SAME_CENTER_EPS {
        delta / dist
    } else {
        // Center inside the box: pick the face the center is nearest to.
        nearest_face_normal(sphere_center, box_min, box_max)
    };

    Some(Contact::new(closest, normal, radius - dist))
}

/// Outward normal of the box face closest to an interior point. Ties break
/// X before Y before Z.
fn nearest_face_normal(point: Vec3, box_min: Vec3, box_max: Vec3) -> Vec3 {
    let face_dists = [
        (point.x - box_min.x, -Vec3::X),
        (box_max.x - point.x, Vec3::X),
        (point.y - box_min.y, -Vec3::Y),
        (box_max.y - point.y, Vec3::Y),
        (point.z - box_min.z, -Vec3::Z),
        (box_max.z - point.z, Vec3::Z),
    ];

    let mut best = face_dists[0];
    for candidate in &face_dists[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }
    best.1
}

/// Box-box overlap via per-axis extents. The separating axis is the one with
/// minimum overlap; equal overlaps break X before Y before Z.
pub fn box_box(center_a: Vec3, half_a: Vec3, center_b: Vec3, half_b: Vec3) -> Option<Contact> {
    let min_a = center_a - half_a;
    let max_a = center_a + half_a;
    let min_b = center_b - half_b;
    let max_b = center_b + half_b;

    let overlap_lo = min_a.max(min_b);
    let overlap_hi = max_a.min(max_b);
    let overlap = overlap_hi - overlap_lo;

    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }

    // Minimum-overlap axis; strict comparison keeps the earlier axis on ties.
    let overlaps = [overlap.x, overlap.y, overlap.z];
    let axes = [Vec3::X, Vec3::Y, Vec3::Z];
    let mut axis_index = 0;
    for i in 1..3 {
        if overlaps[i] < overlaps[axis_index] {
            axis_index = i;
        }
    }

    // Normal sign points from box B toward box A along the chosen axis.
    let delta = center_a - center_b;
    let sign = if delta[axis_index] >= 0.0 { 1.0 } else { -1.0 };
    let normal = axes[axis_index] * sign;

    Some(Contact::new(
        (overlap_lo + overlap_hi) * 0.5,
        normal,
        overlaps[axis_index],
    ))
}

/// Detect collision between two shape descriptors, dispatching on the shape
/// kinds. Shape offsets are applied before any geometric test.
///
/// Pairs with no specialized test (anything involving a capsule) fall back to
/// a symmetric sphere test with `fallback_radius` on both sides: degraded
/// detection is safer than a crash.
pub fn detect_collision(
    shape_a: &ShapeDescriptor,
    position_a: Vec3,
    shape_b: &ShapeDescriptor,
    position_b: Vec3,
    fallback_radius: f32,
) -> Option<Contact> {
    let center_a = shape_a.world_center(position_a);
    let center_b = shape_b.world_center(position_b);

    match (shape_a.kind, shape_b.kind) {
        (ShapeKind::Sphere { radius: ra }, ShapeKind::Sphere { radius: rb }) => {
            sphere_sphere(center_a, ra, center_b, rb)
        }
        (ShapeKind::Sphere { radius }, ShapeKind::Box { half_extents }) => {
            sphere_box(center_a, radius, center_b, half_extents)
        }
        (ShapeKind::Box { half_extents }, ShapeKind::Sphere { radius }) => {
            // Swap operands, then flip the normal back to the B-toward-A
            // convention.
            sphere_box(center_b, radius, center_a, half_extents).map(|mut contact| {
                contact.normal = -contact.normal;
                contact
            })
        }
        (ShapeKind::Box { half_extents: ha }, ShapeKind::Box { half_extents: hb }) => {
            box_box(center_a, ha, center_b, hb)
        }
        (ShapeKind::Capsule { .. }, _) | (_, ShapeKind::Capsule { .. }) => {
            sphere_sphere(center_a, fallback_radius, center_b, fallback_radius)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_sphere_sphere_collided_iff_within_radius_sum() {
        let cases = [
            (Vec3::new(1.5, 0.0, 0.0), true),
            (Vec3::new(1.999, 0.0, 0.0), true),
            (Vec3::new(2.0, 0.0, 0.0), false),
            (Vec3::new(3.0, 0.0, 0.0), false),
            (Vec3::new(0.0, 1.2, 1.2), true),
        ];
        for (center_b, expected) in cases {
            let result = sphere_sphere(Vec3::ZERO, 1.0, center_b, 1.0);
            let dist = center_b.length();
            assert_eq!(
                result.is_some(),
                expected,
                "center_b = {center_b}, dist = {dist}"
            );
            assert_eq!(result.is_some(), dist < 2.0);
        }
    }

    #[test]
    fn test_sphere_sphere_normal_points_toward_first() {
        let contact = sphere_sphere(Vec3::new(1.5, 0.0, 0.0), 1.0, Vec3::ZERO, 1.0).unwrap();
        assert!((contact.normal - Vec3::X).length() < EPS);
        assert!((contact.penetration - 0.5).abs() < EPS);
        // Contact point sits on the second sphere's surface
        assert!((contact.point - Vec3::new(1.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_sphere_sphere_coincident_centers_world_up() {
        let contact = sphere_sphere(Vec3::ZERO, 1.0, Vec3::new(5e-5, 0.0, 0.0), 1.0).unwrap();
        assert_eq!(contact.normal, Vec3::Y);
        assert!(contact.penetration > 0.0);
    }

    #[test]
    fn test_sphere_box_outside() {
        // Sphere left of a unit box, overlapping its -X face
        let contact = sphere_box(
            Vec3::new(-1.4, 0.0, 0.0),
            0.5,
            Vec3::ZERO,
            Vec3::splat(1.0),
        )
        .unwrap();
        assert!((contact.normal - (-Vec3::X)).length() < EPS);
        assert!((contact.penetration - 0.1).abs() < EPS);
        assert!((contact.point - Vec3::new(-1.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_sphere_box_no_collision() {
        assert!(sphere_box(
            Vec3::new(-2.0, 0.0, 0.0),
            0.5,
            Vec3::ZERO,
            Vec3::splat(1.0)
        )
        .is_none());
    }

    #[test]
    fn test_sphere_box_center_inside_picks_nearest_face() {
        // Center inside, nearest to the +X face
        let contact = sphere_box(
            Vec3::new(0.8, 0.1, -0.2),
            0.5,
            Vec3::ZERO,
            Vec3::splat(1.0),
        )
        .unwrap();
        assert_eq!(contact.normal, Vec3::X);
        // Penetration degrades to the full radius in the interior case
        assert!((contact.penetration - 0.5).abs() < EPS);
    }

    #[test]
    fn test_sphere_box_penetration_never_negative() {
        for x in [-1.6, -1.5, -1.2, -0.5, 0.0, 0.4, 1.1, 1.45] {
            if let Some(contact) =
                sphere_box(Vec3::new(x, 0.0, 0.0), 0.5, Vec3::ZERO, Vec3::splat(1.0))
            {
                assert!(
                    contact.penetration >= 0.0,
                    "penetration {} at x = {x}",
                    contact.penetration
                );
            }
        }
    }

    #[test]
    fn test_box_box_overlap_and_separation() {
        let half = Vec3::splat(1.0);
        assert!(box_box(Vec3::ZERO, half, Vec3::new(1.5, 0.0, 0.0), half).is_some());
        assert!(box_box(Vec3::ZERO, half, Vec3::new(2.0, 0.0, 0.0), half).is_none());
        assert!(box_box(Vec3::ZERO, half, Vec3::new(1.5, 1.5, 1.9), half).is_some());
    }

    #[test]
    fn test_box_box_minimum_overlap_axis() {
        // Overlaps (2, 2, 1): the Z axis must be chosen
        let contact = box_box(
            Vec3::ZERO,
            Vec3::new(2.0, 2.0, 2.0),
            Vec3::new(2.0, 2.0, 3.0),
            Vec3::new(2.0, 2.0, 2.0),
        )
        .unwrap();
        assert_eq!(contact.normal.abs(), Vec3::Z);
        assert!((contact.penetration - 1.0).abs() < EPS);
    }

    #[test]
    fn test_box_box_equal_overlaps_tie_break_x() {
        // Overlaps (2, 2, 2) on every axis: X wins the tie
        let contact = box_box(
            Vec3::ZERO,
            Vec3::splat(2.0),
            Vec3::splat(2.0),
            Vec3::splat(2.0),
        )
        .unwrap();
        assert_eq!(contact.normal.abs(), Vec3::X);
        assert!((contact.penetration - 2.0).abs() < EPS);
    }

    #[test]
    fn test_box_box_normal_points_toward_first() {
        let half = Vec3::splat(1.0);
        // Box A to the left of box B: normal points -X (toward A)
        let contact = box_box(Vec3::new(-1.5, 0.0, 0.0), half, Vec3::ZERO, half).unwrap();
        assert_eq!(contact.normal, -Vec3::X);
        // And +X when A is on the right
        let contact = box_box(Vec3::new(1.5, 0.0, 0.0), half, Vec3::ZERO, half).unwrap();
        assert_eq!(contact.normal, Vec3::X);
    }

    #[test]
    fn test_box_box_contact_point_is_overlap_midpoint() {
        let half = Vec3::splat(1.0);
        let contact = box_box(Vec3::new(1.5, 0.0, 0.0), half, Vec3::ZERO, half).unwrap();
        // Overlap region x in [0.5, 1.0], y and z in [-1, 1]
        assert!((contact.point - Vec3::new(0.75, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_box_box_penetration_never_negative() {
        let half = Vec3::splat(1.0);
        for x in [0.0, 0.5, 1.0, 1.5, 1.99] {
            if let Some(contact) = box_box(Vec3::new(x, 0.0, 0.0), half, Vec3::ZERO, half) {
                assert!(contact.penetration >= 0.0);
            }
        }
    }

    #[test]
    fn test_dispatch_box_sphere_negates_normal() {
        let sphere = ShapeDescriptor::new(ShapeKind::Sphere { radius: 0.5 });
        let boxy = ShapeDescriptor::new(ShapeKind::Box {
            half_extents: Vec3::splat(1.0),
        });
        let sphere_pos = Vec3::new(-1.4, 0.0, 0.0);

        let sphere_first =
            detect_collision(&sphere, sphere_pos, &boxy, Vec3::ZERO, 0.5).unwrap();
        let box_first = detect_collision(&boxy, Vec3::ZERO, &sphere, sphere_pos, 0.5).unwrap();

        assert!((sphere_first.normal + box_first.normal).length() < EPS);
        assert!((sphere_first.penetration - box_first.penetration).abs() < EPS);
    }

    #[test]
    fn test_dispatch_applies_shape_offset() {
        let mut sphere = ShapeDescriptor::new(ShapeKind::Sphere { radius: 0.5 });
        sphere.offset = Vec3::new(0.0, 1.0, 0.0);
        let other = ShapeDescriptor::new(ShapeKind::Sphere { radius: 0.5 });

        // Entity origins 2 apart vertically, but the offset closes the gap
        let contact = detect_collision(
            &sphere,
            Vec3::ZERO,
            &other,
            Vec3::new(0.0, 1.5, 0.0),
            0.5,
        );
        assert!(contact.is_some());
        // Without the offset the same entities are out of range
        let bare = ShapeDescriptor::new(ShapeKind::Sphere { radius: 0.5 });
        assert!(detect_collision(&bare, Vec3::ZERO, &other, Vec3::new(0.0, 1.5, 0.0), 0.5)
            .is_none());
    }

    #[test]
    fn test_capsule_pairs_use_fallback_radius() {
        let capsule = ShapeDescriptor::new(ShapeKind::Capsule {
            radius: 0.3,
            half_height: 0.8,
        });
        let sphere = ShapeDescriptor::new(ShapeKind::Sphere { radius: 10.0 });

        // Fallback treats both sides as spheres of the fallback radius, so
        // the sphere's large radius does not participate.
        assert!(detect_collision(&capsule, Vec3::ZERO, &sphere, Vec3::new(0.9, 0.0, 0.0), 0.5)
            .is_some());
        assert!(detect_collision(&capsule, Vec3::ZERO, &sphere, Vec3::new(1.1, 0.0, 0.0), 0.5)
            .is_none());
    }

    #[test]
    fn test_leading_edge_scenario() {
        // Sphere radius 1 approaching a unit-half-extent box centered at
        // (4, 0, 0): contact begins once the sphere's leading edge passes
        // x = 3, i.e. its center passes x = 2.
        let sphere = ShapeDescriptor::new(ShapeKind::Sphere { radius: 1.0 });
        let boxy = ShapeDescriptor::new(ShapeKind::Box {
            half_extents: Vec3::splat(1.0),
        });
        let box_pos = Vec3::new(4.0, 0.0, 0.0);

        assert!(detect_collision(&sphere, Vec3::new(1.9, 0.0, 0.0), &boxy, box_pos, 0.5)
            .is_none());
        let contact =
            detect_collision(&sphere, Vec3::new(2.05, 0.0, 0.0), &boxy, box_pos, 0.5).unwrap();
        assert!(
            (contact.normal - Vec3::new(-1.0, 0.0, 0.0)).length() < EPS,
            "normal = {}",
            contact.normal
        );
    }
}
