use avian2d::prelude::*;
use bevy::prelude::*;

/// Below this the hook centre is taken to sit on the surface, where the
/// closest-point direction says nothing about which side is outside
const MIN_NORMAL_OFFSET_SQ: f32 = 1e-8;

/// A collider together with its world pose
#[derive(Clone, Copy)]
pub struct PlacedCollider<'a> {
    pub collider: &'a Collider,
    pub position: Position,
    pub rotation: Rotation,
}

impl<'a> PlacedCollider<'a> {
    pub fn new(collider: &'a Collider, position: &Position, rotation: &Rotation) -> Self {
        Self {
            collider,
            position: *position,
            rotation: *rotation,
        }
    }
}

/// Result of measuring the gap between the hook and a surface
#[derive(Debug, Clone, Copy)]
pub struct Separation {
    /// Point on the surface boundary closest to the hook
    pub surface_point: Vec2,
    /// Unit direction pointing from the surface out toward the hook, zero when
    /// the hook centre lies on the surface boundary
    pub normal: Vec2,
    /// Gap between the two colliders, 0.0 when touching or overlapping
    pub distance: f32,
}

/// Measures how far the hook collider sits from a surface collider.
///
/// The surface is queried with the hook's centre, then the hook is queried with
/// the resulting surface point, which gives the closest-feature gap for the
/// convex shapes a hook is built from.
pub fn measure_separation(hook: PlacedCollider, surface: PlacedCollider) -> Separation {
    let hook_center = hook.position.0;

    let (surface_point, center_inside_surface) =
        surface
            .collider
            .project_point(surface.position, surface.rotation, hook_center, false);

    let (hook_point, surface_point_inside_hook) =
        hook.collider
            .project_point(hook.position, hook.rotation, surface_point, true);

    let distance = if center_inside_surface || surface_point_inside_hook {
        0.0
    } else {
        hook_point.distance(surface_point)
    };

    let offset = hook_center - surface_point;
    let normal = if offset.length_squared() < MIN_NORMAL_OFFSET_SQ {
        Vec2::ZERO
    } else if center_inside_surface {
        // Penetrating: outward is from the centre toward the boundary
        -offset.normalize()
    } else {
        offset.normalize()
    };

    Separation {
        surface_point,
        normal,
        distance,
    }
}

/// Where a flying hook struck a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Point on the surface boundary the hook came in through
    pub point: Vec2,
    /// Outward surface normal at `point`
    pub normal: Vec2,
}

/// Finds where a hook struck a surface.
///
/// With the hook centre's position from before the physics step, its path is
/// traced into the surface, so a fast hook that sank past the middle of a thin
/// platform still lands on the face it entered through. The trace runs
/// `radius` past the current centre to catch hits made with the hook's rim.
/// Without a path, or when the trace misses, the current centre is projected
/// onto the surface instead.
pub fn locate_impact(
    previous: Option<Vec2>,
    current: Vec2,
    radius: f32,
    surface: PlacedCollider,
) -> Impact {
    let traced = previous.and_then(|previous| {
        let travel = current - previous;
        let direction = travel.try_normalize()?;
        let (toi, normal) = surface.collider.cast_ray(
            surface.position,
            surface.rotation,
            previous,
            direction,
            travel.length() + radius,
            true,
        )?;

        // A zero time of impact means the trace started inside the surface
        (toi > 0.0).then(|| Impact {
            point: previous + direction * toi,
            normal: if normal.dot(direction) > 0.0 {
                -normal
            } else {
                normal
            }
            .normalize_or_zero(),
        })
    });

    if let Some(impact) = traced {
        return impact;
    }

    let (point, inside) =
        surface
            .collider
            .project_point(surface.position, surface.rotation, current, false);
    let outward = if inside { point - current } else { current - point };

    Impact {
        point,
        normal: outward.normalize_or_zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(collider: &Collider, at: Vec2) -> PlacedCollider<'_> {
        PlacedCollider {
            collider,
            position: Position(at),
            rotation: Rotation::default(),
        }
    }

    #[test]
    fn gap_above_a_floor() {
        let floor = Collider::rectangle(10.0, 1.0);
        let hook = Collider::circle(0.25);

        let sep = measure_separation(
            placed(&hook, Vec2::new(1.0, 2.0)),
            placed(&floor, Vec2::ZERO),
        );

        assert!((sep.surface_point - Vec2::new(1.0, 0.5)).length() < 1e-4);
        assert!((sep.normal - Vec2::Y).length() < 1e-4);
        assert!((sep.distance - 1.25).abs() < 1e-4);
    }

    #[test]
    fn touching_hook_has_no_gap() {
        let floor = Collider::rectangle(10.0, 1.0);
        let hook = Collider::circle(0.25);

        let sep = measure_separation(
            placed(&hook, Vec2::new(0.0, 0.7)),
            placed(&floor, Vec2::ZERO),
        );

        assert_eq!(sep.distance, 0.0);
        assert!(sep.normal.y > 0.99);
    }

    #[test]
    fn centre_on_the_boundary_has_no_normal() {
        let wall = Collider::rectangle(1.0, 8.0);
        let hook = Collider::circle(0.15);

        let sep = measure_separation(
            placed(&hook, Vec2::new(8.5, 0.3)),
            placed(&wall, Vec2::new(9.0, 0.0)),
        );

        assert_eq!(sep.distance, 0.0);
        assert_eq!(sep.normal, Vec2::ZERO);
    }

    #[test]
    fn impact_without_a_path_projects_the_centre() {
        let wall = Collider::rectangle(1.0, 8.0);

        let impact = locate_impact(
            None,
            Vec2::new(8.3, 0.3),
            0.15,
            placed(&wall, Vec2::new(9.0, 0.0)),
        );

        assert!((impact.point - Vec2::new(8.5, 0.3)).length() < 1e-4);
        assert!((impact.normal - Vec2::NEG_X).length() < 1e-4);
    }

    #[test]
    fn fast_hook_lands_on_the_face_it_entered() {
        let platform = Collider::rectangle(4.0, 0.2);

        // Centre ends up nearer the underside than the top
        let impact = locate_impact(
            Some(Vec2::new(0.5, 1.0)),
            Vec2::new(0.5, -0.05),
            0.15,
            placed(&platform, Vec2::ZERO),
        );

        assert!((impact.point - Vec2::new(0.5, 0.1)).length() < 1e-4);
        assert!((impact.normal - Vec2::Y).length() < 1e-4);
    }

    #[test]
    fn rim_hit_reaches_past_the_centre() {
        let wall = Collider::rectangle(1.0, 8.0);

        // Centre stops 0.1 short of the wall face at x = 8.5
        let impact = locate_impact(
            Some(Vec2::new(7.4, 0.0)),
            Vec2::new(8.4, 0.0),
            0.15,
            placed(&wall, Vec2::new(9.0, 0.0)),
        );

        assert!((impact.point - Vec2::new(8.5, 0.0)).length() < 1e-4);
        assert!((impact.normal - Vec2::NEG_X).length() < 1e-4);
    }
}
