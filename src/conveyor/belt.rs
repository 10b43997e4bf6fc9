use bevy::prelude::*;

/// Segments shorter than this are ignored by the belt query
const MIN_SEGMENT_LENGTH_SQ: f32 = 1e-8;

/// Default coverage radius around the belt path
pub const DEFAULT_CONTACT_MARGIN: f32 = 0.05;

/// A surface that carries attached hooks along a path.
///
/// The path lives in the belt entity's local space and is travelled from the
/// first point to the last for a positive `speed`. Open belts have an end stop
/// at the downstream end; closed belts loop forever.
#[derive(Component, Clone, Debug)]
pub struct ConveyorBelt {
    /// Path points in local space
    pub path: Vec<Vec2>,
    /// Surface speed in m/s, negative runs the belt backwards along `path`
    pub speed: f32,
    /// Whether the last point joins back to the first
    pub closed: bool,
    /// Coverage radius around the path that always counts as "on the belt"
    pub contact_margin: f32,
}

/// Nearest point on one belt segment
#[derive(Debug, Clone, Copy)]
struct SegmentHit {
    index: usize,
    start: Vec2,
    end: Vec2,
    /// Projection parameter along the segment, not clamped
    along: f32,
    distance_sq: f32,
}

impl ConveyorBelt {
    pub fn new(path: impl Into<Vec<Vec2>>, speed: f32) -> Self {
        Self {
            path: path.into(),
            speed,
            closed: false,
            contact_margin: DEFAULT_CONTACT_MARGIN,
        }
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn with_contact_margin(mut self, margin: f32) -> Self {
        self.contact_margin = margin.max(0.0);
        self
    }

    pub fn segment_count(&self) -> usize {
        match self.path.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Surface velocity at `point`, or zero when the point is off the belt or
    /// has run into the end stop.
    ///
    /// `cursor` caches the segment found last time: its neighbourhood is
    /// searched first, and the whole belt only when that misses. The cursor is
    /// updated to the segment used, or cleared when nothing is in reach.
    /// `tolerance_sq` widens the coverage radius on top of `contact_margin`.
    pub fn effective_direction(
        &self,
        belt_transform: &GlobalTransform,
        point: Vec2,
        cursor: &mut Option<usize>,
        tolerance_sq: f32,
    ) -> Vec2 {
        let count = self.segment_count();
        if count == 0 || self.speed == 0.0 {
            *cursor = None;
            return Vec2::ZERO;
        }

        let reach_sq = tolerance_sq.max(0.0) + self.contact_margin * self.contact_margin;

        let cached = cursor
            .filter(|&index| index < count)
            .and_then(|index| {
                self.nearest_segment(belt_transform, point, self.neighbourhood(index), reach_sq)
            });

        let Some(hit) =
            cached.or_else(|| self.nearest_segment(belt_transform, point, 0..count, reach_sq))
        else {
            *cursor = None;
            return Vec2::ZERO;
        };

        if self.past_end_stop(&hit, count) {
            *cursor = None;
            return Vec2::ZERO;
        }

        *cursor = Some(hit.index);
        (hit.end - hit.start).normalize_or_zero() * self.speed
    }

    /// The cached segment and the ones either side of it
    fn neighbourhood(&self, index: usize) -> impl Iterator<Item = usize> + use<> {
        let count = self.segment_count();
        let closed = self.closed;
        [-1_isize, 0, 1].into_iter().filter_map(move |offset| {
            let i = index as isize + offset;
            if closed {
                Some(i.rem_euclid(count as isize) as usize)
            } else {
                (0..count as isize).contains(&i).then_some(i as usize)
            }
        })
    }

    fn world_segment(&self, belt_transform: &GlobalTransform, index: usize) -> (Vec2, Vec2) {
        let a = self.path[index];
        let b = self.path[(index + 1) % self.path.len()];
        (
            belt_transform.transform_point(a.extend(0.0)).truncate(),
            belt_transform.transform_point(b.extend(0.0)).truncate(),
        )
    }

    fn nearest_segment(
        &self,
        belt_transform: &GlobalTransform,
        point: Vec2,
        indices: impl IntoIterator<Item = usize>,
        reach_sq: f32,
    ) -> Option<SegmentHit> {
        indices
            .into_iter()
            .filter_map(|index| {
                let (start, end) = self.world_segment(belt_transform, index);
                let span = end - start;
                let length_sq = span.length_squared();
                if length_sq < MIN_SEGMENT_LENGTH_SQ {
                    return None;
                }

                let along = (point - start).dot(span) / length_sq;
                let closest = start + span * along.clamp(0.0, 1.0);
                let distance_sq = closest.distance_squared(point);

                (distance_sq <= reach_sq).then_some(SegmentHit {
                    index,
                    start,
                    end,
                    along,
                    distance_sq,
                })
            })
            .min_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq))
    }

    fn past_end_stop(&self, hit: &SegmentHit, count: usize) -> bool {
        if self.closed {
            return false;
        }
        if self.speed > 0.0 {
            hit.index == count - 1 && hit.along >= 1.0
        } else {
            hit.index == 0 && hit.along <= 0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Belt query with the belt at the world origin
    fn at_origin(
        belt: &ConveyorBelt,
        point: Vec2,
        cursor: &mut Option<usize>,
        tolerance_sq: f32,
    ) -> Vec2 {
        belt.effective_direction(&GlobalTransform::IDENTITY, point, cursor, tolerance_sq)
    }

    fn straight_belt(speed: f32) -> ConveyorBelt {
        ConveyorBelt::new(
            vec![Vec2::new(-5.0, 0.0), Vec2::ZERO, Vec2::new(5.0, 0.0)],
            speed,
        )
    }

    #[test]
    fn carries_along_the_path() {
        let belt = straight_belt(2.0);
        let mut cursor = None;

        let dir = at_origin(&belt, Vec2::new(2.0, 0.02), &mut cursor, 0.0);

        assert_eq!(dir, Vec2::new(2.0, 0.0));
        assert_eq!(cursor, Some(1));
    }

    #[test]
    fn negative_speed_runs_backwards() {
        let belt = straight_belt(-3.0);
        let mut cursor = None;

        let dir = at_origin(&belt, Vec2::new(-2.0, 0.0), &mut cursor, 0.0);

        assert_eq!(dir, Vec2::new(-3.0, 0.0));
        assert_eq!(cursor, Some(0));
    }

    #[test]
    fn end_stop_halts_open_belt() {
        let belt = straight_belt(2.0);
        let mut cursor = Some(1);

        let dir = at_origin(&belt, Vec2::new(5.2, 0.0), &mut cursor, 0.1);

        assert_eq!(dir, Vec2::ZERO);
        assert_eq!(cursor, None);
    }

    #[test]
    fn end_stop_for_reversed_belt_is_the_first_point() {
        let belt = straight_belt(-2.0);
        let mut cursor = None;

        let upstream = at_origin(&belt, Vec2::new(5.1, 0.0), &mut cursor, 0.1);
        let downstream = at_origin(&belt, Vec2::new(-5.1, 0.0), &mut cursor, 0.1);

        assert_eq!(upstream, Vec2::new(-2.0, 0.0));
        assert_eq!(downstream, Vec2::ZERO);
    }

    #[test]
    fn out_of_reach_clears_cursor() {
        let belt = straight_belt(2.0);
        let mut cursor = Some(0);

        let dir = at_origin(&belt, Vec2::new(0.0, 3.0), &mut cursor, 0.5);

        assert_eq!(dir, Vec2::ZERO);
        assert_eq!(cursor, None);
    }

    #[test]
    fn tolerance_widens_reach() {
        let belt = straight_belt(2.0);
        let mut cursor = None;
        let point = Vec2::new(1.0, 0.5);

        assert_eq!(at_origin(&belt, point, &mut cursor, 0.0), Vec2::ZERO);
        // 2 * d^2 with d = 0.5
        let dir = at_origin(&belt, point, &mut cursor, 0.5);
        assert_eq!(dir, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn stale_cursor_falls_back_to_full_search() {
        let belt = straight_belt(2.0);
        let mut cursor = Some(40);

        let dir = at_origin(&belt, Vec2::new(-3.0, 0.0), &mut cursor, 0.0);

        assert_eq!(dir, Vec2::new(2.0, 0.0));
        assert_eq!(cursor, Some(0));
    }

    #[test]
    fn closed_loop_wraps_around_the_corner() {
        let belt = ConveyorBelt::new(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(4.0, 0.0),
                Vec2::new(4.0, 4.0),
                Vec2::new(0.0, 4.0),
            ],
            1.0,
        )
        .closed();
        let mut cursor = Some(3);

        // Last segment runs from (0, 4) back down to the origin
        let dir = at_origin(&belt, Vec2::new(0.0, 1.0), &mut cursor, 0.0);

        assert_eq!(dir, Vec2::new(0.0, -1.0));
        assert_eq!(cursor, Some(3));
    }

    #[test]
    fn follows_the_belt_transform() {
        let belt = straight_belt(2.0);
        let transform = GlobalTransform::from(
            Transform::from_xyz(10.0, 0.0, 0.0)
                .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
        );
        let mut cursor = None;

        let dir = belt.effective_direction(&transform, Vec2::new(10.0, 2.0), &mut cursor, 0.0);

        assert!((dir - Vec2::new(0.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn degenerate_belts_have_no_coverage() {
        let mut cursor = Some(0);
        let single = ConveyorBelt::new(vec![Vec2::ZERO], 1.0);
        assert_eq!(at_origin(&single, Vec2::ZERO, &mut cursor, 1.0), Vec2::ZERO);
        assert_eq!(cursor, None);

        let stopped = straight_belt(0.0);
        assert_eq!(at_origin(&stopped, Vec2::ZERO, &mut cursor, 1.0), Vec2::ZERO);
    }
}
