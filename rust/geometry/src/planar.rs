// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar (2D) primitives for screen-space tests
//!
//! All tests here work on exact floating point comparisons. Containment uses
//! the crossing-parity rule: a horizontal ray is cast from the query point
//! towards +x and every segment it crosses is counted, odd meaning inside.
//! This holds for self-intersecting outlines as well as simple polygons.

use nalgebra::Point2;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Convex hull of at most 8 projected box corners without spilling to the heap
pub type Hull = SmallVec<[Point2<f64>; 8]>;

/// Turn direction of the path p -> q -> r
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Colinear,
    Clockwise,
    CounterClockwise,
}

/// Classify the turn p -> q -> r by the sign of (q - p) x (r - q)
///
/// Zero is exact equality, not epsilon based; the hull relies on this.
#[inline]
pub fn orientation(p: &Point2<f64>, q: &Point2<f64>, r: &Point2<f64>) -> Orientation {
    let cross = (q.x - p.x) * (r.y - q.y) - (q.y - p.y) * (r.x - q.x);
    if cross == 0.0 {
        Orientation::Colinear
    } else if cross > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

/// A directed 2D segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment2 {
    #[inline]
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    /// True when y decreases from start to end
    #[inline]
    pub fn is_descending(&self) -> bool {
        self.start.y > self.end.y
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    /// Segments that close the polyline `points` (last point joins the first)
    pub fn closed_loop(points: &[Point2<f64>]) -> impl Iterator<Item = Segment2> + '_ {
        let n = points.len();
        (0..n).map(move |i| Segment2::new(points[i], points[(i + 1) % n]))
    }
}

/// Strict counter-clockwise test used by the crossing check
#[inline]
fn is_ccw(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Whether two segments properly cross each other
///
/// Each segment's endpoints must lie on opposite sides of the other's line.
#[inline]
pub fn segments_cross(a: &Segment2, b: &Segment2) -> bool {
    is_ccw(&a.start, &b.start, &b.end) != is_ccw(&a.end, &b.start, &b.end)
        && is_ccw(&a.start, &a.end, &b.start) != is_ccw(&a.start, &a.end, &b.end)
}

/// -1, 0 or 1; unlike `f64::signum`, zero maps to zero
#[inline]
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Whether a ray from `point` towards +x crosses `segment`
///
/// `prev_descending` is the direction of the nearest preceding non-horizontal
/// segment. When the ray passes exactly through the segment's start vertex and
/// the outline keeps heading the same way, the vertex was already counted as
/// the previous segment's end and is skipped here. A change of direction is a
/// tangent touch and both segments count, leaving parity unchanged.
pub fn point_crosses_segment(
    point: &Point2<f64>,
    segment: &Segment2,
    prev_descending: bool,
    this_descending: bool,
) -> bool {
    let (px, py) = (point.x, point.y);
    let (sx, sy) = (segment.start.x, segment.start.y);
    let (ex, ey) = (segment.end.x, segment.end.y);

    if sy == ey {
        return false;
    }
    if py > sy && py > ey {
        return false; // above
    }
    if py < sy && py < ey {
        return false; // below
    }
    if px > sx && px > ex {
        return false; // right
    }

    let crosses = if px < sx && px < ex {
        true // left
    } else {
        // which side of the segment's line the point is on
        let perp_x = ey - sy;
        let perp_y = -(ex - sx);
        let dot = perp_x * (px - sx) + perp_y * (py - sy);
        sign(dot) != sign(perp_x)
    };

    if crosses && py == sy && prev_descending == this_descending {
        return false;
    }
    crosses
}

/// Count how many of `segments` a ray from `point` towards +x crosses
///
/// `segments` must form a closed outline in order.
pub fn point_crosses_polyline(point: &Point2<f64>, segments: &[Segment2]) -> usize {
    let mut prev_descending = match segments.iter().rev().find(|s| !s.is_horizontal()) {
        Some(last) => last.is_descending(),
        None => return 0,
    };

    let mut crossings = 0;
    for segment in segments {
        if segment.is_horizontal() {
            continue;
        }
        let this_descending = segment.is_descending();
        if point_crosses_segment(point, segment, prev_descending, this_descending) {
            crossings += 1;
        }
        prev_descending = this_descending;
    }
    crossings
}

/// Odd crossing parity
#[inline]
pub fn is_inside(point: &Point2<f64>, segments: &[Segment2]) -> bool {
    point_crosses_polyline(point, segments) % 2 == 1
}

#[inline]
fn dist_sq(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a - b).norm_squared()
}

/// Convex hull by a lowest-point anchored angular sweep (Graham scan)
///
/// The anchor is the point with minimal y, ties broken by minimal x, so every
/// other point lies at a polar angle in [0, pi) and the angular comparator is
/// a total order. Colinear runs keep only their farthest point. Returns the
/// hull counter-clockwise from the anchor, or `None` when fewer than three
/// points survive, meaning the input has no 2D extent.
pub fn convex_hull(points: &[Point2<f64>]) -> Option<Hull> {
    let anchor_index = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))?
        .0;

    let mut sorted: Hull = points.iter().copied().collect();
    sorted.swap(0, anchor_index);
    let p0 = sorted[0];

    sorted[1..].sort_by(|a, b| match orientation(&p0, a, b) {
        Orientation::Colinear => dist_sq(&p0, a).total_cmp(&dist_sq(&p0, b)),
        Orientation::CounterClockwise => Ordering::Less,
        Orientation::Clockwise => Ordering::Greater,
    });

    // keep the farthest point of every colinear run
    let n = sorted.len();
    let mut m = 1;
    let mut i = 1;
    while i < n {
        while i < n - 1 && orientation(&p0, &sorted[i], &sorted[i + 1]) == Orientation::Colinear {
            i += 1;
        }
        sorted[m] = sorted[i];
        m += 1;
        i += 1;
    }

    if m < 3 {
        return None;
    }

    let mut hull: Hull = SmallVec::new();
    hull.extend_from_slice(&sorted[..3]);
    for p in &sorted[3..m] {
        while hull.len() > 1
            && orientation(&hull[hull.len() - 2], &hull[hull.len() - 1], p)
                != Orientation::CounterClockwise
        {
            hull.pop();
        }
        hull.push(*p);
    }

    if hull.len() < 3 {
        return None;
    }
    Some(hull)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn outline(points: &[Point2<f64>]) -> Vec<Segment2> {
        Segment2::closed_loop(points).collect()
    }

    #[test]
    fn test_orientation() {
        assert_eq!(orientation(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orientation(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, -1.0)), Orientation::Clockwise);
        assert_eq!(orientation(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 2.0)), Orientation::Colinear);
    }

    #[test]
    fn test_segments_cross() {
        let a = Segment2::new(p(-1.0, -1.0), p(1.0, 1.0));
        let b = Segment2::new(p(-1.0, 1.0), p(1.0, -1.0));
        assert!(segments_cross(&a, &b));

        let c = Segment2::new(p(2.0, 0.0), p(3.0, 5.0));
        assert!(!segments_cross(&a, &c));

        // parallel segments never cross
        let d = Segment2::new(p(-1.0, 0.0), p(1.0, 2.0));
        assert!(!segments_cross(&a, &d));
    }

    #[test]
    fn test_square_containment() {
        let square = outline(&[p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)]);
        assert!(is_inside(&p(0.0, 0.0), &square));
        assert!(is_inside(&p(0.9, -0.5), &square));
        assert!(!is_inside(&p(1.5, 0.0), &square));
        assert!(!is_inside(&p(-1.5, 0.3), &square));
        assert!(!is_inside(&p(0.0, 2.0), &square));
    }

    #[test]
    fn test_ray_through_shared_vertex() {
        // the ray from both points passes exactly through the vertex (1, 0)
        let diamond = outline(&[p(0.0, -1.0), p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0)]);
        assert_eq!(point_crosses_polyline(&p(-0.5, 0.0), &diamond), 1);
        assert_eq!(point_crosses_polyline(&p(0.0, 0.0), &diamond), 1);
        assert!(!is_inside(&p(-2.0, 0.0), &diamond));
    }

    #[test]
    fn test_ray_touching_extremum() {
        // (1, 1) is a local maximum; a ray along y = 1 only grazes it
        let tent = outline(&[p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0), p(2.0, -1.0), p(0.0, -1.0)]);
        assert_eq!(point_crosses_polyline(&p(-1.0, 1.0), &tent) % 2, 0);
        assert!(is_inside(&p(1.0, 0.5), &tent));
    }

    #[test]
    fn test_self_intersecting_parity() {
        // pentagram: the tips are wound once, the centre pentagon twice
        let star: Vec<_> = [0usize, 2, 4, 1, 3]
            .iter()
            .map(|&k| {
                let angle = std::f64::consts::FRAC_PI_2 + k as f64 * 2.0 * std::f64::consts::PI / 5.0;
                p(angle.cos(), angle.sin())
            })
            .collect();
        let segments = outline(&star);
        assert!(is_inside(&p(0.0, 0.8), &segments));
        assert!(!is_inside(&p(0.0, 0.0), &segments));
        assert!(!is_inside(&p(0.0, 1.5), &segments));
    }

    #[test]
    fn test_repeated_windings() {
        let square = [p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)];
        let twice: Vec<_> = square.iter().chain(square.iter()).copied().collect();
        let thrice: Vec<_> = twice.iter().chain(square.iter()).copied().collect();
        assert_eq!(point_crosses_polyline(&p(0.0, 0.0), &outline(&twice)), 2);
        assert!(!is_inside(&p(0.0, 0.0), &outline(&twice)));
        assert!(is_inside(&p(0.0, 0.0), &outline(&thrice)));
    }

    #[test]
    fn test_degenerate_outlines() {
        assert_eq!(point_crosses_polyline(&p(0.0, 0.0), &[]), 0);
        let single = outline(&[p(1.0, 1.0)]);
        assert_eq!(point_crosses_polyline(&p(0.0, 1.0), &single), 0);
    }

    #[test]
    fn test_hull_of_flat_box_corners() {
        // 8 box corners seen head-on collapse onto 4 distinct points
        let mut corners = Vec::new();
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for _z in 0..2 {
                    corners.push(p(x, y));
                }
            }
        }
        let hull = convex_hull(&corners).unwrap();
        assert_eq!(
            hull.as_slice(),
            &[p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)]
        );
    }

    #[test]
    fn test_hull_drops_interior_and_colinear_points() {
        let points = [
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 2.0),
            p(1.0, 1.0),
            p(0.0, 2.0),
            p(0.0, 1.0),
        ];
        let hull = convex_hull(&points).unwrap();
        assert_eq!(hull.as_slice(), &[p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)]);
        for w in 0..hull.len() {
            let next = (w + 1) % hull.len();
            let after = (w + 2) % hull.len();
            assert_eq!(orientation(&hull[w], &hull[next], &hull[after]), Orientation::CounterClockwise);
        }
    }

    #[test]
    fn test_hull_degenerate() {
        assert!(convex_hull(&[]).is_none());
        assert!(convex_hull(&[p(0.0, 0.0), p(1.0, 1.0)]).is_none());
        assert!(convex_hull(&[p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0)]).is_none());
        assert!(convex_hull(&[p(1.0, 1.0); 8]).is_none());
    }
}
