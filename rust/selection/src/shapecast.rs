// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Region shapecast
//!
//! Culls BVH nodes against the projected selection outline. Each depth keeps
//! its own list of outline segments that can still matter, filtered from the
//! parent depth's list, so deeper nodes test fewer segments.

use crate::classifier::TriangleClassifier;
use crate::projector::ScreenProjector;
use meshsel_geometry::{
    convex_hull, is_inside, point_crosses_polyline, segments_cross, Aabb, NodeIntersection,
    Segment2, ShapecastVisitor, Triangle,
};
use nalgebra::Point2;
use smallvec::SmallVec;

/// Outline segments per BVH depth, reused across traversals
#[derive(Debug, Clone, Default)]
pub struct SegmentCache {
    levels: Vec<Vec<Segment2>>,
}

impl SegmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every level, keeping allocations
    pub fn clear(&mut self) {
        for level in &mut self.levels {
            level.clear();
        }
    }

    /// Segments stored for `depth`, empty if never written
    pub fn level(&self, depth: usize) -> &[Segment2] {
        self.levels.get(depth).map_or(&[], Vec::as_slice)
    }

    /// Number of depths that have been written at least once
    #[inline]
    pub fn depth_count(&self) -> usize {
        self.levels.len()
    }

    /// Overwrite `depth` with the segments of its parent that pass `keep`
    ///
    /// The parent of depth 0 is the full outline.
    pub fn refill<F>(&mut self, depth: usize, outline: &[Segment2], keep: F) -> &[Segment2]
    where
        F: Fn(&Segment2) -> bool,
    {
        while self.levels.len() <= depth {
            self.levels.push(Vec::new());
        }

        let (head, tail) = self.levels.split_at_mut(depth);
        let parent = match head.last() {
            Some(parent) => parent.as_slice(),
            None => outline,
        };
        let level = &mut tail[0];
        level.clear();
        level.extend(parent.iter().filter(|&s| keep(s)).copied());
        level
    }
}

/// Relation of a projected node to the outline
///
/// `candidates` are the outline segments that overlap the node's projected
/// extent; they are a subset of a closed outline, so ray parity against them
/// matches parity against the whole outline for points inside that extent.
pub fn classify_node(corners: &[Point2<f64>; 8], candidates: &[Segment2]) -> NodeIntersection {
    let Some(first) = candidates.first() else {
        return NodeIntersection::NotIntersected;
    };

    // a node seen edge-on has no area; let its children decide
    let Some(hull) = convex_hull(corners) else {
        return NodeIntersection::Intersected;
    };
    let hull_edges: SmallVec<[Segment2; 8]> = Segment2::closed_loop(&hull).collect();

    // the outline starts inside the node
    if is_inside(&first.start, &hull_edges) {
        return NodeIntersection::Intersected;
    }

    let mut parity = None;
    for vertex in &hull {
        let inside = point_crosses_polyline(vertex, candidates) % 2 == 1;
        match parity {
            None => parity = Some(inside),
            Some(previous) if previous != inside => return NodeIntersection::Intersected,
            Some(_) => {}
        }
    }

    let crossing = hull_edges
        .iter()
        .any(|edge| candidates.iter().any(|segment| segments_cross(edge, segment)));
    if crossing {
        return NodeIntersection::Intersected;
    }

    if parity == Some(true) {
        NodeIntersection::Contained
    } else {
        NodeIntersection::NotIntersected
    }
}

/// Shapecast visitor selecting the triangles inside a screen region
pub struct RegionCast<'a> {
    projector: &'a ScreenProjector,
    outline: &'a [Segment2],
    cache: &'a mut SegmentCache,
    classifier: TriangleClassifier<'a>,
    /// Cull nodes against the outline; otherwise every leaf is tested
    use_bounds_tree: bool,
    /// Stop at the first selected triangle
    stop_on_first: bool,
    selected: &'a mut Vec<u32>,
    nodes_visited: usize,
}

impl<'a> RegionCast<'a> {
    pub fn new(
        projector: &'a ScreenProjector,
        outline: &'a [Segment2],
        cache: &'a mut SegmentCache,
        classifier: TriangleClassifier<'a>,
        selected: &'a mut Vec<u32>,
    ) -> Self {
        Self {
            projector,
            outline,
            cache,
            classifier,
            use_bounds_tree: true,
            stop_on_first: false,
            selected,
            nodes_visited: 0,
        }
    }

    pub fn use_bounds_tree(mut self, enabled: bool) -> Self {
        self.use_bounds_tree = enabled;
        self
    }

    pub fn stop_on_first(mut self, enabled: bool) -> Self {
        self.stop_on_first = enabled;
        self
    }

    #[inline]
    pub fn nodes_visited(&self) -> usize {
        self.nodes_visited
    }
}

impl ShapecastVisitor for RegionCast<'_> {
    fn intersects_bounds(
        &mut self,
        bounds: &Aabb,
        _is_leaf: bool,
        depth: usize,
    ) -> NodeIntersection {
        self.nodes_visited += 1;
        if !self.use_bounds_tree {
            return NodeIntersection::Intersected;
        }

        let corners = self.projector.project_corners(bounds);
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for corner in &corners {
            min_x = min_x.min(corner.x);
            min_y = min_y.min(corner.y);
            max_y = max_y.max(corner.y);
        }

        let candidates = self.cache.refill(depth, self.outline, |s| {
            let left = s.start.x < min_x && s.end.x < min_x;
            let above = s.start.y > max_y && s.end.y > max_y;
            let below = s.start.y < min_y && s.end.y < min_y;
            !(left || above || below)
        });
        classify_node(&corners, candidates)
    }

    fn intersects_triangle(
        &mut self,
        triangle: &Triangle,
        triangle_index: usize,
        contained: bool,
        depth: usize,
    ) -> bool {
        // deleted triangles collapse onto vertex 0; they are never selectable,
        // whether or not their node was contained
        if triangle.a == triangle.b && triangle.b == triangle.c {
            return false;
        }

        let segments = if self.use_bounds_tree {
            self.cache.level(depth)
        } else {
            self.outline
        };
        if !self
            .classifier
            .classify(triangle, contained, segments, self.projector)
        {
            return false;
        }

        let base = triangle_index as u32 * 3;
        self.selected.extend_from_slice(&[base, base + 1, base + 2]);
        self.stop_on_first
    }
}
