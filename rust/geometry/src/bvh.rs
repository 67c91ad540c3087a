// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding-volume hierarchy over mesh triangles
//!
//! The tree is stored as a flat node array. Each node covers a contiguous
//! range of a triangle permutation, so a whole subtree can be enumerated
//! without walking it. The mesh index buffer itself is never reordered:
//! deleting a triangle zeroes its indices in place and the tree stays valid
//! (bounds simply become conservative).

use crate::mesh::{Aabb, Mesh, Triangle};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

/// Build parameters
#[derive(Debug, Clone, Copy)]
pub struct BvhOptions {
    /// Nodes with at most this many triangles become leaves
    pub max_leaf_triangles: usize,
    /// Nodes at this depth become leaves regardless of size
    pub max_depth: usize,
}

impl Default for BvhOptions {
    fn default() -> Self {
        Self {
            max_leaf_triangles: 10,
            max_depth: 40,
        }
    }
}

/// Result of testing a node's bounds against a query shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIntersection {
    /// Prune the subtree
    NotIntersected,
    /// Descend; leaf triangles are tested individually
    Intersected,
    /// Every triangle below is inside; they are reported with `contained`
    Contained,
}

/// Callbacks driving [`MeshBvh::shapecast`]
pub trait ShapecastVisitor {
    /// Classify a node. Root depth is 0.
    fn intersects_bounds(&mut self, bounds: &Aabb, is_leaf: bool, depth: usize) -> NodeIntersection;

    /// Test one triangle. `triangle_index` addresses the mesh index buffer at
    /// `triangle_index * 3`; `depth` is that of the node that reported it.
    /// Returning `true` stops the traversal.
    fn intersects_triangle(
        &mut self,
        triangle: &Triangle,
        triangle_index: usize,
        contained: bool,
        depth: usize,
    ) -> bool;
}

#[derive(Debug, Clone)]
struct BvhNode {
    bounds: Aabb,
    /// Range into `MeshBvh::order`
    start: u32,
    count: u32,
    /// Left and right child node indices; `None` for leaves
    children: Option<(u32, u32)>,
}

/// A ray with a bounded parameter range, `origin + t * direction` for
/// `t` in `(0, max_t]`
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
    pub max_t: f64,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction,
            max_t: f64::INFINITY,
        }
    }

    /// Ray from `origin` that ends exactly at `target`
    pub fn between(origin: Point3<f64>, target: Point3<f64>) -> Self {
        Self {
            origin,
            direction: target - origin,
            max_t: 1.0,
        }
    }

    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Nearest ray hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub triangle_index: usize,
    /// Ray parameter of the hit
    pub t: f64,
    pub point: Point3<f64>,
}

const RAY_EPSILON: f64 = 1e-12;

/// BVH over the triangles of one mesh
#[derive(Debug, Clone, Default)]
pub struct MeshBvh {
    nodes: Vec<BvhNode>,
    /// Triangle permutation; nodes reference ranges of it
    order: Vec<u32>,
    depth: usize,
}

impl MeshBvh {
    /// Build with default options
    pub fn build(mesh: &Mesh) -> Self {
        Self::build_with(mesh, &BvhOptions::default())
    }

    pub fn build_with(mesh: &Mesh, options: &BvhOptions) -> Self {
        let triangle_count = mesh.triangle_count();
        if triangle_count == 0 {
            return Self::default();
        }

        // Per-triangle bounds and centroids in parallel
        let prims: Vec<(Aabb, Point3<f64>)> = (0..triangle_count)
            .into_par_iter()
            .map(|t| match mesh.triangle(t) {
                Some(tri) => (tri.bounds(), tri.centroid()),
                None => (Aabb::empty(), Point3::origin()),
            })
            .collect();

        let mut bvh = Self {
            nodes: Vec::with_capacity(2 * triangle_count / options.max_leaf_triangles.max(1) + 1),
            order: (0..triangle_count as u32).collect(),
            depth: 0,
        };
        bvh.build_node(&prims, 0, triangle_count, 0, options);

        tracing::debug!(
            triangles = triangle_count,
            nodes = bvh.nodes.len(),
            depth = bvh.depth,
            "Built mesh BVH"
        );
        bvh
    }

    fn build_node(
        &mut self,
        prims: &[(Aabb, Point3<f64>)],
        start: usize,
        end: usize,
        depth: usize,
        options: &BvhOptions,
    ) -> u32 {
        self.depth = self.depth.max(depth);

        let mut bounds = Aabb::empty();
        let mut centroid_bounds = Aabb::empty();
        for &t in &self.order[start..end] {
            let (tri_bounds, centroid) = &prims[t as usize];
            if !tri_bounds.is_empty() {
                bounds = bounds.union(tri_bounds);
            }
            centroid_bounds.expand_by_point(centroid);
        }

        let node_index = self.nodes.len() as u32;
        self.nodes.push(BvhNode {
            bounds,
            start: start as u32,
            count: (end - start) as u32,
            children: None,
        });

        let count = end - start;
        if count <= options.max_leaf_triangles || depth >= options.max_depth {
            return node_index;
        }

        // Centre split: median along the longest centroid axis
        let axis = centroid_bounds.longest_axis();
        if centroid_bounds.size()[axis] <= 0.0 {
            return node_index;
        }
        let mid = start + count / 2;
        self.order[start..end].select_nth_unstable_by(count / 2, |&a, &b| {
            prims[a as usize].1[axis].total_cmp(&prims[b as usize].1[axis])
        });

        let left = self.build_node(prims, start, mid, depth + 1, options);
        let right = self.build_node(prims, mid, end, depth + 1, options);
        self.nodes[node_index as usize].children = Some((left, right));

        node_index
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node depth (root is 0)
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Root bounds, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        self.nodes.first().map(|n| n.bounds)
    }

    /// Walk the tree with `visitor`; returns `true` if the visitor stopped it
    pub fn shapecast<V: ShapecastVisitor>(&self, mesh: &Mesh, visitor: &mut V) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        self.shapecast_node(0, mesh, visitor, 0)
    }

    fn shapecast_node<V: ShapecastVisitor>(
        &self,
        node_index: u32,
        mesh: &Mesh,
        visitor: &mut V,
        depth: usize,
    ) -> bool {
        let node = &self.nodes[node_index as usize];
        match visitor.intersects_bounds(&node.bounds, node.children.is_none(), depth) {
            NodeIntersection::NotIntersected => false,
            NodeIntersection::Contained => self.shapecast_range(node, mesh, visitor, true, depth),
            NodeIntersection::Intersected => match node.children {
                None => self.shapecast_range(node, mesh, visitor, false, depth),
                Some((left, right)) => {
                    self.shapecast_node(left, mesh, visitor, depth + 1)
                        || self.shapecast_node(right, mesh, visitor, depth + 1)
                }
            },
        }
    }

    fn shapecast_range<V: ShapecastVisitor>(
        &self,
        node: &BvhNode,
        mesh: &Mesh,
        visitor: &mut V,
        contained: bool,
        depth: usize,
    ) -> bool {
        let range = node.start as usize..(node.start + node.count) as usize;
        for &t in &self.order[range] {
            let Some(triangle) = mesh.triangle(t as usize) else {
                continue;
            };
            if visitor.intersects_triangle(&triangle, t as usize, contained, depth) {
                return true;
            }
        }
        false
    }

    /// Nearest triangle hit by `ray` within its parameter range, either side
    pub fn raycast_first(&self, mesh: &Mesh, ray: &Ray) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        if self.nodes.is_empty() {
            return None;
        }

        let mut stack = vec![0u32];
        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index as usize];
            let limit = best.map_or(ray.max_t, |hit| hit.t);
            if !ray_hits_aabb(ray, &node.bounds, limit) {
                continue;
            }

            match node.children {
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => {
                    let range = node.start as usize..(node.start + node.count) as usize;
                    for &t in &self.order[range] {
                        let Some(triangle) = mesh.triangle(t as usize) else {
                            continue;
                        };
                        if let Some(hit_t) = ray_triangle(ray, &triangle) {
                            if hit_t <= best.map_or(ray.max_t, |hit| hit.t) {
                                best = Some(RayHit {
                                    triangle_index: t as usize,
                                    t: hit_t,
                                    point: ray.at(hit_t),
                                });
                            }
                        }
                    }
                }
            }
        }

        best
    }
}

/// Slab test against `[0, max_t]`
fn ray_hits_aabb(ray: &Ray, aabb: &Aabb, max_t: f64) -> bool {
    if aabb.is_empty() {
        return false;
    }
    let mut t_min = 0.0f64;
    let mut t_max = max_t;
    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);
        if dir == 0.0 {
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let (mut t0, mut t1) = ((lo - origin) * inv, (hi - origin) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }
    true
}

/// Möller–Trumbore, double sided
fn ray_triangle(ray: &Ray, tri: &Triangle) -> Option<f64> {
    let edge1 = tri.b - tri.a;
    let edge2 = tri.c - tri.a;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < RAY_EPSILON {
        return None; // ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray.origin - tri.a;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > RAY_EPSILON && t <= ray.max_t).then_some(t)
}

/// A mesh bundled with the hierarchy built over it
///
/// Vertex positions must not change while the hierarchy is in use; call
/// [`BvhMesh::rebuild`] after editing them. Index zeroing is fine.
#[derive(Debug, Clone)]
pub struct BvhMesh {
    pub mesh: Mesh,
    bvh: MeshBvh,
}

impl BvhMesh {
    pub fn new(mesh: Mesh) -> Self {
        Self::with_options(mesh, &BvhOptions::default())
    }

    pub fn with_options(mesh: Mesh, options: &BvhOptions) -> Self {
        let bvh = MeshBvh::build_with(&mesh, options);
        Self { mesh, bvh }
    }

    #[inline]
    pub fn bvh(&self) -> &MeshBvh {
        &self.bvh
    }

    pub fn rebuild(&mut self, options: &BvhOptions) {
        self.bvh = MeshBvh::build_with(&self.mesh, options);
    }
}
