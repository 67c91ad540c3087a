// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::error::{Error, Result};
use nalgebra::{Matrix4, Point3, Vector3};

/// Axis-aligned bounding box in mesh-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a box from its corners
    #[inline]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// An inverted box that any point expands
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True until at least one point has been added
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    #[inline]
    pub fn expand_by_point(&mut self, p: &Point3<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Index of the longest axis (0 = x, 1 = y, 2 = z)
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    /// The 8 corners, x-major then y then z
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let (lo, hi) = (&self.min, &self.max);
        let mut corners = [Point3::origin(); 8];
        let mut index = 0;
        for x in [lo.x, hi.x] {
            for y in [lo.y, hi.y] {
                for z in [lo.z, hi.z] {
                    corners[index] = Point3::new(x, y, z);
                    index += 1;
                }
            }
        }
        corners
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

/// A triangle resolved from the index buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point3<f64>,
    pub b: Point3<f64>,
    pub c: Point3<f64>,
}

impl Triangle {
    #[inline]
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// Unit face normal following the winding order, `None` for degenerate triangles
    #[inline]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        (self.b - self.a)
            .cross(&(self.c - self.a))
            .try_normalize(1e-12)
    }

    #[inline]
    pub fn vertices(&self) -> [Point3<f64>; 3] {
        [self.a, self.b, self.c]
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.a.inf(&self.b).inf(&self.c),
            self.a.sup(&self.b).sup(&self.c),
        )
    }
}

/// Indexed triangle mesh with a world transform
///
/// The index buffer is the only part the selection engine mutates. Deleted
/// triangles keep their slots (the entries are zeroed), so anything built over
/// triangle slots stays valid.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
    /// Mesh-local to world transform
    pub world: Matrix4<f64>,
    index_version: u64,
}

impl Mesh {
    /// Create a mesh, validating that every index references a vertex
    pub fn new(positions: Vec<f32>, indices: Vec<u32>) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(Error::invalid_mesh(format!(
                "position buffer length {} is not a multiple of 3",
                positions.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(Error::invalid_mesh(format!(
                "index buffer length {} is not a multiple of 3",
                indices.len()
            )));
        }
        let vertex_count = positions.len() / 3;
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(Error::invalid_mesh(format!(
                "index {} references a missing vertex (vertex count {})",
                bad, vertex_count
            )));
        }

        Ok(Self {
            positions,
            indices,
            world: Matrix4::identity(),
            index_version: 0,
        })
    }

    /// Set the world transform
    pub fn with_world(mut self, world: Matrix4<f64>) -> Self {
        self.world = world;
        self
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of a vertex in mesh-local space
    #[inline]
    pub fn vertex(&self, vertex: usize) -> Option<Point3<f64>> {
        let chunk = self.positions.get(vertex * 3..vertex * 3 + 3)?;
        Some(Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64))
    }

    /// Resolve the triangle stored at `triangle * 3` in the index buffer
    ///
    /// A missing slot or vertex means whatever was built over this mesh is out
    /// of sync with it; that trips a debug assertion and yields `None`.
    pub fn triangle(&self, triangle: usize) -> Option<Triangle> {
        let slot = self.indices.get(triangle * 3..triangle * 3 + 3);
        debug_assert!(slot.is_some(), "triangle {} out of range", triangle);
        let slot = slot?;
        let a = self.vertex(slot[0] as usize);
        let b = self.vertex(slot[1] as usize);
        let c = self.vertex(slot[2] as usize);
        debug_assert!(
            a.is_some() && b.is_some() && c.is_some(),
            "triangle {} references a missing vertex",
            triangle
        );
        Some(Triangle::new(a?, b?, c?))
    }

    /// Read one index buffer entry
    #[inline]
    pub fn index(&self, position: usize) -> Option<u32> {
        let value = self.indices.get(position).copied();
        debug_assert!(value.is_some(), "index position {} out of range", position);
        value
    }

    /// Overwrite one index buffer entry, returning the previous value
    ///
    /// Does not bump the index version; callers batch writes and then call
    /// [`Mesh::mark_indices_dirty`] once.
    #[inline]
    pub fn set_index(&mut self, position: usize, value: u32) -> Option<u32> {
        let slot = self.indices.get_mut(position);
        debug_assert!(slot.is_some(), "index position {} out of range", position);
        slot.map(|entry| std::mem::replace(entry, value))
    }

    /// Signal the renderer that the index buffer changed
    #[inline]
    pub fn mark_indices_dirty(&mut self) {
        self.index_version = self.index_version.wrapping_add(1);
    }

    /// Incremented on every published index buffer change
    #[inline]
    pub fn index_version(&self) -> u64 {
        self.index_version
    }

    /// Bounds of every vertex, optimized with chunk iteration
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        self.positions.chunks_exact(3).for_each(|chunk| {
            bounds.expand_by_point(&Point3::new(
                chunk[0] as f64,
                chunk[1] as f64,
                chunk[2] as f64,
            ));
        });
        bounds
    }

    /// Bounds of the vertices referenced by the given index buffer positions
    pub fn bounds_of_positions(&self, positions: &[u32]) -> Aabb {
        let mut bounds = Aabb::empty();
        for &position in positions {
            let vertex = self
                .index(position as usize)
                .and_then(|v| self.vertex(v as usize));
            if let Some(p) = vertex {
                bounds.expand_by_point(&p);
            }
        }
        bounds
    }
}
