// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Meshsel Geometry
//!
//! Indexed triangle meshes, a bounding-volume hierarchy over their triangles,
//! and the planar primitives (orientation, segment crossing, ray parity,
//! convex hull) used to test projected geometry against a screen region.

pub mod bvh;
pub mod error;
pub mod mesh;
pub mod planar;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

pub use bvh::{BvhMesh, BvhOptions, MeshBvh, NodeIntersection, Ray, RayHit, ShapecastVisitor};
pub use error::{Error, Result};
pub use mesh::{Aabb, Mesh, Triangle};
pub use planar::{
    convex_hull, is_inside, orientation, point_crosses_polyline, point_crosses_segment,
    segments_cross, Hull, Orientation, Segment2,
};
pub use transform::{invert, project_to_ndc, transform_point};
