// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle classifier
//!
//! Decides whether one candidate triangle belongs to the selection, given
//! the region segments that survived culling for its BVH node.

use crate::config::ClassifierPolicy;
use crate::projector::ScreenProjector;
use meshsel_geometry::{is_inside, segments_cross, BvhMesh, Ray, Segment2, Triangle};
use nalgebra::{Point2, Point3, Vector3};
use smallvec::SmallVec;

/// Applies one [`ClassifierPolicy`] to candidate triangles
#[derive(Debug, Clone, Copy)]
pub struct TriangleClassifier<'a> {
    policy: ClassifierPolicy,
    /// Mesh used for visibility rays
    target: &'a BvhMesh,
    camera_local: Point3<f64>,
    visibility_offset: f64,
}

impl<'a> TriangleClassifier<'a> {
    pub fn new(
        policy: ClassifierPolicy,
        target: &'a BvhMesh,
        camera_local: Point3<f64>,
        visibility_offset: f64,
    ) -> Self {
        Self {
            policy,
            target,
            camera_local,
            visibility_offset,
        }
    }

    #[inline]
    pub fn policy(&self) -> ClassifierPolicy {
        self.policy
    }

    /// `contained` is set when the owning node lies entirely inside the region
    pub fn classify(
        &self,
        triangle: &Triangle,
        contained: bool,
        segments: &[Segment2],
        projector: &ScreenProjector,
    ) -> bool {
        match self.policy {
            ClassifierPolicy::Centroid => {
                contained || is_inside(&projector.project(&triangle.centroid()), segments)
            }
            ClassifierPolicy::CentroidVisible => {
                let centroid = triangle.centroid();
                (contained || is_inside(&projector.project(&centroid), segments))
                    && self.is_visible(triangle, &centroid)
            }
            ClassifierPolicy::Intersection => {
                contained || Self::overlaps(triangle, segments, projector)
            }
        }
    }

    /// Any projected vertex inside, or any projected edge crossing the outline
    fn overlaps(triangle: &Triangle, segments: &[Segment2], projector: &ScreenProjector) -> bool {
        let projected: [Point2<f64>; 3] = triangle.vertices().map(|v| projector.project(&v));
        if projected.iter().any(|p| is_inside(p, segments)) {
            return true;
        }
        // the outline can clip a triangle without enclosing any of its vertices
        let edges: SmallVec<[Segment2; 3]> = Segment2::closed_loop(&projected).collect();
        edges
            .iter()
            .any(|edge| segments.iter().any(|segment| segments_cross(edge, segment)))
    }

    /// Cast from just off the surface towards the camera; any hit on the way occludes
    ///
    /// The start point is pushed along the face normal on the camera's side of
    /// the face, so back-facing triangles do not hit themselves.
    fn is_visible(&self, triangle: &Triangle, centroid: &Point3<f64>) -> bool {
        let to_camera = self.camera_local - centroid;
        let offset = match triangle.normal() {
            Some(normal) if normal.dot(&to_camera) < 0.0 => -normal,
            Some(normal) => normal,
            None => Vector3::zeros(),
        };
        let origin = centroid + offset * self.visibility_offset;
        let ray = Ray::between(origin, self.camera_local);
        self.target
            .bvh()
            .raycast_first(&self.target.mesh, &ray)
            .is_none()
    }
}
