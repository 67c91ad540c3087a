// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Screen-space projector
//!
//! Maps mesh-local points into the same NDC space the selection region is
//! drawn in, and the camera into mesh-local space for visibility rays.

use crate::camera::Camera;
use crate::error::Result;
use meshsel_geometry::{invert, project_to_ndc, transform_point, Aabb, Mesh};
use nalgebra::{Matrix4, Point2, Point3};

#[derive(Debug, Clone)]
pub struct ScreenProjector {
    /// projection * view * world
    to_screen: Matrix4<f64>,
    /// Inverse of the mesh world matrix
    inv_world: Matrix4<f64>,
    camera_local: Point3<f64>,
}

impl ScreenProjector {
    pub fn new() -> Self {
        Self {
            to_screen: Matrix4::identity(),
            inv_world: Matrix4::identity(),
            camera_local: Point3::origin(),
        }
    }

    /// Recompute the matrices for the current camera and mesh placement
    pub fn update(&mut self, camera: &Camera, mesh: &Mesh) -> Result<()> {
        let view = camera.view()?;
        self.inv_world = invert(&mesh.world, "mesh world matrix")?;
        self.to_screen = camera.projection_matrix() * view * mesh.world;
        self.camera_local = transform_point(&self.inv_world, &camera.position());
        Ok(())
    }

    /// Mesh-local point to NDC x/y
    #[inline]
    pub fn project(&self, p: &Point3<f64>) -> Point2<f64> {
        project_to_ndc(&self.to_screen, p)
    }

    /// Project all 8 corners of a box
    pub fn project_corners(&self, bounds: &Aabb) -> [Point2<f64>; 8] {
        bounds.corners().map(|corner| self.project(&corner))
    }

    #[inline]
    pub fn to_screen_matrix(&self) -> &Matrix4<f64> {
        &self.to_screen
    }

    #[inline]
    pub fn inverse_world_matrix(&self) -> &Matrix4<f64> {
        &self.inv_world
    }

    /// Camera position in mesh-local space
    #[inline]
    pub fn camera_local_position(&self) -> Point3<f64> {
        self.camera_local
    }
}

impl Default for ScreenProjector {
    fn default() -> Self {
        Self::new()
    }
}
