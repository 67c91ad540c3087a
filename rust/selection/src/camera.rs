// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera contract consumed by the selection engine
//!
//! The host owns camera motion; the engine only reads the camera's world
//! matrix and projection at traversal time.

use crate::error::Result;
use meshsel_geometry::invert;
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

/// Projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians
        fov_y: f64,
        aspect: f64,
        near: f64,
        far: f64,
    },
    Orthographic {
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    },
}

impl Projection {
    pub fn matrix(&self) -> Matrix4<f64> {
        match *self {
            Projection::Perspective { fov_y, aspect, near, far } => {
                Matrix4::new_perspective(aspect, fov_y, near, far)
            }
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                Matrix4::new_orthographic(left, right, bottom, top, near, far)
            }
        }
    }
}

/// A camera placed in the world
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera-to-world transform
    pub world: Matrix4<f64>,
    pub projection: Projection,
}

impl Camera {
    /// Perspective camera at the origin looking down -z
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            world: Matrix4::identity(),
            projection: Projection::Perspective { fov_y, aspect, near, far },
        }
    }

    /// Orthographic camera at the origin looking down -z
    pub fn orthographic(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        Self {
            world: Matrix4::identity(),
            projection: Projection::Orthographic { left, right, bottom, top, near, far },
        }
    }

    /// Place the camera at `eye` looking towards `target`
    pub fn look_at(mut self, eye: Point3<f64>, target: Point3<f64>, up: Vector3<f64>) -> Self {
        self.world = Isometry3::look_at_rh(&eye, &target, &up)
            .inverse()
            .to_homogeneous();
        self
    }

    #[inline]
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        self.projection.matrix()
    }

    /// World-to-camera transform
    pub fn view(&self) -> Result<Matrix4<f64>> {
        Ok(invert(&self.world, "camera world matrix")?)
    }

    /// World-space position
    #[inline]
    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.world[(0, 3)], self.world[(1, 3)], self.world[(2, 3)])
    }

    /// Vertical field of view in radians, zero for orthographic cameras
    pub fn fov_y(&self) -> f64 {
        match self.projection {
            Projection::Perspective { fov_y, .. } => fov_y,
            Projection::Orthographic { .. } => 0.0,
        }
    }

    pub fn aspect(&self) -> f64 {
        match self.projection {
            Projection::Perspective { aspect, .. } => aspect,
            Projection::Orthographic { left, right, bottom, top, .. } => {
                (right - left) / (top - bottom)
            }
        }
    }

    /// Follow a render surface resize
    pub fn set_aspect(&mut self, new_aspect: f64) {
        match &mut self.projection {
            Projection::Perspective { aspect, .. } => *aspect = new_aspect,
            Projection::Orthographic { left, right, bottom, top, .. } => {
                let half_width = (*top - *bottom) * new_aspect / 2.0;
                let center = (*left + *right) / 2.0;
                *left = center - half_width;
                *right = center + half_width;
            }
        }
    }
}
