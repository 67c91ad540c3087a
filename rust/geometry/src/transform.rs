// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared transform utilities
//!
//! Homogeneous point transforms with perspective divide, matching how a
//! renderer maps mesh-local points into clip space and then into normalized
//! device coordinates.

use crate::error::{Error, Result};
use nalgebra::{Matrix4, Point2, Point3};

/// Below this |w| the perspective divide is skipped
const MIN_W: f64 = 1e-12;

/// Transform a point by a 4x4 matrix, dividing by the resulting w
///
/// Points that land on the camera plane (w == 0) are returned undivided
/// rather than producing infinities.
#[inline]
pub fn transform_point(m: &Matrix4<f64>, p: &Point3<f64>) -> Point3<f64> {
    let h = m * p.to_homogeneous();
    if h.w.abs() < MIN_W {
        return Point3::new(h.x, h.y, h.z);
    }
    Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
}

/// Project a point through a clip-space matrix and keep NDC x/y
#[inline]
pub fn project_to_ndc(m: &Matrix4<f64>, p: &Point3<f64>) -> Point2<f64> {
    let projected = transform_point(m, p);
    Point2::new(projected.x, projected.y)
}

/// Invert a matrix, naming it in the error when it is singular
pub fn invert(m: &Matrix4<f64>, what: &'static str) -> Result<Matrix4<f64>> {
    m.try_inverse().ok_or(Error::SingularMatrix(what))
}
