// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection tool configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How pointer drags are turned into a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionMode {
    /// Axis-aligned rectangle between drag start and the pointer
    Box,
    /// Freehand outline, implicitly closed
    #[default]
    Lasso,
}

/// Rule deciding whether a candidate triangle is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierPolicy {
    /// Projected centroid inside the region
    Centroid,
    /// Centroid inside and not occluded from the camera by the same mesh
    CentroidVisible,
    /// Any overlap between the projected triangle and the region
    #[default]
    Intersection,
}

/// Configuration for the selection engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub region_mode: RegionMode,
    pub policy: ClassifierPolicy,
    /// Re-run the traversal on every pointer move instead of only on release
    pub live_update: bool,
    /// Highlight the whole mesh once any triangle matches; the traversal
    /// stops at the first match since the rest would add nothing
    pub select_model: bool,
    /// Cull with the BVH; when false every leaf is tested against every
    /// region segment
    pub use_bounds_tree: bool,
    /// Minimum pointer travel (pixels, either axis) before a lasso point is recorded
    pub lasso_pixel_step: f64,
    /// Consecutive lasso directions with a dot product above this are merged
    pub colinear_dot: f64,
    /// Distance (mesh-local units) the visibility ray starts off the surface.
    /// Too small and the ray re-hits its own triangle on large meshes; too
    /// large and it skips thin occluders in front of the triangle.
    pub visibility_offset: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            region_mode: RegionMode::Lasso,
            policy: ClassifierPolicy::Intersection,
            live_update: false,
            select_model: false,
            use_bounds_tree: true,
            lasso_pixel_step: 3.0,
            colinear_dot: 0.99,
            visibility_offset: 1e-6,
        }
    }
}

impl SelectionConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
