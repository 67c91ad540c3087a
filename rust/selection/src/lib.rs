// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Meshsel Selection
//!
//! Screen-space box and lasso selection of mesh triangles.
//!
//! Pointer input builds a [`SelectionRegion`] in normalized device
//! coordinates. On release (or on every move with live update) the
//! [`SelectionEngine`] projects the mesh BVH into screen space, culls nodes
//! against the region and classifies the surviving triangles. The result
//! drives a highlight overlay, a bounding box gizmo, and an undoable delete
//! that zeroes index buffer entries in place.

pub mod camera;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod history;
pub mod input;
pub mod projector;
pub mod region;
pub mod shapecast;

pub use camera::Camera;
pub use classifier::TriangleClassifier;
pub use config::{ClassifierPolicy, RegionMode, SelectionConfig};
pub use engine::SelectionEngine;
pub use error::{Error, Result};
pub use highlight::{BoundsGizmo, DrawRange, HighlightMesh, WireBox};
pub use history::{DeletionHistory, UndoFrame};
pub use input::{PointerSample, Viewport};
pub use projector::ScreenProjector;
pub use region::SelectionRegion;
pub use shapecast::{RegionCast, SegmentCache};
