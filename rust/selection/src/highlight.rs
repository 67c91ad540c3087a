// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection feedback: highlight overlay and bounding box gizmo

use meshsel_geometry::{Aabb, Mesh};
use nalgebra::{Matrix4, Point3, Vector3};

/// How much of the highlight index buffer the renderer should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawRange {
    /// Leading index count
    Count(usize),
    /// Entire buffer
    All,
}

/// Overlay sharing the mesh's vertex positions with its own index buffer
///
/// The index buffer is allocated at the mesh's full index length once; only
/// its prefix and the draw range change afterwards.
#[derive(Debug, Clone)]
pub struct HighlightMesh {
    positions: Vec<f32>,
    indices: Vec<u32>,
    draw_range: DrawRange,
    version: u64,
}

impl HighlightMesh {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            positions: mesh.positions.clone(),
            indices: vec![0; mesh.indices.len()],
            draw_range: DrawRange::Count(0),
            version: 0,
        }
    }

    /// Copy the vertex ids at the selected index buffer positions
    ///
    /// Entries are written before the draw range grows to cover them.
    pub fn publish_selection(&mut self, mesh: &Mesh, selected: &[u32]) {
        self.indices.resize(mesh.indices.len(), 0);
        let count = selected.len().min(self.indices.len());
        for (slot, &position) in self.indices.iter_mut().zip(&selected[..count]) {
            *slot = mesh.index(position as usize).unwrap_or(0);
        }
        self.draw_range = DrawRange::Count(count);
        self.bump();
    }

    /// Highlight every triangle of the mesh
    pub fn publish_all(&mut self, mesh: &Mesh) {
        self.indices.clear();
        self.indices.extend_from_slice(&mesh.indices);
        self.draw_range = DrawRange::All;
        self.bump();
    }

    pub fn clear(&mut self) {
        self.draw_range = DrawRange::Count(0);
        self.bump();
    }

    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn draw_range(&self) -> DrawRange {
        self.draw_range
    }

    /// Number of indices the renderer draws
    pub fn draw_count(&self) -> usize {
        match self.draw_range {
            DrawRange::Count(count) => count,
            DrawRange::All => self.indices.len(),
        }
    }

    /// The drawn prefix of the index buffer
    pub fn drawn_indices(&self) -> &[u32] {
        &self.indices[..self.draw_count()]
    }

    /// Incremented on every publish; the renderer re-uploads when it changes
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Wireframe box in mesh-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireBox {
    pub center: Point3<f64>,
    pub size: Vector3<f64>,
    pub visible: bool,
}

impl WireBox {
    /// Unit cube centred at the origin to this box
    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.center.coords) * Matrix4::new_nonuniform_scaling(&self.size)
    }
}

/// Bounding box around the current selection
///
/// Created on first use and refitted in place after that.
#[derive(Debug, Clone, Default)]
pub struct BoundsGizmo {
    wire_box: Option<WireBox>,
}

impl BoundsGizmo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit and show the box; returns false (and hides it) for empty bounds
    pub fn fit(&mut self, bounds: &Aabb) -> bool {
        if bounds.is_empty() || bounds.size() == Vector3::zeros() {
            self.hide();
            return false;
        }

        let (center, size) = (bounds.center(), bounds.size());
        match &mut self.wire_box {
            Some(wire_box) => {
                wire_box.center = center;
                wire_box.size = size;
                wire_box.visible = true;
            }
            None => {
                self.wire_box = Some(WireBox {
                    center,
                    size,
                    visible: true,
                });
            }
        }
        true
    }

    pub fn hide(&mut self) {
        if let Some(wire_box) = &mut self.wire_box {
            wire_box.visible = false;
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.wire_box.is_some_and(|b| b.visible)
    }

    #[inline]
    pub fn wire_box(&self) -> Option<&WireBox> {
        self.wire_box.as_ref()
    }
}
