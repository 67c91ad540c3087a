// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection engine
//!
//! Owns the tool state between pointer events: the region being drawn, the
//! per-depth segment cache, the current selection, its highlight and gizmo,
//! and the deletion history. The host owns the camera and the mesh and
//! passes them in on each call.

use crate::camera::Camera;
use crate::classifier::TriangleClassifier;
use crate::config::SelectionConfig;
use crate::error::Result;
use crate::highlight::{BoundsGizmo, HighlightMesh};
use crate::history::DeletionHistory;
use crate::input::Viewport;
use crate::projector::ScreenProjector;
use crate::region::SelectionRegion;
use crate::shapecast::{RegionCast, SegmentCache};
use meshsel_geometry::{BvhMesh, Mesh, Segment2};

/// Box and lasso selection over one mesh, driven by pointer events
pub struct SelectionEngine {
    config: SelectionConfig,
    viewport: Viewport,
    enabled: bool,
    region: SelectionRegion,
    projector: ScreenProjector,
    /// Closed outline of the region, rebuilt per traversal
    outline: Vec<Segment2>,
    cache: SegmentCache,
    /// Index buffer positions, three per selected triangle
    selection: Vec<u32>,
    highlight: HighlightMesh,
    gizmo: BoundsGizmo,
    history: DeletionHistory,
}

impl SelectionEngine {
    pub fn new(config: SelectionConfig, viewport: Viewport, mesh: &Mesh) -> Self {
        Self {
            region: SelectionRegion::new(config.region_mode),
            config,
            viewport,
            enabled: true,
            projector: ScreenProjector::new(),
            outline: Vec::new(),
            cache: SegmentCache::new(),
            selection: Vec::new(),
            highlight: HighlightMesh::from_mesh(mesh),
            gizmo: BoundsGizmo::new(),
            history: DeletionHistory::new(),
        }
    }

    /// Point the engine at a different mesh, dropping selection and history
    pub fn set_mesh(&mut self, mesh: &Mesh) {
        self.region.clear();
        self.selection.clear();
        self.highlight = HighlightMesh::from_mesh(mesh);
        self.gizmo.hide();
        self.history.clear();
    }

    #[inline]
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Replace the configuration; a region mode change discards the outline
    pub fn set_config(&mut self, config: SelectionConfig) {
        self.region.set_mode(config.region_mode);
        self.config = config;
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// While disabled, pointer events are ignored; disabling abandons a drag
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled && !enabled && self.region.is_dragging() {
            self.region.clear();
        }
        self.enabled = enabled;
    }

    /// Start a new region at client coordinates
    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) {
        if !self.enabled {
            return;
        }
        self.region.begin(self.viewport.sample(client_x, client_y));
    }

    /// Extend the region; with live update the selection follows the pointer
    ///
    /// Returns whether the region changed.
    pub fn pointer_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        camera: &Camera,
        target: &BvhMesh,
    ) -> Result<bool> {
        if !self.enabled || !self.region.is_dragging() {
            return Ok(false);
        }
        let sample = self.viewport.sample(client_x, client_y);
        if !self.region.update(sample, &self.config) {
            return Ok(false);
        }
        if self.config.live_update {
            self.update_selection(camera, target)?;
        }
        Ok(true)
    }

    /// Finish the region and run the traversal
    pub fn pointer_up(&mut self, camera: &Camera, target: &BvhMesh) -> Result<()> {
        if !self.enabled || !self.region.is_dragging() {
            return Ok(());
        }
        self.region.finish();
        self.update_selection(camera, target)?;
        Ok(())
    }

    /// Select the triangles of `target` inside the current region
    ///
    /// Replaces the previous selection, publishes the highlight and refits
    /// the gizmo. Returns the number of selected triangles.
    pub fn update_selection(&mut self, camera: &Camera, target: &BvhMesh) -> Result<usize> {
        self.projector.update(camera, &target.mesh)?;
        self.region.segments_into(&mut self.outline);
        self.selection.clear();
        self.cache.clear();

        let mut nodes_visited = 0;
        if !self.outline.is_empty() {
            let classifier = TriangleClassifier::new(
                self.config.policy,
                target,
                self.projector.camera_local_position(),
                self.config.visibility_offset,
            );
            let mut cast = RegionCast::new(
                &self.projector,
                &self.outline,
                &mut self.cache,
                classifier,
                &mut self.selection,
            )
            .use_bounds_tree(self.config.use_bounds_tree)
            .stop_on_first(self.config.select_model);
            target.bvh().shapecast(&target.mesh, &mut cast);
            nodes_visited = cast.nodes_visited();
        }

        self.publish(&target.mesh);
        tracing::debug!(
            triangles = self.selected_triangle_count(),
            segments = self.outline.len(),
            nodes = nodes_visited,
            policy = ?self.config.policy,
            "Selection updated"
        );
        Ok(self.selected_triangle_count())
    }

    fn publish(&mut self, mesh: &Mesh) {
        if self.config.select_model && !self.selection.is_empty() {
            self.highlight.publish_all(mesh);
        } else {
            self.highlight.publish_selection(mesh, &self.selection);
        }
        self.gizmo.fit(&mesh.bounds_of_positions(&self.selection));
    }

    /// Zero the selected triangles in the index buffer
    ///
    /// Only acts while the selection gizmo is shown. Clears the selection
    /// afterwards. Returns whether anything was deleted.
    pub fn delete_selected(&mut self, target: &mut BvhMesh) -> bool {
        if !self.gizmo.is_visible() {
            return false;
        }
        self.history.delete(&mut target.mesh, &self.selection);
        self.selection.clear();
        self.highlight.clear();
        self.gizmo.hide();
        true
    }

    /// Restore the most recent delete
    pub fn undo(&mut self, target: &mut BvhMesh) -> bool {
        self.history.undo(&mut target.mesh)
    }

    /// Index buffer positions of the selected triangles
    #[inline]
    pub fn selection(&self) -> &[u32] {
        &self.selection
    }

    #[inline]
    pub fn selected_triangle_count(&self) -> usize {
        self.selection.len() / 3
    }

    #[inline]
    pub fn region(&self) -> &SelectionRegion {
        &self.region
    }

    /// Mutable region access for the host's outline renderer (dirty flag)
    #[inline]
    pub fn region_mut(&mut self) -> &mut SelectionRegion {
        &mut self.region
    }

    #[inline]
    pub fn highlight(&self) -> &HighlightMesh {
        &self.highlight
    }

    #[inline]
    pub fn gizmo(&self) -> &BoundsGizmo {
        &self.gizmo
    }

    #[inline]
    pub fn history(&self) -> &DeletionHistory {
        &self.history
    }

    #[inline]
    pub fn segment_cache(&self) -> &SegmentCache {
        &self.cache
    }
}
