// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection region builder
//!
//! Accumulates pointer samples into an outline in normalized device
//! coordinates. Box mode always holds the five points of a closed rectangle;
//! lasso mode grows while dragging, merging nearly colinear steps. Either way
//! the outline is treated as closed (last point joins the first) when
//! segments are produced, without storing the closing segment.

use crate::config::{RegionMode, SelectionConfig};
use crate::input::PointerSample;
use meshsel_geometry::Segment2;
use nalgebra::Point2;

#[derive(Debug, Clone)]
pub struct SelectionRegion {
    mode: RegionMode,
    points: Vec<Point2<f64>>,
    /// Drag start in NDC
    start: Point2<f64>,
    /// Client position of the last recorded lasso point
    last_client: Point2<f64>,
    dragging: bool,
    visible: bool,
    dirty: bool,
}

impl SelectionRegion {
    pub fn new(mode: RegionMode) -> Self {
        Self {
            mode,
            points: Vec::new(),
            start: Point2::origin(),
            last_client: Point2::origin(),
            dragging: false,
            visible: false,
            dirty: false,
        }
    }

    #[inline]
    pub fn mode(&self) -> RegionMode {
        self.mode
    }

    /// Switch modes, discarding the current outline
    pub fn set_mode(&mut self, mode: RegionMode) {
        if self.mode != mode {
            self.mode = mode;
            self.clear();
        }
    }

    /// Outline points in NDC, without the implicit closing segment
    #[inline]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether the host should draw the outline
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns and resets the "outline changed" flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.dragging = false;
        self.visible = false;
        self.dirty = true;
    }

    /// Pointer down: abandon any previous outline and start a new one
    pub fn begin(&mut self, sample: PointerSample) {
        self.points.clear();
        self.start = sample.ndc;
        self.last_client = sample.client;
        self.dragging = true;
        self.dirty = true;
    }

    /// Pointer move; returns whether the outline changed
    pub fn update(&mut self, sample: PointerSample, config: &SelectionConfig) -> bool {
        if !self.dragging {
            return false;
        }

        match self.mode {
            RegionMode::Box => {
                let (s, p) = (self.start, sample.ndc);
                self.points.clear();
                self.points.extend_from_slice(&[
                    s,
                    Point2::new(p.x, s.y),
                    p,
                    Point2::new(s.x, p.y),
                    s,
                ]);
            }
            RegionMode::Lasso => {
                let moved = (sample.client - self.last_client).abs();
                if moved.x < config.lasso_pixel_step && moved.y < config.lasso_pixel_step {
                    return false;
                }

                if self.extends_last_step(&sample.ndc, config.colinear_dot) {
                    if let Some(last) = self.points.last_mut() {
                        *last = sample.ndc;
                    }
                } else {
                    self.points.push(sample.ndc);
                }
                self.last_client = sample.client;
                tracing::trace!(points = self.points.len(), "Lasso extended");
            }
        }

        self.visible = true;
        self.dirty = true;
        true
    }

    /// Whether moving to `next` continues the direction of the last step
    fn extends_last_step(&self, next: &Point2<f64>, colinear_dot: f64) -> bool {
        let [.., before, last] = self.points.as_slice() else {
            return false;
        };
        let previous = (last - before).try_normalize(0.0);
        let current = (next - last).try_normalize(0.0);
        match (previous, current) {
            (Some(previous), Some(current)) => previous.dot(&current) > colinear_dot,
            _ => false,
        }
    }

    /// Pointer up: freeze the outline and hide it
    pub fn finish(&mut self) {
        self.dragging = false;
        self.visible = false;
        self.dirty = true;
    }

    /// Write the closed outline's segments into `out`
    pub fn segments_into(&self, out: &mut Vec<Segment2>) {
        out.clear();
        out.extend(Segment2::closed_loop(&self.points));
    }
}

impl Default for SelectionRegion {
    fn default() -> Self {
        Self::new(RegionMode::default())
    }
}
