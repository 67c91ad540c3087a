// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pointer input in client pixels and normalized device coordinates

use nalgebra::Point2;

/// Bounding rectangle of the render surface in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Client pixels (y down) to NDC (x right, y up, both in [-1, 1])
    #[inline]
    pub fn to_ndc(&self, client: Point2<f64>) -> Point2<f64> {
        Point2::new(
            (client.x - self.left) / self.width * 2.0 - 1.0,
            -((client.y - self.top) / self.height * 2.0 - 1.0),
        )
    }

    /// Sample a pointer event at client coordinates
    pub fn sample(&self, client_x: f64, client_y: f64) -> PointerSample {
        let client = Point2::new(client_x, client_y);
        PointerSample {
            client,
            ndc: self.to_ndc(client),
        }
    }
}

/// One pointer position in both coordinate systems
///
/// Client pixels drive the lasso travel threshold; NDC is what gets stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub client: Point2<f64>,
    pub ndc: Point2<f64>,
}
