// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Undoable triangle deletion
//!
//! Deleting zeroes index buffer entries in place, so every deleted triangle
//! collapses onto vertex 0 and stops rendering. Each delete records the
//! overwritten entries as one frame; undo replays the newest frame.

use meshsel_geometry::Mesh;

/// Overwritten index buffer entries of one delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoFrame {
    /// (position, original value)
    entries: Vec<(usize, u32)>,
}

impl UndoFrame {
    #[inline]
    pub fn entries(&self) -> &[(usize, u32)] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stack of undo frames, newest last
#[derive(Debug, Clone, Default)]
pub struct DeletionHistory {
    frames: Vec<UndoFrame>,
}

impl DeletionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the index buffer entries at `positions` and push one frame
    ///
    /// A frame is pushed even when `positions` is empty so every delete pairs
    /// with exactly one undo. Returns the number of entries written.
    pub fn delete(&mut self, mesh: &mut Mesh, positions: &[u32]) -> usize {
        let mut frame = UndoFrame {
            entries: Vec::with_capacity(positions.len()),
        };
        for &position in positions {
            let position = position as usize;
            if let Some(original) = mesh.set_index(position, 0) {
                frame.entries.push((position, original));
            }
        }
        mesh.mark_indices_dirty();

        let written = frame.len();
        self.frames.push(frame);
        tracing::debug!(entries = written, frames = self.frames.len(), "Deleted selection");
        written
    }

    /// Restore the newest frame; returns false when there is nothing to undo
    pub fn undo(&mut self, mesh: &mut Mesh) -> bool {
        let Some(frame) = self.frames.pop() else {
            return false;
        };
        // reverse order: a position listed twice ends with its first recorded value
        for &(position, original) in frame.entries.iter().rev() {
            mesh.set_index(position, original);
        }
        mesh.mark_indices_dirty();
        tracing::debug!(entries = frame.len(), frames = self.frames.len(), "Undid delete");
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<&UndoFrame> {
        self.frames.last()
    }

    /// Forget all frames, e.g. when the mesh is replaced
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
