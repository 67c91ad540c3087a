// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for selection operations.

/// Result type alias for selection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the host.
///
/// Geometry invariant violations (a hierarchy out of sync with its mesh) are
/// not reported here; they trip debug assertions and are skipped otherwise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Mesh or matrix problem from the geometry layer.
    #[error(transparent)]
    Geometry(#[from] meshsel_geometry::Error),

    /// Configuration document could not be parsed.
    #[error("invalid selection config: {0}")]
    Config(#[from] serde_json::Error),
}
