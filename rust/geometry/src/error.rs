// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building meshes and transforms
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Singular matrix: {0} is not invertible")]
    SingularMatrix(&'static str),
}

impl Error {
    pub fn invalid_mesh(msg: impl Into<String>) -> Self {
        Error::InvalidMesh(msg.into())
    }
}
