//! Error type for canvas operations

use serde::{Deserialize, Serialize};

use crate::artist::ArtistKind;
use crate::ids::{ArtistId, AxesId};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CanvasError {
    #[error("axes not found: {0:?}")]
    AxesNotFound(AxesId),

    #[error("artist not found: {0:?}")]
    ArtistNotFound(ArtistId),

    /// An update was sent to an artist of a different kind (e.g. UV data to a line).
    #[error("cannot apply {update} update to a {artist:?} artist")]
    IncompatibleUpdate { artist: ArtistKind, update: String },

    #[error("shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("canvas does not support {0}")]
    Unsupported(String),

    #[error("backend error: {0}")]
    Backend(String),
}
