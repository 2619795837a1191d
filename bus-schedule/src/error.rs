//! Registry error types.

use std::path::PathBuf;

use crate::domain::RouteId;

/// Errors returned by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A schedule was added for a route that is not registered
    #[error("route {0} not found")]
    RouteNotFound(RouteId),

    /// Reading or writing the data file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The data file could not be encoded or decoded
    #[error("JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
