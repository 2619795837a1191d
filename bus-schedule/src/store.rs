//! JSON data file holding the full registry state.
//!
//! The file is a single object with four top-level keys: `routes`,
//! `schedules`, `buses` and `stops`. Writes overwrite the file in place; there
//! is no temporary file or rename, so a crash mid-write can leave it truncated.

use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Bus, BusId, Route, RouteId, Schedule, Stop, StopId};
use crate::error::RegistryError;

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "bus_data.json";

/// Owned contents of a data file.
///
/// Missing top-level keys load as empty mappings. Entries keep the order
/// they have in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub routes: IndexMap<RouteId, Route>,
    pub schedules: IndexMap<RouteId, Schedule>,
    pub buses: IndexMap<BusId, Bus>,
    pub stops: IndexMap<StopId, Stop>,
}

/// Borrowed view used when writing, so saving does not clone the registry.
#[derive(Debug, Serialize)]
pub struct SnapshotRef<'a> {
    pub routes: &'a IndexMap<RouteId, Route>,
    pub schedules: &'a IndexMap<RouteId, Schedule>,
    pub buses: &'a IndexMap<BusId, Bus>,
    pub stops: &'a IndexMap<StopId, Stop>,
}

/// Write a snapshot to `path` as pretty-printed JSON, replacing any existing file.
pub fn save(path: &Path, snapshot: &SnapshotRef<'_>) -> Result<(), RegistryError> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|source| RegistryError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, json).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "wrote data file");
    Ok(())
}

/// Read a snapshot from `path`.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load(path: &Path) -> Result<Option<Snapshot>, RegistryError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file");
            return Ok(None);
        }
        Err(source) => {
            return Err(RegistryError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let snapshot = serde_json::from_str(&contents).map_err(|source| RegistryError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "read data file");
    Ok(Some(snapshot))
}
