//! Session configuration.

use std::path::{Path, PathBuf};

use crate::store::DEFAULT_DATA_FILE;

/// Configuration for an interactive session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// File used by the save and load menu options.
    pub data_path: PathBuf,

    /// Whether to seed the registry with the demo network on startup.
    pub sample_data: bool,
}

impl SessionConfig {
    /// Create a configuration that saves to and loads from `data_path`.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            sample_data: true,
        }
    }

    /// Set a custom data file.
    pub fn with_data_path(mut self, data_path: impl Into<PathBuf>) -> Self {
        self.data_path = data_path.into();
        self
    }

    /// Enable or disable the demo network.
    pub fn with_sample_data(mut self, sample_data: bool) -> Self {
        self.sample_data = sample_data;
        self
    }

    /// Returns the data file path.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}
