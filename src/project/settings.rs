//! Editor settings recognized by the analysis host.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors from reading project configuration.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Settings read from the editor's JSON configuration.
///
/// Keys are flat, dotted names as the editor stores them. Unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Coverage report written by the emulator, relative to the project root.
    #[serde(rename = "firebase.coverageFile", default)]
    pub coverage_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_coverage_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.coverage_file = Some(path.into());
        self
    }

    /// Resolve the coverage file against the project root.
    ///
    /// Absolute settings are returned unchanged. An empty setting counts as unset.
    pub fn coverage_path(&self, project_root: &Path) -> Option<PathBuf> {
        let file = self.coverage_file.as_ref()?;
        if file.as_os_str().is_empty() {
            return None;
        }
        Some(project_root.join(file))
    }
}
