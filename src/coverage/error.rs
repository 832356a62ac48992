//! Error types for coverage loading.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a coverage file produced no entries.
///
/// None of these reach editor users: the index logs them and answers with
/// "no coverage available".
#[derive(Debug, Error)]
pub enum CoverageError {
    /// The coverage file could not be read.
    #[error("cannot read coverage file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A delimiter around the embedded report is missing.
    #[error("coverage file is missing the `{0}` marker")]
    MissingMarker(&'static str),

    /// The embedded report is not the expected JSON document.
    #[error("malformed coverage report: {0}")]
    Malformed(String),

    /// The report describes a different rules file.
    #[error("coverage report is for `{found}`, not `{expected}`")]
    MismatchedSource { expected: String, found: String },

    /// A file-change subscription could not be set up.
    #[error("file watch error: {0}")]
    Watch(String),

    /// The caller abandoned the load.
    #[error("coverage load cancelled")]
    Cancelled,

    /// The file changed while it was being loaded.
    #[error("coverage file changed while loading")]
    Superseded,
}

impl CoverageError {
    /// Create a malformed-report error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Create a watch error.
    pub fn watch(message: impl Into<String>) -> Self {
        Self::Watch(message.into())
    }
}
