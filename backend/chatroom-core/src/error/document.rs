use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error as ThisError;

/// Failures while preparing a file for upload, before any request is sent.
#[derive(Debug, ThisError)]
pub enum DocumentError {
    #[error("Unsupported Document Error: {path} ({reason}) {location}")]
    Unsupported {
        path: PathBuf,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Document Read Error: {path}: {source} {location}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl DocumentError {
    /// One-line description for user-facing text, without the location.
    pub fn summary(&self) -> String {
        match self {
            DocumentError::Unsupported { path, reason, .. } => {
                format!("{}: {reason}", path.display())
            }
            DocumentError::Read { path, source, .. } => format!("{}: {source}", path.display()),
        }
    }
}
