//! Persistence error types.
//!
//! Every error has a user-facing message and, where one exists, a hint for
//! fixing it.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is JSON but not a roster state file.
    #[error("invalid state file {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Written by a newer release.
    #[error("state file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    #[error("failed to serialize roster state")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read roster state from {path}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The temp file was written but could not replace the target.
    #[error("failed to complete save to {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// A message suitable for showing to the person running the tool.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::InvalidFormat { path, reason } => format!(
                "The file at {} is not a roster state file: {}",
                path.display(),
                reason
            ),
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => format!(
                "This state file was written by a newer release \
                 (file version {found}, this build reads up to {max_supported})."
            ),
            Self::Serialization { .. } => {
                "An error occurred while saving the roster state.".to_string()
            }
            Self::Deserialization { path, source } => format!(
                "The state file at {} could not be read (line {}, column {}). \
                 It may be corrupted.",
                path.display(),
                source.line(),
                source.column()
            ),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the file to {}. Check disk space and permissions.",
                target_path.display()
            ),
        }
    }

    /// How to resolve this error, when there is something to suggest.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => {
                Some("Pass the JSON file written by a previous run with --state.".into())
            }
            Self::UnsupportedVersion { .. } => {
                Some("Upgrade to the release that wrote this file.".into())
            }
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } => Some("Restore the file from a backup.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or save to a different location.".into())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
