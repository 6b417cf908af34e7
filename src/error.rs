//! Centralized error types for invitecopy.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the invitecopy library.
///
/// A message without a calendar part is not an error; the locator returns
/// `None` for it.
#[derive(Error, Debug)]
pub enum InviteError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The calendar payload is not valid base64.
    #[error("Invalid base64 in calendar part: {0}")]
    Decode(#[from] base64::DecodeError),

    /// An anchor substring needed to slice a field out of the invite is absent.
    #[error("Anchor {anchor:?} not found while extracting {key}")]
    MissingAnchor { key: String, anchor: String },

    /// The host could not provide a message, tab or theme.
    #[error("Host API error: {0}")]
    Host(String),

    /// The clipboard write was rejected.
    #[error("Clipboard write failed: {0}")]
    Clipboard(String),
}

/// Convenience alias for `Result<T, InviteError>`.
pub type Result<T> = std::result::Result<T, InviteError>;

impl InviteError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `MissingAnchor` variant.
    pub fn missing_anchor(key: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self::MissingAnchor {
            key: key.into(),
            anchor: anchor.into(),
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare, prefer `InviteError::io`).
impl From<std::io::Error> for InviteError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
