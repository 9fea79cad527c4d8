//! Error types for trueno-ctx operations.
//!
//! Rendering itself never fails: malformed domains, missing spans and empty
//! data all degrade to defaults. Errors only come from the edges: reading
//! scene configurations and writing SVG output.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trueno-ctx operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML scene configuration could not be parsed.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// JSON scene configuration could not be parsed.
    #[error("JSON configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file not found or unreadable.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Configuration file extension is neither YAML nor JSON.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_display() {
        let err = Error::ConfigParse {
            line: 7,
            message: "unexpected key".to_string(),
        };
        assert!(err.to_string().contains("line 7"));
        assert!(err.to_string().contains("unexpected key"));
    }

    #[test]
    fn test_io_from() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = Error::UnsupportedFormat("scene.toml".to_string());
        assert!(err.to_string().contains("scene.toml"));
    }
}
