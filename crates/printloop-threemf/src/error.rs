//! Error types for 3MF container handling.

use thiserror::Error;

/// Errors from 3MF reading and rewriting.
#[derive(Error, Debug)]
pub enum ThreeMfError {
    /// The bytes are not a readable zip archive.
    #[error("not a valid 3MF archive: {0}")]
    Archive(String),

    /// No entry with the G-code suffix exists in the archive.
    #[error("no .gcode entry found; slice the model first")]
    NoGcodeEntry,

    /// The G-code entry could not be decoded with any supported encoding.
    #[error("could not decode {name} as text with any supported encoding")]
    Decode {
        /// Name of the undecodable entry.
        name: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for 3MF operations.
pub type Result<T> = std::result::Result<T, ThreeMfError>;
