//! Error types for G-code looping.

use thiserror::Error;

/// Errors from section location and sequence assembly.
#[derive(Error, Debug)]
pub enum LoopError {
    /// Neither the marker tables nor the line-scan fallback could locate
    /// both print boundaries.
    #[error("could not locate print boundaries; file may not be sliced. Input starts with:\n{context}")]
    StructureNotRecognized {
        /// Leading portion of the input, kept for diagnostics.
        context: String,
    },

    /// The located print body is too short to be real toolpath.
    #[error("print body is only {len} characters; file may not be sliced")]
    BodyTooShort {
        /// Length of the rejected body.
        len: usize,
    },

    /// The end boundary precedes the start boundary.
    #[error("print end (byte {end}) precedes print start (byte {start})")]
    ReversedBoundaries {
        /// Byte offset of the start boundary.
        start: usize,
        /// Byte offset of the end boundary.
        end: usize,
    },

    /// Invalid loop settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Requested loop count exceeds the configured ceiling.
    #[error("loop count {requested} exceeds maximum {max}")]
    TooManyLoops {
        /// Requested loop count.
        requested: u32,
        /// Configured ceiling.
        max: u32,
    },

    /// Number of source files exceeds the configured ceiling.
    #[error("file count {requested} exceeds maximum {max}")]
    TooManyFiles {
        /// Requested file count.
        requested: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// Sweep pattern override exceeds the configured ceiling.
    #[error("sweep pattern override is {size} bytes, maximum is {max}")]
    PatternTooLarge {
        /// Override size in bytes.
        size: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// File order is not a permutation of the inputs.
    #[error("invalid file order: {0}")]
    InvalidFileOrder(String),

    /// Assembled output exceeds the configured ceiling.
    #[error("assembled G-code is {size} bytes, maximum is {max}")]
    OutputTooLarge {
        /// Assembled size in bytes.
        size: usize,
        /// Configured ceiling.
        max: usize,
    },
}

/// Result type for looping operations.
pub type Result<T> = std::result::Result<T, LoopError>;
