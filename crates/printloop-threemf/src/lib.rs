#![warn(missing_docs)]

//! 3MF container handling for the print looper.
//!
//! This crate provides:
//! - Locating and decoding the first G-code entry of a sliced 3MF
//! - Splicing replacement G-code back in with every other entry preserved
//!   byte-for-byte
//!
//! # Example
//!
//! ```ignore
//! use printloop_threemf::{read_gcode, rewrite_gcode};
//!
//! let bytes = std::fs::read("sliced.3mf")?;
//! let entry = read_gcode(&bytes)?;
//! let looped = rework(&entry.text)?;
//! std::fs::write("looped.3mf", rewrite_gcode(&bytes, &looped)?)?;
//! ```

pub mod archive;
pub mod decode;
pub mod error;

pub use archive::{read_gcode, rewrite_gcode, GcodeEntry, GCODE_SUFFIX};
pub use decode::decode_text;
pub use error::{Result, ThreeMfError};
