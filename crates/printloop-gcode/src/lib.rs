#![warn(missing_docs)]

//! G-code looping core for unattended repeat printing.
//!
//! This crate splits a sliced G-code stream into header, print body, and
//! footer, then reassembles the body into a repeated sequence with bed
//! sweeps and timed pauses between repetitions. Several streams can be
//! chained into one base sequence (in a chosen order) before looping.
//!
//! # Example
//!
//! ```ignore
//! use printloop_gcode::{assemble_looped, locate_sections, LoopSettings};
//!
//! let sections = locate_sections(&gcode)?;
//! let settings = LoopSettings {
//!     loop_count: 3,
//!     wait_minutes: 10,
//!     ..Default::default()
//! };
//! let looped = assemble_looped(&sections, &settings)?;
//! ```

pub mod assemble;
pub mod error;
pub mod estimate;
pub mod limits;
pub mod sections;
pub mod sweep;

pub use assemble::{assemble_looped, combine_sources, LoopSettings, PrintSource};
pub use error::{LoopError, Result};
pub use estimate::estimate_print_minutes;
pub use limits::Limits;
pub use sections::{locate_sections, GcodeSections};
pub use sweep::{default_sweep_pattern, resolve_sweep_pattern};
