//! Request and output ceilings.

use serde::{Deserialize, Serialize};

use crate::error::{LoopError, Result};

/// Ceilings applied to loop requests and assembled output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum number of loop repetitions.
    pub max_loop_count: u32,
    /// Maximum number of source files in one combination.
    pub max_file_count: usize,
    /// Maximum sweep pattern override size (bytes).
    pub max_sweep_pattern_bytes: usize,
    /// Maximum assembled output size (bytes).
    pub max_output_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_loop_count: 100,
            max_file_count: 25,
            max_sweep_pattern_bytes: 16 * 1024,
            max_output_bytes: 256 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Validate a loop request. Runs before any assembly happens. The sweep
    /// pattern is only checked when an override is supplied.
    pub fn check_request(
        &self,
        loop_count: u32,
        file_count: usize,
        sweep_override: Option<&str>,
    ) -> Result<()> {
        if loop_count > self.max_loop_count {
            return Err(LoopError::TooManyLoops {
                requested: loop_count,
                max: self.max_loop_count,
            });
        }
        if file_count > self.max_file_count {
            return Err(LoopError::TooManyFiles {
                requested: file_count,
                max: self.max_file_count,
            });
        }
        if let Some(pattern) = sweep_override {
            if pattern.len() > self.max_sweep_pattern_bytes {
                return Err(LoopError::PatternTooLarge {
                    size: pattern.len(),
                    max: self.max_sweep_pattern_bytes,
                });
            }
        }
        Ok(())
    }

    /// Validate the size of a fully assembled sequence. Runs on the complete
    /// result; assembly is never aborted midway on size.
    pub fn check_output_size(&self, gcode: &str) -> Result<()> {
        if gcode.len() > self.max_output_bytes {
            return Err(LoopError::OutputTooLarge {
                size: gcode.len(),
                max: self.max_output_bytes,
            });
        }
        Ok(())
    }
}
