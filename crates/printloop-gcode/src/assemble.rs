//! Looped and combined sequence assembly.
//!
//! A looped sequence repeats one print body with a timed wait and a bed
//! sweep between repetitions. A combined sequence first chains several
//! print bodies (in a caller-chosen order) into one base sequence, then
//! loops that base. The emitted wait is literal G-code (`G4`) for the
//! printer to execute, not something this code waits on.

use serde::{Deserialize, Serialize};

use crate::error::{LoopError, Result};
use crate::limits::Limits;
use crate::sections::GcodeSections;
use crate::sweep::resolve_sweep_pattern;

/// Settings for loop assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopSettings {
    /// Number of repetitions of the print body (or combined base sequence).
    pub loop_count: u32,
    /// Minutes to pause between loop repetitions.
    pub wait_minutes: u32,
    /// Minutes to pause between files within one base sequence (combined
    /// mode only).
    pub per_file_wait_minutes: u32,
    /// Emit the sweep pattern between files (combined mode only).
    pub sweep_between_files: bool,
    /// Home all axes after the final sweep.
    pub final_home: bool,
    /// Replacement sweep pattern; `None` uses the built-in pattern.
    pub sweep_override: Option<String>,
    /// Ceilings applied to the request and the output.
    pub limits: Limits,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            loop_count: 1,
            wait_minutes: 60,
            per_file_wait_minutes: 0,
            sweep_between_files: true,
            final_home: true,
            sweep_override: None,
            limits: Limits::default(),
        }
    }
}

impl LoopSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.loop_count == 0 {
            return Err(LoopError::InvalidSettings(
                "loop_count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// One source file's sections, tagged with a display name for the file
/// markers.
#[derive(Debug, Clone)]
pub struct PrintSource {
    /// Display name, typically the uploaded file name.
    pub name: String,
    /// Located sections of the file's G-code.
    pub sections: GcodeSections,
}

/// Build a looped sequence from a single source.
///
/// Emits the header once, then the body `loop_count` times inside loop
/// markers, with a wait and a sweep between repetitions (never after the
/// last), a final sweep, an optional homing move, and the footer.
pub fn assemble_looped(sections: &GcodeSections, settings: &LoopSettings) -> Result<String> {
    settings.validate()?;
    settings
        .limits
        .check_request(settings.loop_count, 1, settings.sweep_override.as_deref())?;

    let sweep = resolve_sweep_pattern(settings.sweep_override.as_deref());
    let loops = settings.loop_count as usize;

    let mut out = String::with_capacity(
        sections.header.len()
            + sections.footer.len()
            + loops * (sections.body.len() + sweep.len() + 128),
    );

    out.push_str(&sections.header);
    for i in 0..loops {
        out.push_str(&format!("\n; === LOOP {} START ===\n", i + 1));
        out.push_str(&sections.body);
        out.push_str(&format!("\n; === LOOP {} END ===\n", i + 1));
        if i + 1 < loops {
            out.push_str("\n; --- WAITING AND SWEEPING ---\n");
            push_timed_wait(&mut out, settings.wait_minutes);
            out.push_str(&sweep);
        }
    }
    out.push_str("\n; --- FINAL SWEEP ---\n");
    out.push_str(&sweep);
    if settings.final_home {
        out.push_str("G28 ; home all axes\n");
    }
    out.push_str(&sections.footer);

    settings.limits.check_output_size(&out)?;
    Ok(out)
}

/// Build a looped sequence from several sources.
///
/// Chains every body (in the chosen order) after the first file's header
/// into one base sequence, with an optional wait and sweep between files,
/// then repeats the whole base `loop_count` times with a wait and sweep
/// between repetitions. Combined output carries no footer; the final sweep
/// and optional homing close the program.
pub fn combine_sources(
    sources: &[PrintSource],
    order: Option<&[usize]>,
    settings: &LoopSettings,
) -> Result<String> {
    settings.validate()?;
    if sources.is_empty() {
        return Err(LoopError::InvalidSettings(
            "at least one source file is required".into(),
        ));
    }
    settings.limits.check_request(
        settings.loop_count,
        sources.len(),
        settings.sweep_override.as_deref(),
    )?;
    let order = resolve_order(sources.len(), order)?;

    let sweep = resolve_sweep_pattern(settings.sweep_override.as_deref());

    let bodies: usize = sources.iter().map(|s| s.sections.body.len()).sum();
    let mut base = String::with_capacity(
        sources[order[0]].sections.header.len() + bodies + sources.len() * (sweep.len() + 128),
    );
    base.push_str(&sources[order[0]].sections.header);
    base.push_str("\n; === COMBINED FILES BASE SEQUENCE ===\n");
    for (pos, &idx) in order.iter().enumerate() {
        let source = &sources[idx];
        base.push_str(&format!(
            "\n; === FILE {}: {} START ===\n",
            pos + 1,
            source.name
        ));
        base.push_str(&source.sections.body);
        base.push_str(&format!(
            "\n; === FILE {}: {} END ===\n",
            pos + 1,
            source.name
        ));
        if pos + 1 < order.len() {
            if settings.per_file_wait_minutes > 0 {
                base.push_str("\n; --- WAIT BETWEEN FILES ---\n");
                push_timed_wait(&mut base, settings.per_file_wait_minutes);
            }
            if settings.sweep_between_files {
                base.push_str("\n; --- SWEEP BETWEEN FILES ---\n");
                base.push_str(&sweep);
            }
        }
    }

    let loops = settings.loop_count as usize;
    let mut out = String::with_capacity(loops * (base.len() + sweep.len() + 128));
    out.push_str("; === COMBINED AND LOOPED FARM MODE GCODE START ===\n");
    for i in 0..loops {
        out.push_str(&format!("\n; ====== LOOP {} START ======\n", i + 1));
        out.push_str(&base);
        out.push_str(&format!("\n; ====== LOOP {} END ======\n", i + 1));
        if i + 1 < loops {
            out.push_str("\n; --- SWEEP BETWEEN LOOPS ---\n");
            push_timed_wait(&mut out, settings.wait_minutes);
            out.push_str(&sweep);
        }
    }
    out.push_str("\n; --- FINAL SWEEP ---\nM400\n");
    out.push_str(&sweep);
    if settings.final_home {
        out.push_str("G28 ; home all axes\n");
    }
    out.push_str("; === COMBINED AND LOOPED FARM MODE GCODE END ===\n");

    settings.limits.check_output_size(&out)?;
    Ok(out)
}

/// Synchronize outstanding moves, then dwell for the given wait.
fn push_timed_wait(out: &mut String, wait_minutes: u32) {
    out.push_str("M400\n");
    out.push_str(&format!(
        "G4 S{} ; wait {} minutes\n",
        u64::from(wait_minutes) * 60,
        wait_minutes
    ));
}

/// Resolve the file order: `None` keeps upload order, otherwise the given
/// indices must be a permutation referencing every source exactly once.
fn resolve_order(count: usize, order: Option<&[usize]>) -> Result<Vec<usize>> {
    let Some(order) = order else {
        return Ok((0..count).collect());
    };
    if order.len() != count {
        return Err(LoopError::InvalidFileOrder(format!(
            "expected {} entries, got {}",
            count,
            order.len()
        )));
    }
    let mut seen = vec![false; count];
    for &idx in order {
        if idx >= count {
            return Err(LoopError::InvalidFileOrder(format!(
                "index {idx} out of range for {count} files"
            )));
        }
        if seen[idx] {
            return Err(LoopError::InvalidFileOrder(format!(
                "index {idx} appears more than once"
            )));
        }
        seen[idx] = true;
    }
    Ok(order.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY_LINE: &str = "G1 X42 Y42 E1.234";

    fn sample_sections() -> GcodeSections {
        let body = format!(";LAYER:0\n{}\n", BODY_LINE.repeat(8).replace("G1", "\nG1"));
        GcodeSections {
            header: "M104 S220\nM190 S55\n".into(),
            body,
            footer: "M104 S0\nM140 S0\nM84\n".into(),
        }
    }

    fn sample_sources() -> Vec<PrintSource> {
        let mut alpha = sample_sections();
        alpha.body = alpha.body.replace("Y42", "Y10");
        let mut beta = sample_sections();
        beta.body = beta.body.replace("Y42", "Y20");
        vec![
            PrintSource {
                name: "alpha.3mf".into(),
                sections: alpha,
            },
            PrintSource {
                name: "beta.3mf".into(),
                sections: beta,
            },
        ]
    }

    #[test]
    fn test_single_loop_has_no_wait() {
        let settings = LoopSettings::default();
        let out = assemble_looped(&sample_sections(), &settings).unwrap();
        assert_eq!(out.matches("; === LOOP 1 START ===").count(), 1);
        assert_eq!(out.matches("G4 S").count(), 0);
        // Exactly the final sweep.
        assert_eq!(out.matches("; --- AUTO SWEEP START ---").count(), 1);
        assert!(out.ends_with("M104 S0\nM140 S0\nM84\n"));
    }

    #[test]
    fn test_three_loops_two_waits() {
        let settings = LoopSettings {
            loop_count: 3,
            wait_minutes: 10,
            ..Default::default()
        };
        let out = assemble_looped(&sample_sections(), &settings).unwrap();
        assert_eq!(out.matches(";LAYER:0").count(), 3);
        assert_eq!(out.matches("G4 S600 ; wait 10 minutes").count(), 2);
        // Two inter-loop sweeps plus the final one.
        assert_eq!(out.matches("; --- AUTO SWEEP START ---").count(), 3);
        assert_eq!(out.matches("G28 ; home all axes").count(), 1);
        assert!(out.starts_with("M104 S220\n"));
    }

    #[test]
    fn test_final_home_suppressed() {
        let settings = LoopSettings {
            final_home: false,
            ..Default::default()
        };
        let out = assemble_looped(&sample_sections(), &settings).unwrap();
        assert!(!out.contains("G28 ; home all axes"));
        assert!(out.contains("; --- FINAL SWEEP ---"));
    }

    #[test]
    fn test_sweep_override_used() {
        let settings = LoopSettings {
            sweep_override: Some("G1 X0 Y300 F9000".into()),
            ..Default::default()
        };
        let out = assemble_looped(&sample_sections(), &settings).unwrap();
        assert!(out.contains("G1 X0 Y300 F9000\n"));
        assert!(!out.contains("; --- AUTO SWEEP START ---"));
    }

    #[test]
    fn test_loop_count_zero_rejected() {
        let settings = LoopSettings {
            loop_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            assemble_looped(&sample_sections(), &settings),
            Err(LoopError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_loop_ceiling_rejected_before_assembly() {
        let settings = LoopSettings {
            loop_count: 101,
            ..Default::default()
        };
        assert!(matches!(
            assemble_looped(&sample_sections(), &settings),
            Err(LoopError::TooManyLoops { .. })
        ));
    }

    #[test]
    fn test_oversized_override_rejected_before_assembly() {
        let settings = LoopSettings {
            sweep_override: Some("G1 X0 Y220 F6000\n".repeat(4096)),
            ..Default::default()
        };
        assert!(matches!(
            assemble_looped(&sample_sections(), &settings),
            Err(LoopError::PatternTooLarge { .. })
        ));
    }

    #[test]
    fn test_output_size_ceiling() {
        let settings = LoopSettings {
            loop_count: 4,
            limits: Limits {
                max_output_bytes: 512,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            assemble_looped(&sample_sections(), &settings),
            Err(LoopError::OutputTooLarge { .. })
        ));
    }

    #[test]
    fn test_combine_reordered_with_wait_and_sweep() {
        // Order [beta, alpha], one loop: beta's body, then the per-file
        // wait, then the sweep, then alpha's body; no inter-loop wait.
        let sources = sample_sources();
        let settings = LoopSettings {
            loop_count: 1,
            per_file_wait_minutes: 5,
            sweep_between_files: true,
            ..Default::default()
        };
        let out = combine_sources(&sources, Some(&[1, 0]), &settings).unwrap();

        let beta_body = out.find("Y20").unwrap();
        let wait = out.find("G4 S300 ; wait 5 minutes").unwrap();
        let sweep = out.find("; --- AUTO SWEEP START ---").unwrap();
        let alpha_body = out.find("Y10").unwrap();
        assert!(beta_body < wait);
        assert!(wait < sweep);
        assert!(sweep < alpha_body);

        assert!(out.contains("; === FILE 1: beta.3mf START ==="));
        assert!(out.contains("; === FILE 2: alpha.3mf END ==="));
        assert!(!out.contains("; --- SWEEP BETWEEN LOOPS ---"));
        // Header comes from beta, the first file in the chosen order, and
        // combined mode emits no footer.
        assert!(out.contains("M104 S220"));
        assert!(!out.contains("M84"));
    }

    #[test]
    fn test_combine_looped_repeats_base() {
        let sources = sample_sources();
        let settings = LoopSettings {
            loop_count: 2,
            wait_minutes: 15,
            per_file_wait_minutes: 0,
            ..Default::default()
        };
        let out = combine_sources(&sources, None, &settings).unwrap();
        assert_eq!(out.matches("; === FILE 1: alpha.3mf START ===").count(), 2);
        assert_eq!(out.matches("; === FILE 2: beta.3mf START ===").count(), 2);
        assert_eq!(out.matches("G4 S900 ; wait 15 minutes").count(), 1);
        // Per loop: one sweep between the two files; one between loops; one
        // final.
        assert_eq!(out.matches("; --- SWEEP BETWEEN FILES ---").count(), 2);
        assert_eq!(out.matches("; --- AUTO SWEEP START ---").count(), 4);
        assert!(out.starts_with("; === COMBINED AND LOOPED FARM MODE GCODE START ==="));
        assert!(out.ends_with("; === COMBINED AND LOOPED FARM MODE GCODE END ===\n"));
    }

    #[test]
    fn test_combine_no_sweep_between_files() {
        let sources = sample_sources();
        let settings = LoopSettings {
            sweep_between_files: false,
            ..Default::default()
        };
        let out = combine_sources(&sources, None, &settings).unwrap();
        assert!(!out.contains("; --- SWEEP BETWEEN FILES ---"));
    }

    #[test]
    fn test_order_must_be_permutation() {
        let sources = sample_sources();
        let settings = LoopSettings::default();
        for bad in [&[0usize, 0][..], &[0][..], &[0, 2][..], &[0, 1, 1][..]] {
            assert!(matches!(
                combine_sources(&sources, Some(bad), &settings),
                Err(LoopError::InvalidFileOrder(_))
            ));
        }
        assert!(combine_sources(&sources, Some(&[0, 1]), &settings).is_ok());
    }

    #[test]
    fn test_combine_rejects_empty_input() {
        assert!(matches!(
            combine_sources(&[], None, &LoopSettings::default()),
            Err(LoopError::InvalidSettings(_))
        ));
    }
}
