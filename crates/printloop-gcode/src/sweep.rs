//! Built-in bed sweep pattern and override resolution.

/// Bed-clearing maneuver: raise the nozzle, then push finished parts off
/// the plate with back-and-forth Y traversals at fixed X increments,
/// synchronized on both ends with `M400`.
const DEFAULT_SWEEP: &str = "; --- AUTO SWEEP START ---\n\
M400\n\
G91\n\
G1 Z5 F2000\n\
G90\n\
G1 X0 Y220 F6000\n\
G1 X0 Y0 F6000\n\
G1 X55 Y220 F6000\n\
G1 X55 Y0 F6000\n\
G1 X110 Y220 F6000\n\
G1 X110 Y0 F6000\n\
G1 X165 Y220 F6000\n\
G1 X165 Y0 F6000\n\
G1 X220 Y220 F6000\n\
G1 X220 Y0 F6000\n\
M400\n\
; --- AUTO SWEEP END ---\n";

/// The built-in bed sweep fragment.
pub fn default_sweep_pattern() -> &'static str {
    DEFAULT_SWEEP
}

/// Pick the sweep pattern to emit: a non-empty override wins (normalized to
/// end in exactly one newline), otherwise the built-in pattern.
pub fn resolve_sweep_pattern(override_pattern: Option<&str>) -> String {
    match override_pattern.map(str::trim) {
        Some(pattern) if !pattern.is_empty() => format!("{pattern}\n"),
        _ => DEFAULT_SWEEP.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_shape() {
        let sweep = default_sweep_pattern();
        assert!(sweep.starts_with("; --- AUTO SWEEP START ---"));
        assert!(sweep.ends_with("; --- AUTO SWEEP END ---\n"));
        // One traversal pair per X increment across the 220mm bed.
        assert_eq!(sweep.matches("Y220 F6000").count(), 5);
        assert_eq!(sweep.matches("M400").count(), 2);
    }

    #[test]
    fn test_resolve_default() {
        assert_eq!(resolve_sweep_pattern(None), DEFAULT_SWEEP);
        assert_eq!(resolve_sweep_pattern(Some("   \n")), DEFAULT_SWEEP);
    }

    #[test]
    fn test_resolve_override_normalizes_newline() {
        assert_eq!(
            resolve_sweep_pattern(Some("G1 X0 Y300 F9000")),
            "G1 X0 Y300 F9000\n"
        );
        assert_eq!(
            resolve_sweep_pattern(Some("G1 X0 Y300 F9000\n\n")),
            "G1 X0 Y300 F9000\n"
        );
    }
}
