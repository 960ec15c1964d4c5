//! Best-effort extraction of the slicer's estimated print time.
//!
//! Slicers annotate their output with an estimated duration in vendor
//! specific comment forms. This is informational only: absence is a valid
//! state, never an error, and nothing downstream depends on the value.

use std::sync::LazyLock;

use regex::Regex;

/// Comment patterns carrying an estimate in seconds, in priority order.
static SECONDS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i);\s*model printing time:\s*(\d+)\s*s",
        r"(?i);\s*total estimated time:\s*(\d+)\s*s",
        r"(?i);\s*estimated printing time[^\n\d]*(\d+)\s*s",
        r"(?i);\s*print time:\s*(\d+)\s*s",
        r"(?i);\s*total time:\s*(\d+)\s*s",
        r"(?i);\s*time:\s*(\d+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Fallback: an `HH:MM:SS` duration anywhere in a comment line.
static HMS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^;[^\n]*?(\d{1,2}):(\d{2}):(\d{2})").unwrap());

/// Extract the slicer's estimated print time in whole minutes (rounded up).
///
/// Tries the seconds-valued comment patterns in priority order, treating
/// non-positive values as no match, then falls back to an `HH:MM:SS` shaped
/// comment. Returns `None` when nothing matches.
pub fn estimate_print_minutes(text: &str) -> Option<u64> {
    for pattern in SECONDS_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Ok(seconds) = caps[1].parse::<u64>() {
                if seconds > 0 {
                    return Some(seconds.div_ceil(60));
                }
            }
        }
    }

    let caps = HMS_PATTERN.captures(text)?;
    let hours: u64 = caps[1].parse().ok()?;
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;
    let total = hours * 3600 + minutes * 60 + seconds;
    (total > 0).then(|| total.div_ceil(60))
}
