//! Locates the header, print body, and footer of a sliced G-code stream.
//!
//! Sliced G-code has no guaranteed grammar, so boundaries are found with a
//! prioritized marker search plus a line-scan fallback. Table order encodes
//! priority: the first table entry found anywhere in the text wins, even if
//! a lower-priority marker occurs earlier in the stream.

use crate::error::{LoopError, Result};

/// Start markers in priority order. The print body begins at the first
/// occurrence of the highest-priority marker present.
const START_MARKERS: &[&str] = &[
    ";LAYER:0",
    "; layer 0",
    ";TYPE:WALL-OUTER",
    "G1 Z0.3",
    "; retract extruder",
];

/// End markers in priority order. The print body ends at the LAST
/// occurrence of the highest-priority marker present.
const END_MARKERS: &[&str] = &[
    ";END gcode",
    ";End of Gcode",
    ";end of print",
    "M104 S0",
    "M140 S0",
];

/// Minimum plausible print body length. Anything shorter is a false
/// positive from the marker search.
const MIN_BODY_LEN: usize = 100;

/// Leading input kept as diagnostic context when location fails.
const CONTEXT_CHARS: usize = 1000;

/// The three regions of a sliced G-code stream.
#[derive(Debug, Clone)]
pub struct GcodeSections {
    /// Machine setup: everything before the first print move.
    pub header: String,
    /// The repeatable toolpath.
    pub body: String,
    /// Shutdown sequence: everything from the end marker on.
    pub footer: String,
}

/// Split a G-code stream into header, print body, and footer.
///
/// Runs the prioritized marker scans first, then the line-scan fallback for
/// any boundary still unresolved. Fails when neither pass can place both
/// boundaries, when the end precedes the start, or when the body is too
/// short to be real toolpath.
pub fn locate_sections(text: &str) -> Result<GcodeSections> {
    let mut start = START_MARKERS.iter().find_map(|m| text.find(m));
    let mut end = END_MARKERS.iter().find_map(|m| text.rfind(m));

    if start.is_none() || end.is_none() {
        let (fallback_start, fallback_end) = scan_lines(text);
        if start.is_none() {
            start = fallback_start;
        }
        if end.is_none() {
            end = fallback_end;
        }
    }

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(LoopError::StructureNotRecognized {
                context: text.chars().take(CONTEXT_CHARS).collect(),
            })
        }
    };

    if end < start {
        return Err(LoopError::ReversedBoundaries { start, end });
    }

    let body = &text[start..end];
    if body.len() < MIN_BODY_LEN {
        return Err(LoopError::BodyTooShort { len: body.len() });
    }

    Ok(GcodeSections {
        header: text[..start].to_string(),
        body: body.to_string(),
        footer: text[end..].to_string(),
    })
}

/// Line-scan fallback: the first move with a Z component marks the start,
/// the last heater-off or homing line marks the end.
fn scan_lines(text: &str) -> (Option<usize>, Option<usize>) {
    let mut start = None;
    let mut end = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if start.is_none()
            && (line.contains("G1") || line.contains("G0"))
            && line.contains('Z')
        {
            start = Some(offset);
        }
        if line.contains("M104 S0") || line.contains("M140 S0") || line.contains("G28") {
            end = Some(offset);
        }
        offset += line.len();
    }

    (start, end)
}
