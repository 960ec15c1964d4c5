//! Prioritized text decoding for G-code entries.

use encoding_rs::{Encoding, WINDOWS_1252};

/// Encodings tried after strict UTF-8, in priority order.
const FALLBACK_ENCODINGS: &[&Encoding] = &[WINDOWS_1252];

/// Decode raw entry bytes as text.
///
/// Tries strict UTF-8 first, then the fallback encodings in order,
/// rejecting any decode that needed replacement characters. Content with
/// NUL bytes is binary, not a mislabeled text encoding, and is rejected
/// up front.
pub fn decode_text(raw: &[u8]) -> Option<String> {
    if raw.contains(&0) {
        return None;
    }
    if let Ok(text) = std::str::from_utf8(raw) {
        return Some(text.to_string());
    }
    for encoding in FALLBACK_ENCODINGS {
        let (text, _, had_errors) = encoding.decode(raw);
        if !had_errors {
            return Some(text.into_owned());
        }
    }
    None
}
