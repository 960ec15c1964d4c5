//! 3MF container reading and G-code entry replacement.
//!
//! A sliced 3MF is a zip archive bundling the G-code with project assets.
//! Only the first entry carrying the G-code suffix is read or replaced;
//! every other entry must survive a rewrite byte-for-byte, so non-target
//! entries are raw-copied without recompression.

use std::io::{Cursor, Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::decode::decode_text;
use crate::error::{Result, ThreeMfError};

/// Entry name suffix identifying the instruction stream.
pub const GCODE_SUFFIX: &str = ".gcode";

/// The G-code entry of a container: its path inside the archive and its
/// decoded text.
#[derive(Debug, Clone)]
pub struct GcodeEntry {
    /// Entry path inside the archive.
    pub name: String,
    /// Decoded G-code text.
    pub text: String,
}

/// Read the first G-code entry of a 3MF container.
pub fn read_gcode(bytes: &[u8]) -> Result<GcodeEntry> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ThreeMfError::Archive(e.to_string()))?;
    let index = find_gcode_index(&mut archive)?;

    let mut file = archive
        .by_index(index)
        .map_err(|e| ThreeMfError::Archive(e.to_string()))?;
    let name = file.name().to_string();
    let mut raw = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut raw)?;

    let text = decode_text(&raw).ok_or_else(|| ThreeMfError::Decode { name: name.clone() })?;
    Ok(GcodeEntry { name, text })
}

/// Write a new container in which the first G-code entry's content is
/// replaced by `new_gcode` and every other entry is copied unchanged,
/// preserving names, order, and compression.
pub fn rewrite_gcode(bytes: &[u8], new_gcode: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ThreeMfError::Archive(e.to_string()))?;
    let target = find_gcode_index(&mut archive)?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(6));

    for i in 0..archive.len() {
        let file = archive
            .by_index_raw(i)
            .map_err(|e| ThreeMfError::Archive(e.to_string()))?;
        if i == target {
            let name = file.name().to_string();
            drop(file);
            writer
                .start_file(name, options)
                .map_err(|e| ThreeMfError::Archive(e.to_string()))?;
            writer.write_all(new_gcode.as_bytes())?;
        } else {
            writer
                .raw_copy_file(file)
                .map_err(|e| ThreeMfError::Archive(e.to_string()))?;
        }
    }

    let buffer = writer
        .finish()
        .map_err(|e| ThreeMfError::Archive(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// First entry (in central directory order) whose name carries the G-code
/// suffix.
fn find_gcode_index<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<usize> {
    for i in 0..archive.len() {
        let file = archive
            .by_index_raw(i)
            .map_err(|e| ThreeMfError::Archive(e.to_string()))?;
        if file.name().ends_with(GCODE_SUFFIX) {
            return Ok(i);
        }
    }
    Err(ThreeMfError::NoGcodeEntry)
}
