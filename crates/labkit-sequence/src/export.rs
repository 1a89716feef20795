//! Writing movement programs to disk.

use crate::buffer::SequenceBuffer;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// File stem used when a buffer has no usable name
pub const DEFAULT_EXPORT_NAME: &str = "sequence";

/// Keep only `[A-Za-z0-9_-]`
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// `<name>_<YYYY-MM-DD>.gcode`
pub fn export_file_name(name: &str, date: NaiveDate) -> String {
    let name = sanitize_name(name);
    let stem = if name.is_empty() {
        DEFAULT_EXPORT_NAME
    } else {
        name.as_str()
    };
    format!("{}_{}.gcode", stem, date.format("%Y-%m-%d"))
}

/// Write the buffer text verbatim into `dir`, returning the file path
pub fn export_to_dir(
    buffer: &SequenceBuffer,
    dir: impl AsRef<Path>,
    date: NaiveDate,
) -> Result<PathBuf> {
    if buffer.is_blank() {
        bail!("No G-code to export. Generate a sequence first");
    }
    let path = dir.as_ref().join(export_file_name(buffer.name(), date));
    std::fs::write(&path, buffer.content())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Exported sequence '{}' to {}", buffer.name(), path.display());
    Ok(path)
}
