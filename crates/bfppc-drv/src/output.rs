//! Output-path / file-extension handling.
//!
//! The emitted file type is derived from the output path's extension,
//! lower-cased for comparison, then the (lower-cased) extension is
//! reattached to the extension-stripped base to get the final path — so
//! `-o Program.S` still writes `Program.s`.

use std::path::{Path, PathBuf};

use crate::error::{DriverError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Assembly,
    Object,
}

/// Splits `output` into its extension-stripped base and recognized
/// [`OutputKind`], or an "Unknown file extension" error for anything else.
pub fn classify_output(output: &Path) -> Result<(PathBuf, OutputKind)> {
    let raw = output.to_string_lossy();
    let (base, ext) = match raw.rfind('.') {
        Some(idx) => (raw[..idx].to_string(), raw[idx..].to_ascii_lowercase()),
        None => return Err(DriverError::UnknownExtension),
    };
    let kind = match ext.as_str() {
        ".s" | ".asm" => OutputKind::Assembly,
        ".o" | ".obj" => OutputKind::Object,
        _ => return Err(DriverError::UnknownExtension),
    };
    Ok((PathBuf::from(format!("{base}{ext}")), kind))
}
