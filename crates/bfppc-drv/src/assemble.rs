//! External-assembler discovery and invocation for object output.
//!
//! Out of the core's scope by design — the core only ever produces
//! assembly text; turning that into an object file is delegated to
//! whatever `as`-compatible assembler the host provides.

use std::path::Path;
use std::process::Command;

use crate::error::{DriverError, Result};

/// The assembler name probed for when `-a`/`--assembler` is not given.
pub const DEFAULT_ASSEMBLER: &str = "as";

/// Probes for `name` on `PATH` via `which` (or `where` on Windows) by
/// shelling out rather than parsing `PATH` directly.
pub fn is_available(name: &str) -> bool {
    let probe = if cfg!(windows) { "where" } else { "which" };
    Command::new(probe)
        .arg(name)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Resolves the assembler to use for object output: the `-a` override if
/// given, else [`DEFAULT_ASSEMBLER`] — reported missing if neither is on
/// `PATH`.
pub fn resolve(requested: Option<&str>) -> Result<String> {
    let assembler = requested.unwrap_or(DEFAULT_ASSEMBLER).to_string();
    if is_available(&assembler) {
        Ok(assembler)
    } else {
        Err(DriverError::AssemblerNotFound(assembler))
    }
}

/// Invokes `assembler <asm_path> -o <output_path>`.
pub fn assemble(assembler: &str, asm_path: &Path, output_path: &Path) -> Result<()> {
    let status = Command::new(assembler)
        .arg(asm_path)
        .arg("-o")
        .arg(output_path)
        .status()
        .map_err(|source| DriverError::AssemblerSpawn {
            assembler: assembler.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(DriverError::AssemblerFailed {
            assembler: assembler.to_string(),
        })
    }
}
