//! bfppc-drv — the BF++ compiler driver.
//!
//! Everything here is an external collaborator to the core: argument
//! parsing, file I/O, line-comment stripping, and optional invocation of a
//! system assembler. None of it participates in the tokenizer/parser/
//! codegen invariants — it only wires the three core crates together and
//! talks to the filesystem and the outside world on their behalf.

pub mod assemble;
pub mod cli;
pub mod comment;
pub mod error;
pub mod output;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use bfppc_gen::CodegenOptions;
use bfppc_util::Diagnostics;

pub use cli::Cli;
pub use error::{DriverError, Result};
pub use output::OutputKind;

const TEMP_ASSEMBLY_NAME: &str = "__temp_bfpp_assembly__file.s";

/// Runs the full pipeline described by a parsed [`Cli`] invocation: read the
/// input file, strip line comments, tokenize, parse, generate assembly, and
/// (for object output) invoke an external assembler. Returns the
/// diagnostics collected along the way so the caller can decide whether to
/// flush them and what exit code to use.
pub fn run(cli: &Cli) -> Result<Diagnostics> {
    let mut diagnostics = Diagnostics::new();

    let input = cli.input()?;
    let (final_path, kind) = output::classify_output(&cli.output())?;

    if kind == OutputKind::Object {
        assemble::resolve(cli.assembler.as_deref())?;
    }

    let mut source = std::fs::read(input).map_err(|source| DriverError::ReadInput {
        path: input.clone(),
        source,
    })?;
    if source.is_empty() {
        tracing::warn!(path = %input.display(), "input file not found or empty");
    }
    comment::strip_line_comments(&mut source);

    let mut tokens = bfppc_lex::tokenize(&source);
    bfppc_lex::classify_keywords(&mut tokens);
    let ctx = bfppc_par::parse(&tokens, &mut diagnostics);

    let options = CodegenOptions {
        allocate: cli.stack_size,
        base_offset: cli.base_offset,
    };

    let asm_path: PathBuf = match kind {
        OutputKind::Assembly => final_path.clone(),
        OutputKind::Object => temp_assembly_path(&final_path),
    };
    write_assembly(&asm_path, &ctx, options, &mut diagnostics)?;

    if kind == OutputKind::Object {
        let assembler = cli.assembler.clone().unwrap_or_else(|| assemble::DEFAULT_ASSEMBLER.to_string());
        let result = assemble::assemble(&assembler, &asm_path, &final_path);
        let _ = std::fs::remove_file(&asm_path);
        result?;
    }

    Ok(diagnostics)
}

fn temp_assembly_path(final_path: &Path) -> PathBuf {
    final_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|dir| dir.join(TEMP_ASSEMBLY_NAME))
        .unwrap_or_else(|| PathBuf::from(TEMP_ASSEMBLY_NAME))
}

fn write_assembly(
    path: &Path,
    ctx: &bfppc_par::ParsedContext,
    options: CodegenOptions,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let file = File::create(path).map_err(|source| DriverError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    bfppc_gen::generate(ctx, options, diagnostics, &mut writer)?;
    Ok(())
}

/// Initializes the `tracing` subscriber from `-v`/`--verbose` and the
/// `BFPPC_LOG` environment variable.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("BFPPC_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_assembly_path_sits_beside_the_final_output() {
        let p = temp_assembly_path(Path::new("build/out.o"));
        assert_eq!(p, PathBuf::from("build/__temp_bfpp_assembly__file.s"));
    }

    #[test]
    fn temp_assembly_path_with_no_directory_is_relative() {
        let p = temp_assembly_path(Path::new("out.o"));
        assert_eq!(p, PathBuf::from(TEMP_ASSEMBLY_NAME));
    }
}
