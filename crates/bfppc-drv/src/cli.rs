//! Command-line surface: a `clap` derive parser rather than a hand-rolled
//! `argv` loop. `--stack-size`/`--base-offset`/`-v` are additions layered
//! on top of the minimal input/output/assembler surface, defaulting to
//! the historical prologue constants so they never change default
//! behavior.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bfpp")]
#[command(author, version, about = "Compiles BF++ sources to x86-64 AT&T assembly.")]
pub struct Cli {
    /// BF++ source file to compile.
    ///
    /// Optional at the `clap` level so a missing positional produces a
    /// dedicated "no input files" diagnostic and exit code 1, instead of
    /// `clap`'s generic usage-error exit code 2.
    pub input_arg: Option<PathBuf>,

    /// Output path; the extension (.s/.asm/.o/.obj, case-insensitive)
    /// selects assembly or object output.
    ///
    /// Optional at the `clap` level for the same reason as `input_arg`
    /// above: a missing `-o` must still reach `output::classify_output`
    /// and fail with its own "Unknown file extension" diagnostic and exit
    /// code 1 (an empty path has no extension either), instead of
    /// `clap`'s generic usage-error exit code 2.
    #[arg(short = 'o', long = "output")]
    pub output_arg: Option<PathBuf>,

    /// External assembler to invoke for object output (default: `as`,
    /// probed for on `PATH`).
    #[arg(short = 'a', long = "assembler")]
    pub assembler: Option<String>,

    /// Stack headroom reserved by the prologue, in bytes.
    #[arg(long = "stack-size", default_value_t = 16384)]
    pub stack_size: u32,

    /// Bytes the BF tape cursor sits below the saved frame pointer.
    #[arg(long = "base-offset", default_value_t = 128)]
    pub base_offset: i32,

    /// Enable verbose (debug-level) logging.
    #[arg(short = 'v', long = "verbose", env = "BFPPC_VERBOSE")]
    pub verbose: bool,
}

impl Cli {
    /// The input path, or a "no input files" error if none was given.
    pub fn input(&self) -> crate::error::Result<&PathBuf> {
        self.input_arg
            .as_ref()
            .ok_or(crate::error::DriverError::NoInputFiles)
    }

    /// The output path, or an empty path if `-o` was not given — an empty
    /// path carries no extension either, so it reaches
    /// `output::classify_output` and fails there with its own diagnostic
    /// rather than never getting that far.
    pub fn output(&self) -> PathBuf {
        self.output_arg.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::parse_from(["bfpp", "main.bfpp", "-o", "main.s"]);
        assert_eq!(cli.input().unwrap(), &PathBuf::from("main.bfpp"));
        assert_eq!(cli.output(), PathBuf::from("main.s"));
        assert_eq!(cli.stack_size, 16384);
        assert_eq!(cli.base_offset, 128);
        assert!(cli.assembler.is_none());
    }

    #[test]
    fn missing_input_is_reported_not_panicked() {
        let cli = Cli::parse_from(["bfpp", "-o", "main.s"]);
        assert!(matches!(
            cli.input(),
            Err(crate::error::DriverError::NoInputFiles)
        ));
    }

    #[test]
    fn missing_output_parses_to_an_empty_path() {
        let cli = Cli::parse_from(["bfpp", "main.bfpp"]);
        assert_eq!(cli.output(), PathBuf::new());
    }

    #[test]
    fn parses_assembler_override() {
        let cli = Cli::parse_from(["bfpp", "main.bfpp", "-o", "main.o", "-a", "clang"]);
        assert_eq!(cli.assembler.as_deref(), Some("clang"));
    }
}
