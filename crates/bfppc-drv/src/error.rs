//! Error type for the driver's own collaborator duties: file I/O,
//! extension parsing, and assembler invocation. The core crates never
//! return these — they report through [`bfppc_util::Diagnostics`] instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("bf++: error: no input files")]
    NoInputFiles,

    #[error("bf++: error: Unknown file extension")]
    UnknownExtension,

    #[error("bf++: error: Assembler {0} not found")]
    AssemblerNotFound(String),

    #[error("could not read input file {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not create output file {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    CodeGen(#[from] bfppc_gen::CodeGenError),

    #[error("failed to invoke assembler {assembler}: {source}")]
    AssemblerSpawn {
        assembler: String,
        #[source]
        source: std::io::Error,
    },

    #[error("assembler {assembler} exited with a failure status")]
    AssemblerFailed { assembler: String },
}

pub type Result<T> = std::result::Result<T, DriverError>;
