//! Error type for code generation (§7: the only abort case in the whole
//! pipeline is the output sink failing).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("failed to write generated assembly: {0}")]
    Write(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
