//! Position-driven AT&T assembly code generator for BF++ (component C).
//!
//! Walks a [`bfppc_par::ParsedContext`] once, in position order, and writes
//! GNU AS assembly text. Owns the register-sync peephole that elides
//! redundant immediate loads around syscall setup and argument marshalling.

pub mod error;
pub mod generator;
pub mod options;
pub mod registers;

pub use error::{CodeGenError, Result};
pub use generator::generate;
pub use options::CodegenOptions;
pub use registers::{Register, Registers};
