//! Shared diagnostics plumbing used by every bfppc compiler phase.
//!
//! The core pipeline (tokenizer, parser, code generator) never aborts on
//! malformed input — §7 of the design treats the tool as a translator, not a
//! verifier. Instead of scattering `eprintln!` calls through the parser the
//! way the reference implementation does, every phase reports through a
//! shared [`Diagnostics`] sink, so callers (tests, the CLI driver) can
//! inspect what was reported instead of capturing stderr.

mod diagnostics;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
