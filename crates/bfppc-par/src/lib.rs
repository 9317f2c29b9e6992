//! Single-pass parser / IR builder for BF++ (component B).
//!
//! Consumes the keyword-classified token stream [`bfppc_lex`] produces and
//! folds it into a [`ParsedContext`]: run-length-folded BF instructions,
//! matched loop brackets, labels, width switches, moves, externs, calls, and
//! early returns. The code generator walks this structure position-by-
//! position; the parser itself never emits assembly.

pub mod context;
pub mod ir;
pub mod label;
pub mod parser;

pub use context::ParsedContext;
pub use ir::{BfInstruction, BfOpType, Call, FReturn, Loop, MoveValue, Width, WidthSwitch};
pub use label::Label;
pub use parser::parse;
