use crate::ir::{BfInstruction, Call, FReturn, Loop, MoveValue, WidthSwitch};
use crate::label::Label;

/// Everything the code generator needs, produced by a single pass over the
/// token stream (§3 "ParsedContext").
#[derive(Debug, Clone, Default)]
pub struct ParsedContext {
    pub labels: Vec<Label>,
    pub switches: Vec<WidthSwitch>,
    pub returns: Vec<FReturn>,
    pub calls: Vec<Call>,
    pub externs: Vec<String>,
    pub done_loops: Vec<Loop>,
    pub instructions: Vec<BfInstruction>,
    pub moves: Vec<MoveValue>,
    /// One past the last token position the parser actually visited —
    /// the code generator's position loop runs `0..last_position`.
    pub last_position: usize,
}
