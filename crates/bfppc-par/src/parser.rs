//! Single-pass parser / IR builder (§4.2).
//!
//! The parser advances one token at a time, maintaining a small state
//! machine (`Normal` / `Label` / `Bfpp`) the way the reference's
//! `ParsingStateHandle` dispatch does. Lookahead-consuming directives
//! (`mov`, `extern`, `call`) advance the cursor past their operand so the
//! operand token is never revisited (§3 invariant I4).

use bfppc_lex::{Keyword, Token, TokenType};
use bfppc_util::Diagnostics;

use crate::context::ParsedContext;
use crate::ir::{BfInstruction, BfOpType, Call, FReturn, Loop, MoveValue, Width, WidthSwitch};
use crate::label::Label;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Normal,
    Label,
    Bfpp,
}

/// Maps a folded-instruction token type to its IR type, or `None` if the
/// token does not participate in run-length folding.
fn bf_op_type(ty: TokenType) -> Option<BfOpType> {
    match ty {
        TokenType::LShift => Some(BfOpType::Left),
        TokenType::RShift => Some(BfOpType::Right),
        TokenType::Plus => Some(BfOpType::Plus),
        TokenType::Minus => Some(BfOpType::Minus),
        TokenType::Dot => Some(BfOpType::Output),
        TokenType::Star => Some(BfOpType::Argument),
        TokenType::LSquare | TokenType::RSquare => Some(BfOpType::Loop),
        TokenType::Ampersand => Some(BfOpType::GetArg),
        _ => None,
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    state: ParseState,
    special: bool,
    declared_type: Keyword,
    pending_ty: BfOpType,
    pending_count: u32,
    open_loops: Vec<usize>,
    ctx: ParsedContext,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            tokens,
            pos: 0,
            state: ParseState::Normal,
            special: false,
            declared_type: Keyword::Void,
            pending_ty: BfOpType::None,
            pending_count: 0,
            open_loops: Vec::new(),
            ctx: ParsedContext::default(),
            diagnostics,
        }
    }

    fn tok_ty(&self, idx: usize) -> TokenType {
        self.tokens[idx].ty
    }

    fn tok_keyword(&self, idx: usize) -> Keyword {
        self.tokens[idx].keyword
    }

    fn tok_line(&self, idx: usize) -> u32 {
        self.tokens.get(idx).map(|t| t.line).unwrap_or(0)
    }

    fn tok_value_string(&self, idx: usize) -> String {
        self.tokens[idx].value_str().into_owned()
    }

    fn has_next(&self) -> bool {
        self.pos + 1 < self.tokens.len()
    }

    /// Flushes the pending folded run, if any (§3 invariant I3). The
    /// flushed instruction's position is `pos - 1`: the position of the
    /// run's *last* token, which is always one behind whatever token
    /// triggered the flush.
    fn flush_pending(&mut self) {
        if self.pending_ty != BfOpType::None {
            let position = self.pos.saturating_sub(1);
            self.ctx
                .instructions
                .push(BfInstruction::new(self.pending_ty, self.pending_count, position));
            self.pending_ty = BfOpType::None;
            self.pending_count = 0;
        }
    }

    fn reset_parse_state(&mut self) {
        self.state = ParseState::Normal;
        self.special = false;
        self.declared_type = Keyword::Void;
        self.pending_ty = BfOpType::None;
        self.pending_count = 0;
    }

    /// Folds a Brainfuck-operator token into the pending run, or — for `[`
    /// and `]` — flushes any pending non-loop run and records the bracket
    /// directly. Loop brackets are singletons (§9 "Instruction-folding
    /// across `[` and `]`"): they never themselves become a folded IR
    /// instruction, since the generator schedules loop markers from
    /// `done_loops`, not from the instruction stream (§4.3 point 1 vs 5).
    fn fold_instruction(&mut self, op_ty: BfOpType) {
        if op_ty == BfOpType::Loop {
            self.flush_pending();
            match self.tok_ty(self.pos) {
                TokenType::LSquare => self.open_loops.push(self.pos),
                TokenType::RSquare => {
                    if let Some(start) = self.open_loops.pop() {
                        self.ctx.done_loops.push(Loop { start, end: self.pos });
                    }
                    // An unmatched `]` is left unreported, per §3 invariant
                    // I2: the reference does not diagnose unmatched
                    // brackets either.
                }
                _ => unreachable!("fold_instruction called with a non-bracket Loop token"),
            }
            return;
        }

        if op_ty != self.pending_ty {
            self.flush_pending();
            self.pending_ty = op_ty;
            self.pending_count = 1;
        } else {
            self.pending_count += 1;
        }
    }

    fn normal_parse(&mut self) {
        match self.tok_ty(self.pos) {
            TokenType::At => {
                self.flush_pending();
                self.state = ParseState::Label;
            }
            TokenType::Exclamation => {
                if self.ctx.labels.is_empty() {
                    self.diagnostics.warn("Global returns are not permitted", None);
                    return;
                }
                self.flush_pending();
                self.ctx.returns.push(FReturn {
                    position: self.pos,
                    label_index: self.ctx.labels.len() - 1,
                });
            }
            TokenType::Question => {
                self.flush_pending();
                self.state = ParseState::Bfpp;
            }
            TokenType::Caret => {
                self.flush_pending();
                if let Some(last) = self.ctx.instructions.last_mut() {
                    last.address = true;
                }
            }
            ty => {
                if let Some(op_ty) = bf_op_type(ty) {
                    self.fold_instruction(op_ty);
                } else {
                    self.flush_pending();
                }
            }
        }
    }

    fn handle_mov(&mut self) {
        if !self.has_next() {
            self.diagnostics.warn(
                "Error on mov instruction, abruptly ended",
                Some(self.tok_line(self.pos)),
            );
            return;
        }
        let operand = self.pos + 1;
        self.pos += 1;
        let line = self.tok_line(operand);
        let value = self.tok_value_string(operand);
        let parsed = match self.tok_ty(operand) {
            TokenType::Decimal => value.parse::<i64>().ok(),
            TokenType::Hex => {
                let digits = value
                    .strip_prefix("0x")
                    .or_else(|| value.strip_prefix("0X"))
                    .unwrap_or(&value);
                i64::from_str_radix(digits, 16).ok()
            }
            _ => None,
        };
        match parsed {
            Some(v) => self.ctx.moves.push(MoveValue { value: v, position: operand }),
            None => self
                .diagnostics
                .warn("Unknown value on mov instruction", Some(line)),
        }
    }

    fn handle_extern(&mut self) {
        if !self.has_next() {
            self.diagnostics.warn(
                "Error on extern instruction, abruptly ended",
                Some(self.tok_line(self.pos)),
            );
            return;
        }
        let operand = self.pos + 1;
        self.pos += 1;
        if self.tok_ty(operand) == TokenType::Alpha {
            self.ctx.externs.push(self.tok_value_string(operand));
        } else {
            self.diagnostics.warn(
                "Unknown token on extern instruction",
                Some(self.tok_line(operand)),
            );
        }
    }

    fn handle_call(&mut self) {
        if !self.has_next() {
            self.diagnostics.warn(
                "Error on call instruction, abruptly ended",
                Some(self.tok_line(self.pos)),
            );
            return;
        }
        let operand = self.pos + 1;
        self.pos += 1;
        if self.tok_ty(operand) == TokenType::Alpha {
            let name = self.tok_value_string(operand);
            self.ctx.calls.push(Call { position: operand, name });
        } else {
            self.diagnostics
                .warn("Unknown token on call instruction", Some(self.tok_line(operand)));
        }
    }

    fn bfpp_parse(&mut self) {
        match self.tok_keyword(self.pos) {
            Keyword::None => {
                self.state = ParseState::Normal;
                return;
            }
            Keyword::I8 | Keyword::U8 => self.ctx.switches.push(WidthSwitch {
                width: Width::Byte,
                position: self.pos,
            }),
            Keyword::I16 | Keyword::U16 => self.ctx.switches.push(WidthSwitch {
                width: Width::Word,
                position: self.pos,
            }),
            Keyword::I32 | Keyword::U32 => self.ctx.switches.push(WidthSwitch {
                width: Width::Dword,
                position: self.pos,
            }),
            Keyword::I64 | Keyword::U64 => self.ctx.switches.push(WidthSwitch {
                width: Width::Qword,
                position: self.pos,
            }),
            Keyword::Mov => self.handle_mov(),
            Keyword::Extern => self.handle_extern(),
            Keyword::Call => self.handle_call(),
            Keyword::Void => {}
        }
        self.state = ParseState::Normal;
    }

    fn label_parse(&mut self) {
        if !self.special {
            if let Some(last) = self.ctx.labels.last_mut() {
                last.end = self.pos;
            }
            let name = self.tok_value_string(self.pos);
            self.ctx
                .labels
                .push(Label::new(name, self.pos, 0, self.declared_type));
            self.reset_parse_state();

            if self.has_next() && self.tok_ty(self.pos + 1) == TokenType::Colon {
                self.special = true;
                self.state = ParseState::Label;
            } else {
                self.state = ParseState::Normal;
            }
        } else {
            if self.has_next() {
                let type_pos = self.pos + 1;
                let kwd = self.tok_keyword(type_pos);
                if kwd.is_type() {
                    if let Some(last) = self.ctx.labels.last_mut() {
                        last.return_type = kwd;
                    }
                }
                self.pos += 1;
            }
            self.reset_parse_state();
        }
    }

    fn step(&mut self) {
        match self.state {
            ParseState::Normal => self.normal_parse(),
            ParseState::Label => self.label_parse(),
            ParseState::Bfpp => self.bfpp_parse(),
        }
    }

    fn run(mut self) -> ParsedContext {
        let len = self.tokens.len();
        while self.pos < len {
            self.step();
            self.pos += 1;
        }
        // End-of-stream finalization (§4.2): flush a trailing pending run
        // exactly as a synthetic empty token would, without indexing past
        // the real token array.
        if self.state == ParseState::Normal {
            self.flush_pending();
        }
        self.ctx.last_position = self.pos;
        self.ctx
    }
}

/// Parses a keyword-classified token stream into a [`ParsedContext`].
pub fn parse(tokens: &[Token], diagnostics: &mut Diagnostics) -> ParsedContext {
    Parser::new(tokens, diagnostics).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bfppc_lex::{classify_keywords, tokenize};

    fn parse_source(src: &str) -> (ParsedContext, Diagnostics) {
        let mut tokens = tokenize(src.as_bytes());
        classify_keywords(&mut tokens);
        let mut diags = Diagnostics::new();
        let ctx = parse(&tokens, &mut diags);
        (ctx, diags)
    }

    #[test]
    fn folds_runs_of_identical_operators() {
        let (ctx, _) = parse_source("+++---<<.");
        assert_eq!(ctx.instructions.len(), 4);
        assert_eq!(ctx.instructions[0].ty, BfOpType::Plus);
        assert_eq!(ctx.instructions[0].count, 3);
        assert_eq!(ctx.instructions[1].ty, BfOpType::Minus);
        assert_eq!(ctx.instructions[1].count, 3);
        assert_eq!(ctx.instructions[2].ty, BfOpType::Left);
        assert_eq!(ctx.instructions[2].count, 2);
        assert_eq!(ctx.instructions[3].ty, BfOpType::Output);
        assert_eq!(ctx.instructions[3].count, 1);
    }

    #[test]
    fn loops_do_not_fold_across_brackets() {
        let (ctx, _) = parse_source("[+]");
        assert_eq!(ctx.done_loops.len(), 1);
        assert_eq!(ctx.done_loops[0].start, 0);
        assert_eq!(ctx.done_loops[0].end, 2);
        assert_eq!(ctx.instructions.len(), 1);
        assert_eq!(ctx.instructions[0].ty, BfOpType::Plus);
        assert_eq!(ctx.instructions[0].count, 1);
    }

    #[test]
    fn address_flag_attaches_to_last_instruction() {
        let (ctx, _) = parse_source("*1^");
        assert_eq!(ctx.instructions.len(), 1);
        assert!(ctx.instructions[0].address);
    }

    #[test]
    fn labels_partition_positions_and_last_is_open() {
        let (ctx, _) = parse_source("@a: void + @b: void -");
        assert_eq!(ctx.labels.len(), 2);
        assert_eq!(ctx.labels[0].end, ctx.labels[1].start);
        assert_eq!(ctx.labels[1].end, 0);
    }

    #[test]
    fn label_type_takes_the_peeked_keyword() {
        let (ctx, _) = parse_source("@f: i32 +++ !");
        assert_eq!(ctx.labels[0].return_type, Keyword::I32);
    }

    #[test]
    fn global_return_is_reported_and_skipped() {
        let (ctx, diags) = parse_source("!");
        assert!(ctx.returns.is_empty());
        assert_eq!(diags.len(), 1);
        assert!(diags.iter().next().unwrap().message.contains("Global returns"));
    }

    #[test]
    fn return_inside_label_is_recorded() {
        let (ctx, diags) = parse_source("@f: i32 +++ !");
        assert_eq!(ctx.returns.len(), 1);
        assert_eq!(ctx.returns[0].label_index, 0);
        assert!(diags.is_empty());
    }

    #[test]
    fn mov_parses_decimal_and_hex() {
        let (ctx, diags) = parse_source("?mov 65 ?mov 0x41");
        assert_eq!(ctx.moves.len(), 2);
        assert_eq!(ctx.moves[0].value, 65);
        assert_eq!(ctx.moves[1].value, 65);
        assert!(diags.is_empty());
    }

    #[test]
    fn mov_with_unparseable_hex_is_diagnosed() {
        let (ctx, diags) = parse_source("?mov 0xzzz");
        assert!(ctx.moves.is_empty());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn extern_and_call_record_names() {
        let (ctx, diags) = parse_source("?extern puts @main: void *1^ ?call puts");
        assert_eq!(ctx.externs, vec!["puts".to_string()]);
        assert_eq!(ctx.calls.len(), 1);
        assert_eq!(ctx.calls[0].name, "puts");
        assert!(diags.is_empty());
    }

    #[test]
    fn width_switch_records_position() {
        let (ctx, _) = parse_source("?i32 ?mov 65");
        assert_eq!(ctx.switches.len(), 1);
        assert_eq!(ctx.switches[0].width, Width::Dword);
    }
}
