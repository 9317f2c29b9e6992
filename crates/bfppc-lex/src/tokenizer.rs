//! The BF++ tokenizer: a four-state DFA over byte character classes.
//!
//! See §4.1 of the design. The tokenizer never backtracks: each input byte
//! is consumed exactly once, dispatched by the current state and the byte's
//! [`CharClass`], and the only lookahead is the implicit one-byte delay
//! inherent in "does this byte still belong to the token I'm building".

use crate::char_class::{classify, CharClass};
use crate::token::{symbol_token_type, Token, TokenType};

/// Fixed-size identifier/number scratch buffer. Identifiers or numeric
/// literals longer than this are out of scope (§4.1); bytes beyond the
/// limit are silently dropped rather than growing the buffer, so a
/// pathological input degrades instead of allocating unboundedly.
const SCRATCH_CAP: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Alpha,
    Number,
    Symbol,
}

struct Tokenizer {
    tokens: Vec<Token>,
    line: u32,
    state: State,
    ty: TokenType,
    scratch: [u8; SCRATCH_CAP],
    len: usize,
}

impl Tokenizer {
    fn new(reserve: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(reserve),
            line: 1,
            state: State::Normal,
            ty: TokenType::None,
            scratch: [0; SCRATCH_CAP],
            len: 0,
        }
    }

    #[inline]
    fn push_byte(&mut self, byte: u8) {
        if self.len < SCRATCH_CAP {
            self.scratch[self.len] = byte;
            self.len += 1;
        }
    }

    fn flush(&mut self) {
        if self.len > 0 {
            let value = self.scratch[..self.len].to_vec();
            self.tokens.push(Token::new(value, self.line, self.ty));
            self.len = 0;
        }
    }

    /// Dispatches a byte as if seen for the first time in `Normal` state:
    /// starts a new run for Alpha/Number/Symbol, or advances the line
    /// counter and returns to `Normal` on whitespace. Bytes with
    /// [`CharClass::None`] do nothing — they neither start nor end a token.
    fn dispatch(&mut self, byte: u8, class: CharClass) {
        match class {
            CharClass::Special => {
                if byte == b'\n' {
                    self.line += 1;
                }
                self.state = State::Normal;
            }
            CharClass::Symbol => {
                self.state = State::Symbol;
                self.push_byte(byte);
                self.ty = symbol_token_type(byte);
                self.flush();
            }
            CharClass::Number => {
                self.ty = TokenType::Decimal;
                self.state = State::Number;
                self.push_byte(byte);
            }
            CharClass::Alpha => {
                self.ty = TokenType::Alpha;
                self.state = State::Alpha;
                self.push_byte(byte);
            }
            CharClass::None => {}
        }
    }

    fn step_alpha(&mut self, byte: u8, class: CharClass) {
        match class {
            CharClass::Alpha | CharClass::Number => self.push_byte(byte),
            _ => {
                self.flush();
                self.dispatch(byte, class);
            }
        }
    }

    fn step_number(&mut self, byte: u8, class: CharClass) {
        if class == CharClass::Number {
            self.push_byte(byte);
        } else if byte == b'.' && self.ty != TokenType::Float {
            self.ty = TokenType::Float;
            self.push_byte(byte);
        } else if byte == b'x' && self.len == 1 && self.ty != TokenType::Hex {
            self.ty = TokenType::Hex;
            self.push_byte(byte);
        } else if class == CharClass::Alpha && self.ty == TokenType::Hex {
            self.push_byte(byte);
        } else {
            self.flush();
            self.dispatch(byte, class);
        }
    }

    fn step_symbol(&mut self, byte: u8, class: CharClass) {
        if class == CharClass::Symbol {
            self.push_byte(byte);
            self.ty = symbol_token_type(byte);
            self.flush();
        } else {
            self.dispatch(byte, class);
        }
    }

    fn step(&mut self, byte: u8, class: CharClass) {
        match self.state {
            State::Normal => self.dispatch(byte, class),
            State::Alpha => self.step_alpha(byte, class),
            State::Number => self.step_number(byte, class),
            State::Symbol => self.step_symbol(byte, class),
        }
    }
}

/// Counts bytes classified as `Symbol` or `Special` — a cheap upper-bound
/// hint for how many tokens (or token boundaries) to expect, used only to
/// size the output vector's initial allocation.
pub fn reserve_hint(source: &[u8]) -> usize {
    source
        .iter()
        .filter(|&&b| matches!(classify(b), CharClass::Symbol | CharClass::Special))
        .count()
}

/// Tokenizes `source`, reserving `reserve` slots up front.
pub fn tokenize_with_reserve(source: &[u8], reserve: usize) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(reserve);
    for &byte in source {
        let class = classify(byte);
        tokenizer.step(byte, class);
    }
    // Synthesized end-of-stream flush (§4.2 "End-of-stream finalization").
    tokenizer.flush();
    tokenizer.tokens
}

/// Tokenizes `source`, estimating the reservation via [`reserve_hint`].
pub fn tokenize(source: &[u8]) -> Vec<Token> {
    tokenize_with_reserve(source, reserve_hint(source))
}
