//! C-style escape lookup table.
//!
//! The tokenizer does not yet consume string or character literals, so
//! nothing in this crate calls [`escape_byte`] today — it exists because the
//! reference implementation pre-builds the same table for that purpose, and
//! a future `"..."`/`'...'` lexer stage will need it.

use std::sync::OnceLock;

fn build_table() -> [u8; 128] {
    let mut table = [0u8; 128];
    table[b'n' as usize] = b'\n';
    table[b't' as usize] = b'\t';
    table[b'0' as usize] = 0;
    table[b'b' as usize] = 0x08;
    table[b'r' as usize] = b'\r';
    table[b'a' as usize] = 0x07;
    table[b'\'' as usize] = b'\'';
    table[b'"' as usize] = b'"';
    table[b'?' as usize] = b'?';
    table[b'\\' as usize] = b'\\';
    table[b'f' as usize] = 0x0c;
    table[b'v' as usize] = 0x0b;
    table
}

static ESCAPE_TABLE: OnceLock<[u8; 128]> = OnceLock::new();

/// Looks up the byte a `\<letter>` escape denotes, or `None` if `letter`
/// names no recognized escape.
pub fn escape_byte(letter: u8) -> Option<u8> {
    if letter >= 128 {
        return None;
    }
    let table = ESCAPE_TABLE.get_or_init(build_table);
    let mapped = table[letter as usize];
    if mapped == 0 && letter != b'0' {
        None
    } else {
        Some(mapped)
    }
}
