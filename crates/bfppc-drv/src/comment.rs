//! Line-comment stripping: `;` through the end of its line becomes
//! spaces, so the tokenizer's line-counting still sees every newline.
//!
//! A trivial pre-pass over the raw source bytes, run once before
//! tokenization — outside the tokenizer/parser/codegen core proper.

/// Replaces every byte from a `;` to (but not including) the next `\n` with
/// a space. The `;` itself becomes a space too; the newline is left alone
/// so line numbers downstream are unaffected.
pub fn strip_line_comments(source: &mut [u8]) {
    let mut in_comment = false;
    for byte in source.iter_mut() {
        if *byte == b'\n' {
            in_comment = false;
            continue;
        }
        if in_comment {
            *byte = b' ';
        } else if *byte == b';' {
            in_comment = true;
            *byte = b' ';
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comment_to_end_of_line() {
        let mut src = b"+++ ; this is a comment\n---".to_vec();
        strip_line_comments(&mut src);
        assert_eq!(&src, b"+++                     \n---");
    }

    #[test]
    fn comment_on_last_line_with_no_trailing_newline() {
        let mut src = b"+ ; dangling".to_vec();
        strip_line_comments(&mut src);
        assert_eq!(&src, b"+            ");
    }

    #[test]
    fn no_comment_is_a_no_op() {
        let mut src = b"@main: void +++ .".to_vec();
        let original = src.clone();
        strip_line_comments(&mut src);
        assert_eq!(src, original);
    }

    #[test]
    fn newline_byte_itself_is_preserved() {
        let mut src = b";x\ny".to_vec();
        strip_line_comments(&mut src);
        assert_eq!(&src, b"  \ny");
    }
}
