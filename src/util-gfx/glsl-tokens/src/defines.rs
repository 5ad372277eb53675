use std::fmt::Write as _;

use crate::{
    preprocessor::PpLine,
    token::TokenKind,
    tokenize::tokenize,
};

/// Inserts a `#define NAME VALUE` line per define, in order. The lines go right after the last
/// `#version` or `#extension` directive since those must precede everything else, or at the very
/// start of the source when it has neither.
pub fn inject_defines<K, V>(source: &str, defines: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut block = String::new();
    for (name, value) in defines {
        let (name, value) = (name.as_ref(), value.as_ref());

        if !block.is_empty() {
            block.push('\n');
        }

        if value.is_empty() {
            let _ = write!(block, "#define {name}");
        } else {
            let _ = write!(block, "#define {name} {value}");
        }
    }

    if block.is_empty() {
        return source.to_string();
    }

    let header_end = tokenize(source)
        .iter()
        .filter(|token| token.kind == TokenKind::Preprocessor)
        .filter(|token| PpLine::parse(&token.data).is_some_and(|line| line.is_header()))
        .last()
        .map(|token| token.end_offset());

    let mut out = String::with_capacity(source.len() + block.len() + 1);
    match header_end {
        Some(at) => {
            out.push_str(&source[..at]);
            out.push('\n');
            out.push_str(&block);
            out.push_str(&source[at..]);
        }
        None => {
            out.push_str(&block);
            out.push('\n');
            out.push_str(source);
        }
    }

    out
}
