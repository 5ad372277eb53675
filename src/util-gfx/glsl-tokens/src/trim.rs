use crate::token::{Token, TokenKind};

pub fn stringify(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.data.as_str()).collect()
}

/// Tidies the whitespace of a token list which was stitched together from several modules.
///
/// Adjacent whitespace tokens are merged, leading and trailing whitespace is dropped, and runs of
/// three or more line breaks are collapsed into a single blank line which keeps the indentation
/// of the line that follows.
pub fn trim_whitespace(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::<Token>::with_capacity(tokens.len());

    for token in tokens {
        if token.kind == TokenKind::Whitespace {
            if let Some(prev) = out.last_mut().filter(|prev| prev.kind == TokenKind::Whitespace) {
                prev.data.push_str(&token.data);
                continue;
            }

            if out.iter().all(is_blank) {
                continue;
            }
        }

        out.push(token);
    }

    let content_end = out
        .iter()
        .rposition(|token| !is_blank(token))
        .map_or(0, |i| i + 1);

    out.truncate(content_end);

    for token in &mut out {
        if token.kind == TokenKind::Whitespace {
            collapse_blank_lines(&mut token.data);
        }
    }

    out
}

fn is_blank(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Whitespace | TokenKind::Eof)
}

fn collapse_blank_lines(ws: &mut String) {
    if memchr::memchr_iter(b'\n', ws.as_bytes()).count() < 3 {
        return;
    }

    let Some(last_break) = memchr::memrchr(b'\n', ws.as_bytes()) else {
        return;
    };

    let indent = ws[last_break + 1..].to_string();
    ws.clear();
    ws.push_str("\n\n");
    ws.push_str(&indent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn trimmed(source: &str) -> String {
        stringify(&trim_whitespace(tokenize(source)))
    }

    #[test]
    fn drops_outer_whitespace() {
        assert_eq!(trimmed("\n\n  float a;\n  \n"), "float a;");
        assert_eq!(trimmed(" \n "), "");
        assert_eq!(trimmed(""), "");
    }

    #[test]
    fn collapses_blank_lines() {
        assert_eq!(trimmed("a;\n\n\n\n    b;"), "a;\n\n    b;");
        assert_eq!(trimmed("a;\n\n  b;"), "a;\n\n  b;");
    }

    #[test]
    fn merges_adjacent_whitespace() {
        let mut tokens = tokenize("a");
        tokens.insert(1, Token::new(TokenKind::Whitespace, "\n"));
        tokens.insert(2, Token::new(TokenKind::Whitespace, "\n\n"));
        tokens.push(Token::new(TokenKind::Ident, "b"));

        let out = trim_whitespace(tokens);
        assert_eq!(stringify(&out), "a\n\nb");
        assert_eq!(out.iter().filter(|t| t.kind == TokenKind::Whitespace).count(), 1);
    }
}
