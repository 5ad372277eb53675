use unicode_xid::UnicodeXID;

use crate::{
    literals::{is_builtin, is_keyword, OPERATORS},
    token::{Token, TokenKind},
};

// === Tokenizer === //

/// Splits GLSL source into tokens. Lexing never fails: characters which fit no other category
/// become single-character operators, and unterminated comments run to the end of the input.
///
/// The final token is always an empty [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer {
        source,
        pos: 0,
        line: 1,
        tokens: Vec::new(),
    };

    lexer.run();
    lexer.tokens
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    tokens: Vec<Token>,
}

impl Lexer<'_> {
    fn run(&mut self) {
        while let Some(c) = self.peek() {
            let start = self.pos;

            let kind = if c.is_whitespace() {
                self.eat_while(char::is_whitespace);
                TokenKind::Whitespace
            } else if self.rest().starts_with("/*") {
                self.block_comment();
                TokenKind::BlockComment
            } else if self.rest().starts_with("//") {
                self.eat_while(|c| c != '\n');
                TokenKind::LineComment
            } else if c == '#' {
                self.preprocessor();
                TokenKind::Preprocessor
            } else if c.is_ascii_digit()
                || (c == '.' && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()))
            {
                self.number()
            } else if c == '_' || c.is_xid_start() {
                self.eat_while(|c| c == '_' || c.is_xid_continue());
                classify_word(&self.source[start..self.pos])
            } else {
                self.operator();
                TokenKind::Operator
            };

            self.push(kind, start);
        }

        self.push(TokenKind::Eof, self.pos);
    }

    // === Cursor === //

    fn rest(&self) -> &str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, f: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&f) {
            self.bump();
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let data = &self.source[start..self.pos];
        let line = self.line;
        self.line += memchr::memchr_iter(b'\n', data.as_bytes()).count() as u32;

        self.tokens.push(Token {
            kind,
            data: data.to_string(),
            offset: start,
            line,
            depth: 0,
            scope: Default::default(),
        });
    }

    // === Productions === //

    fn block_comment(&mut self) {
        self.pos += "/*".len();

        loop {
            if self.rest().starts_with("*/") {
                self.pos += "*/".len();
                break;
            }

            if self.bump().is_none() {
                break;
            }
        }
    }

    fn preprocessor(&mut self) {
        // Runs to the end of the line, but a backslash right before the line break continues it.
        while let Some(c) = self.peek() {
            match c {
                '\n' => break,
                '\\' => {
                    self.bump();
                    if self.rest().starts_with("\r\n") {
                        self.pos += 2;
                    } else if self.peek() == Some('\n') {
                        self.bump();
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Integer;

        let is_hex = self.rest().starts_with("0x") || self.rest().starts_with("0X");
        if is_hex && self.peek_nth(2).is_some_and(|c| c.is_ascii_hexdigit()) {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit());
        } else {
            self.eat_while(|c| c.is_ascii_digit());

            if self.peek() == Some('.') {
                self.bump();
                self.eat_while(|c| c.is_ascii_digit());
                kind = TokenKind::Float;
            }

            if matches!(self.peek(), Some('e' | 'E')) {
                let signed = matches!(self.peek_nth(1), Some('+' | '-'));
                let digit_at = if signed { 2 } else { 1 };

                if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += digit_at;
                    self.eat_while(|c| c.is_ascii_digit());
                    kind = TokenKind::Float;
                }
            }
        }

        // Type suffixes
        match self.peek() {
            Some('u' | 'U') if kind == TokenKind::Integer => {
                self.bump();
            }
            Some('f' | 'F') => {
                self.bump();
                kind = TokenKind::Float;
            }
            Some('l' | 'L') if matches!(self.peek_nth(1), Some('f' | 'F')) => {
                self.pos += 2;
                kind = TokenKind::Float;
            }
            _ => {}
        }

        kind
    }

    fn operator(&mut self) {
        if let Some(op) = OPERATORS.iter().find(|op| self.rest().starts_with(*op)) {
            self.pos += op.len();
        } else {
            self.bump();
        }
    }
}

fn classify_word(word: &str) -> TokenKind {
    if is_keyword(word) {
        TokenKind::Keyword
    } else if is_builtin(word) {
        TokenKind::Builtin
    } else {
        TokenKind::Ident
    }
}
