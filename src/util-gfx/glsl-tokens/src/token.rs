// === Token === //

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub data: String,

    /// Byte offset of the token in the source it was lexed from.
    pub offset: usize,

    /// One-based line on which the token starts.
    pub line: u32,

    /// Number of braces enclosing the token. Braces themselves carry the depth of their surroundings.
    pub depth: u32,

    /// Only meaningful for [`TokenKind::Ident`] tokens.
    pub scope: IdentScope,
}

impl Token {
    /// Creates a token which doesn't originate from any source text.
    pub fn new(kind: TokenKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
            offset: 0,
            line: 0,
            depth: 0,
            scope: IdentScope::Module,
        }
    }

    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.data == op
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.data == keyword
    }

    /// Whether the token can affect the meaning of the surrounding code.
    pub fn is_significant(&self) -> bool {
        !matches!(
            self.kind,
            TokenKind::Whitespace
                | TokenKind::BlockComment
                | TokenKind::LineComment
                | TokenKind::Preprocessor
                | TokenKind::Eof
        )
    }

    pub fn end_offset(&self) -> usize {
        self.offset + self.data.len()
    }
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum TokenKind {
    BlockComment,
    LineComment,
    Preprocessor,
    Operator,
    Integer,
    Float,
    Ident,
    Builtin,
    Keyword,
    Whitespace,
    Eof,
}

/// Where an identifier's binding lives.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default)]
pub enum IdentScope {
    /// Bound at the top level of the module, or not bound in the module at all. These are the
    /// names which have to be renamed when the module is instantiated.
    #[default]
    Module,

    /// Bound by a function parameter or a declaration inside a block.
    Local,

    /// A struct member, swizzle, or layout qualifier name.
    Member,
}
