use std::ops::Range;

/// A `#keyword rest` preprocessor line, borrowed from a [`TokenKind::Preprocessor`] token.
///
/// [`TokenKind::Preprocessor`]: crate::token::TokenKind::Preprocessor
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PpLine<'a> {
    pub keyword: &'a str,

    /// Byte range of the first identifier after the keyword, relative to the token text.
    pub name: Option<Range<usize>>,
}

impl<'a> PpLine<'a> {
    pub fn parse(text: &'a str) -> Option<Self> {
        let after_hash = text.strip_prefix('#')?;
        let keyword_start = text.len() - after_hash.trim_start().len();
        let keyword_len = text[keyword_start..]
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(text.len() - keyword_start);

        if keyword_len == 0 {
            return None;
        }

        let keyword_end = keyword_start + keyword_len;
        let keyword = &text[keyword_start..keyword_end];

        let rest = &text[keyword_end..];
        let name_start = keyword_end + (rest.len() - rest.trim_start().len());
        let name_len = text[name_start..]
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(text.len() - name_start);

        let name = (name_len > 0 && !text[name_start..].starts_with(|c: char| c.is_ascii_digit()))
            .then(|| name_start..(name_start + name_len));

        Some(Self { keyword, name })
    }

    pub fn name_in<'b>(&self, text: &'b str) -> Option<&'b str> {
        self.name.clone().map(|range| &text[range])
    }

    /// Whether the line introduces or removes a macro, making its name part of the module's
    /// namespace.
    pub fn is_macro_definition(&self) -> bool {
        matches!(self.keyword, "define" | "undef")
    }

    pub fn is_macro_query(&self) -> bool {
        matches!(self.keyword, "ifdef" | "ifndef")
    }

    /// Whether the line has to stay at the very top of the shader.
    pub fn is_header(&self) -> bool {
        matches!(self.keyword, "version" | "extension")
    }
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}
