use link_utils::hash::FxHashSet;

use crate::{
    literals::is_type_keyword,
    token::{IdentScope, Token, TokenKind},
};

pub fn annotate(tokens: &mut [Token]) {
    annotate_depth(tokens);
    annotate_scope(tokens);
}

// === Depth === //

pub fn annotate_depth(tokens: &mut [Token]) {
    let mut depth = 0u32;

    for token in tokens {
        if token.is_op("}") {
            depth = depth.saturating_sub(1);
        }

        token.depth = depth;

        if token.is_op("{") {
            depth += 1;
        }
    }
}

// === Scope === //

/// Classifies every identifier by where its binding lives. See [`IdentScope`].
///
/// This is a heuristic over the flat token stream, not a parser. An identifier is considered to be
/// declared when it directly follows a type keyword, a user-defined type name, `struct`, or a
/// top-level `,` inside a declaration list. Parameter lists of functions and `for` loops open a
/// scope which is then adopted by the body that follows them.
///
/// Named interface blocks (`uniform Params { vec4 tint; };`) are matched by name against the host
/// and other stages, so the block name and its members are classified as [`IdentScope::Member`]
/// wherever they appear.
pub fn annotate_scope(tokens: &mut [Token]) {
    let mut cx = ScopeState::new();

    for i in 0..tokens.len() {
        if !tokens[i].is_significant() {
            continue;
        }

        let prev = cx.prev.map(|prev| &tokens[prev]);

        match tokens[i].kind {
            TokenKind::Ident => {
                let scope = cx.classify_ident(i, prev, &tokens[i].data);
                tokens[i].scope = scope;
            }
            TokenKind::Keyword if tokens[i].data == "struct" => {
                cx.struct_pending = true;
            }
            TokenKind::Keyword if is_interface_qualifier(&tokens[i].data) => {
                if cx.frames.len() == 1 && cx.paren_depth == 0 {
                    cx.qualifier_pending = true;
                }
            }
            TokenKind::Operator => {
                let opens_interface = tokens[i].is_op("{") && cx.is_interface_head(prev);
                cx.operator(&tokens[i].data, prev, opens_interface);

                if opens_interface {
                    if let Some(name) = cx.prev {
                        tokens[name].scope = IdentScope::Member;
                    }
                }
            }
            _ => {}
        }

        cx.prev = Some(i);
    }
}

fn is_interface_qualifier(keyword: &str) -> bool {
    matches!(keyword, "uniform" | "buffer" | "in" | "out")
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum FrameKind {
    Module,
    Block,
    Params,
    Struct,
    Interface,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    names: FxHashSet<String>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            names: FxHashSet::default(),
        }
    }
}

#[derive(Debug)]
struct ScopeState {
    frames: Vec<Frame>,
    paren_depth: u32,

    /// Index of the previous significant token.
    prev: Option<usize>,

    /// Index of the most recently declared identifier in the current statement.
    last_decl: Option<usize>,

    /// Whether a `,` outside of parentheses introduces another declarator.
    in_decl_list: bool,

    /// Paren depth outside of the parameter list currently being lexed.
    params_paren: Option<u32>,

    /// A parameter list was closed and is waiting for either a body or a `;`.
    awaiting_body: bool,

    /// The next `{` opens a struct body.
    struct_pending: bool,

    /// Paren depth outside of the `layout(...)` qualifier currently being lexed.
    layout_paren: Option<u32>,

    /// The current top-level statement started with an interface storage qualifier.
    qualifier_pending: bool,

    /// Members of named interface blocks. These are visible throughout the module.
    block_members: FxHashSet<String>,
}

impl ScopeState {
    fn new() -> Self {
        Self {
            frames: vec![Frame::new(FrameKind::Module)],
            paren_depth: 0,
            prev: None,
            last_decl: None,
            in_decl_list: false,
            params_paren: None,
            awaiting_body: false,
            struct_pending: false,
            layout_paren: None,
            qualifier_pending: false,
            block_members: FxHashSet::default(),
        }
    }

    fn is_interface_head(&self, prev: Option<&Token>) -> bool {
        self.qualifier_pending
            && !self.struct_pending
            && !self.awaiting_body
            && self.frames.len() == 1
            && prev.is_some_and(|prev| prev.kind == TokenKind::Ident)
    }

    fn classify_ident(&mut self, index: usize, prev: Option<&Token>, name: &str) -> IdentScope {
        if prev.is_some_and(|prev| prev.is_op(".")) || self.layout_paren.is_some() {
            return IdentScope::Member;
        }

        if self.is_declaration(prev) {
            return self.declare(index, name);
        }

        self.lookup(name)
    }

    fn is_declaration(&self, prev: Option<&Token>) -> bool {
        let Some(prev) = prev else {
            return false;
        };

        match prev.kind {
            TokenKind::Keyword => prev.data == "struct" || is_type_keyword(&prev.data),
            // Two identifiers in a row can only be a user-defined type followed by a declarator.
            TokenKind::Ident => true,
            TokenKind::Operator => prev.data == "," && self.in_decl_list && self.paren_depth == 0,
            _ => false,
        }
    }

    fn declare(&mut self, index: usize, name: &str) -> IdentScope {
        self.last_decl = Some(index);

        if self.paren_depth == 0 {
            self.in_decl_list = true;
        }

        let depth = self.frames.len();
        let Some(frame) = self.frames.last_mut() else {
            return IdentScope::Module;
        };

        match frame.kind {
            FrameKind::Struct => return IdentScope::Member,
            FrameKind::Interface => {
                self.block_members.insert(name.to_string());
                return IdentScope::Member;
            }
            _ => {}
        }

        frame.names.insert(name.to_string());

        if depth == 1 {
            IdentScope::Module
        } else {
            IdentScope::Local
        }
    }

    fn lookup(&self, name: &str) -> IdentScope {
        let binder = self
            .frames
            .iter()
            .rposition(|frame| frame.names.contains(name));

        match binder {
            Some(0) => IdentScope::Module,
            Some(_) => IdentScope::Local,
            None if self.block_members.contains(name) => IdentScope::Member,
            None => IdentScope::Module,
        }
    }

    fn operator(&mut self, op: &str, prev: Option<&Token>, opens_interface: bool) {
        match op {
            "(" => {
                let is_layout_open = prev.is_some_and(|prev| prev.is_keyword("layout"));
                let is_for_open = prev.is_some_and(|prev| prev.is_keyword("for"));
                let is_function_open = self.last_decl.is_some() && self.last_decl == self.prev;

                if is_layout_open {
                    self.layout_paren = Some(self.paren_depth);
                } else if self.params_paren.is_none() && (is_function_open || is_for_open) {
                    self.frames.push(Frame::new(FrameKind::Params));
                    self.params_paren = Some(self.paren_depth);
                    self.in_decl_list = false;
                }

                self.paren_depth += 1;
            }
            ")" => {
                self.paren_depth = self.paren_depth.saturating_sub(1);

                if self.layout_paren == Some(self.paren_depth) {
                    self.layout_paren = None;
                }

                if self.params_paren == Some(self.paren_depth) {
                    self.params_paren = None;
                    self.awaiting_body = true;
                }
            }
            "{" => {
                if self.awaiting_body {
                    self.awaiting_body = false;
                    if let Some(frame) = self.frames.last_mut() {
                        frame.kind = FrameKind::Block;
                    }
                } else if self.struct_pending {
                    self.struct_pending = false;
                    self.frames.push(Frame::new(FrameKind::Struct));
                } else if opens_interface {
                    self.frames.push(Frame::new(FrameKind::Interface));
                } else {
                    self.frames.push(Frame::new(FrameKind::Block));
                }

                self.in_decl_list = false;
                self.last_decl = None;
                self.qualifier_pending = false;
            }
            "}" => {
                if self.frames.len() > 1 {
                    self.frames.pop();
                }

                self.in_decl_list = false;
                self.last_decl = None;
            }
            ";" => {
                // Semicolons inside a `for` header don't end anything we track.
                if self.params_paren.is_some() {
                    return;
                }

                // A prototype or a brace-less `for` body.
                if self.awaiting_body {
                    self.awaiting_body = false;
                    if self.frames.len() > 1 {
                        self.frames.pop();
                    }
                }

                self.in_decl_list = false;
                self.last_decl = None;
                self.qualifier_pending = false;
            }
            _ => {}
        }
    }
}
