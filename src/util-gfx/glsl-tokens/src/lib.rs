//! GLSL token streams and the passes the linker runs over them.
//!
//! Tokens are never re-parsed into a syntax tree. Every pass here works on a flat token list and
//! round-trips byte-for-byte through [`stringify`] when nothing was changed.

pub mod defines;
pub mod descope;
pub mod literals;
pub mod preprocessor;
pub mod scope;
pub mod token;
pub mod tokenize;
pub mod trim;

pub use self::{
    defines::inject_defines,
    descope::descope,
    scope::{annotate, annotate_depth, annotate_scope},
    token::{IdentScope, Token, TokenKind},
    tokenize::tokenize,
    trim::{stringify, trim_whitespace},
};
