pub mod diagnostic;
pub mod span;
