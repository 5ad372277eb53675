use std::ops::Range;

use lang_utils::{
    diagnostic::Diagnostic,
    span::{Span, SpanManager},
};
use thiserror::Error;

// === BundleError === //

#[derive(Debug, Clone, Hash, Eq, PartialEq, Error)]
pub enum BundleError {
    #[error("{file} does not export any symbols")]
    MissingExport { module: String, file: String },

    #[error("{file} requires {path:?} but no module was provided for that path")]
    UnresolvedImport {
        module: String,
        file: String,
        path: String,
        span: Range<usize>,
    },

    #[error("{file} depends on module {target:?}, which was never provided")]
    UnknownModule {
        module: String,
        file: String,
        target: String,
    },

    #[error("module {module:?} was provided more than once")]
    DuplicateModule { module: String },

    #[error("modules depend on each other in a cycle: {}", cycle_chain(.cycle))]
    CyclicDependency { cycle: Vec<String> },
}

fn cycle_chain(cycle: &[String]) -> String {
    let mut chain = cycle.join(" -> ");
    if let Some(first) = cycle.first() {
        chain.push_str(" -> ");
        chain.push_str(first);
    }
    chain
}

impl BundleError {
    /// The id of the module the error is about.
    pub fn module(&self) -> Option<&str> {
        match self {
            Self::MissingExport { module, .. }
            | Self::UnresolvedImport { module, .. }
            | Self::UnknownModule { module, .. }
            | Self::DuplicateModule { module } => Some(module),
            Self::CyclicDependency { cycle } => cycle.first().map(String::as_str),
        }
    }

    /// Converts the error into a diagnostic. Files are looked up in `spans` by their display name;
    /// errors about files which were never registered are reported without a source window.
    pub fn to_diagnostic(&self, spans: &SpanManager) -> Diagnostic {
        let message = self.to_string();

        match self {
            Self::MissingExport { file, .. } => {
                let diag = Diagnostic::new_err(message)
                    .with_note("add a `#pragma glslify: export(<name>)` directive to the module");

                match spans.find_file(file) {
                    Some(file) => diag.with_offending_span(Span::new(file, 0..0)),
                    None => diag,
                }
            }
            Self::UnresolvedImport {
                file, path, span, ..
            } => match spans.find_file(file) {
                Some(file) => {
                    let span = Span::new(file, span.clone());
                    Diagnostic::span_err(span, message)
                        .with_window(span, Some(format!("{path:?} is not a known dependency")))
                }
                None => Diagnostic::new_err(message),
            },
            Self::UnknownModule { .. } | Self::DuplicateModule { .. } => {
                Diagnostic::new_err(message)
            }
            Self::CyclicDependency { .. } => Diagnostic::new_err(message)
                .with_note("circular imports cannot be bundled into a single source unit"),
        }
    }
}
