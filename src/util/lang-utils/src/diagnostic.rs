use codespan_reporting::{
    diagnostic as cs,
    files,
    term::{self, termcolor::WriteColor},
};

use crate::span::{FileIndex, Span, SpanManager};

// === Diagnostic === //

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub offending_span: Option<Span>,
    pub windows: Vec<DiagnosticWindow>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    // === Constructors === //

    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            offending_span: None,
            windows: Vec::new(),
            notes: Vec::new(),
        }
    }

    // Span
    pub fn span_err(span: Span, message: impl Into<String>) -> Self {
        Self::new_err(message).with_offending_span(span)
    }

    // Un-spanned
    pub fn new_err(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, message)
    }

    // === Builder === //

    pub fn with_offending_span(mut self, span: Span) -> Self {
        self.offending_span = Some(span);
        self
    }

    pub fn with_window(mut self, span: Span, label: Option<impl Into<String>>) -> Self {
        self.windows.push(DiagnosticWindow {
            span,
            label: label.map(Into::into),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    // === Conversion === //

    pub fn to_codespan(&self) -> cs::Diagnostic<FileIndex> {
        let severity = match self.kind {
            DiagnosticKind::Error => cs::Severity::Error,
            DiagnosticKind::Warn => cs::Severity::Warning,
            DiagnosticKind::Note => cs::Severity::Note,
        };

        let mut labels = Vec::new();

        if let Some(span) = self.offending_span {
            labels.push(cs::Label::primary(span.file, span.range()));
        }

        for window in &self.windows {
            let label = cs::Label::secondary(window.span.file, window.span.range());
            labels.push(match &window.label {
                Some(message) => label.with_message(message),
                None => label,
            });
        }

        cs::Diagnostic::new(severity)
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum DiagnosticKind {
    Error,
    Warn,
    Note,
}

#[derive(Debug, Clone)]
pub struct DiagnosticWindow {
    pub span: Span,
    pub label: Option<String>,
}

// === Emission === //

pub fn emit_pretty_diagnostics(
    writer: &mut dyn WriteColor,
    spans: &SpanManager,
    diagnostics: &[Diagnostic],
) -> Result<(), files::Error> {
    let config = term::Config::default();

    for diagnostic in diagnostics {
        term::emit(writer, &config, spans, &diagnostic.to_codespan())?;
    }

    Ok(())
}
