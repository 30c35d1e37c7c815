//! Diagnostic messages collected while translating.
//!
//! Each generation unit accumulates its own [`Diagnostics`]; the driver
//! merges them in unit order so the report is reproducible even when units
//! are processed on several threads.

use std::collections::VecDeque;
use std::fmt;

use crate::Span;

/// A single diagnostic message.
///
/// # Examples
///
/// ```
/// use objlower_core::{Diagnostic, DiagnosticKind, Span};
///
/// let diagnostic = Diagnostic::warning("header 'Foo.h' cannot be imported")
///     .with_source("com/example/A.java")
///     .with_span(Span::new(10, 5, 0));
///
/// assert_eq!(
///     diagnostic.to_string(),
///     "com/example/A.java:10:5: warning: header 'Foo.h' cannot be imported"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity level of this diagnostic
    pub kind: DiagnosticKind,
    /// The diagnostic message text
    pub message: String,
    /// The input source this diagnostic refers to, if any
    pub source: Option<String>,
    /// Location inside the source; synthetic when not applicable
    pub span: Span,
}

/// The severity level of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A unit was abandoned.
    Error,
    /// Output was produced but may not build as-is (e.g., a skipped include).
    Warning,
    /// Informational record of what the pipeline did.
    Info,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            span: Span::default(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, message)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// A collection of diagnostic messages.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    diagnostics: VecDeque<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    /// Creates a new, empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.kind == DiagnosticKind::Error {
            self.has_errors = true;
        }
        self.diagnostics.push_back(diagnostic);
    }

    /// Append every diagnostic of `other`, preserving its order.
    pub fn extend(&mut self, other: Diagnostics) {
        for diagnostic in other.diagnostics {
            self.add_diagnostic(diagnostic);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn info_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Info)
            .count()
    }

    pub fn emit<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(writer, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind_str = match self.kind {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
        };

        match (&self.source, self.span.is_synthetic()) {
            (Some(source), false) => write!(
                f,
                "{}:{}: {}: {}",
                source, self.span, kind_str, self.message
            ),
            (Some(source), true) => write!(f, "{}: {}: {}", source, kind_str, self.message),
            (None, false) => write!(f, "{}: {}: {}", self.span, kind_str, self.message),
            (None, true) => write!(f, "{}: {}", kind_str, self.message),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}
