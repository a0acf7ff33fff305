//! Diagnostics: the closed set of error kinds the front end can report,
//! and the sink that accumulates them (C7).

use std::fmt;

use crate::{intern::Interner, span::Span};

/// Which pass of the pipeline produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Lex,
    Parse,
    Resolve,
    Typecheck,
    Runtime,
}

/// Severity of a recorded diagnostic.
///
/// The Language currently only raises errors; `Warning` exists so the sink's
/// data model matches `(severity, span, message)` without a breaking change
/// the day a lint-style warning is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// The closed set of error kinds, one per bullet in the error-handling
/// design. Each variant has a fixed [`Phase`], mirroring how a production
/// interpreter classifies exceptions by a closed enum rather than by
/// matching on message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorKind {
    InvalidChar,
    UnterminatedString,

    UnexpectedToken,
    MissingTerminator,
    MalformedPattern,

    UnknownIdentifier,
    AmbiguousAlias,
    CyclicImport,
    MissingExport,
    DuplicateBinding,

    TypeMismatch,
    WrongArity,
    UnknownField,
    NonListIndex,
    PatternMismatch,

    DivideByZero,
    IndexOutOfBounds,
    MissingFieldAtRuntime,
    NonExhaustiveMatch,
    LoopControlOutsideLoop,
    BadRange,
    NotCallable,
    MainMissing,
    DuplicateField,
    StepLimitExceeded,
}

impl ErrorKind {
    /// The phase this error kind is always reported from.
    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Self::InvalidChar | Self::UnterminatedString => Phase::Lex,
            Self::UnexpectedToken | Self::MissingTerminator | Self::MalformedPattern => Phase::Parse,
            Self::UnknownIdentifier
            | Self::AmbiguousAlias
            | Self::CyclicImport
            | Self::MissingExport
            | Self::DuplicateBinding => Phase::Resolve,
            Self::TypeMismatch | Self::WrongArity | Self::UnknownField | Self::NonListIndex | Self::PatternMismatch => {
                Phase::Typecheck
            }
            Self::DivideByZero
            | Self::IndexOutOfBounds
            | Self::MissingFieldAtRuntime
            | Self::NonExhaustiveMatch
            | Self::LoopControlOutsideLoop
            | Self::BadRange
            | Self::NotCallable
            | Self::MainMissing
            | Self::DuplicateField
            | Self::StepLimitExceeded => Phase::Runtime,
        }
    }
}

/// One recorded diagnostic: a fixed-phase error kind, the span it applies
/// to, and a human-readable message.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn error(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            span,
            message: message.into(),
        }
    }

    /// Renders `<path>:<line>:<col>: <phase>: <message>`, the stable
    /// single-line diagnostic format.
    pub fn format(&self, interner: &Interner, source: &str) -> String {
        let path = interner.resolve(self.span.file);
        let mut out = format!(
            "{path}:{}:{}: {}: {}",
            self.span.start.line + 1,
            self.span.start.column + 1,
            self.kind.phase(),
            self.message
        );
        if let Some(line) = source.lines().nth(self.span.start.line as usize) {
            out.push('\n');
            out.push_str(line);
            out.push('\n');
            let caret_len = caret_len(self.span, line);
            out.push_str(&" ".repeat(self.span.start.column as usize));
            out.push_str(&"^".repeat(caret_len.max(1)));
        }
        out
    }
}

fn caret_len(span: Span, line: &str) -> usize {
    if span.start.line == span.end.line && span.end.column > span.start.column {
        (span.end.column - span.start.column) as usize
    } else {
        (line.len().saturating_sub(span.start.column as usize)).max(1)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Controls how many recorded diagnostics are surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkMode {
    /// Surface only the first diagnostic recorded (the `all_errors: false`
    /// configuration toggle). Everything after it is still recorded
    /// internally, but [`DiagnosticSink::reported`] hides it.
    #[default]
    FirstOnly,
    /// Surface every diagnostic recorded (`all_errors: true`).
    All,
}

/// Accumulates diagnostics across lex/parse/resolve/typecheck, and answers
/// whether execution should proceed.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    mode: SinkMode,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    #[must_use]
    pub fn new(mode: SinkMode) -> Self {
        Self {
            mode,
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> SinkMode {
        self.mode
    }

    /// Records a diagnostic. Always stored, regardless of sink mode; mode
    /// only affects what [`Self::reported`] returns.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics surfaced to the caller under the current mode.
    #[must_use]
    pub fn reported(&self) -> &[Diagnostic] {
        match self.mode {
            SinkMode::FirstOnly => &self.diagnostics[..self.diagnostics.len().min(1)],
            SinkMode::All => &self.diagnostics,
        }
    }

    /// True if any diagnostic of [`Severity::Error`] was ever recorded,
    /// whether or not it is surfaced by the current mode. This is what
    /// gates whether execution proceeds and what the exit code reports.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Whether the parser should keep parsing subsequent top-level items
    /// after recovering from a statement-level error (`all_errors` mode),
    /// or stop once the first diagnostic has been recorded.
    #[must_use]
    pub fn continues_after_recovery(&self) -> bool {
        matches!(self.mode, SinkMode::All)
    }

    pub fn format_all(&self, interner: &Interner, source: &str) -> String {
        self.reported()
            .iter()
            .map(|d| d.format(interner, source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Loc;

    fn span(interner: &mut Interner) -> Span {
        let file = interner.intern("test.lang");
        Span::new(file, Loc::new(0, 0, 0), Loc::new(0, 1, 1))
    }

    #[test]
    fn first_only_surfaces_one_but_records_all() {
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new(SinkMode::FirstOnly);
        let span = span(&mut interner);
        sink.record(Diagnostic::error(ErrorKind::UnexpectedToken, span, "a"));
        sink.record(Diagnostic::error(ErrorKind::UnexpectedToken, span, "b"));
        assert_eq!(sink.reported().len(), 1);
        assert!(sink.has_errors());
        assert!(!sink.continues_after_recovery());
    }

    #[test]
    fn all_mode_surfaces_everything() {
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new(SinkMode::All);
        let span = span(&mut interner);
        sink.record(Diagnostic::error(ErrorKind::UnexpectedToken, span, "a"));
        sink.record(Diagnostic::error(ErrorKind::UnexpectedToken, span, "b"));
        assert_eq!(sink.reported().len(), 2);
        assert!(sink.continues_after_recovery());
    }
}
