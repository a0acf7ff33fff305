//! Source positions and spans.
//!
//! Every token and AST node carries a [`Span`] identifying the range of
//! source text it came from, so diagnostics can point back at exact
//! locations without re-scanning the source.

use std::fmt;

use crate::intern::StringId;

/// A single position within a source buffer.
///
/// `line` and `column` are zero-indexed; `byte_offset` is the absolute
/// offset into the source's UTF-8 bytes, used to slice out preview text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Loc {
    pub line: u32,
    pub column: u32,
    pub byte_offset: u32,
}

impl Loc {
    #[must_use]
    pub const fn new(line: u32, column: u32, byte_offset: u32) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }
}

/// A closed `[start, end]` range of [`Loc`]s within one named source file.
///
/// `file` is an interned filename so spans stay cheap to copy around the
/// AST; resolving it to text only happens when a diagnostic is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub file: StringId,
    pub start: Loc,
    pub end: Loc,
}

impl Span {
    #[must_use]
    pub const fn new(file: StringId, start: Loc, end: Loc) -> Self {
        Self { file, start, end }
    }

    /// Returns a span covering from `self`'s start through `other`'s end.
    ///
    /// Used to widen a node's span to include a trailing token once it has
    /// been parsed (e.g. extending a call expression's span to its closing
    /// paren).
    #[must_use]
    pub fn to(self, other: Span) -> Span {
        Span::new(self.file, self.start, other.end)
    }
}

impl fmt::Display for Span {
    /// Renders as `line:col`, 1-indexed for human consumption.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start.line + 1, self.start.column + 1)
    }
}
