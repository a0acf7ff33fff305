//! Execution tracer (A3).
//!
//! A zero-cost-when-unused observability seam: the evaluator calls these
//! hooks at well-defined points, but nothing downstream depends on them —
//! they exist for debugging a failing program and for coverage tooling,
//! not for language semantics.

use ahash::AHashSet;

use crate::span::Span;

pub trait EvalTracer {
    fn on_statement(&mut self, span: Span) {
        let _ = span;
    }

    fn on_call(&mut self, name: &str, span: Span) {
        let _ = (name, span);
    }

    fn on_loop_iteration(&mut self, span: Span) {
        let _ = span;
    }

    fn on_return(&mut self, span: Span) {
        let _ = span;
    }
}

/// The default: every hook is a no-op, inlined away.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl EvalTracer for NoopTracer {}

/// Logs a human-readable line per hook to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrTracer;

impl EvalTracer for StderrTracer {
    fn on_statement(&mut self, span: Span) {
        eprintln!("stmt at {span}");
    }

    fn on_call(&mut self, name: &str, span: Span) {
        eprintln!("call {name} at {span}");
    }

    fn on_loop_iteration(&mut self, span: Span) {
        eprintln!("loop iteration at {span}");
    }

    fn on_return(&mut self, span: Span) {
        eprintln!("return at {span}");
    }
}

/// Records the set of statement spans visited, for coverage tooling.
#[derive(Debug, Default)]
pub struct CoverageTracer {
    visited: AHashSet<Span>,
}

impl CoverageTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn visited(&self) -> &AHashSet<Span> {
        &self.visited
    }
}

impl EvalTracer for CoverageTracer {
    fn on_statement(&mut self, span: Span) {
        self.visited.insert(span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{intern::Interner, span::Loc};

    #[test]
    fn coverage_tracer_records_distinct_spans() {
        let mut interner = Interner::new();
        let file = interner.intern("test.lang");
        let mut tracer = CoverageTracer::new();
        let a = Span::new(file, Loc::new(0, 0, 0), Loc::new(0, 1, 1));
        let b = Span::new(file, Loc::new(1, 0, 2), Loc::new(1, 1, 3));
        tracer.on_statement(a);
        tracer.on_statement(a);
        tracer.on_statement(b);
        assert_eq!(tracer.visited().len(), 2);
    }
}
