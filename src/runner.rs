//! Public façade (A5): wires the lexer, parser, module loader, type
//! checker, and evaluator into a single `run` entry point, and threads the
//! configuration toggles from the external-interfaces design through to
//! each stage.

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink, SinkMode},
    eval::Evaluator,
    intern::{Interner, StringId},
    io::{CollectPrint, NullPrint, PrintWriter, StdPrint},
    module::{load_graph, ModuleGraph, ModuleLoader},
    parser::parse_source,
    resource::{LimitedSteps, NoStepLimit, StepTracker},
    tracer::{EvalTracer, NoopTracer},
    typeck::check_graph,
};

/// The three configuration toggles recognized by the core.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// `false` surfaces only the first diagnostic recorded; `true`
    /// surfaces all of them.
    pub all_errors: bool,
    /// `true` treats `Unknown` as a type error wherever a specific type
    /// is required; `false` lets it match anything.
    pub strict_types: bool,
    /// `None` runs without a step ceiling; `Some(n)` aborts with
    /// `StepLimitExceeded` after `n` statements/iterations.
    pub max_steps: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            all_errors: false,
            strict_types: true,
            max_steps: None,
        }
    }
}

/// Where `print` output should go during a run.
pub enum Output {
    Stdout,
    Collected,
    Discarded,
}

/// The result of a single run: the diagnostic sink (always populated,
/// even on success) and, if output was collected, the captured text.
pub struct RunReport {
    pub sink: DiagnosticSink,
    pub interner: Interner,
    collected: Option<String>,
}

impl RunReport {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !self.sink.has_errors()
    }

    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.collected.as_deref()
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.sink.reported()
    }

    /// Renders every reported diagnostic, one per line, in the stable
    /// `<path>:<line>:<col>: <phase>: <message>` format.
    #[must_use]
    pub fn format_diagnostics(&self, source_by_file: impl Fn(&str) -> Option<String>) -> String {
        self.sink
            .reported()
            .iter()
            .map(|d| {
                let file = self.interner.resolve(d.span.file);
                let source = source_by_file(file).unwrap_or_default();
                d.format(&self.interner, &source)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Runs `entry_module` (and everything it transitively imports, resolved
/// via `loader`) end to end: lex, parse, load, typecheck, evaluate.
///
/// Returns a [`RunReport`] in every case, including lex/parse/typecheck
/// failures — callers should check [`RunReport::succeeded`] rather than
/// matching on a `Result`, since a failed run still carries diagnostics
/// worth reporting.
pub fn run(entry_module: &str, loader: &dyn ModuleLoader, config: Config, output: Output) -> RunReport {
    let mut interner = Interner::new();
    let mode = if config.all_errors { SinkMode::All } else { SinkMode::FirstOnly };
    let mut sink = DiagnosticSink::new(mode);

    let Some(graph) = load_graph(entry_module, loader, &mut interner, &mut sink, parse_source) else {
        return RunReport { sink, interner, collected: None };
    };

    for loaded in graph.modules.values() {
        crate::module::check_aliases(&loaded.program, &interner, &mut sink);
    }
    if sink.has_errors() {
        return RunReport { sink, interner, collected: None };
    }

    check_graph(&graph, &interner, &mut sink, config.strict_types);
    if sink.has_errors() {
        return RunReport { sink, interner, collected: None };
    }

    let print_id = interner.intern("print");
    let entry_id = interner.intern(entry_module);

    let mut noop_tracer = NoopTracer;
    let tracer: &mut dyn EvalTracer = &mut noop_tracer;

    let mut no_limit = NoStepLimit;
    let mut limited;
    let steps: &mut dyn StepTracker = match config.max_steps {
        Some(max) => {
            limited = LimitedSteps::new(max);
            &mut limited
        }
        None => &mut no_limit,
    };

    match output {
        Output::Stdout => {
            let mut print = StdPrint;
            run_with_sinks(&graph, &mut interner, &mut sink, &mut print, tracer, steps, print_id, entry_id);
            RunReport { sink, interner, collected: None }
        }
        Output::Collected => {
            let mut print = CollectPrint::new();
            run_with_sinks(&graph, &mut interner, &mut sink, &mut print, tracer, steps, print_id, entry_id);
            let collected = Some(print.into_output());
            RunReport { sink, interner, collected }
        }
        Output::Discarded => {
            let mut print = NullPrint;
            run_with_sinks(&graph, &mut interner, &mut sink, &mut print, tracer, steps, print_id, entry_id);
            RunReport { sink, interner, collected: None }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_with_sinks(
    graph: &ModuleGraph,
    interner: &mut Interner,
    sink: &mut DiagnosticSink,
    print: &mut dyn PrintWriter,
    tracer: &mut dyn EvalTracer,
    steps: &mut dyn StepTracker,
    print_id: StringId,
    entry_id: StringId,
) {
    let mut evaluator = Evaluator::new(graph, interner, sink, print, tracer, steps, print_id);
    let _ = evaluator.run(entry_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::MapLoader;

    #[test]
    fn successful_run_collects_output() {
        let loader = MapLoader::new().with("main", r#"fn main() { print("ok"); }"#);
        let report = run("main", &loader, Config::default(), Output::Collected);
        assert!(report.succeeded());
        assert_eq!(report.output(), Some("ok\n"));
    }

    #[test]
    fn type_error_is_reported_and_does_not_execute() {
        let loader = MapLoader::new().with("main", r#"fn main() { let x: Int = "nope"; }"#);
        let report = run("main", &loader, Config::default(), Output::Collected);
        assert!(!report.succeeded());
        assert_eq!(report.output(), None);
    }

    #[test]
    fn all_errors_mode_surfaces_more_than_one_diagnostic() {
        let loader = MapLoader::new().with(
            "main",
            r#"
            fn main() {
                let x: Int = "a";
                let y: Int = "b";
            }
            "#,
        );
        let config = Config { all_errors: true, ..Config::default() };
        let report = run("main", &loader, config, Output::Discarded);
        assert!(!report.succeeded());
        assert!(report.diagnostics().len() >= 2);
    }

    #[test]
    fn step_limit_aborts_an_infinite_loop() {
        let loader = MapLoader::new().with("main", "fn main() { while true { } }");
        let config = Config { max_steps: Some(50), ..Config::default() };
        let report = run("main", &loader, config, Output::Discarded);
        assert!(!report.succeeded());
    }
}
