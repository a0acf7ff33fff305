//! A small, statically-checked interpreted language: lexer, recursive
//! descent parser with error recovery, module loader, type checker, and
//! tree-walking evaluator.

mod ast;
mod diagnostics;
mod env;
mod eval;
mod intern;
mod io;
mod lexer;
mod module;
mod parser;
mod resource;
mod runner;
mod span;
mod token;
mod tracer;
mod typeck;
mod types;
mod value;

pub use crate::{
    ast::{EnumDef, Expr, FnDef, Item, Param, Program, Stmt, TypeExpr},
    diagnostics::{Diagnostic, DiagnosticSink, ErrorKind, Phase, Severity, SinkMode},
    eval::Evaluator,
    intern::{Interner, StringId},
    io::{CollectPrint, NullPrint, PrintWriter, StdPrint},
    module::{check_aliases, load_graph, LoadedModule, MapLoader, ModuleGraph, ModuleLoader},
    parser::parse_source,
    resource::{LimitedSteps, NoStepLimit, StepLimitExceeded, StepTracker},
    runner::{run, Config, Output, RunReport},
    span::{Loc, Span},
    tracer::{CoverageTracer, EvalTracer, NoopTracer, StderrTracer},
    typeck::{check_graph, EnumSig, ModuleSig},
    types::Type,
    value::{Closure, Value},
};
