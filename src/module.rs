//! Module loader (C4).
//!
//! Resolves `import` statements across files, detecting cycles and
//! collecting each module's declared functions, enums, and import
//! aliases before handing the whole graph to the checker and evaluator.
//! Source text is supplied by a host-provided loader callback rather than
//! this crate reading the filesystem directly, so embedders can back
//! modules with anything (an in-memory map, a VFS, a network fetch).

use ahash::AHashMap;

use crate::{
    ast::{Item, Program},
    diagnostics::{Diagnostic, DiagnosticSink, ErrorKind},
    intern::{Interner, StringId},
    span::Span,
};

/// Supplies the source text for a module name. Returns `None` if no such
/// module exists.
pub trait ModuleLoader {
    fn load(&self, module_name: &str) -> Option<String>;
}

/// A loader backed by an in-memory map, primarily for tests and
/// single-file embeddings.
#[derive(Debug, Default)]
pub struct MapLoader {
    modules: AHashMap<String, String>,
}

impl MapLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.modules.insert(name.into(), source.into());
        self
    }
}

impl ModuleLoader for MapLoader {
    fn load(&self, module_name: &str) -> Option<String> {
        self.modules.get(module_name).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Grey,
    Black,
}

/// One parsed and (not yet checked) loaded module.
pub struct LoadedModule {
    pub name: StringId,
    pub program: Program,
}

/// The full set of modules reachable from the entry module, in dependency
/// order (a module always appears after everything it imports).
pub struct ModuleGraph {
    pub order: Vec<StringId>,
    pub modules: AHashMap<StringId, LoadedModule>,
}

/// Loads `entry_module` and everything it transitively imports.
///
/// `parse_fn` is injected so the loader does not depend on the parser's
/// concrete signature beyond "turn source text into a `Program` while
/// reporting diagnostics".
pub fn load_graph(
    entry_module: &str,
    loader: &dyn ModuleLoader,
    interner: &mut Interner,
    sink: &mut DiagnosticSink,
    mut parse_fn: impl FnMut(&str, StringId, &mut Interner, &mut DiagnosticSink) -> Program,
) -> Option<ModuleGraph> {
    let mut colors: AHashMap<StringId, Color> = AHashMap::default();
    let mut modules: AHashMap<StringId, LoadedModule> = AHashMap::default();
    let mut order: Vec<StringId> = Vec::new();
    let mut stack: Vec<StringId> = Vec::new();

    let entry_id = interner.intern(entry_module);
    if !visit(
        entry_id,
        loader,
        interner,
        sink,
        &mut parse_fn,
        &mut colors,
        &mut modules,
        &mut order,
        &mut stack,
    ) {
        return None;
    }

    Some(ModuleGraph { order, modules })
}

#[allow(clippy::too_many_arguments)]
fn visit(
    module_id: StringId,
    loader: &dyn ModuleLoader,
    interner: &mut Interner,
    sink: &mut DiagnosticSink,
    parse_fn: &mut impl FnMut(&str, StringId, &mut Interner, &mut DiagnosticSink) -> Program,
    colors: &mut AHashMap<StringId, Color>,
    modules: &mut AHashMap<StringId, LoadedModule>,
    order: &mut Vec<StringId>,
    stack: &mut Vec<StringId>,
) -> bool {
    match colors.get(&module_id) {
        Some(Color::Black) => return true,
        Some(Color::Grey) => {
            stack.push(module_id);
            let start = stack.iter().position(|m| *m == module_id).unwrap_or(0);
            let cycle: Vec<_> = stack[start..].iter().map(|id| interner.resolve(*id).to_string()).collect();
            sink.record(Diagnostic::error(
                ErrorKind::CyclicImport,
                Span::default(),
                format!("cyclic import: {}", cycle.join(" -> ")),
            ));
            stack.pop();
            return false;
        }
        None => {}
    }

    colors.insert(module_id, Color::Grey);
    stack.push(module_id);

    let module_name = interner.resolve(module_id).to_string();
    let Some(source) = loader.load(&module_name) else {
        sink.record(Diagnostic::error(
            ErrorKind::UnknownIdentifier,
            Span::default(),
            format!("module '{module_name}' not found"),
        ));
        stack.pop();
        colors.insert(module_id, Color::Black);
        return false;
    };

    let program = parse_fn(&source, module_id, interner, sink);

    let mut ok = true;
    for item in &program.items {
        if let Item::Import(import) = item {
            let dep_name = interner.resolve(import.name).to_string();
            let dep_id = interner.intern(&dep_name);
            if !visit(dep_id, loader, interner, sink, parse_fn, colors, modules, order, stack) {
                ok = false;
            }
        }
    }

    stack.pop();
    colors.insert(module_id, Color::Black);
    modules.insert(module_id, LoadedModule { name: module_id, program });
    order.push(module_id);
    ok
}

/// Checks every `import X as Y;` in a module for alias collisions: two
/// imports using the same alias, or an alias shadowing a local top-level
/// name (a function or enum declared in the same module).
pub fn check_aliases(program: &Program, interner: &Interner, sink: &mut DiagnosticSink) {
    let mut seen: AHashMap<StringId, Span> = AHashMap::default();
    let mut locals: std::collections::HashSet<StringId> = std::collections::HashSet::new();
    for item in &program.items {
        match item {
            Item::FnDef(f) => {
                locals.insert(f.name);
            }
            Item::EnumDef(e) => {
                locals.insert(e.name);
            }
            _ => {}
        }
    }
    for item in &program.items {
        let Item::Import(import) = item else { continue };
        let alias = import.alias.unwrap_or(import.name);
        if locals.contains(&alias) {
            sink.record(Diagnostic::error(
                ErrorKind::AmbiguousAlias,
                import.span,
                format!(
                    "import alias '{}' collides with a local declaration",
                    interner.resolve(alias)
                ),
            ));
            continue;
        }
        if let Some(_prior) = seen.insert(alias, import.span) {
            sink.record(Diagnostic::error(
                ErrorKind::AmbiguousAlias,
                import.span,
                format!("import alias '{}' is used more than once", interner.resolve(alias)),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SinkMode;

    fn dummy_parse(_src: &str, _file: StringId, _interner: &mut Interner, _sink: &mut DiagnosticSink) -> Program {
        Program {
            module_decl: None,
            items: Vec::new(),
            span: Span::default(),
        }
    }

    #[test]
    fn single_module_loads_without_errors() {
        let loader = MapLoader::new().with("main", "fn main() { }");
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new(SinkMode::All);
        let graph = load_graph("main", &loader, &mut interner, &mut sink, dummy_parse);
        assert!(graph.is_some());
        assert!(!sink.has_errors());
    }

    #[test]
    fn missing_module_is_an_error() {
        let loader = MapLoader::new();
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new(SinkMode::All);
        let graph = load_graph("missing", &loader, &mut interner, &mut sink, dummy_parse);
        assert!(graph.is_none());
        assert!(sink.has_errors());
    }
}
