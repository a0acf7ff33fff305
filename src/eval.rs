//! Tree-walking evaluator (C6).

use std::rc::Rc;

use ahash::AHashMap;

use crate::{
    ast::{BinOp, Block, Expr, ExprNode, Item, MatchArm, Pattern, PatternNode, Stmt, StmtNode, UnaryOp},
    diagnostics::{Diagnostic, DiagnosticSink, ErrorKind},
    env::Scopes,
    intern::{Interner, StringId},
    io::PrintWriter,
    module::ModuleGraph,
    resource::StepTracker,
    span::Span,
    tracer::EvalTracer,
    value::{Closure, Value},
};

/// A non-local exit in flight. Mirrors the signal-based control flow the
/// evaluator uses instead of generic exception machinery: loop bodies
/// catch `Break`/`Continue`, function bodies catch `Return`.
enum Signal {
    Break,
    Continue,
    Return(Value),
}

type EvalResult<T> = Result<T, Outcome>;

/// Either a genuine runtime error (recorded and fatal) or an in-flight
/// control-flow signal threaded up to its catching boundary.
enum Outcome {
    Error,
    Signal(Signal),
}

impl From<Signal> for Outcome {
    fn from(signal: Signal) -> Self {
        Outcome::Signal(signal)
    }
}

/// A module's evaluable surface: its functions (as closures) and its enum
/// variant table, plus the alias table for qualified access.
struct EvalModule {
    functions: AHashMap<StringId, Rc<Closure>>,
    /// variant name -> (enum name, payload arity)
    variants: AHashMap<StringId, (StringId, usize)>,
    exported: std::collections::HashSet<StringId>,
    import_aliases: AHashMap<StringId, StringId>,
}

pub struct Evaluator<'a> {
    interner: &'a mut Interner,
    sink: &'a mut DiagnosticSink,
    print: &'a mut dyn PrintWriter,
    tracer: &'a mut dyn EvalTracer,
    steps: &'a mut dyn StepTracker,
    modules: AHashMap<StringId, EvalModule>,
    print_id: StringId,
}

impl<'a> Evaluator<'a> {
    #[must_use]
    pub fn new(
        graph: &ModuleGraph,
        interner: &'a mut Interner,
        sink: &'a mut DiagnosticSink,
        print: &'a mut dyn PrintWriter,
        tracer: &'a mut dyn EvalTracer,
        steps: &'a mut dyn StepTracker,
        print_id: StringId,
    ) -> Self {
        let mut modules = AHashMap::default();
        for module_id in &graph.order {
            let program = &graph.modules[module_id].program;
            let mut functions = AHashMap::default();
            let mut variants = AHashMap::default();
            let mut exported = std::collections::HashSet::new();
            let mut import_aliases = AHashMap::default();

            for item in &program.items {
                match item {
                    Item::Import(import) => {
                        let alias = import.alias.unwrap_or(import.name);
                        import_aliases.insert(alias, import.name);
                    }
                    Item::Export(export) => {
                        for (name, _) in &export.names {
                            exported.insert(*name);
                        }
                    }
                    Item::EnumDef(enum_def) => {
                        for variant in &enum_def.variants {
                            variants.insert(variant.name, (enum_def.name, variant.payload_types.len()));
                        }
                    }
                    Item::FnDef(_) => {}
                }
            }
            for item in &program.items {
                if let Item::FnDef(f) = item {
                    let closure = Rc::new(Closure {
                        name: f.name,
                        params: f.params.iter().map(|p| (p.name, crate::types::Type::Unknown)).collect(),
                        return_type: crate::types::Type::Unknown,
                        body: Rc::new(f.body.clone()),
                        home_module: *module_id,
                    });
                    functions.insert(f.name, closure);
                }
            }

            modules.insert(*module_id, EvalModule { functions, variants, exported, import_aliases });
        }

        Self { interner, sink, print, tracer, steps, modules, print_id }
    }

    fn runtime_error(&mut self, kind: ErrorKind, span: Span, message: impl Into<String>) -> Outcome {
        self.sink.record(Diagnostic::error(kind, span, message.into()));
        Outcome::Error
    }

    /// Calls `main` in `entry_module` with zero arguments. Returns `Ok(())`
    /// on a clean run; a runtime error is recorded in the sink and signaled
    /// via `Err`.
    pub fn run(&mut self, entry_module: StringId) -> Result<(), ()> {
        let main_name = self.lookup_main_name(entry_module);
        let Some(main_name) = main_name else {
            self.sink.record(Diagnostic::error(
                ErrorKind::MainMissing,
                Span::default(),
                "no `main` function in the root module",
            ));
            return Err(());
        };
        let Some(closure) = self.modules[&entry_module].functions.get(&main_name).cloned() else {
            self.sink.record(Diagnostic::error(
                ErrorKind::MainMissing,
                Span::default(),
                "no `main` function in the root module",
            ));
            return Err(());
        };
        if !closure.params.is_empty() {
            self.sink.record(Diagnostic::error(
                ErrorKind::WrongArity,
                Span::default(),
                "`main` must take zero arguments",
            ));
            return Err(());
        }
        match self.call_closure(&closure, Vec::new(), Span::default()) {
            Ok(_) => Ok(()),
            Err(Outcome::Error) => Err(()),
            Err(Outcome::Signal(_)) => {
                self.sink.record(Diagnostic::error(
                    ErrorKind::LoopControlOutsideLoop,
                    Span::default(),
                    "control-flow signal escaped `main`",
                ));
                Err(())
            }
        }
    }

    fn lookup_main_name(&self, entry_module: StringId) -> Option<StringId> {
        self.modules[&entry_module]
            .functions
            .keys()
            .find(|id| self.interner.resolve(**id) == "main")
            .copied()
    }

    fn call_closure(&mut self, closure: &Rc<Closure>, args: Vec<Value>, call_span: Span) -> EvalResult<Value> {
        self.tracer.on_call(self.interner.resolve(closure.name), call_span);
        let mut scopes = Scopes::new();
        for ((name, _), value) in closure.params.iter().zip(args) {
            scopes.declare(*name, value);
        }
        match self.eval_block(closure.home_module, &closure.body, &mut scopes) {
            Ok(value) => Ok(value),
            Err(Outcome::Signal(Signal::Return(value))) => {
                self.tracer.on_return(call_span);
                Ok(value)
            }
            Err(Outcome::Signal(Signal::Break | Signal::Continue)) => {
                Err(self.runtime_error(ErrorKind::LoopControlOutsideLoop, call_span, "`break`/`continue` used outside a loop"))
            }
            Err(other) => Err(other),
        }
    }

    fn eval_block(&mut self, module: StringId, block: &Block, scopes: &mut Scopes) -> EvalResult<Value> {
        scopes.push();
        let result = self.eval_block_inner(module, block, scopes);
        scopes.pop();
        result
    }

    fn eval_block_inner(&mut self, module: StringId, block: &Block, scopes: &mut Scopes) -> EvalResult<Value> {
        let mut value = Value::Unit;
        for (i, stmt) in block.stmts.iter().enumerate() {
            let is_last = i == block.stmts.len() - 1;
            let stmt_value = self.eval_stmt(module, stmt, scopes)?;
            if is_last {
                value = stmt_value;
            }
        }
        Ok(value)
    }

    fn tick(&mut self, span: Span) -> EvalResult<()> {
        if self.steps.tick().is_err() {
            return Err(self.runtime_error(ErrorKind::StepLimitExceeded, span, "step limit exceeded"));
        }
        Ok(())
    }

    fn eval_stmt(&mut self, module: StringId, stmt: &StmtNode, scopes: &mut Scopes) -> EvalResult<Value> {
        self.tracer.on_statement(stmt.span);
        self.tick(stmt.span)?;
        match &stmt.kind {
            Stmt::Err => Ok(Value::Unit),
            Stmt::Let { name, value, .. } => {
                let v = self.eval_expr(module, value, scopes)?;
                if !scopes.declare(*name, v) {
                    return Err(self.runtime_error(
                        ErrorKind::DuplicateBinding,
                        stmt.span,
                        format!("'{}' is already bound in this scope", self.interner.resolve(*name)),
                    ));
                }
                Ok(Value::Unit)
            }
            Stmt::Set { name, value, .. } => {
                let v = self.eval_expr(module, value, scopes)?;
                if !scopes.set(*name, v) {
                    return Err(self.runtime_error(
                        ErrorKind::UnknownIdentifier,
                        stmt.span,
                        format!("'{}' is not bound", self.interner.resolve(*name)),
                    ));
                }
                Ok(Value::Unit)
            }
            Stmt::Return(value) => {
                let v = match value {
                    Some(e) => self.eval_expr(module, e, scopes)?,
                    None => Value::Unit,
                };
                Err(Signal::Return(v).into())
            }
            Stmt::Break => Err(Signal::Break.into()),
            Stmt::Continue => Err(Signal::Continue.into()),
            Stmt::While { cond, body } => {
                loop {
                    let c = self.eval_expr(module, cond, scopes)?;
                    if !self.truthy(&c) {
                        break;
                    }
                    self.tracer.on_loop_iteration(stmt.span);
                    self.tick(stmt.span)?;
                    match self.eval_block(module, body, scopes) {
                        Ok(_) => {}
                        Err(Outcome::Signal(Signal::Break)) => break,
                        Err(Outcome::Signal(Signal::Continue)) => continue,
                        Err(other) => return Err(other),
                    }
                }
                Ok(Value::Unit)
            }
            Stmt::For { var, start, end, inclusive, step, body, .. } => self.eval_for(module, *var, start, end, *inclusive, step.as_ref(), body, scopes, stmt.span),
            Stmt::ExprStmt(expr) => self.eval_expr(module, expr, scopes),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn eval_for(
        &mut self,
        module: StringId,
        var: StringId,
        start: &ExprNode,
        end: &ExprNode,
        inclusive: bool,
        step: Option<&ExprNode>,
        body: &Block,
        scopes: &mut Scopes,
        span: Span,
    ) -> EvalResult<Value> {
        let start_v = self.expect_int(module, start, scopes)?;
        let end_v = self.expect_int(module, end, scopes)?;
        let step_v = match step {
            Some(e) => self.expect_int(module, e, scopes)?,
            None => {
                if start_v <= end_v {
                    1
                } else {
                    -1
                }
            }
        };
        if step_v == 0 {
            return Err(self.runtime_error(ErrorKind::BadRange, span, "`for` step must be non-zero"));
        }
        let ascending = start_v <= end_v;
        if (step_v > 0) != ascending {
            return Err(self.runtime_error(ErrorKind::BadRange, span, "`for` step direction does not match range direction"));
        }

        let mut i = start_v;
        loop {
            let in_range = if ascending {
                if inclusive { i <= end_v } else { i < end_v }
            } else if inclusive {
                i >= end_v
            } else {
                i > end_v
            };
            if !in_range {
                break;
            }
            self.tracer.on_loop_iteration(span);
            self.tick(span)?;
            scopes.push();
            scopes.declare(var, Value::Integer(i));
            let result = self.eval_block_inner(module, body, scopes);
            scopes.pop();
            match result {
                Ok(_) => {}
                Err(Outcome::Signal(Signal::Break)) => break,
                Err(Outcome::Signal(Signal::Continue)) => {}
                Err(other) => return Err(other),
            }
            i += step_v;
        }
        Ok(Value::Unit)
    }

    fn expect_int(&mut self, module: StringId, expr: &ExprNode, scopes: &mut Scopes) -> EvalResult<i64> {
        match self.eval_expr(module, expr, scopes)? {
            Value::Integer(n) => Ok(n),
            _ => Err(self.runtime_error(ErrorKind::BadRange, expr.span, "expected an integer in range expression")),
        }
    }

    fn truthy(&self, value: &Value) -> bool {
        value.is_truthy(self.interner)
    }

    fn eval_expr(&mut self, module: StringId, expr: &ExprNode, scopes: &mut Scopes) -> EvalResult<Value> {
        match &expr.kind {
            Expr::Error => Ok(Value::Unit),
            Expr::Int(v) => Ok(Value::Integer(*v)),
            Expr::Str(s) => Ok(Value::String(*s)),
            Expr::Bool(b) => Ok(Value::Boolean(*b)),
            Expr::Paren(inner) => self.eval_expr(module, inner, scopes),
            Expr::Ident(name) => self.eval_ident(module, *name, expr.span, scopes),
            Expr::Unary { op, expr: inner } => self.eval_unary(module, *op, inner, expr.span, scopes),
            Expr::Binary { op, left, right } => self.eval_binary(module, *op, left, right, expr.span, scopes),
            Expr::FieldAccess { object, field, field_span } => self.eval_field_access(module, object, *field, *field_span, scopes),
            Expr::Index { object, index } => self.eval_index(module, object, index, expr.span, scopes),
            Expr::If { cond, then_block, else_block } => {
                let c = self.eval_expr(module, cond, scopes)?;
                if self.truthy(&c) {
                    self.eval_block(module, then_block, scopes)
                } else if let Some(else_block) = else_block {
                    self.eval_block(module, else_block, scopes)
                } else {
                    Ok(Value::Unit)
                }
            }
            Expr::Match { subject, arms } => self.eval_match(module, subject, arms, expr.span, scopes),
            Expr::Record(fields) => {
                let mut map = AHashMap::default();
                for field in fields {
                    let v = self.eval_expr(module, &field.value, scopes)?;
                    if map.insert(field.name, v).is_some() {
                        return Err(self.runtime_error(
                            ErrorKind::DuplicateField,
                            field.name_span,
                            format!("duplicate field '{}' in record literal", self.interner.resolve(field.name)),
                        ));
                    }
                }
                Ok(Value::Record(Rc::new(map)))
            }
            Expr::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expr(module, item, scopes)?);
                }
                Ok(Value::List(Rc::new(values)))
            }
            Expr::Call { callee, args } => self.eval_call(module, callee, args, expr.span, scopes),
        }
    }

    fn eval_ident(&mut self, module: StringId, name: StringId, span: Span, scopes: &Scopes) -> EvalResult<Value> {
        if let Some(v) = scopes.get(name) {
            return Ok(v.clone());
        }
        if let Some(closure) = self.modules[&module].functions.get(&name).cloned() {
            return Ok(Value::Function(closure));
        }
        if let Some(&(enum_name, arity)) = self.modules[&module].variants.get(&name) {
            if arity == 0 {
                return Ok(Value::EnumVariant {
                    enum_module: module,
                    enum_name,
                    variant: name,
                    payload: Vec::new(),
                });
            }
        }
        Err(self.runtime_error(
            ErrorKind::UnknownIdentifier,
            span,
            format!("unknown identifier '{}'", self.interner.resolve(name)),
        ))
    }

    fn eval_unary(&mut self, module: StringId, op: UnaryOp, inner: &ExprNode, span: Span, scopes: &mut Scopes) -> EvalResult<Value> {
        let v = self.eval_expr(module, inner, scopes)?;
        match (op, &v) {
            (UnaryOp::Neg, Value::Integer(n)) => Ok(Value::Integer(-n)),
            (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            _ => Err(self.runtime_error(ErrorKind::TypeMismatch, span, "invalid operand for unary operator")),
        }
    }

    fn eval_binary(&mut self, module: StringId, op: BinOp, left: &ExprNode, right: &ExprNode, span: Span, scopes: &mut Scopes) -> EvalResult<Value> {
        if matches!(op, BinOp::And) {
            let l = self.eval_expr(module, left, scopes)?;
            if !self.truthy(&l) {
                return Ok(Value::Boolean(false));
            }
            let r = self.eval_expr(module, right, scopes)?;
            return Ok(Value::Boolean(self.truthy(&r)));
        }
        if matches!(op, BinOp::Or) {
            let l = self.eval_expr(module, left, scopes)?;
            if self.truthy(&l) {
                return Ok(Value::Boolean(true));
            }
            let r = self.eval_expr(module, right, scopes)?;
            return Ok(Value::Boolean(self.truthy(&r)));
        }

        let l = self.eval_expr(module, left, scopes)?;
        let r = self.eval_expr(module, right, scopes)?;
        match op {
            BinOp::Add => self.eval_add(&l, &r, span),
            BinOp::Sub | BinOp::Mul | BinOp::Div => self.eval_arith(op, &l, &r, span),
            BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => self.eval_compare(op, &l, &r, span),
            BinOp::Eq => Ok(Value::Boolean(values_equal(&l, &r))),
            BinOp::NotEq => Ok(Value::Boolean(!values_equal(&l, &r))),
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    fn eval_add(&mut self, l: &Value, r: &Value, span: Span) -> EvalResult<Value> {
        match (l, r) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
            (Value::String(_), _) | (_, Value::String(_)) => {
                let mut s = l.display(self.interner);
                s.push_str(&r.display(self.interner));
                Ok(Value::String(self.intern_runtime_string(&s)))
            }
            _ => Err(self.runtime_error(ErrorKind::TypeMismatch, span, "cannot add these operands")),
        }
    }

    /// Interns a string produced at runtime (e.g. by `+` coercion) into the
    /// same table used at parse time, so it compares equal to any
    /// source-literal spelled the same way.
    fn intern_runtime_string(&mut self, s: &str) -> StringId {
        self.interner.intern(s)
    }

    fn eval_arith(&mut self, op: BinOp, l: &Value, r: &Value, span: Span) -> EvalResult<Value> {
        match (l, r) {
            (Value::Integer(a), Value::Integer(b)) => match op {
                BinOp::Sub => Ok(Value::Integer(a - b)),
                BinOp::Mul => Ok(Value::Integer(a * b)),
                BinOp::Div => {
                    if *b == 0 {
                        Err(self.runtime_error(ErrorKind::DivideByZero, span, "division by zero"))
                    } else {
                        Ok(Value::Integer(a / b))
                    }
                }
                _ => unreachable!(),
            },
            _ => Err(self.runtime_error(ErrorKind::TypeMismatch, span, "arithmetic requires integer operands")),
        }
    }

    fn eval_compare(&mut self, op: BinOp, l: &Value, r: &Value, span: Span) -> EvalResult<Value> {
        match (l, r) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Boolean(match op {
                BinOp::Lt => a < b,
                BinOp::LtEq => a <= b,
                BinOp::Gt => a > b,
                BinOp::GtEq => a >= b,
                _ => unreachable!(),
            })),
            _ => Err(self.runtime_error(ErrorKind::TypeMismatch, span, "comparison requires integer operands")),
        }
    }

    fn eval_field_access(&mut self, module: StringId, object: &ExprNode, field: StringId, field_span: Span, scopes: &mut Scopes) -> EvalResult<Value> {
        if let Expr::Ident(alias) = &object.kind {
            if scopes.get(*alias).is_none() {
                if let Some(&target) = self.modules[&module].import_aliases.get(alias) {
                    return self.eval_qualified(target, field, field_span);
                }
            }
        }
        let v = self.eval_expr(module, object, scopes)?;
        match v {
            Value::Record(fields) => fields.get(&field).cloned().ok_or_else(|| {
                self.runtime_error(
                    ErrorKind::MissingFieldAtRuntime,
                    field_span,
                    format!("no field '{}' on this record", self.interner.resolve(field)),
                )
            }),
            _ => Err(self.runtime_error(ErrorKind::MissingFieldAtRuntime, field_span, "value has no fields")),
        }
    }

    fn eval_qualified(&mut self, target: StringId, field: StringId, span: Span) -> EvalResult<Value> {
        if let Some(closure) = self.modules[&target].functions.get(&field).cloned() {
            if !self.modules[&target].exported.contains(&field) {
                return Err(self.runtime_error(ErrorKind::MissingExport, span, "name is not exported by its module"));
            }
            return Ok(Value::Function(closure));
        }
        if let Some(&(enum_name, arity)) = self.modules[&target].variants.get(&field) {
            if !self.modules[&target].exported.contains(&enum_name) {
                return Err(self.runtime_error(ErrorKind::MissingExport, span, "enum is not exported by its module"));
            }
            if arity == 0 {
                return Ok(Value::EnumVariant {
                    enum_module: target,
                    enum_name,
                    variant: field,
                    payload: Vec::new(),
                });
            }
            // A payload-carrying variant referenced bare (not called) has
            // no value form; this is only valid as a call callee, handled
            // in `eval_call`.
            return Err(self.runtime_error(ErrorKind::NotCallable, span, "variant requires payload arguments"));
        }
        Err(self.runtime_error(
            ErrorKind::UnknownIdentifier,
            span,
            format!("unknown qualified name '{}'", self.interner.resolve(field)),
        ))
    }

    fn eval_index(&mut self, module: StringId, object: &ExprNode, index: &ExprNode, span: Span, scopes: &mut Scopes) -> EvalResult<Value> {
        let object_v = self.eval_expr(module, object, scopes)?;
        let index_v = self.eval_expr(module, index, scopes)?;
        let Value::Integer(i) = index_v else {
            return Err(self.runtime_error(ErrorKind::TypeMismatch, index.span, "index must be an integer"));
        };
        match object_v {
            Value::List(items) => {
                if i < 0 || (i as usize) >= items.len() {
                    Err(self.runtime_error(ErrorKind::IndexOutOfBounds, span, format!("index {i} out of bounds")))
                } else {
                    Ok(items[i as usize].clone())
                }
            }
            _ => Err(self.runtime_error(ErrorKind::NonListIndex, object.span, "cannot index this value")),
        }
    }

    fn eval_match(&mut self, module: StringId, subject: &ExprNode, arms: &[MatchArm], span: Span, scopes: &mut Scopes) -> EvalResult<Value> {
        let subject_v = self.eval_expr(module, subject, scopes)?;
        for arm in arms {
            scopes.push();
            let matched = self.try_bind_pattern(module, &arm.pattern, &subject_v, scopes);
            if matched {
                let result = self.eval_block_inner(module, &arm.body, scopes);
                scopes.pop();
                return result;
            }
            scopes.pop();
        }
        Err(self.runtime_error(ErrorKind::NonExhaustiveMatch, span, "no match arm matched the subject"))
    }

    fn try_bind_pattern(&mut self, module: StringId, pattern: &PatternNode, subject: &Value, scopes: &mut Scopes) -> bool {
        match &pattern.kind {
            Pattern::Wildcard => true,
            Pattern::Int(v) => matches!(subject, Value::Integer(n) if n == v),
            Pattern::Bool(v) => matches!(subject, Value::Boolean(b) if b == v),
            Pattern::Str(v) => matches!(subject, Value::String(s) if self.interner.resolve(*s) == self.interner.resolve(*v)),
            Pattern::Variant { module: qualifier, variant, bindings } => {
                let target = match qualifier {
                    Some(alias) => self.modules[&module].import_aliases.get(alias).copied(),
                    None => Some(module),
                };
                let Some(target) = target else { return false };
                let Some(&(enum_name, _)) = self.modules[&target].variants.get(variant) else {
                    return false;
                };
                match subject {
                    Value::EnumVariant { enum_module, enum_name: subj_enum, variant: subj_variant, payload }
                        if *enum_module == target && *subj_enum == enum_name && subj_variant == variant =>
                    {
                        for (name, value) in bindings.iter().zip(payload.iter()) {
                            scopes.declare(*name, value.clone());
                        }
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    fn eval_call(&mut self, module: StringId, callee: &ExprNode, args: &[ExprNode], span: Span, scopes: &mut Scopes) -> EvalResult<Value> {
        if let Expr::Ident(name) = &callee.kind {
            if *name == self.print_id && scopes.get(*name).is_none() && self.modules[&module].functions.get(name).is_none() {
                return self.eval_print(module, args, scopes);
            }
        }

        // Bare (unqualified) payload-carrying variant constructor: `Variant(a, b)`.
        if let Expr::Ident(name) = &callee.kind {
            if scopes.get(*name).is_none() && self.modules[&module].functions.get(name).is_none() {
                if let Some(&(enum_name, arity)) = self.modules[&module].variants.get(name) {
                    return self.construct_variant(module, module, enum_name, *name, arity, args, span, scopes);
                }
            }
        }
        // Qualified payload-carrying variant constructor: `alias.Variant(a, b)`.
        if let Expr::FieldAccess { object, field, .. } = &callee.kind {
            if let Expr::Ident(alias) = &object.kind {
                if scopes.get(*alias).is_none() {
                    if let Some(&target) = self.modules[&module].import_aliases.get(alias) {
                        if let Some(&(enum_name, arity)) = self.modules[&target].variants.get(field) {
                            return self.construct_variant(module, target, enum_name, *field, arity, args, span, scopes);
                        }
                    }
                }
            }
        }

        let callee_v = self.eval_expr(module, callee, scopes)?;
        let Value::Function(closure) = callee_v else {
            return Err(self.runtime_error(ErrorKind::NotCallable, span, "value is not callable"));
        };
        if closure.params.len() != args.len() {
            return Err(self.runtime_error(
                ErrorKind::WrongArity,
                span,
                format!("expected {} argument(s), found {}", closure.params.len(), args.len()),
            ));
        }
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.eval_expr(module, arg, scopes)?);
        }
        self.call_closure(&closure, arg_values, span)
    }

    #[allow(clippy::too_many_arguments)]
    fn construct_variant(
        &mut self,
        calling_module: StringId,
        enum_module: StringId,
        enum_name: StringId,
        variant: StringId,
        arity: usize,
        args: &[ExprNode],
        span: Span,
        scopes: &mut Scopes,
    ) -> EvalResult<Value> {
        if args.len() != arity {
            return Err(self.runtime_error(
                ErrorKind::WrongArity,
                span,
                format!("variant expects {arity} payload value(s), found {}", args.len()),
            ));
        }
        let mut payload = Vec::with_capacity(args.len());
        for arg in args {
            payload.push(self.eval_expr(calling_module, arg, scopes)?);
        }
        Ok(Value::EnumVariant { enum_module, enum_name, variant, payload })
    }

    fn eval_print(&mut self, module: StringId, args: &[ExprNode], scopes: &mut Scopes) -> EvalResult<Value> {
        let mut parts = Vec::with_capacity(args.len());
        for arg in args {
            let v = self.eval_expr(module, arg, scopes)?;
            parts.push(v.display(self.interner));
        }
        self.print.write_line(&parts.join(" "));
        Ok(Value::Unit)
    }
}


fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Unit, Value::Unit) => true,
        (Value::List(x), Value::List(y)) => x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| values_equal(a, b)),
        (
            Value::EnumVariant { enum_module: em1, enum_name: en1, variant: v1, payload: p1 },
            Value::EnumVariant { enum_module: em2, enum_name: en2, variant: v2, payload: p2 },
        ) => em1 == em2 && en1 == en2 && v1 == v2 && p1.len() == p2.len() && p1.iter().zip(p2).all(|(a, b)| values_equal(a, b)),
        (Value::Record(x), Value::Record(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => false,
    }
}
