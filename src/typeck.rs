//! Static type checker (C5).
//!
//! A syntactic pass over the AST: no inference beyond what a declared
//! annotation or a literal's shape gives directly. Operates over a whole
//! loaded [`ModuleGraph`], building a signature for every module
//! (functions and enums) before checking any function body, so forward
//! references within and across modules resolve correctly.

use std::collections::HashSet;

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::{
    ast::{BinOp, Block, Expr, ExprNode, Item, Pattern, Stmt, StmtNode, TypeExpr, UnaryOp},
    diagnostics::{Diagnostic, DiagnosticSink, ErrorKind},
    intern::{Interner, StringId},
    module::ModuleGraph,
    span::Span,
    types::Type,
};

/// One module's declared surface: its functions' signatures and its
/// enums' variant payload shapes, plus the alias table its `import`
/// statements establish.
#[derive(Debug, Default)]
pub struct ModuleSig {
    pub functions: AHashMap<StringId, (Vec<Type>, Type)>,
    pub enums: AHashMap<StringId, EnumSig>,
    pub exported: HashSet<StringId>,
    pub import_aliases: AHashMap<StringId, StringId>,
}

#[derive(Debug, Default, Clone)]
pub struct EnumSig {
    pub variants: IndexMap<StringId, Vec<Type>, ahash::RandomState>,
}

/// Type environment for one function body: a stack of name -> Type maps.
#[derive(Debug, Default)]
struct TypeEnv {
    scopes: Vec<AHashMap<StringId, Type>>,
}

impl TypeEnv {
    fn new(params: impl IntoIterator<Item = (StringId, Type)>) -> Self {
        let mut root = AHashMap::default();
        for (name, ty) in params {
            root.insert(name, ty);
        }
        Self { scopes: vec![root] }
    }

    fn push(&mut self) {
        self.scopes.push(AHashMap::default());
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: StringId, ty: Type) -> bool {
        let frame = self.scopes.last_mut().expect("root scope present");
        if frame.contains_key(&name) {
            return false;
        }
        frame.insert(name, ty);
        true
    }

    fn lookup(&self, name: StringId) -> Option<&Type> {
        self.scopes.iter().rev().find_map(|s| s.get(&name))
    }

    /// Updates the nearest enclosing binding, for `set`.
    fn update(&mut self, name: StringId, ty: Type) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(&name) {
                *slot = ty;
                return true;
            }
        }
        false
    }
}

/// Builds every module's signature, in dependency order, then type-checks
/// every function body. Returns the signature table so the evaluator can
/// reuse it for call resolution.
pub fn check_graph(
    graph: &ModuleGraph,
    interner: &Interner,
    sink: &mut DiagnosticSink,
    strict_types: bool,
) -> AHashMap<StringId, ModuleSig> {
    let mut sigs: AHashMap<StringId, ModuleSig> = AHashMap::default();

    for module_id in &graph.order {
        let program = &graph.modules[module_id].program;
        let mut sig = ModuleSig::default();

        for item in &program.items {
            if let Item::Import(import) = item {
                let alias = import.alias.unwrap_or(import.name);
                sig.import_aliases.insert(alias, import.name);
            }
        }
        for item in &program.items {
            if let Item::Export(export) = item {
                for (name, _) in &export.names {
                    sig.exported.insert(*name);
                }
            }
        }
        // Stub in enum names first (with empty variant maps) so that
        // payload/parameter types naming a sibling enum declared later in
        // the same module still resolve.
        for item in &program.items {
            if let Item::EnumDef(enum_def) = item {
                sig.enums.insert(enum_def.name, EnumSig::default());
            }
        }
        sigs.insert(*module_id, sig);

        for item in &program.items {
            if let Item::EnumDef(enum_def) = item {
                let mut variants = IndexMap::default();
                for variant in &enum_def.variants {
                    let payload = variant
                        .payload_types
                        .iter()
                        .map(|ty| resolve_type_expr(ty, *module_id, &sigs, interner, sink, enum_def.span))
                        .collect();
                    variants.insert(variant.name, payload);
                }
                sigs.get_mut(module_id).expect("just inserted").enums.insert(enum_def.name, EnumSig { variants });
            }
        }
        for item in &program.items {
            if let Item::FnDef(f) = item {
                let params = f
                    .params
                    .iter()
                    .map(|p| {
                        p.ty.as_ref()
                            .map_or(Type::Unknown, |ty| resolve_type_expr(ty, *module_id, &sigs, interner, sink, f.span))
                    })
                    .collect();
                let ret = f
                    .return_type
                    .as_ref()
                    .map_or(Type::Unit, |ty| resolve_type_expr(ty, *module_id, &sigs, interner, sink, f.span));
                sigs.get_mut(module_id).expect("just inserted").functions.insert(f.name, (params, ret));
            }
        }
    }

    for module_id in &graph.order {
        let program = &graph.modules[module_id].program;
        let mut checker = Checker {
            interner,
            sink: &mut *sink,
            sigs: &sigs,
            strict_types,
            current_return: Type::Unit,
        };
        for item in &program.items {
            if let Item::FnDef(f) = item {
                checker.check_fn(*module_id, f);
            }
        }
    }

    sigs
}

fn resolve_type_expr(
    ty: &TypeExpr,
    current_module: StringId,
    sigs: &AHashMap<StringId, ModuleSig>,
    interner: &Interner,
    sink: &mut DiagnosticSink,
    span: Span,
) -> Type {
    match ty {
        TypeExpr::Int => Type::Int,
        TypeExpr::Bool => Type::Bool,
        TypeExpr::String => Type::String,
        TypeExpr::Unit => Type::Unit,
        TypeExpr::List(inner) => Type::ListType(Box::new(resolve_type_expr(inner, current_module, sigs, interner, sink, span))),
        TypeExpr::Named { module: None, name } => {
            if sigs.get(&current_module).is_some_and(|s| s.enums.contains_key(name)) {
                Type::EnumType { module: current_module, name: *name }
            } else {
                sink.record(Diagnostic::error(
                    ErrorKind::UnknownIdentifier,
                    span,
                    format!("unknown type '{}'", interner.resolve(*name)),
                ));
                Type::Unknown
            }
        }
        TypeExpr::Named { module: Some(alias), name } => {
            let Some(target) = sigs.get(&current_module).and_then(|s| s.import_aliases.get(alias)).copied() else {
                sink.record(Diagnostic::error(
                    ErrorKind::UnknownIdentifier,
                    span,
                    format!("unknown module alias '{}'", interner.resolve(*alias)),
                ));
                return Type::Unknown;
            };
            if sigs.get(&target).is_some_and(|s| s.enums.contains_key(name)) {
                Type::EnumType { module: target, name: *name }
            } else {
                sink.record(Diagnostic::error(
                    ErrorKind::UnknownIdentifier,
                    span,
                    format!("unknown type '{}.{}'", interner.resolve(*alias), interner.resolve(*name)),
                ));
                Type::Unknown
            }
        }
    }
}

struct Checker<'a> {
    interner: &'a Interner,
    sink: &'a mut DiagnosticSink,
    sigs: &'a AHashMap<StringId, ModuleSig>,
    strict_types: bool,
    /// The enclosing function's declared return type, checked against every
    /// `return` statement regardless of how deeply it is nested inside
    /// `if`/`match` bodies. A field rather than a threaded parameter, since
    /// `if`/`match` are expressions and would otherwise have to plumb it
    /// through every `check_expr` call site.
    current_return: Type,
}

impl<'a> Checker<'a> {
    /// Compatibility gate used at every operand check. With `strict_types`
    /// on (the default), an `Unknown` operand where a concrete type is
    /// required is an error; with it off, `Unknown` matches anything.
    fn fits(&self, expected: &Type, actual: &Type) -> bool {
        if self.strict_types && (matches!(expected, Type::Unknown) ^ matches!(actual, Type::Unknown)) {
            return false;
        }
        expected.compatible(actual)
    }

    fn mismatch(&mut self, span: Span, expected: &Type, actual: &Type) {
        self.sink.record(Diagnostic::error(
            ErrorKind::TypeMismatch,
            span,
            format!("expected {expected}, found {actual}"),
        ));
    }

    fn check_fn(&mut self, module: StringId, f: &crate::ast::FnDef) {
        let sig = &self.sigs[&module];
        let (param_types, ret) = sig.functions[&f.name].clone();
        let params = f.params.iter().zip(param_types).map(|(p, ty)| (p.name, ty));
        let mut env = TypeEnv::new(params);
        self.current_return = ret.clone();
        let block_ty = self.check_block(module, &f.body, &mut env);
        // A body ending in an explicit `return` already had its value
        // checked against `ret` there; the block's own value is `Unit` in
        // that case (as for any non-expression statement) and comparing it
        // against `ret` again would be a false mismatch. Only a body ending
        // in a trailing expression uses the block value as the result.
        let ends_in_return = matches!(f.body.stmts.last().map(|s| &s.kind), Some(Stmt::Return(_)));
        if !ends_in_return && !ret.compatible(&Type::Unit) && !self.fits(&ret, &block_ty) {
            self.mismatch(f.body.span, &ret, &block_ty);
        }
    }

    fn check_block(&mut self, module: StringId, block: &Block, env: &mut TypeEnv) -> Type {
        env.push();
        let mut value = Type::Unit;
        for (i, stmt) in block.stmts.iter().enumerate() {
            let ty = self.check_stmt(module, stmt, env);
            if i == block.stmts.len() - 1 {
                value = ty;
            }
        }
        env.pop();
        value
    }

    fn check_stmt(&mut self, module: StringId, stmt: &StmtNode, env: &mut TypeEnv) -> Type {
        match &stmt.kind {
            Stmt::Let { name, value, ty, .. } => {
                let value_ty = self.check_expr(module, value, env);
                let declared = ty.as_ref().map(|t| resolve_type_expr(t, module, self.sigs, self.interner, self.sink, stmt.span));
                let final_ty = if let Some(declared) = declared {
                    if !self.fits(&declared, &value_ty) {
                        self.mismatch(stmt.span, &declared, &value_ty);
                    }
                    declared
                } else {
                    value_ty
                };
                if !env.declare(*name, final_ty) {
                    self.sink.record(Diagnostic::error(
                        ErrorKind::DuplicateBinding,
                        stmt.span,
                        format!("'{}' is already bound in this scope", self.interner.resolve(*name)),
                    ));
                }
                Type::Unit
            }
            Stmt::Set { name, value, .. } => {
                let value_ty = self.check_expr(module, value, env);
                match env.lookup(*name).cloned() {
                    Some(existing) => {
                        if !self.fits(&existing, &value_ty) {
                            self.mismatch(stmt.span, &existing, &value_ty);
                        }
                    }
                    None => {
                        self.sink.record(Diagnostic::error(
                            ErrorKind::UnknownIdentifier,
                            stmt.span,
                            format!("'{}' is not bound", self.interner.resolve(*name)),
                        ));
                    }
                }
                if !env.update(*name, value_ty) {
                    // already reported above
                }
                Type::Unit
            }
            Stmt::Return(value) => {
                let ty = value.as_ref().map_or(Type::Unit, |v| self.check_expr(module, v, env));
                let expected = self.current_return.clone();
                if !self.fits(&expected, &ty) {
                    self.mismatch(stmt.span, &expected, &ty);
                }
                Type::Unit
            }
            Stmt::While { cond, body } => {
                let cond_ty = self.check_expr(module, cond, env);
                if !self.fits(&Type::Bool, &cond_ty) {
                    self.mismatch(cond.span, &Type::Bool, &cond_ty);
                }
                self.check_block(module, body, env);
                Type::Unit
            }
            Stmt::For { var, start, end, step, body, .. } => {
                let start_ty = self.check_expr(module, start, env);
                let end_ty = self.check_expr(module, end, env);
                if !self.fits(&Type::Int, &start_ty) {
                    self.mismatch(start.span, &Type::Int, &start_ty);
                }
                if !self.fits(&Type::Int, &end_ty) {
                    self.mismatch(end.span, &Type::Int, &end_ty);
                }
                if let Some(step) = step {
                    let step_ty = self.check_expr(module, step, env);
                    if !self.fits(&Type::Int, &step_ty) {
                        self.mismatch(step.span, &Type::Int, &step_ty);
                    }
                }
                env.push();
                env.declare(*var, Type::Int);
                self.check_block(module, body, env);
                env.pop();
                Type::Unit
            }
            Stmt::Break | Stmt::Continue | Stmt::Err => Type::Unit,
            Stmt::ExprStmt(expr) => self.check_expr(module, expr, env),
        }
    }

    fn check_expr(&mut self, module: StringId, expr: &ExprNode, env: &mut TypeEnv) -> Type {
        match &expr.kind {
            Expr::Int(_) => Type::Int,
            Expr::Str(_) => Type::String,
            Expr::Bool(_) => Type::Bool,
            Expr::Error => Type::Unknown,
            Expr::Paren(inner) => self.check_expr(module, inner, env),
            Expr::Ident(name) => self.check_ident(module, *name, expr.span, env),
            Expr::Unary { op, expr: inner } => {
                let ty = self.check_expr(module, inner, env);
                match op {
                    UnaryOp::Neg => {
                        if !self.fits(&Type::Int, &ty) {
                            self.mismatch(expr.span, &Type::Int, &ty);
                        }
                        Type::Int
                    }
                    UnaryOp::Not => {
                        if !self.fits(&Type::Bool, &ty) {
                            self.mismatch(expr.span, &Type::Bool, &ty);
                        }
                        Type::Bool
                    }
                }
            }
            Expr::Binary { op, left, right } => self.check_binary(module, *op, left, right, expr.span, env),
            Expr::FieldAccess { object, field, field_span } => self.check_field_access(module, object, *field, *field_span, env),
            Expr::Index { object, index } => {
                let object_ty = self.check_expr(module, object, env);
                let index_ty = self.check_expr(module, index, env);
                if !self.fits(&Type::Int, &index_ty) {
                    self.mismatch(index.span, &Type::Int, &index_ty);
                }
                match object_ty {
                    Type::ListType(elem) => *elem,
                    Type::Unknown => Type::Unknown,
                    other => {
                        self.sink.record(Diagnostic::error(
                            ErrorKind::NonListIndex,
                            object.span,
                            format!("cannot index into {other}"),
                        ));
                        Type::Unknown
                    }
                }
            }
            Expr::If { cond, then_block, else_block } => {
                let cond_ty = self.check_expr(module, cond, env);
                if !self.fits(&Type::Bool, &cond_ty) {
                    self.mismatch(cond.span, &Type::Bool, &cond_ty);
                }
                let then_ty = self.check_block(module, then_block, env);
                let else_ty = else_block.as_ref().map(|b| self.check_block(module, b, env));
                match else_ty {
                    Some(else_ty) if then_ty.compatible(&else_ty) => then_ty,
                    _ => Type::Unit,
                }
            }
            Expr::Match { subject, arms } => self.check_match(module, subject, arms, env),
            Expr::Record(fields) => {
                let mut map = AHashMap::default();
                for field in fields {
                    let ty = self.check_expr(module, &field.value, env);
                    map.insert(field.name, ty);
                }
                Type::RecordType(map)
            }
            Expr::List(items) => {
                let mut elem_ty = None;
                for item in items {
                    let ty = self.check_expr(module, item, env);
                    elem_ty = match elem_ty {
                        None => Some(ty),
                        Some(prev) if prev.compatible(&ty) => Some(prev),
                        Some(_) => Some(Type::Unknown),
                    };
                }
                Type::ListType(Box::new(elem_ty.unwrap_or(Type::Unknown)))
            }
            Expr::Call { callee, args } => self.check_call(module, callee, args, expr.span, env),
        }
    }

    fn check_ident(&mut self, module: StringId, name: StringId, span: Span, env: &TypeEnv) -> Type {
        if let Some(ty) = env.lookup(name) {
            return ty.clone();
        }
        let sig = &self.sigs[&module];
        if let Some((params, ret)) = sig.functions.get(&name) {
            return Type::FnType { params: params.clone(), ret: Box::new(ret.clone()) };
        }
        for (enum_name, enum_sig) in &sig.enums {
            if enum_sig.variants.contains_key(&name) {
                return Type::EnumType { module, name: *enum_name };
            }
        }
        self.sink.record(Diagnostic::error(
            ErrorKind::UnknownIdentifier,
            span,
            format!("unknown identifier '{}'", self.interner.resolve(name)),
        ));
        Type::Unknown
    }

    fn check_field_access(&mut self, module: StringId, object: &ExprNode, field: StringId, field_span: Span, env: &mut TypeEnv) -> Type {
        if let Expr::Ident(alias) = &object.kind {
            let sig = &self.sigs[&module];
            if let Some(&target) = sig.import_aliases.get(alias) {
                return self.check_qualified_access(target, field, field_span);
            }
        }
        let object_ty = self.check_expr(module, object, env);
        match object_ty {
            Type::RecordType(fields) => fields.get(&field).cloned().unwrap_or_else(|| {
                self.sink.record(Diagnostic::error(
                    ErrorKind::UnknownField,
                    field_span,
                    format!("no field '{}' on this record", self.interner.resolve(field)),
                ));
                Type::Unknown
            }),
            Type::Unknown => Type::Unknown,
            other => {
                self.sink.record(Diagnostic::error(
                    ErrorKind::UnknownField,
                    field_span,
                    format!("{other} has no fields"),
                ));
                Type::Unknown
            }
        }
    }

    fn check_qualified_access(&mut self, target: StringId, field: StringId, span: Span) -> Type {
        let Some(target_sig) = self.sigs.get(&target) else {
            return Type::Unknown;
        };
        if let Some((params, ret)) = target_sig.functions.get(&field) {
            if !target_sig.exported.contains(&field) {
                self.sink.record(Diagnostic::error(ErrorKind::MissingExport, span, "name is not exported by its module"));
            }
            return Type::FnType { params: params.clone(), ret: Box::new(ret.clone()) };
        }
        for (enum_name, enum_sig) in &target_sig.enums {
            if enum_sig.variants.contains_key(&field) {
                if !target_sig.exported.contains(enum_name) {
                    self.sink.record(Diagnostic::error(ErrorKind::MissingExport, span, "enum is not exported by its module"));
                }
                return Type::EnumType { module: target, name: *enum_name };
            }
        }
        self.sink.record(Diagnostic::error(
            ErrorKind::UnknownField,
            span,
            format!("unknown qualified name '{}'", self.interner.resolve(field)),
        ));
        Type::Unknown
    }

    fn check_binary(&mut self, module: StringId, op: BinOp, left: &ExprNode, right: &ExprNode, span: Span, env: &mut TypeEnv) -> Type {
        let lt = self.check_expr(module, left, env);
        let rt = self.check_expr(module, right, env);
        match op {
            BinOp::Sub | BinOp::Mul | BinOp::Div => {
                if !self.fits(&Type::Int, &lt) {
                    self.mismatch(left.span, &Type::Int, &lt);
                }
                if !self.fits(&Type::Int, &rt) {
                    self.mismatch(right.span, &Type::Int, &rt);
                }
                Type::Int
            }
            BinOp::Add => {
                if lt.compatible(&Type::Int) && rt.compatible(&Type::Int) {
                    Type::Int
                } else if lt.compatible(&Type::String) || rt.compatible(&Type::String) {
                    Type::String
                } else if matches!(lt, Type::Unknown) || matches!(rt, Type::Unknown) {
                    Type::Unknown
                } else {
                    self.sink.record(Diagnostic::error(
                        ErrorKind::TypeMismatch,
                        span,
                        format!("cannot add {lt} and {rt}"),
                    ));
                    Type::Unknown
                }
            }
            BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => {
                if !self.fits(&Type::Int, &lt) {
                    self.mismatch(left.span, &Type::Int, &lt);
                }
                if !self.fits(&Type::Int, &rt) {
                    self.mismatch(right.span, &Type::Int, &rt);
                }
                Type::Bool
            }
            BinOp::Eq | BinOp::NotEq => {
                if !lt.compatible(&rt) {
                    self.mismatch(span, &lt, &rt);
                }
                Type::Bool
            }
            BinOp::And | BinOp::Or => {
                if !self.fits(&Type::Bool, &lt) {
                    self.mismatch(left.span, &Type::Bool, &lt);
                }
                if !self.fits(&Type::Bool, &rt) {
                    self.mismatch(right.span, &Type::Bool, &rt);
                }
                Type::Bool
            }
        }
    }

    fn check_call(&mut self, module: StringId, callee: &ExprNode, args: &[ExprNode], span: Span, env: &mut TypeEnv) -> Type {
        if let Expr::Ident(name) = &callee.kind {
            if self.interner.resolve(*name) == "print" && env.lookup(*name).is_none() {
                for arg in args {
                    self.check_expr(module, arg, env);
                }
                return Type::Unit;
            }
        }
        let callee_ty = self.check_expr(module, callee, env);
        let arg_types: Vec<_> = args.iter().map(|a| self.check_expr(module, a, env)).collect();
        match callee_ty {
            Type::FnType { params, ret } => {
                if params.len() != arg_types.len() {
                    self.sink.record(Diagnostic::error(
                        ErrorKind::WrongArity,
                        span,
                        format!("expected {} argument(s), found {}", params.len(), arg_types.len()),
                    ));
                } else {
                    for (i, (expected, actual)) in params.iter().zip(&arg_types).enumerate() {
                        if !self.fits(expected, actual) {
                            self.mismatch(args[i].span, expected, actual);
                        }
                    }
                }
                *ret
            }
            Type::EnumType { module: enum_module, name: enum_name } => {
                self.check_variant_call(enum_module, enum_name, callee, &arg_types, args, span)
            }
            Type::Unknown => Type::Unknown,
            _ => Type::Unknown,
        }
    }

    /// Checks a payload-carrying variant constructor call (`Circle(1)` or
    /// `alias.Tagged(1)`) against its declared payload arity and types.
    /// `callee` is still the unresolved call target, so the variant name
    /// (lost once `check_ident`/`check_qualified_access` collapsed it to
    /// the enum's `Type::EnumType`) is recovered from it directly.
    fn check_variant_call(
        &mut self,
        enum_module: StringId,
        enum_name: StringId,
        callee: &ExprNode,
        arg_types: &[Type],
        args: &[ExprNode],
        span: Span,
    ) -> Type {
        let result = Type::EnumType { module: enum_module, name: enum_name };
        let variant_name = match &callee.kind {
            Expr::Ident(name) => *name,
            Expr::FieldAccess { field, .. } => *field,
            _ => return result,
        };
        let Some(payload) = self.sigs.get(&enum_module).and_then(|sig| sig.enums.get(&enum_name)).and_then(|e| e.variants.get(&variant_name))
        else {
            return result;
        };
        if payload.len() != arg_types.len() {
            self.sink.record(Diagnostic::error(
                ErrorKind::WrongArity,
                span,
                format!("expected {} argument(s), found {}", payload.len(), arg_types.len()),
            ));
        } else {
            for (i, (expected, actual)) in payload.iter().zip(arg_types).enumerate() {
                if !self.fits(expected, actual) {
                    self.mismatch(args[i].span, expected, actual);
                }
            }
        }
        result
    }

    fn check_match(&mut self, module: StringId, subject: &ExprNode, arms: &[crate::ast::MatchArm], env: &mut TypeEnv) -> Type {
        let subject_ty = self.check_expr(module, subject, env);
        let mut result: Option<Type> = None;
        for arm in arms {
            env.push();
            self.bind_pattern(module, &arm.pattern, &subject_ty, env);
            let arm_ty = self.check_block(module, &arm.body, env);
            env.pop();
            result = Some(match result {
                None => arm_ty,
                Some(prev) if prev.compatible(&arm_ty) => prev,
                Some(_) => Type::Unit,
            });
        }
        result.unwrap_or(Type::Unit)
    }

    fn bind_pattern(&mut self, module: StringId, pattern: &crate::ast::PatternNode, subject_ty: &Type, env: &mut TypeEnv) {
        match &pattern.kind {
            Pattern::Int(_) => {
                if !self.fits(&Type::Int, subject_ty) {
                    self.mismatch(pattern.span, &Type::Int, subject_ty);
                }
            }
            Pattern::Str(_) => {
                if !self.fits(&Type::String, subject_ty) {
                    self.mismatch(pattern.span, &Type::String, subject_ty);
                }
            }
            Pattern::Bool(_) => {
                if !self.fits(&Type::Bool, subject_ty) {
                    self.mismatch(pattern.span, &Type::Bool, subject_ty);
                }
            }
            Pattern::Wildcard => {}
            Pattern::Variant { module: qualifier, variant, bindings } => {
                let enum_sig_and_module = match qualifier {
                    Some(alias) => {
                        let target = self.sigs[&module].import_aliases.get(alias).copied();
                        target.and_then(|t| self.sigs.get(&t).map(|s| (t, s)))
                    }
                    None => Some((module, &self.sigs[&module])),
                };
                let Some((enum_module, sig)) = enum_sig_and_module else {
                    self.sink.record(Diagnostic::error(ErrorKind::PatternMismatch, pattern.span, "unknown module in pattern"));
                    return;
                };
                let found = sig.enums.iter().find(|(_, e)| e.variants.contains_key(variant));
                let Some((enum_name, enum_sig)) = found else {
                    self.sink.record(Diagnostic::error(
                        ErrorKind::PatternMismatch,
                        pattern.span,
                        format!("unknown variant '{}'", self.interner.resolve(*variant)),
                    ));
                    return;
                };
                let pattern_enum_ty = Type::EnumType { module: enum_module, name: *enum_name };
                if !self.fits(&pattern_enum_ty, subject_ty) {
                    self.mismatch(pattern.span, subject_ty, &pattern_enum_ty);
                }
                let payload_types = enum_sig.variants[variant].clone();
                for (binding, ty) in bindings.iter().zip(payload_types) {
                    env.declare(*binding, ty);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics::SinkMode, module::{load_graph, MapLoader}, parser::parse_source};

    fn check(src: &str) -> (DiagnosticSink, Interner) {
        let loader = MapLoader::new().with("main", src);
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new(SinkMode::All);
        let graph = load_graph("main", &loader, &mut interner, &mut sink, parse_source).expect("should load");
        check_graph(&graph, &interner, &mut sink, true);
        (sink, interner)
    }

    #[test]
    fn accepts_well_typed_program() {
        let (sink, _) = check("fn main() { let a = 40; let b = 2; print(a + b); }");
        assert!(!sink.has_errors());
    }

    #[test]
    fn rejects_arithmetic_type_mismatch() {
        let (sink, _) = check(r#"fn main() { let x = "hi" - 1; }"#);
        assert!(sink.has_errors());
    }

    #[test]
    fn rejects_duplicate_let_in_same_scope() {
        let (sink, _) = check("fn main() { let x = 1; let x = 2; }");
        assert!(sink.has_errors());
        assert_eq!(sink.reported()[0].kind, ErrorKind::DuplicateBinding);
    }

    #[test]
    fn string_coercion_allows_plus_with_int() {
        let (sink, _) = check(r#"fn main() { print("Result is " + 42); }"#);
        assert!(!sink.has_errors());
    }
}
