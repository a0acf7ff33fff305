//! Abstract syntax tree produced by the parser (C3).
//!
//! Every node carries the [`Span`] of its first and last token, per the
//! data model in the spec. Type annotations are parsed into [`TypeExpr`],
//! a purely syntactic tree; the checker resolves those into the semantic
//! [`crate::types::Type`] lattice.

use crate::{intern::StringId, span::Span};

/// A parsed type annotation, as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Int,
    Bool,
    String,
    Unit,
    /// A named type: an enum, optionally module-qualified (`alias.Name`).
    Named { module: Option<StringId>, name: StringId },
    List(Box<TypeExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

/// One `key: value` field of a record literal, in source order.
#[derive(Debug, Clone)]
pub struct RecordField {
    pub name: StringId,
    pub name_span: Span,
    pub value: ExprNode,
}

/// One arm of a `match` expression.
#[derive(Debug, Clone)]
pub struct MatchArm {
    pub pattern: PatternNode,
    pub body: Block,
    pub span: Span,
}

/// A pattern usable in a `match` arm.
#[derive(Debug, Clone)]
pub enum Pattern {
    Int(i64),
    Str(StringId),
    Bool(bool),
    Wildcard,
    /// `IDENT`, `IDENT(a, b)`, `module.IDENT`, or `module.IDENT(a, b)`.
    ///
    /// `bindings` names the payload slots to bind in the arm's block scope;
    /// it is empty for a variant with no payload.
    Variant {
        module: Option<StringId>,
        variant: StringId,
        bindings: Vec<StringId>,
    },
}

#[derive(Debug, Clone)]
pub struct PatternNode {
    pub kind: Pattern,
    pub span: Span,
}

/// An expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64),
    Str(StringId),
    Bool(bool),
    /// A bare identifier reference; resolved to a local binding or a
    /// module-namespace entry during evaluation/typechecking.
    Ident(StringId),
    Record(Vec<RecordField>),
    List(Vec<ExprNode>),
    Unary {
        op: UnaryOp,
        expr: Box<ExprNode>,
    },
    Binary {
        op: BinOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    /// `object.field`. Also used for `alias.name` module-qualified access,
    /// where `object` is `Ident(alias)` and the checker/evaluator resolve
    /// against the module namespace bound to `alias` instead of a record.
    FieldAccess {
        object: Box<ExprNode>,
        field: StringId,
        field_span: Span,
    },
    Index {
        object: Box<ExprNode>,
        index: Box<ExprNode>,
    },
    If {
        cond: Box<ExprNode>,
        then_block: Block,
        else_block: Option<Block>,
    },
    Match {
        subject: Box<ExprNode>,
        arms: Vec<MatchArm>,
    },
    Call {
        callee: Box<ExprNode>,
        args: Vec<ExprNode>,
    },
    Paren(Box<ExprNode>),
    /// Sentinel produced by parser error recovery in expression position.
    Error,
}

#[derive(Debug, Clone)]
pub struct ExprNode {
    pub kind: Expr,
    pub span: Span,
}

impl ExprNode {
    #[must_use]
    pub const fn new(kind: Expr, span: Span) -> Self {
        Self { kind, span }
    }
}

/// A statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    Let {
        name: StringId,
        name_span: Span,
        ty: Option<TypeExpr>,
        value: ExprNode,
    },
    Set {
        name: StringId,
        name_span: Span,
        value: ExprNode,
    },
    Return(Option<ExprNode>),
    While {
        cond: ExprNode,
        body: Block,
    },
    For {
        var: StringId,
        var_span: Span,
        start: ExprNode,
        end: ExprNode,
        inclusive: bool,
        step: Option<ExprNode>,
        body: Block,
    },
    Break,
    Continue,
    ExprStmt(ExprNode),
    /// Sentinel left behind by parser error recovery. Treated as a no-op
    /// (Unit) by the checker and evaluator.
    Err,
}

#[derive(Debug, Clone)]
pub struct StmtNode {
    pub kind: Stmt,
    pub span: Span,
}

/// A `{ ... }` block. Its value (for `if`/`match`/function-body position)
/// is the value of its last `ExprStmt`, or Unit otherwise.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<StmtNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: StringId,
    pub name_span: Span,
    pub ty: Option<TypeExpr>,
}

#[derive(Debug, Clone)]
pub struct FnDef {
    pub name: StringId,
    pub name_span: Span,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumVariantDef {
    pub name: StringId,
    pub name_span: Span,
    pub payload_types: Vec<TypeExpr>,
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: StringId,
    pub name_span: Span,
    pub variants: Vec<EnumVariantDef>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ModuleDecl {
    pub name: StringId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub name: StringId,
    pub name_span: Span,
    pub alias: Option<StringId>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Export {
    pub names: Vec<(StringId, Span)>,
    pub span: Span,
}

/// A top-level item.
#[derive(Debug, Clone)]
pub enum Item {
    Import(Import),
    EnumDef(EnumDef),
    FnDef(FnDef),
    Export(Export),
}

/// A fully parsed source file: `program ::= module_decl? (import | export |
/// enum_def | fn_def)*`.
#[derive(Debug, Clone)]
pub struct Program {
    pub module_decl: Option<ModuleDecl>,
    pub items: Vec<Item>,
    pub span: Span,
}
