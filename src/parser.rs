//! Recursive-descent parser with precedence climbing and error recovery
//! (C3).

use crate::{
    ast::{
        Block, EnumDef, EnumVariantDef, Export, Expr, ExprNode, FnDef, Import, Item, MatchArm, ModuleDecl, Param,
        Pattern, PatternNode, Program, RecordField, Stmt, StmtNode, TypeExpr, UnaryOp,
    },
    diagnostics::{Diagnostic, DiagnosticSink, ErrorKind},
    intern::{Interner, StringId},
    lexer::lex,
    span::Span,
    token::{Keyword, Symbol, Token, TokenKind},
};

/// Interned spellings the parser needs to recognize by identity rather than
/// reserved keyword: the contextual `as` in import aliases, and the
/// built-in type names, which are ordinary identifiers lexically but map to
/// dedicated [`TypeExpr`] variants.
#[derive(Debug, Clone, Copy)]
pub struct ParserKeywords {
    pub as_id: StringId,
    pub int_id: StringId,
    pub bool_id: StringId,
    pub string_id: StringId,
    pub unit_id: StringId,
}

impl ParserKeywords {
    #[must_use]
    pub fn intern(interner: &mut Interner) -> Self {
        Self {
            as_id: interner.intern("as"),
            int_id: interner.intern("Int"),
            bool_id: interner.intern("Bool"),
            string_id: interner.intern("String"),
            unit_id: interner.intern("Unit"),
        }
    }
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    sink: &'a mut DiagnosticSink,
    kw: ParserKeywords,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token], sink: &'a mut DiagnosticSink, kw: ParserKeywords) -> Self {
        Self { tokens, pos: 0, sink, kw }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_n(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if !tok.is_eof() {
            self.pos += 1;
        }
        tok
    }

    fn check_symbol(&self, sym: Symbol) -> bool {
        matches!(&self.peek().kind, TokenKind::Symbol(s) if *s == sym)
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(&self.peek().kind, TokenKind::Keyword(k) if *k == kw)
    }

    fn eat_symbol(&mut self, sym: Symbol) -> bool {
        if self.check_symbol(sym) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_symbol(&mut self, sym: Symbol, what: &str) -> Option<Token> {
        if self.check_symbol(sym) {
            Some(self.advance())
        } else {
            let span = self.span();
            self.sink.record(Diagnostic::error(
                ErrorKind::MissingTerminator,
                span,
                format!("expected {what}"),
            ));
            None
        }
    }

    fn error_unexpected(&mut self, what: &str) {
        let span = self.span();
        let found = describe(&self.peek().kind);
        self.sink.record(Diagnostic::error(
            ErrorKind::UnexpectedToken,
            span,
            format!("expected {what}, found {found}"),
        ));
    }

    fn ident(&mut self) -> Option<(StringId, Span)> {
        if let TokenKind::Ident(id) = self.peek().kind {
            let span = self.span();
            self.advance();
            Some((id, span))
        } else {
            self.error_unexpected("an identifier");
            None
        }
    }

    /// Skips tokens until a synchronization point: `;` (consumed), a
    /// closing `}` (not consumed, left for the caller), a top-level
    /// keyword (not consumed), or end of file.
    fn resync_stmt(&mut self) {
        loop {
            match &self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::Symbol(Symbol::Semicolon) => {
                    self.advance();
                    return;
                }
                TokenKind::Symbol(Symbol::RBrace) => return,
                TokenKind::Keyword(Keyword::Fn | Keyword::Enum | Keyword::Import | Keyword::Module | Keyword::Export) => {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn resync_item(&mut self) {
        loop {
            match &self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::Keyword(Keyword::Fn | Keyword::Enum | Keyword::Import | Keyword::Module | Keyword::Export) => {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ---- top level ----------------------------------------------------

    pub fn parse_program(&mut self) -> Program {
        let start = self.span();
        let module_decl = if self.check_keyword(Keyword::Module) {
            let kw_span = self.advance().span;
            let Some((name, name_span)) = self.ident() else {
                self.resync_item();
                return self.finish_program(start, None);
            };
            self.eat_symbol(Symbol::Semicolon);
            Some(ModuleDecl { name, span: kw_span.to(name_span) })
        } else {
            None
        };

        let mut items = Vec::new();
        while !matches!(self.peek().kind, TokenKind::Eof) {
            let before = self.pos;
            match self.parse_item() {
                Some(item) => items.push(item),
                None => {
                    if self.pos == before {
                        self.advance();
                    }
                    if self.sink.has_errors() && !self.sink.continues_after_recovery() {
                        break;
                    }
                }
            }
        }

        let program = Program {
            module_decl,
            items,
            span: start.to(self.span()),
        };
        program
    }

    fn finish_program(&mut self, start: Span, module_decl: Option<ModuleDecl>) -> Program {
        Program {
            module_decl,
            items: Vec::new(),
            span: start.to(self.span()),
        }
    }

    fn parse_item(&mut self) -> Option<Item> {
        if self.check_keyword(Keyword::Import) {
            self.parse_import().map(Item::Import)
        } else if self.check_keyword(Keyword::Export) {
            self.parse_export().map(Item::Export)
        } else if self.check_keyword(Keyword::Enum) {
            self.parse_enum_def().map(Item::EnumDef)
        } else if self.check_keyword(Keyword::Fn) {
            self.parse_fn_def().map(Item::FnDef)
        } else {
            self.error_unexpected("a top-level item (`import`, `export`, `enum`, or `fn`)");
            self.resync_item();
            None
        }
    }

    fn parse_import(&mut self) -> Option<Import> {
        let start = self.advance().span; // `import`
        let (name, name_span) = self.ident()?;
        let mut end_span = name_span;
        let alias = if matches!(&self.peek().kind, TokenKind::Ident(id) if *id == self.kw.as_id) {
            self.advance();
            let (alias_name, alias_span) = self.ident()?;
            end_span = alias_span;
            Some(alias_name)
        } else {
            None
        };
        self.eat_symbol(Symbol::Semicolon);
        Some(Import {
            name,
            name_span,
            alias,
            span: start.to(end_span),
        })
    }

    fn parse_export(&mut self) -> Option<Export> {
        let start = self.advance().span; // `export`
        self.expect_symbol(Symbol::LBrace, "'{' after `export`")?;
        let mut names = Vec::new();
        while !self.check_symbol(Symbol::RBrace) && !matches!(self.peek().kind, TokenKind::Eof) {
            let (name, span) = self.ident()?;
            names.push((name, span));
            if !self.eat_symbol(Symbol::Comma) {
                break;
            }
        }
        let end = self.expect_symbol(Symbol::RBrace, "'}' to close `export`")?;
        self.eat_symbol(Symbol::Semicolon);
        Some(Export { names, span: start.to(end.span) })
    }

    fn parse_type_expr(&mut self) -> Option<TypeExpr> {
        if self.eat_symbol(Symbol::LBracket) {
            let inner = self.parse_type_expr()?;
            self.expect_symbol(Symbol::RBracket, "']' to close list type")?;
            return Some(TypeExpr::List(Box::new(inner)));
        }
        let (name, _) = self.ident()?;
        Some(self.resolve_type_name(name))
    }

    fn resolve_type_name(&mut self, name: StringId) -> TypeExpr {
        if self.eat_symbol(Symbol::Dot) {
            if let Some((member, _)) = self.ident() {
                return TypeExpr::Named { module: Some(name), name: member };
            }
        }
        if name == self.kw.int_id {
            TypeExpr::Int
        } else if name == self.kw.bool_id {
            TypeExpr::Bool
        } else if name == self.kw.string_id {
            TypeExpr::String
        } else if name == self.kw.unit_id {
            TypeExpr::Unit
        } else {
            TypeExpr::Named { module: None, name }
        }
    }

    fn parse_enum_def(&mut self) -> Option<EnumDef> {
        let start = self.advance().span; // `enum`
        let (name, name_span) = self.ident()?;
        self.expect_symbol(Symbol::LBrace, "'{' after enum name")?;
        let mut variants = Vec::new();
        while !self.check_symbol(Symbol::RBrace) && !matches!(self.peek().kind, TokenKind::Eof) {
            let (variant_name, variant_span) = self.ident()?;
            let mut payload_types = Vec::new();
            if self.eat_symbol(Symbol::LParen) {
                while !self.check_symbol(Symbol::RParen) && !matches!(self.peek().kind, TokenKind::Eof) {
                    if let Some(ty) = self.parse_type_expr() {
                        payload_types.push(ty);
                    }
                    if !self.eat_symbol(Symbol::Comma) {
                        break;
                    }
                }
                self.expect_symbol(Symbol::RParen, "')' to close variant payload")?;
            }
            variants.push(EnumVariantDef {
                name: variant_name,
                name_span: variant_span,
                payload_types,
            });
            if !self.eat_symbol(Symbol::Comma) {
                break;
            }
        }
        let end = self.expect_symbol(Symbol::RBrace, "'}' to close enum")?;
        Some(EnumDef {
            name,
            name_span,
            variants,
            span: start.to(end.span),
        })
    }

    fn parse_fn_def(&mut self) -> Option<FnDef> {
        let start = self.advance().span; // `fn`
        let (name, name_span) = self.ident()?;
        self.expect_symbol(Symbol::LParen, "'(' after function name")?;
        let mut params = Vec::new();
        while !self.check_symbol(Symbol::RParen) && !matches!(self.peek().kind, TokenKind::Eof) {
            let (pname, pname_span) = self.ident()?;
            let ty = if self.eat_symbol(Symbol::Colon) { self.parse_type_expr() } else { None };
            params.push(Param { name: pname, name_span: pname_span, ty });
            if !self.eat_symbol(Symbol::Comma) {
                break;
            }
        }
        self.expect_symbol(Symbol::RParen, "')' to close parameter list")?;
        let return_type = if self.eat_symbol(Symbol::Arrow) { self.parse_type_expr() } else { None };
        let body = self.parse_block()?;
        let span = start.to(body.span);
        Some(FnDef { name, name_span, params, return_type, body, span })
    }

    // ---- statements -----------------------------------------------------

    fn parse_block(&mut self) -> Option<Block> {
        let start = self.expect_symbol(Symbol::LBrace, "'{' to open block")?.span;
        let mut stmts = Vec::new();
        while !self.check_symbol(Symbol::RBrace) && !matches!(self.peek().kind, TokenKind::Eof) {
            let before = self.pos;
            stmts.push(self.parse_stmt());
            if self.pos == before {
                self.advance();
            }
        }
        let end = self.expect_symbol(Symbol::RBrace, "'}' to close block").map(|t| t.span).unwrap_or(start);
        Some(Block { stmts, span: start.to(end) })
    }

    fn err_stmt(&self, span: Span) -> StmtNode {
        StmtNode { kind: Stmt::Err, span }
    }

    fn parse_stmt(&mut self) -> StmtNode {
        let start = self.span();
        let result = if self.check_keyword(Keyword::Let) {
            self.parse_let()
        } else if self.check_keyword(Keyword::Set) {
            self.parse_set()
        } else if self.check_keyword(Keyword::Return) {
            self.parse_return()
        } else if self.check_keyword(Keyword::While) {
            self.parse_while()
        } else if self.check_keyword(Keyword::For) {
            self.parse_for()
        } else if self.eat_keyword(Keyword::Break) {
            self.eat_symbol(Symbol::Semicolon);
            Some(StmtNode { kind: Stmt::Break, span: start.to(self.span()) })
        } else if self.eat_keyword(Keyword::Continue) {
            self.eat_symbol(Symbol::Semicolon);
            Some(StmtNode { kind: Stmt::Continue, span: start.to(self.span()) })
        } else {
            self.parse_expr_stmt()
        };

        match result {
            Some(stmt) => stmt,
            None => {
                self.resync_stmt();
                self.err_stmt(start.to(self.span()))
            }
        }
    }

    fn parse_let(&mut self) -> Option<StmtNode> {
        let start = self.advance().span; // `let`
        let (name, name_span) = self.ident()?;
        let ty = if self.eat_symbol(Symbol::Colon) { self.parse_type_expr() } else { None };
        self.expect_symbol(Symbol::Eq, "'=' in `let` binding")?;
        let value = self.parse_expr()?;
        self.eat_symbol(Symbol::Semicolon);
        let span = start.to(value.span);
        Some(StmtNode {
            kind: Stmt::Let { name, name_span, ty, value },
            span,
        })
    }

    fn parse_set(&mut self) -> Option<StmtNode> {
        let start = self.advance().span; // `set`
        let (name, name_span) = self.ident()?;
        self.expect_symbol(Symbol::Eq, "'=' in `set` statement")?;
        let value = self.parse_expr()?;
        self.eat_symbol(Symbol::Semicolon);
        let span = start.to(value.span);
        Some(StmtNode {
            kind: Stmt::Set { name, name_span, value },
            span,
        })
    }

    fn parse_return(&mut self) -> Option<StmtNode> {
        let start = self.advance().span; // `return`
        let value = if self.check_symbol(Symbol::Semicolon) || self.check_symbol(Symbol::RBrace) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let end = value.as_ref().map_or(start, |v| v.span);
        self.eat_symbol(Symbol::Semicolon);
        Some(StmtNode {
            kind: Stmt::Return(value),
            span: start.to(end),
        })
    }

    fn parse_while(&mut self) -> Option<StmtNode> {
        let start = self.advance().span; // `while`
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        let span = start.to(body.span);
        Some(StmtNode {
            kind: Stmt::While { cond, body },
            span,
        })
    }

    fn parse_for(&mut self) -> Option<StmtNode> {
        let start = self.advance().span; // `for`
        let (var, var_span) = self.ident()?;
        if !self.eat_keyword(Keyword::In) {
            self.error_unexpected("`in` in `for` loop");
            return None;
        }
        let from = self.parse_expr()?;
        let inclusive = if self.eat_symbol(Symbol::DotDotEq) {
            true
        } else if self.eat_symbol(Symbol::DotDot) {
            false
        } else {
            self.error_unexpected("'..' or '..=' in `for` loop range");
            return None;
        };
        let to = self.parse_expr()?;
        let step = if self.eat_keyword(Keyword::By) { Some(self.parse_expr()?) } else { None };
        let body = self.parse_block()?;
        let span = start.to(body.span);
        Some(StmtNode {
            kind: Stmt::For {
                var,
                var_span,
                start: from,
                end: to,
                inclusive,
                step,
                body,
            },
            span,
        })
    }

    fn parse_expr_stmt(&mut self) -> Option<StmtNode> {
        let expr = self.parse_expr()?;
        let span = expr.span;
        self.eat_symbol(Symbol::Semicolon);
        Some(StmtNode { kind: Stmt::ExprStmt(expr), span })
    }

    // ---- expressions ----------------------------------------------------
    // Precedence climbing, lowest to highest: || , && , ==/!= , comparisons,
    // +/-, */, unary, postfix.

    fn parse_expr(&mut self) -> Option<ExprNode> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_and()?;
        while self.eat_symbol(Symbol::OrOr) {
            let right = self.parse_and()?;
            let span = left.span.to(right.span);
            left = ExprNode::new(
                Expr::Binary {
                    op: crate::ast::BinOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_equality()?;
        while self.eat_symbol(Symbol::AndAnd) {
            let right = self.parse_equality()?;
            let span = left.span.to(right.span);
            left = ExprNode::new(
                Expr::Binary {
                    op: crate::ast::BinOp::And,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    fn parse_equality(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = if self.check_symbol(Symbol::EqEq) {
                crate::ast::BinOp::Eq
            } else if self.check_symbol(Symbol::NotEq) {
                crate::ast::BinOp::NotEq
            } else {
                break;
            };
            self.advance();
            let right = self.parse_comparison()?;
            let span = left.span.to(right.span);
            left = ExprNode::new(Expr::Binary { op, left: Box::new(left), right: Box::new(right) }, span);
        }
        Some(left)
    }

    fn parse_comparison(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_additive()?;
        loop {
            let op = if self.check_symbol(Symbol::Lt) {
                crate::ast::BinOp::Lt
            } else if self.check_symbol(Symbol::LtEq) {
                crate::ast::BinOp::LtEq
            } else if self.check_symbol(Symbol::Gt) {
                crate::ast::BinOp::Gt
            } else if self.check_symbol(Symbol::GtEq) {
                crate::ast::BinOp::GtEq
            } else {
                break;
            };
            self.advance();
            let right = self.parse_additive()?;
            let span = left.span.to(right.span);
            left = ExprNode::new(Expr::Binary { op, left: Box::new(left), right: Box::new(right) }, span);
        }
        Some(left)
    }

    fn parse_additive(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = if self.check_symbol(Symbol::Plus) {
                crate::ast::BinOp::Add
            } else if self.check_symbol(Symbol::Minus) {
                crate::ast::BinOp::Sub
            } else {
                break;
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            let span = left.span.to(right.span);
            left = ExprNode::new(Expr::Binary { op, left: Box::new(left), right: Box::new(right) }, span);
        }
        Some(left)
    }

    fn parse_multiplicative(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.check_symbol(Symbol::Star) {
                crate::ast::BinOp::Mul
            } else if self.check_symbol(Symbol::Slash) {
                crate::ast::BinOp::Div
            } else {
                break;
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.to(right.span);
            left = ExprNode::new(Expr::Binary { op, left: Box::new(left), right: Box::new(right) }, span);
        }
        Some(left)
    }

    fn parse_unary(&mut self) -> Option<ExprNode> {
        let start = self.span();
        if self.eat_symbol(Symbol::Minus) {
            let expr = self.parse_unary()?;
            let span = start.to(expr.span);
            return Some(ExprNode::new(Expr::Unary { op: UnaryOp::Neg, expr: Box::new(expr) }, span));
        }
        if self.eat_symbol(Symbol::Bang) {
            let expr = self.parse_unary()?;
            let span = start.to(expr.span);
            return Some(ExprNode::new(Expr::Unary { op: UnaryOp::Not, expr: Box::new(expr) }, span));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Option<ExprNode> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat_symbol(Symbol::Dot) {
                let (field, field_span) = self.ident()?;
                let span = expr.span.to(field_span);
                expr = ExprNode::new(
                    Expr::FieldAccess {
                        object: Box::new(expr),
                        field,
                        field_span,
                    },
                    span,
                );
            } else if self.eat_symbol(Symbol::LBracket) {
                let index = self.parse_expr()?;
                let end = self.expect_symbol(Symbol::RBracket, "']' to close index")?;
                let span = expr.span.to(end.span);
                expr = ExprNode::new(Expr::Index { object: Box::new(expr), index: Box::new(index) }, span);
            } else if self.check_symbol(Symbol::LParen) {
                self.advance();
                let mut args = Vec::new();
                while !self.check_symbol(Symbol::RParen) && !matches!(self.peek().kind, TokenKind::Eof) {
                    args.push(self.parse_expr()?);
                    if !self.eat_symbol(Symbol::Comma) {
                        break;
                    }
                }
                let end = self.expect_symbol(Symbol::RParen, "')' to close call")?;
                let span = expr.span.to(end.span);
                expr = ExprNode::new(Expr::Call { callee: Box::new(expr), args }, span);
            } else {
                break;
            }
        }
        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<ExprNode> {
        let start = self.span();
        match self.peek().kind.clone() {
            TokenKind::Int(v) => {
                self.advance();
                Some(ExprNode::new(Expr::Int(v), start))
            }
            TokenKind::Str(s) => {
                self.advance();
                Some(ExprNode::new(Expr::Str(s), start))
            }
            TokenKind::Bool(b) => {
                self.advance();
                Some(ExprNode::new(Expr::Bool(b), start))
            }
            TokenKind::Ident(id) => {
                self.advance();
                Some(ExprNode::new(Expr::Ident(id), start))
            }
            TokenKind::Symbol(Symbol::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                let end = self.expect_symbol(Symbol::RParen, "')' to close parenthesized expression")?;
                Some(ExprNode::new(Expr::Paren(Box::new(inner)), start.to(end.span)))
            }
            TokenKind::Symbol(Symbol::LBrace) => self.parse_record_literal(start),
            TokenKind::Symbol(Symbol::LBracket) => self.parse_list_literal(start),
            TokenKind::Keyword(Keyword::If) => self.parse_if_expr(start),
            TokenKind::Keyword(Keyword::Match) => self.parse_match_expr(start),
            _ => {
                self.error_unexpected("an expression");
                None
            }
        }
    }

    fn parse_record_literal(&mut self, start: Span) -> Option<ExprNode> {
        self.advance(); // `{`
        let mut fields = Vec::new();
        while !self.check_symbol(Symbol::RBrace) && !matches!(self.peek().kind, TokenKind::Eof) {
            let (name, name_span) = self.ident()?;
            self.expect_symbol(Symbol::Colon, "':' after record field name")?;
            let value = self.parse_expr()?;
            fields.push(RecordField { name, name_span, value });
            if !self.eat_symbol(Symbol::Comma) {
                break;
            }
        }
        let end = self.expect_symbol(Symbol::RBrace, "'}' to close record literal")?;
        Some(ExprNode::new(Expr::Record(fields), start.to(end.span)))
    }

    fn parse_list_literal(&mut self, start: Span) -> Option<ExprNode> {
        self.advance(); // `[`
        let mut items = Vec::new();
        while !self.check_symbol(Symbol::RBracket) && !matches!(self.peek().kind, TokenKind::Eof) {
            items.push(self.parse_expr()?);
            if !self.eat_symbol(Symbol::Comma) {
                break;
            }
        }
        let end = self.expect_symbol(Symbol::RBracket, "']' to close list literal")?;
        Some(ExprNode::new(Expr::List(items), start.to(end.span)))
    }

    fn parse_if_expr(&mut self, start: Span) -> Option<ExprNode> {
        self.advance(); // `if`
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat_keyword(Keyword::Else) {
            if self.check_keyword(Keyword::If) {
                let inner_start = self.span();
                let inner = self.parse_if_expr(inner_start)?;
                Some(Block {
                    span: inner.span,
                    stmts: vec![StmtNode { kind: Stmt::ExprStmt(inner.clone()), span: inner.span }],
                })
            } else {
                self.parse_block()
            }
        } else {
            None
        };
        let end = else_block.as_ref().map_or(then_block.span, |b| b.span);
        Some(ExprNode::new(
            Expr::If {
                cond: Box::new(cond),
                then_block,
                else_block,
            },
            start.to(end),
        ))
    }

    fn parse_match_expr(&mut self, start: Span) -> Option<ExprNode> {
        self.advance(); // `match`
        let subject = self.parse_expr()?;
        self.expect_symbol(Symbol::LBrace, "'{' to open match arms")?;
        let mut arms = Vec::new();
        while !self.check_symbol(Symbol::RBrace) && !matches!(self.peek().kind, TokenKind::Eof) {
            let arm_start = self.span();
            let pattern = self.parse_pattern()?;
            self.expect_symbol(Symbol::FatArrow, "'=>' after match pattern")?;
            let body = self.parse_block()?;
            let span = arm_start.to(body.span);
            arms.push(MatchArm { pattern, body, span });
            self.eat_symbol(Symbol::Semicolon);
        }
        let end = self.expect_symbol(Symbol::RBrace, "'}' to close match")?;
        Some(ExprNode::new(Expr::Match { subject: Box::new(subject), arms }, start.to(end.span)))
    }

    fn parse_pattern(&mut self) -> Option<PatternNode> {
        let start = self.span();
        match self.peek().kind.clone() {
            TokenKind::Int(v) => {
                self.advance();
                Some(PatternNode { kind: Pattern::Int(v), span: start })
            }
            TokenKind::Str(s) => {
                self.advance();
                Some(PatternNode { kind: Pattern::Str(s), span: start })
            }
            TokenKind::Bool(b) => {
                self.advance();
                Some(PatternNode { kind: Pattern::Bool(b), span: start })
            }
            TokenKind::Symbol(Symbol::Underscore) => {
                self.advance();
                Some(PatternNode { kind: Pattern::Wildcard, span: start })
            }
            TokenKind::Ident(first) => {
                self.advance();
                let (module, variant, mut span) = if self.eat_symbol(Symbol::Dot) {
                    let (variant, variant_span) = self.ident()?;
                    (Some(first), variant, start.to(variant_span))
                } else {
                    (None, first, start)
                };
                let mut bindings = Vec::new();
                if self.eat_symbol(Symbol::LParen) {
                    while !self.check_symbol(Symbol::RParen) && !matches!(self.peek().kind, TokenKind::Eof) {
                        let (name, _) = self.ident()?;
                        bindings.push(name);
                        if !self.eat_symbol(Symbol::Comma) {
                            break;
                        }
                    }
                    let end = self.expect_symbol(Symbol::RParen, "')' to close pattern payload")?;
                    span = span.to(end.span);
                }
                Some(PatternNode {
                    kind: Pattern::Variant { module, variant, bindings },
                    span,
                })
            }
            _ => {
                let span = self.span();
                self.sink.record(Diagnostic::error(
                    ErrorKind::MalformedPattern,
                    span,
                    "expected a pattern (literal, `_`, or enum variant)",
                ));
                None
            }
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Int(v) => format!("integer `{v}`"),
        TokenKind::Str(_) => "a string literal".to_string(),
        TokenKind::Ident(_) => "an identifier".to_string(),
        TokenKind::Bool(b) => format!("`{b}`"),
        TokenKind::Keyword(k) => format!("keyword `{k}`"),
        TokenKind::Symbol(s) => format!("`{s}`"),
        TokenKind::Eof => "end of file".to_string(),
    }
}

/// Parses a full token stream (already terminated with `Eof`) into a
/// [`Program`], recording diagnostics to `sink`.
pub fn parse(tokens: &[Token], sink: &mut DiagnosticSink, kw: ParserKeywords) -> Program {
    let mut parser = Parser::new(tokens, sink, kw);
    parser.parse_program()
}

/// Lexes and parses `source` in one step. Matches the parse-callback shape
/// [`crate::module::load_graph`] expects.
pub fn parse_source(source: &str, file: StringId, interner: &mut Interner, sink: &mut DiagnosticSink) -> Program {
    let tokens = lex(source, file, interner, sink);
    let kw = ParserKeywords::intern(interner);
    parse(&tokens, sink, kw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SinkMode;

    fn parse_src(src: &str) -> (Program, DiagnosticSink) {
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new(SinkMode::All);
        let file = interner.intern("test.lang");
        let program = parse_source(src, file, &mut interner, &mut sink);
        (program, sink)
    }

    #[test]
    fn parses_hello_world() {
        let (program, sink) = parse_src(r#"fn main() { print("hi"); }"#);
        assert!(!sink.has_errors());
        assert_eq!(program.items.len(), 1);
        assert!(matches!(program.items[0], Item::FnDef(_)));
    }

    #[test]
    fn parses_precedence_left_to_right() {
        let (program, sink) = parse_src("fn main() { 1 + 2 * 3; }");
        assert!(!sink.has_errors());
        let Item::FnDef(f) = &program.items[0] else { panic!() };
        let Stmt::ExprStmt(expr) = &f.body.stmts[0].kind else { panic!() };
        let Expr::Binary { op: crate::ast::BinOp::Add, right, .. } = &expr.kind else {
            panic!("expected top-level Add")
        };
        assert!(matches!(right.kind, Expr::Binary { op: crate::ast::BinOp::Mul, .. }));
    }

    #[test]
    fn parses_for_loop_with_step() {
        let (program, sink) = parse_src("fn main() { for i in 0..=4 by 2 { print(i); } }");
        assert!(!sink.has_errors());
        let Item::FnDef(f) = &program.items[0] else { panic!() };
        assert!(matches!(f.body.stmts[0].kind, Stmt::For { inclusive: true, .. }));
    }

    #[test]
    fn duplicate_let_is_not_a_parse_error_here() {
        // Duplicate-binding detection happens in the checker; the parser
        // accepts two `let` statements with the same name.
        let (_program, sink) = parse_src("fn main() { let x = 1; let x = 2; }");
        assert!(!sink.has_errors());
    }

    #[test]
    fn missing_semicolon_recovers_with_err_stmt() {
        let (program, sink) = parse_src("fn main() { let x = 1 let y = 2; }");
        assert!(sink.has_errors());
        let Item::FnDef(f) = &program.items[0] else { panic!() };
        assert!(f.body.stmts.iter().any(|s| matches!(s.kind, Stmt::Err)));
    }

    #[test]
    fn parses_match_with_variant_pattern() {
        let (program, sink) = parse_src(
            "enum C { R, G, B } fn main() { match c { R => { print(1); }; G(a) => { print(a); }; _ => { print(0); }; } }",
        );
        assert!(!sink.has_errors());
        assert_eq!(program.items.len(), 2);
    }
}
