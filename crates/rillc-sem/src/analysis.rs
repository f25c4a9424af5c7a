//! The semantic analyzer: scope resolution, bidirectional type checking,
//! implicit cast insertion, constant folding, and array size inference.
//!
//! Two passes drive everything:
//!
//!   PASS 1 - SIGNATURES. Function return and parameter types are resolved
//!   and the function symbols are defined in the global scope. Global
//!   variables are deliberately *not* processed here: a body earlier in the
//!   file may call a function declared later, but must not see a global
//!   declared later.
//!
//!   PASS 2 - BODIES AND GLOBALS, in source order. Statements are walked in
//!   a scope stack rooted at the global scope; every expression is checked
//!   bidirectionally against an optional expected type that steers literal
//!   defaults and numeric widths.
//!
//! The analyzer never stops early: it keeps walking past individual errors
//! so one run surfaces every diagnostic. A rejected expression keeps
//! `ty == None`; its ancestors degrade gracefully.

use rillc_lex::TokenKind;
use rillc_par::ast::{
    Block, ConstValue, Decl, ElseClause, Expr, ExprKind, FnDecl, IfStmt, Program, ReturnStmt,
    Stmt, TypeExpr, TypeExprKind, UnOp, VarDecl,
};
use rillc_par::ast::BinOp;
use rillc_util::{DiagnosticKind, Diagnostics, NameId, ScopeId, Span, StrInterner, TypeId};

use crate::scope::{Namespace, ScopeTree, Symbol, SymbolFlags, SymbolKind};
use crate::types::{TypeData, TypeStore};

/// Run semantic analysis over a parsed program.
///
/// The AST is annotated in place (types, constness, folded values,
/// synthesized casts and inferred array sizes); diagnostics accumulate in
/// `diags`. Returns the type store holding every canonical type the
/// program mentions.
pub fn analyze<'a>(
    program: &mut Program,
    identifiers: &StrInterner<'a, ()>,
    keywords: &StrInterner<'a, TokenKind>,
    diags: &mut Diagnostics,
) -> TypeStore {
    let mut analyzer = Analyzer::new(identifiers, keywords, diags);
    analyzer.run(program);
    analyzer.into_store()
}

/// Analysis context: type store, interners, scope stack, diagnostics.
pub struct Analyzer<'a, 'i, 'd> {
    store: TypeStore,
    identifiers: &'i StrInterner<'a, ()>,
    keywords: &'i StrInterner<'a, TokenKind>,
    diags: &'d mut Diagnostics,
    scopes: ScopeTree,
    global: ScopeId,
    /// Number of enclosing loops at the current walk position
    loop_depth: u32,
}

impl<'a, 'i, 'd> Analyzer<'a, 'i, 'd> {
    /// Create an analyzer with a fresh type store and global scope.
    pub fn new(
        identifiers: &'i StrInterner<'a, ()>,
        keywords: &'i StrInterner<'a, TokenKind>,
        diags: &'d mut Diagnostics,
    ) -> Self {
        let store = TypeStore::new(keywords);
        let mut scopes = ScopeTree::new();
        let global = scopes.create(None, identifiers.len() + 64, Namespace::Identifiers);
        Self {
            store,
            identifiers,
            keywords,
            diags,
            scopes,
            global,
            loop_depth: 0,
        }
    }

    /// Run both passes.
    pub fn run(&mut self, program: &mut Program) {
        self.resolve_signatures(program);
        self.check_top_level(program);
    }

    /// The type store (for inspection after [`Analyzer::run`]).
    pub fn store(&self) -> &TypeStore {
        &self.store
    }

    /// Consume the analyzer, keeping the type store.
    pub fn into_store(self) -> TypeStore {
        self.store
    }

    /// The scope tree (for inspection after [`Analyzer::run`]).
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// The global scope id.
    pub fn global_scope(&self) -> ScopeId {
        self.global
    }

    fn ident_str(&self, name: NameId) -> Box<str> {
        self.identifiers.get(name).unwrap_or("<unknown>").into()
    }

    fn keyword_str(&self, name: NameId) -> Box<str> {
        self.keywords.get(name).unwrap_or("<unknown>").into()
    }

    // ------------------------------------------------------------------
    // Pass 1: signatures and global function symbols
    // ------------------------------------------------------------------

    fn resolve_signatures(&mut self, program: &mut Program) {
        for decl in &mut program.decls {
            if let Decl::Fn(func) = decl {
                self.resolve_fn_signature(func);
            }
        }
    }

    fn resolve_fn_signature(&mut self, func: &mut FnDecl) {
        let global = self.global;

        let ret = match &mut func.ret {
            Some(ty) => {
                let resolved = self.resolve_type(ty, global);
                resolved.unwrap_or_else(|| self.store.t_void())
            }
            None => self.store.t_void(),
        };

        let mut params = Vec::with_capacity(func.params.len());
        for param in &mut func.params {
            let ty = self
                .resolve_type(&mut param.ty, global)
                .unwrap_or_else(|| self.store.t_void());
            param.sem_ty = Some(ty);
            params.push(ty);
        }

        let fn_ty = self.store.intern(TypeData::Fn {
            params: params.into(),
            ret,
        });
        func.sem_ty = Some(fn_ty);
        self.define_or_error(global, func.name, fn_ty, SymbolKind::Function, func.span);
    }

    // ------------------------------------------------------------------
    // Pass 2: bodies and global variables, in source order
    // ------------------------------------------------------------------

    fn check_top_level(&mut self, program: &mut Program) {
        let global = self.global;
        for decl in &mut program.decls {
            match decl {
                Decl::Var(var) => self.check_var_decl(var, global),
                Decl::Fn(func) => self.check_fn(func),
            }
        }
    }

    fn check_fn(&mut self, func: &mut FnDecl) {
        let fn_scope = self
            .scopes
            .create(Some(self.global), 32, Namespace::Identifiers);

        for param in &func.params {
            // Anonymous parameters produce no symbol.
            let Some(name) = param.name else { continue };
            let ty = param.sem_ty.unwrap_or_else(|| self.store.t_void());
            let kind = self.symbol_kind_of(ty);
            self.define_or_error(fn_scope, name, ty, kind, param.span);
        }

        let ret = match func.sem_ty.map(|t| self.store[t].clone()) {
            Some(TypeData::Fn { ret, .. }) => ret,
            _ => self.store.t_void(),
        };
        self.check_block(&mut func.body, fn_scope, ret);
    }

    fn check_var_decl(&mut self, decl: &mut VarDecl, scope: ScopeId) {
        let Some(var_ty) = self.resolve_type(&mut decl.ty, scope) else {
            let name = self.ident_str(decl.name);
            self.diags
                .emit(DiagnosticKind::VariableTypeResolutionFailed { name }, decl.span);
            return;
        };
        decl.sem_ty = Some(var_ty);

        let kind = self.symbol_kind_of(var_ty);
        self.define_or_error(scope, decl.name, var_ty, kind, decl.span);

        let mut has_init = false;
        let mut init_is_const = false;
        let mut init_value = None;

        if let Some(init) = &mut decl.init {
            has_init = true;
            if let Some(actual) = self.check_expr(init, Some(var_ty), scope) {
                if actual != var_ty {
                    if self.store.has_unsized_dim(var_ty)
                        && !self.store.has_unsized_dim(actual)
                        && self.store.can_implicit_cast(var_ty, actual)
                    {
                        // Array size inference: the declaration adopts the
                        // initializer's fully sized type, and the declared
                        // type expression gains synthesized size literals.
                        decl.sem_ty = Some(actual);
                        self.write_inferred_sizes(&mut decl.ty, actual);
                        let kind = self.symbol_kind_of(actual);
                        if let Some(symbol) = self.scopes.lookup_local_mut(scope, decl.name) {
                            symbol.ty = actual;
                            symbol.kind = kind;
                        }
                    } else if self.store.can_implicit_cast(var_ty, actual) {
                        self.insert_cast(init, var_ty);
                    } else {
                        self.diags.emit(
                            DiagnosticKind::TypeMismatch {
                                expected: var_ty,
                                actual,
                            },
                            init.span,
                        );
                    }
                }
            }
            init_is_const = init.is_const;
            init_value = init.value;
        }

        if let Some(symbol) = self.scopes.lookup_local_mut(scope, decl.name) {
            if has_init {
                symbol.flags.insert(SymbolFlags::INITIALIZED);
            }
            if decl.is_const {
                symbol.flags.insert(SymbolFlags::CONST);
                if init_is_const {
                    symbol.flags.insert(SymbolFlags::COMPUTED_VALUE);
                    symbol.value = init_value;
                }
            }
        }
    }

    fn define_or_error(
        &mut self,
        scope: ScopeId,
        name: NameId,
        ty: TypeId,
        kind: SymbolKind,
        span: Span,
    ) {
        let symbol = Symbol {
            name,
            ty,
            kind,
            flags: SymbolFlags::NONE,
            span,
            value: None,
        };
        if self.scopes.define(scope, symbol).is_err() {
            let name = self.ident_str(name);
            self.diags
                .emit(DiagnosticKind::Redeclaration { name }, span);
        }
    }

    fn symbol_kind_of(&self, ty: TypeId) -> SymbolKind {
        if self.store.is_integer(ty) {
            SymbolKind::Int
        } else if self.store.is_float(ty) {
            SymbolKind::Float
        } else if self.store.is_bool(ty) {
            SymbolKind::Bool
        } else if matches!(self.store[ty], TypeData::Fn { .. }) {
            SymbolKind::Function
        } else {
            SymbolKind::Var
        }
    }

    // ------------------------------------------------------------------
    // Type expression resolution
    // ------------------------------------------------------------------

    /// Resolve a source-level type expression to a canonical type.
    /// `None` means resolution failed; a diagnostic has been emitted for
    /// the specific cause where one exists (unknown name, non-constant
    /// array size).
    fn resolve_type(&mut self, ty: &mut TypeExpr, scope: ScopeId) -> Option<TypeId> {
        match &mut ty.kind {
            TypeExprKind::Named(record) => {
                let record = *record;
                if let Some(prim) = self.store.resolve_named(record) {
                    return Some(prim);
                }
                // A user-defined type symbol would be consulted here once
                // struct/enum declarations exist.
                let name = self.keyword_str(record);
                self.diags.emit(DiagnosticKind::UnknownType { name }, ty.span);
                None
            }
            TypeExprKind::Ptr(inner) => {
                let pointee = self.resolve_type(inner, scope)?;
                Some(self.store.intern(TypeData::Ptr(pointee)))
            }
            TypeExprKind::Array { elem, size } => {
                let elem_ty = self.resolve_type(elem, scope)?;
                let size_value = match size {
                    None => None,
                    Some(size_expr) => {
                        let span = size_expr.span;
                        let i64_ty = self.store.t_i64();
                        self.check_expr(size_expr, Some(i64_ty), scope);
                        match (size_expr.is_const, size_expr.value) {
                            (true, Some(ConstValue::Int(n))) => Some(n),
                            _ => {
                                self.diags.emit(DiagnosticKind::NotConst, span);
                                return None;
                            }
                        }
                    }
                };
                Some(self.store.intern(TypeData::Array {
                    elem: elem_ty,
                    size: size_value,
                }))
            }
            TypeExprKind::Fn { params, ret } => {
                let mut param_tys = Vec::with_capacity(params.len());
                for param in params.iter_mut() {
                    param_tys.push(self.resolve_type(param, scope)?);
                }
                let ret_ty = match ret {
                    Some(ret) => self.resolve_type(ret, scope)?,
                    None => self.store.t_void(),
                };
                Some(self.store.intern(TypeData::Fn {
                    params: param_tys.into(),
                    ret: ret_ty,
                }))
            }
        }
    }

    /// Rewrite the unsized dimensions of a declared array type with
    /// synthesized integer literals taken from the inferred type.
    fn write_inferred_sizes(&mut self, ty: &mut TypeExpr, inferred: TypeId) {
        let TypeExprKind::Array { elem, size } = &mut ty.kind else {
            return;
        };
        let TypeData::Array {
            elem: inferred_elem,
            size: inferred_size,
        } = self.store[inferred].clone()
        else {
            return;
        };
        if size.is_none() {
            if let Some(n) = inferred_size {
                let mut lit = Expr::new(ExprKind::Literal(ConstValue::Int(n)), ty.span);
                lit.ty = Some(self.store.t_i64());
                lit.is_const = true;
                lit.value = Some(ConstValue::Int(n));
                *size = Some(Box::new(lit));
            }
        }
        self.write_inferred_sizes(elem, inferred_elem);
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn check_block(&mut self, block: &mut Block, parent: ScopeId, ret: TypeId) {
        let scope = self.scopes.create(Some(parent), 16, Namespace::Identifiers);
        for stmt in &mut block.stmts {
            self.check_stmt(stmt, scope, ret);
        }
    }

    fn check_stmt(&mut self, stmt: &mut Stmt, scope: ScopeId, ret: TypeId) {
        match stmt {
            Stmt::Block(block) => self.check_block(block, scope, ret),
            Stmt::If(if_stmt) => self.check_if(if_stmt, scope, ret),
            Stmt::While(while_stmt) => {
                self.check_condition(&mut while_stmt.cond, scope);
                self.loop_depth += 1;
                self.check_block(&mut while_stmt.body, scope, ret);
                self.loop_depth -= 1;
            }
            Stmt::For(for_stmt) => {
                let for_scope = self.scopes.create(Some(scope), 16, Namespace::Identifiers);
                if let Some(init) = &mut for_stmt.init {
                    self.check_stmt(init, for_scope, ret);
                }
                if let Some(cond) = &mut for_stmt.cond {
                    self.check_condition(cond, for_scope);
                }
                if let Some(post) = &mut for_stmt.post {
                    self.check_expr(post, None, for_scope);
                }
                self.loop_depth += 1;
                self.check_block(&mut for_stmt.body, for_scope, ret);
                self.loop_depth -= 1;
            }
            Stmt::Return(ret_stmt) => self.check_return(ret_stmt, scope, ret),
            Stmt::Break(span) => {
                if self.loop_depth == 0 {
                    self.diags
                        .emit(DiagnosticKind::OutsideLoop { keyword: "break" }, *span);
                }
            }
            Stmt::Continue(span) => {
                if self.loop_depth == 0 {
                    self.diags
                        .emit(DiagnosticKind::OutsideLoop { keyword: "continue" }, *span);
                }
            }
            Stmt::Var(decl) => self.check_var_decl(decl, scope),
            Stmt::Expr(expr) => {
                self.check_expr(expr, None, scope);
            }
        }
    }

    fn check_if(&mut self, if_stmt: &mut IfStmt, scope: ScopeId, ret: TypeId) {
        self.check_condition(&mut if_stmt.cond, scope);
        self.check_block(&mut if_stmt.then_branch, scope, ret);
        match &mut if_stmt.else_branch {
            Some(ElseClause::Block(block)) => self.check_block(block, scope, ret),
            Some(ElseClause::If(nested)) => self.check_if(nested, scope, ret),
            None => {}
        }
    }

    /// A loop or branch condition: checked with expected type `bool`.
    fn check_condition(&mut self, cond: &mut Expr, scope: ScopeId) {
        let bool_ty = self.store.t_bool();
        if let Some(ty) = self.check_expr(cond, Some(bool_ty), scope) {
            if ty != bool_ty {
                self.diags.emit(
                    DiagnosticKind::TypeMismatch {
                        expected: bool_ty,
                        actual: ty,
                    },
                    cond.span,
                );
            }
        }
    }

    fn check_return(&mut self, ret_stmt: &mut ReturnStmt, scope: ScopeId, ret: TypeId) {
        let void = self.store.t_void();
        match &mut ret_stmt.value {
            None => {
                if ret != void {
                    self.diags.emit(
                        DiagnosticKind::ReturnMismatch {
                            expected: ret,
                            actual: None,
                        },
                        ret_stmt.span,
                    );
                }
            }
            Some(expr) => {
                if ret == void {
                    let actual = self.check_expr(expr, None, scope);
                    self.diags.emit(
                        DiagnosticKind::ReturnMismatch {
                            expected: void,
                            actual,
                        },
                        expr.span,
                    );
                } else if let Some(actual) = self.check_expr(expr, Some(ret), scope) {
                    if actual != ret {
                        if self.store.can_implicit_cast(ret, actual) {
                            self.insert_cast(expr, ret);
                        } else {
                            self.diags.emit(
                                DiagnosticKind::TypeMismatch {
                                    expected: ret,
                                    actual,
                                },
                                expr.span,
                            );
                        }
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions (bidirectional)
    // ------------------------------------------------------------------

    /// Check an expression against an optional expected type.
    ///
    /// The expected type is a *hint*: it steers literal defaults and
    /// numeric widths but does not by itself coerce. The resolved type is
    /// written onto the node and returned; `None` means the expression was
    /// rejected (a diagnostic has been emitted).
    pub fn check_expr(
        &mut self,
        expr: &mut Expr,
        expected: Option<TypeId>,
        scope: ScopeId,
    ) -> Option<TypeId> {
        expr.ty = None;
        expr.is_const = false;
        expr.value = None;
        let span = expr.span;

        let result = match &mut expr.kind {
            ExprKind::Literal(lit) => {
                let ty = match *lit {
                    ConstValue::Int(v) => match expected {
                        Some(e) if self.store.is_float(e) => {
                            // An integer literal in float context becomes a
                            // float literal outright.
                            *lit = ConstValue::Float(v as f64);
                            e
                        }
                        Some(e) if self.store.is_integer(e) => e,
                        _ => self.store.t_i32(),
                    },
                    ConstValue::Float(_) => match expected {
                        Some(e) if self.store.is_float(e) => e,
                        _ => self.store.t_f64(),
                    },
                    ConstValue::Bool(_) => self.store.t_bool(),
                    ConstValue::Char(_) => self.store.t_char(),
                    ConstValue::Str(_) => self.store.t_str(),
                };
                expr.is_const = true;
                expr.value = Some(*lit);
                Some(ty)
            }

            ExprKind::Ident(name) => {
                let name = *name;
                match self.scopes.lookup(scope, name, Namespace::Identifiers) {
                    None => {
                        let name = self.ident_str(name);
                        self.diags.emit(DiagnosticKind::Undeclared { name }, span);
                        None
                    }
                    Some(symbol) => {
                        let ty = symbol.ty;
                        let flags = symbol.flags;
                        let value = symbol.value;
                        self.scopes.mark_used(scope, name, Namespace::Identifiers);
                        if flags.contains(SymbolFlags::CONST)
                            && flags.contains(SymbolFlags::COMPUTED_VALUE)
                        {
                            expr.is_const = true;
                            expr.value = value;
                        }
                        Some(ty)
                    }
                }
            }

            ExprKind::Call { callee, args } => match self.check_expr(callee, None, scope) {
                None => None,
                Some(callee_ty) => match self.store[callee_ty].clone() {
                    TypeData::Fn { params, ret } => {
                        if args.len() != params.len() {
                            self.diags.emit(
                                DiagnosticKind::ArgCountMismatch {
                                    expected: params.len(),
                                    actual: args.len(),
                                },
                                span,
                            );
                            None
                        } else {
                            for (arg, &param_ty) in args.iter_mut().zip(params.iter()) {
                                if let Some(arg_ty) =
                                    self.check_expr(arg, Some(param_ty), scope)
                                {
                                    if arg_ty != param_ty {
                                        if self.store.can_implicit_cast(param_ty, arg_ty) {
                                            self.insert_cast(arg, param_ty);
                                        } else {
                                            self.diags.emit(
                                                DiagnosticKind::TypeMismatch {
                                                    expected: param_ty,
                                                    actual: arg_ty,
                                                },
                                                arg.span,
                                            );
                                        }
                                    }
                                }
                            }
                            Some(ret)
                        }
                    }
                    _ => {
                        self.diags.emit(
                            DiagnosticKind::NotCallable { actual: callee_ty },
                            callee.span,
                        );
                        None
                    }
                },
            },

            ExprKind::Subscript { target, index } => {
                match self.check_expr(target, None, scope) {
                    None => None,
                    Some(target_ty) => {
                        let elem = match self.store[target_ty] {
                            TypeData::Array { elem, .. } => Some(elem),
                            TypeData::Ptr(pointee) => Some(pointee),
                            _ => None,
                        };
                        match elem {
                            None => {
                                self.diags.emit(
                                    DiagnosticKind::NotIndexable { actual: target_ty },
                                    target.span,
                                );
                                None
                            }
                            Some(elem) => {
                                let i64_ty = self.store.t_i64();
                                match self.check_expr(index, Some(i64_ty), scope) {
                                    Some(index_ty) if self.store.is_integer(index_ty) => {
                                        Some(elem)
                                    }
                                    Some(index_ty) => {
                                        self.diags.emit(
                                            DiagnosticKind::TypeMismatch {
                                                expected: i64_ty,
                                                actual: index_ty,
                                            },
                                            index.span,
                                        );
                                        None
                                    }
                                    None => None,
                                }
                            }
                        }
                    }
                }
            }

            ExprKind::Unary { op, operand } => {
                let op = *op;
                let hint = match op {
                    UnOp::Neg | UnOp::Pos => expected.filter(|e| self.store.is_numeric(*e)),
                    UnOp::Not => expected.filter(|e| self.store.is_bool(*e)),
                    _ => None,
                };
                match self.check_expr(operand, hint, scope) {
                    None => None,
                    Some(operand_ty) => match op {
                        UnOp::Not => {
                            if !self.store.is_bool(operand_ty) {
                                self.diags.emit(
                                    DiagnosticKind::UnopMismatch {
                                        op: "!",
                                        operand: operand_ty,
                                    },
                                    span,
                                );
                                None
                            } else {
                                if let (true, Some(v)) = (operand.is_const, operand.value) {
                                    if let Some(folded) = fold_unary(op, v) {
                                        expr.is_const = true;
                                        expr.value = Some(folded);
                                    }
                                }
                                Some(operand_ty)
                            }
                        }
                        UnOp::Neg | UnOp::Pos => {
                            if !self.store.is_numeric(operand_ty) {
                                self.diags.emit(
                                    DiagnosticKind::UnopMismatch {
                                        op: op.as_str(),
                                        operand: operand_ty,
                                    },
                                    span,
                                );
                                None
                            } else {
                                if let (true, Some(v)) = (operand.is_const, operand.value) {
                                    if let Some(folded) = fold_unary(op, v) {
                                        expr.is_const = true;
                                        expr.value = Some(folded);
                                    }
                                }
                                Some(operand_ty)
                            }
                        }
                        UnOp::AddrOf => {
                            if !operand.is_lvalue() {
                                self.diags.emit(DiagnosticKind::NotLvalue, operand.span);
                                None
                            } else {
                                Some(self.store.intern(TypeData::Ptr(operand_ty)))
                            }
                        }
                        UnOp::Deref => match self.store[operand_ty] {
                            TypeData::Ptr(pointee) => Some(pointee),
                            _ => {
                                self.diags.emit(
                                    DiagnosticKind::UnopMismatch {
                                        op: "*",
                                        operand: operand_ty,
                                    },
                                    span,
                                );
                                None
                            }
                        },
                        UnOp::PreInc | UnOp::PreDec => {
                            if !operand.is_lvalue() {
                                self.diags.emit(DiagnosticKind::NotLvalue, operand.span);
                                None
                            } else if !self.store.is_numeric(operand_ty) {
                                self.diags.emit(
                                    DiagnosticKind::UnopMismatch {
                                        op: op.as_str(),
                                        operand: operand_ty,
                                    },
                                    span,
                                );
                                None
                            } else {
                                Some(operand_ty)
                            }
                        }
                    },
                }
            }

            ExprKind::Postfix { op, operand } => {
                let op = *op;
                match self.check_expr(operand, None, scope) {
                    None => None,
                    Some(operand_ty) => {
                        if !operand.is_lvalue() {
                            self.diags.emit(DiagnosticKind::NotLvalue, operand.span);
                            None
                        } else if !self.store.is_numeric(operand_ty) {
                            self.diags.emit(
                                DiagnosticKind::UnopMismatch {
                                    op: op.as_str(),
                                    operand: operand_ty,
                                },
                                span,
                            );
                            None
                        } else {
                            Some(operand_ty)
                        }
                    }
                }
            }

            ExprKind::Binary { op, lhs, rhs } => {
                let op = *op;
                let lhs_hint = match expected {
                    Some(e) if op.is_arithmetic() && self.store.is_numeric(e) => Some(e),
                    _ => None,
                };
                let lhs_checked = self.check_expr(lhs, lhs_hint, scope);
                let rhs_hint = lhs_checked.filter(|t| self.store.is_numeric(*t));
                let rhs_checked = self.check_expr(rhs, rhs_hint, scope);

                match (lhs_checked, rhs_checked) {
                    (Some(first_lt), Some(rt)) => {
                        let mut lt = first_lt;
                        // A literal left operand re-adopts the right
                        // operand's width when both sides are integers or
                        // both are floats.
                        if matches!(lhs.kind, ExprKind::Literal(_))
                            && lt != rt
                            && ((self.store.is_integer(lt) && self.store.is_integer(rt))
                                || (self.store.is_float(lt) && self.store.is_float(rt)))
                        {
                            if let Some(readopted) = self.check_expr(lhs, Some(rt), scope) {
                                lt = readopted;
                            }
                        }

                        let result = if op.is_arithmetic() {
                            match self.store.unify_numeric(lt, rt) {
                                Some(common) => {
                                    if lt != common {
                                        self.insert_cast(lhs, common);
                                    }
                                    if rt != common {
                                        self.insert_cast(rhs, common);
                                    }
                                    Some(common)
                                }
                                None => {
                                    self.diags.emit(
                                        DiagnosticKind::BinopMismatch {
                                            op: op.as_str(),
                                            lhs: lt,
                                            rhs: rt,
                                        },
                                        span,
                                    );
                                    None
                                }
                            }
                        } else if op.is_comparison() {
                            let mut common = self.store.unify_numeric(lt, rt);
                            if common.is_none()
                                && matches!(op, BinOp::Eq | BinOp::Ne)
                                && lt == rt
                                && matches!(self.store[lt], TypeData::Ptr(_))
                            {
                                common = Some(lt);
                            }
                            match common {
                                Some(common) => {
                                    if lt != common {
                                        self.insert_cast(lhs, common);
                                    }
                                    if rt != common {
                                        self.insert_cast(rhs, common);
                                    }
                                    Some(self.store.t_bool())
                                }
                                None => {
                                    self.diags.emit(
                                        DiagnosticKind::BinopMismatch {
                                            op: op.as_str(),
                                            lhs: lt,
                                            rhs: rt,
                                        },
                                        span,
                                    );
                                    None
                                }
                            }
                        } else {
                            let bool_ty = self.store.t_bool();
                            if lt != bool_ty || rt != bool_ty {
                                self.diags.emit(
                                    DiagnosticKind::BinopMismatch {
                                        op: op.as_str(),
                                        lhs: lt,
                                        rhs: rt,
                                    },
                                    span,
                                );
                                None
                            } else {
                                Some(bool_ty)
                            }
                        };

                        if result.is_some() && lhs.is_const && rhs.is_const {
                            if let (Some(lv), Some(rv)) = (lhs.value, rhs.value) {
                                if let Some(mut folded) = fold_binary(op, lv, rv) {
                                    // Keep the folded value in the result's
                                    // domain when the result is float.
                                    if let (Some(result_ty), ConstValue::Int(n)) =
                                        (result, folded)
                                    {
                                        if self.store.is_float(result_ty) {
                                            folded = ConstValue::Float(n as f64);
                                        }
                                    }
                                    expr.is_const = true;
                                    expr.value = Some(folded);
                                }
                            }
                        }
                        result
                    }
                    _ => None,
                }
            }

            ExprKind::Assign { op: _, target, value } => {
                if !target.is_lvalue() {
                    self.diags.emit(DiagnosticKind::NotLvalue, target.span);
                    None
                } else {
                    let target_ty = self.check_expr(target, None, scope);
                    let value_ty = self.check_expr(value, target_ty, scope);

                    if let ExprKind::Ident(name) = target.kind {
                        if let Some(symbol) =
                            self.scopes.lookup(scope, name, Namespace::Identifiers)
                        {
                            if symbol.flags.contains(SymbolFlags::CONST) {
                                let name = self.ident_str(name);
                                self.diags
                                    .emit(DiagnosticKind::ConstAssign { name }, target.span);
                            }
                        }
                    }

                    match (target_ty, value_ty) {
                        (Some(lt), Some(rt)) => {
                            if lt == rt {
                                Some(lt)
                            } else if self.store.can_implicit_cast(lt, rt) {
                                self.insert_cast(value, lt);
                                Some(lt)
                            } else {
                                self.diags.emit(
                                    DiagnosticKind::TypeMismatch {
                                        expected: lt,
                                        actual: rt,
                                    },
                                    value.span,
                                );
                                None
                            }
                        }
                        _ => None,
                    }
                }
            }

            ExprKind::InitList { elements } => {
                self.check_init_list_elements(elements, expected, span, scope)
            }

            ExprKind::Cast { target, .. } => Some(*target),
        };

        expr.ty = result;
        result
    }

    /// Initializer-list checking. The list has no free interpretation: it
    /// requires an expected array type whose rank matches the list's
    /// nesting depth.
    fn check_init_list_elements(
        &mut self,
        elements: &mut [Expr],
        expected: Option<TypeId>,
        span: Span,
        scope: ScopeId,
    ) -> Option<TypeId> {
        let Some(expected_ty) = expected else {
            self.diags
                .emit(DiagnosticKind::UnexpectedList { expected: None }, span);
            return None;
        };
        let TypeData::Array {
            elem: base_expected,
            size: expected_size,
        } = self.store[expected_ty].clone()
        else {
            self.diags.emit(
                DiagnosticKind::UnexpectedList {
                    expected: Some(expected_ty),
                },
                span,
            );
            return None;
        };

        let type_rank = self.store.rank(expected_ty);
        let list_rank = init_list_rank(elements);
        if type_rank != list_rank {
            self.diags.emit(
                DiagnosticKind::DimensionMismatch {
                    expected: type_rank,
                    actual: list_rank,
                },
                span,
            );
            return None;
        }

        if let Some(size) = expected_size {
            if elements.len() as i64 != size {
                self.diags.emit(
                    DiagnosticKind::ArraySizeMismatch {
                        expected: size,
                        actual: elements.len(),
                    },
                    span,
                );
                return None;
            }
        }

        let base_is_array = matches!(self.store[base_expected], TypeData::Array { .. });
        let mut common: Option<TypeId> = None;
        let mut any_error = false;

        for element in elements.iter_mut() {
            let Some(actual) = self.check_expr(element, Some(base_expected), scope) else {
                any_error = true;
                continue;
            };
            let actual_is_array = matches!(self.store[actual], TypeData::Array { .. });

            if base_is_array && !actual_is_array {
                self.diags.emit(
                    DiagnosticKind::ExpectedArray {
                        expected: base_expected,
                        actual,
                    },
                    element.span,
                );
                return None;
            }
            if !base_is_array && actual_is_array {
                self.diags.emit(
                    DiagnosticKind::TypeMismatch {
                        expected: base_expected,
                        actual,
                    },
                    element.span,
                );
                return None;
            }

            let element_ty = if actual == base_expected {
                actual
            } else if base_is_array && self.store.can_implicit_cast(base_expected, actual) {
                // A fully sized sub-array filling an unsized slot keeps its
                // sizes; it becomes the shared element type.
                actual
            } else if self.store.can_implicit_cast(base_expected, actual) {
                self.insert_cast(element, base_expected);
                base_expected
            } else {
                self.diags.emit(
                    DiagnosticKind::TypeMismatch {
                        expected: base_expected,
                        actual,
                    },
                    element.span,
                );
                return None;
            };

            match common {
                None => common = Some(element_ty),
                Some(existing) if existing != element_ty => {
                    self.diags.emit(
                        DiagnosticKind::TypeMismatch {
                            expected: existing,
                            actual: element_ty,
                        },
                        element.span,
                    );
                    return None;
                }
                Some(_) => {}
            }
        }

        if any_error {
            return None;
        }

        let final_elem = common.unwrap_or(base_expected);
        Some(self.store.intern(TypeData::Array {
            elem: final_elem,
            size: Some(elements.len() as i64),
        }))
    }

    // ------------------------------------------------------------------
    // Cast insertion
    // ------------------------------------------------------------------

    /// Replace `expr` in place with a cast node targeting `to`, the
    /// original expression becoming the cast's child. Constant values fold
    /// through the wrapper (int to float, float to truncated int).
    fn insert_cast(&mut self, expr: &mut Expr, to: TypeId) {
        if expr.ty == Some(to) {
            return;
        }
        let span = expr.span;
        let placeholder = Expr::new(ExprKind::Literal(ConstValue::Int(0)), span);
        let original = std::mem::replace(expr, placeholder);

        let was_const = original.is_const;
        let from_ty = original.ty;
        let mut value = original.value;
        if was_const {
            if let (Some(from), Some(v)) = (from_ty, value) {
                value = Some(match v {
                    ConstValue::Int(n)
                        if self.store.is_integer(from) && self.store.is_float(to) =>
                    {
                        ConstValue::Float(n as f64)
                    }
                    ConstValue::Float(f)
                        if self.store.is_float(from) && self.store.is_integer(to) =>
                    {
                        ConstValue::Int(f as i64)
                    }
                    other => other,
                });
            }
        }

        *expr = Expr {
            kind: ExprKind::Cast {
                target: to,
                inner: Box::new(original),
            },
            span,
            ty: Some(to),
            is_const: was_const,
            value,
        };
    }
}

/// Nesting depth of an initializer list, following first elements.
fn init_list_rank(elements: &[Expr]) -> usize {
    match elements.first() {
        None => 1,
        Some(first) => match &first.kind {
            ExprKind::InitList { elements } => 1 + init_list_rank(elements),
            _ => 1,
        },
    }
}

/// Fold a unary operation over a constant operand.
fn fold_unary(op: UnOp, value: ConstValue) -> Option<ConstValue> {
    match (op, value) {
        (UnOp::Not, ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
        (UnOp::Neg, ConstValue::Int(n)) => Some(ConstValue::Int(n.wrapping_neg())),
        (UnOp::Neg, ConstValue::Float(f)) => Some(ConstValue::Float(-f)),
        (UnOp::Pos, v @ (ConstValue::Int(_) | ConstValue::Float(_))) => Some(v),
        _ => None,
    }
}

/// Fold a binary operation over constant operands.
///
/// Integer arithmetic wraps; division or modulo by a constant zero skips
/// folding entirely.
fn fold_binary(op: BinOp, lhs: ConstValue, rhs: ConstValue) -> Option<ConstValue> {
    use ConstValue::{Bool, Float, Int};

    match (lhs, rhs) {
        (Int(a), Int(b)) => match op {
            BinOp::Add => Some(Int(a.wrapping_add(b))),
            BinOp::Sub => Some(Int(a.wrapping_sub(b))),
            BinOp::Mul => Some(Int(a.wrapping_mul(b))),
            BinOp::Div => (b != 0).then(|| Int(a.wrapping_div(b))),
            BinOp::Rem => (b != 0).then(|| Int(a.wrapping_rem(b))),
            BinOp::Eq => Some(Bool(a == b)),
            BinOp::Ne => Some(Bool(a != b)),
            BinOp::Lt => Some(Bool(a < b)),
            BinOp::Gt => Some(Bool(a > b)),
            BinOp::Le => Some(Bool(a <= b)),
            BinOp::Ge => Some(Bool(a >= b)),
            BinOp::And | BinOp::Or => None,
        },
        (Int(_) | Float(_), Int(_) | Float(_)) => {
            let a = as_f64(lhs)?;
            let b = as_f64(rhs)?;
            match op {
                BinOp::Add => Some(Float(a + b)),
                BinOp::Sub => Some(Float(a - b)),
                BinOp::Mul => Some(Float(a * b)),
                BinOp::Div => (b != 0.0).then(|| Float(a / b)),
                BinOp::Rem => (b != 0.0).then(|| Float(a % b)),
                BinOp::Eq => Some(Bool(a == b)),
                BinOp::Ne => Some(Bool(a != b)),
                BinOp::Lt => Some(Bool(a < b)),
                BinOp::Gt => Some(Bool(a > b)),
                BinOp::Le => Some(Bool(a <= b)),
                BinOp::Ge => Some(Bool(a >= b)),
                BinOp::And | BinOp::Or => None,
            }
        }
        (Bool(a), Bool(b)) => match op {
            BinOp::And => Some(Bool(a && b)),
            BinOp::Or => Some(Bool(a || b)),
            BinOp::Eq => Some(Bool(a == b)),
            BinOp::Ne => Some(Bool(a != b)),
            _ => None,
        },
        _ => None,
    }
}

fn as_f64(value: ConstValue) -> Option<f64> {
    match value {
        ConstValue::Int(n) => Some(n as f64),
        ConstValue::Float(f) => Some(f),
        _ => None,
    }
}
