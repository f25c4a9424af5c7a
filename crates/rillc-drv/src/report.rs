//! Human-readable rendering of diagnostics, tokens and the AST.
//!
//! The core keeps diagnostics as tagged records with structured payloads;
//! this module turns them into `file:line:col: error[code]: message` lines,
//! and provides the `--tokens` / `--ast` dump formats.

use std::fmt::Write as _;

use rillc_par::ast::{
    Block, ConstValue, Decl, ElseClause, Expr, ExprKind, IfStmt, Stmt, TypeExpr, TypeExprKind,
};
use rillc_util::{Diagnostic, DiagnosticKind, NameId};

use crate::Compilation;

/// Render one diagnostic as a single line.
pub fn render_diagnostic(compilation: &Compilation<'_>, diag: &Diagnostic) -> String {
    format!(
        "{}:{}:{}: {}[{}]: {}",
        compilation.diagnostics.filename(),
        diag.span.start_line,
        diag.span.start_col,
        diag.level(),
        diag.code(),
        message_for(compilation, &diag.kind),
    )
}

fn message_for(c: &Compilation<'_>, kind: &DiagnosticKind) -> String {
    let ty = |id| c.types.display(id).to_string();
    match kind {
        DiagnosticKind::UnterminatedComment => "unterminated block comment".into(),
        DiagnosticKind::UnexpectedToken { expected, found } => {
            format!("expected {expected}, found '{found}'")
        }
        DiagnosticKind::UnexpectedEof { expected } => {
            format!("unexpected end of input, expected {expected}")
        }
        DiagnosticKind::TrailingTokens => "trailing tokens after program end".into(),
        DiagnosticKind::UnknownType { name } => format!("unknown type '{name}'"),
        DiagnosticKind::Redeclaration { name } => {
            format!("symbol '{name}' is already defined")
        }
        DiagnosticKind::Undeclared { name } => {
            format!("use of undeclared identifier '{name}'")
        }
        DiagnosticKind::ArgCountMismatch { expected, actual } => {
            format!("expected {expected} argument(s), found {actual}")
        }
        DiagnosticKind::TypeMismatch { expected, actual } => {
            format!("expected '{}', found '{}'", ty(*expected), ty(*actual))
        }
        DiagnosticKind::ReturnMismatch {
            expected,
            actual: Some(actual),
        } => format!(
            "function declared to return '{}' but returns '{}'",
            ty(*expected),
            ty(*actual)
        ),
        DiagnosticKind::ReturnMismatch {
            expected,
            actual: None,
        } => format!(
            "function declared to return '{}' but returns nothing",
            ty(*expected)
        ),
        DiagnosticKind::VariableTypeResolutionFailed { name } => {
            format!("failed to resolve the type of variable '{name}'")
        }
        DiagnosticKind::DimensionMismatch { expected, actual } => {
            format!("initializer has {actual} dimension(s), expected {expected}")
        }
        DiagnosticKind::ArraySizeMismatch { expected, actual } => {
            format!("expected {expected} element(s), found {actual}")
        }
        DiagnosticKind::ExpectedArray { expected, actual } => {
            format!(
                "expected nested array '{}', found '{}'",
                ty(*expected),
                ty(*actual)
            )
        }
        DiagnosticKind::UnexpectedList {
            expected: Some(expected),
        } => format!("initializer list cannot initialize '{}'", ty(*expected)),
        DiagnosticKind::UnexpectedList { expected: None } => {
            "initializer list requires an array type context".into()
        }
        DiagnosticKind::BinopMismatch { op, lhs, rhs } => {
            format!("invalid operands for '{op}': '{}' and '{}'", ty(*lhs), ty(*rhs))
        }
        DiagnosticKind::UnopMismatch { op, operand } => {
            format!("invalid operand for '{op}': '{}'", ty(*operand))
        }
        DiagnosticKind::NotCallable { actual } => {
            format!("type '{}' is not callable", ty(*actual))
        }
        DiagnosticKind::NotIndexable { actual } => {
            format!("type '{}' is not an array or pointer", ty(*actual))
        }
        DiagnosticKind::FieldAccess { name } => format!("no field named '{name}'"),
        DiagnosticKind::ConstAssign { name } => {
            format!("cannot assign to constant '{name}'")
        }
        DiagnosticKind::NotConst => "array size must be a constant expression".into(),
        DiagnosticKind::NotLvalue => "expression is not assignable".into(),
        DiagnosticKind::OutsideLoop { keyword } => {
            format!("'{keyword}' outside of a loop")
        }
    }
}

/// Render the token sequence as an aligned table.
pub fn render_tokens(compilation: &Compilation<'_>) -> String {
    let mut out = String::new();
    for token in &compilation.tokens {
        let _ = writeln!(
            out,
            "{:>4}:{:<4} {:<16} {:?}",
            token.span.start_line,
            token.span.start_col,
            format!("{:?}", token.kind),
            token.lexeme,
        );
    }
    out
}

/// Render the AST as an indented tree.
pub fn render_ast(compilation: &Compilation<'_>) -> String {
    let mut printer = AstPrinter {
        compilation,
        out: String::new(),
        depth: 0,
    };
    match &compilation.program {
        Some(program) => {
            printer.line("Program");
            printer.depth += 1;
            for decl in &program.decls {
                printer.decl(decl);
            }
        }
        None => printer.line("(no ast)"),
    }
    printer.out
}

struct AstPrinter<'c, 'a> {
    compilation: &'c Compilation<'a>,
    out: String,
    depth: usize,
}

impl AstPrinter<'_, '_> {
    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn nested(&mut self, header: impl AsRef<str>, f: impl FnOnce(&mut Self)) {
        self.line(header);
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn ident(&self, name: NameId) -> &str {
        self.compilation.identifiers.get(name).unwrap_or("<unknown>")
    }

    fn type_suffix(&self, expr: &Expr) -> String {
        match expr.ty {
            Some(ty) => format!(" : {}", self.compilation.types.display(ty)),
            None => String::new(),
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(var) => self.var_decl(var),
            Decl::Fn(func) => {
                self.nested(format!("FnDecl {}", self.ident(func.name)), |p| {
                    for param in &func.params {
                        let name = match param.name {
                            Some(name) => p.ident(name).to_string(),
                            None => "_".to_string(),
                        };
                        p.nested(format!("Param {name}"), |p| p.type_expr(&param.ty));
                    }
                    p.block(&func.body);
                });
            }
        }
    }

    fn var_decl(&mut self, var: &rillc_par::ast::VarDecl) {
        let constness = if var.is_const { "const " } else { "" };
        let resolved = match var.sem_ty {
            Some(ty) => format!(" : {}", self.compilation.types.display(ty)),
            None => String::new(),
        };
        self.nested(
            format!("VarDecl {}{}{}", constness, self.ident(var.name), resolved),
            |p| {
                p.type_expr(&var.ty);
                if let Some(init) = &var.init {
                    p.expr(init);
                }
            },
        );
    }

    fn type_expr(&mut self, ty: &TypeExpr) {
        match &ty.kind {
            TypeExprKind::Named(record) => {
                let name = self
                    .compilation
                    .keywords
                    .get(*record)
                    .unwrap_or("<unknown>");
                self.line(format!("Type {name}"));
            }
            TypeExprKind::Ptr(inner) => self.nested("Type ptr", |p| p.type_expr(inner)),
            TypeExprKind::Array { elem, size } => {
                self.nested("Type array", |p| {
                    p.type_expr(elem);
                    if let Some(size) = size {
                        p.expr(size);
                    }
                });
            }
            TypeExprKind::Fn { params, ret } => {
                self.nested("Type fn", |p| {
                    for param in params {
                        p.type_expr(param);
                    }
                    if let Some(ret) = ret {
                        p.type_expr(ret);
                    }
                });
            }
        }
    }

    fn block(&mut self, block: &Block) {
        self.nested("Block", |p| {
            for stmt in &block.stmts {
                p.stmt(stmt);
            }
        });
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::If(if_stmt) => self.if_stmt(if_stmt),
            Stmt::While(while_stmt) => {
                self.nested("While", |p| {
                    p.expr(&while_stmt.cond);
                    p.block(&while_stmt.body);
                });
            }
            Stmt::For(for_stmt) => {
                self.nested("For", |p| {
                    if let Some(init) = &for_stmt.init {
                        p.stmt(init);
                    }
                    if let Some(cond) = &for_stmt.cond {
                        p.expr(cond);
                    }
                    if let Some(post) = &for_stmt.post {
                        p.expr(post);
                    }
                    p.block(&for_stmt.body);
                });
            }
            Stmt::Return(ret) => match &ret.value {
                Some(value) => self.nested("Return", |p| p.expr(value)),
                None => self.line("Return"),
            },
            Stmt::Break(_) => self.line("Break"),
            Stmt::Continue(_) => self.line("Continue"),
            Stmt::Var(var) => self.var_decl(var),
            Stmt::Expr(expr) => self.expr(expr),
        }
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt) {
        self.nested("If", |p| {
            p.expr(&if_stmt.cond);
            p.block(&if_stmt.then_branch);
            match &if_stmt.else_branch {
                Some(ElseClause::Block(block)) => p.nested("Else", |p| p.block(block)),
                Some(ElseClause::If(nested)) => p.nested("Else", |p| p.if_stmt(nested)),
                None => {}
            }
        });
    }

    fn expr(&mut self, expr: &Expr) {
        let suffix = self.type_suffix(expr);
        match &expr.kind {
            ExprKind::Literal(value) => {
                let rendered = match value {
                    ConstValue::Int(v) => format!("Int {v}"),
                    ConstValue::Float(v) => format!("Float {v}"),
                    ConstValue::Bool(v) => format!("Bool {v}"),
                    ConstValue::Char(v) => format!("Char {v:?}"),
                    ConstValue::Str(record) => {
                        let text = self.compilation.strings.get(*record).unwrap_or("");
                        format!("Str {text:?}")
                    }
                };
                self.line(format!("Literal {rendered}{suffix}"));
            }
            ExprKind::Ident(name) => {
                self.line(format!("Ident {}{}", self.ident(*name), suffix));
            }
            ExprKind::Binary { op, lhs, rhs } => {
                self.nested(format!("Binary '{}'{}", op.as_str(), suffix), |p| {
                    p.expr(lhs);
                    p.expr(rhs);
                });
            }
            ExprKind::Unary { op, operand } => {
                self.nested(format!("Unary '{}'{}", op.as_str(), suffix), |p| {
                    p.expr(operand)
                });
            }
            ExprKind::Postfix { op, operand } => {
                self.nested(format!("Postfix '{}'{}", op.as_str(), suffix), |p| {
                    p.expr(operand)
                });
            }
            ExprKind::Assign { op, target, value } => {
                self.nested(format!("Assign '{}'{}", op.as_str(), suffix), |p| {
                    p.expr(target);
                    p.expr(value);
                });
            }
            ExprKind::Call { callee, args } => {
                self.nested(format!("Call{suffix}"), |p| {
                    p.expr(callee);
                    for arg in args {
                        p.expr(arg);
                    }
                });
            }
            ExprKind::Subscript { target, index } => {
                self.nested(format!("Subscript{suffix}"), |p| {
                    p.expr(target);
                    p.expr(index);
                });
            }
            ExprKind::InitList { elements } => {
                self.nested(format!("InitList{suffix}"), |p| {
                    for element in elements {
                        p.expr(element);
                    }
                });
            }
            ExprKind::Cast { target, inner } => {
                let target = self.compilation.types.display(*target);
                self.nested(format!("Cast -> {target}"), |p| p.expr(inner));
            }
        }
    }
}
