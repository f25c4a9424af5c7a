//! rillc-sem - Semantic Analysis & Type Checking
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! This crate answers the questions the grammar cannot: is this name
//! defined, do these types agree, what does this initializer list mean, what
//! is the value of this constant. Its three pillars:
//!
//!   TYPE STORE - canonical, interned semantic types. Structural equality is
//!   handle equality; the eight primitives are singletons created with the
//!   store; every composite points at already-canonical children.
//!
//!   SCOPE TREE - lexically nested symbol tables. A scope is a slot array
//!   indexed by the identifier's dense interner index, so define/lookup are
//!   array accesses. Lookup walks parent links, respecting the namespace
//!   split between identifiers and keywords.
//!
//!   ANALYZER - a two-pass walk. Pass one resolves function signatures so
//!   calls can be checked against declarations appearing later in the file;
//!   pass two checks bodies and global variables in source order, performing
//!   bidirectional type checking with implicit promotion, constant folding,
//!   explicit cast insertion, and initializer-list/array-size inference.
//!
//! The analyzer mutates the AST it is given: expression nodes gain their
//! resolved types and constant values, implicit conversions materialize as
//! cast nodes wrapping the original expression, and unsized array
//! declarations gain synthesized size literals. Nothing else about the tree
//! changes shape.
//!
//! ============================================================================

pub mod analysis;
pub mod scope;
pub mod types;

pub use analysis::{analyze, Analyzer};
pub use scope::{Namespace, ScopeTree, Symbol, SymbolFlags, SymbolKind};
pub use types::{PrimKind, TypeData, TypeDisplay, TypeStore};

#[cfg(test)]
mod tests {
    use super::*;
    use rillc_par::ast::{ConstValue, Decl, Expr, ExprKind, Program, Stmt, TypeExprKind};
    use rillc_util::{Arena, DiagnosticKind, Diagnostics, Span};

    /// Full front-end run: lex, parse, analyze. Panics if parsing fails;
    /// semantic diagnostics are returned for inspection.
    fn check(source: &str) -> (Program, TypeStore, Diagnostics) {
        let arena = Arena::new();
        let mut diags = Diagnostics::new("test.rl");
        let lexed = rillc_lex::lex(&arena, source, &mut diags);
        let mut program =
            rillc_par::parse(&lexed.tokens, &mut diags).expect("test source must parse");
        let store = analyze(
            &mut program,
            &lexed.identifiers,
            &lexed.keywords,
            &mut diags,
        );
        (program, store, diags)
    }

    fn first_fn_body(program: &Program) -> &[Stmt] {
        for decl in &program.decls {
            if let Decl::Fn(func) = decl {
                return &func.body.stmts;
            }
        }
        panic!("no function in program");
    }

    fn only_diag_kind(diags: &Diagnostics) -> &DiagnosticKind {
        assert_eq!(diags.len(), 1, "expected exactly one diagnostic");
        &diags.first().unwrap().kind
    }

    // ------------------------------------------------------------------
    // The six end-to-end scenarios
    // ------------------------------------------------------------------

    #[test]
    fn scenario_return_adopts_declared_width() {
        let (program, store, diags) = check("fn main() -> i64 { return 10; }");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
        let Stmt::Return(ret) = &first_fn_body(&program)[0] else {
            panic!("expected return");
        };
        let value = ret.value.as_ref().unwrap();
        // The literal adopted i64 from the expected return type: no cast.
        assert!(matches!(value.kind, ExprKind::Literal(_)));
        assert_eq!(value.ty, Some(store.t_i64()));
        assert!(value.is_const);
    }

    #[test]
    fn scenario_string_into_i32_mismatch() {
        let (_, store, diags) = check("x: i32 = \"string\";");
        let DiagnosticKind::TypeMismatch { expected, actual } = only_diag_kind(&diags) else {
            panic!("expected TypeMismatch");
        };
        assert_eq!(*expected, store.t_i32());
        assert_eq!(*actual, store.t_str());
    }

    #[test]
    fn scenario_undeclared_identifier() {
        let (_, _, diags) = check("x: i32 = y;");
        let DiagnosticKind::Undeclared { name } = only_diag_kind(&diags) else {
            panic!("expected Undeclared");
        };
        assert_eq!(&**name, "y");
    }

    #[test]
    fn scenario_arg_count_mismatch() {
        let source = "fn inc(a: i32) -> i32 { return 0; } val: i32 = inc(1, 2);";
        let (program, _, diags) = check(source);
        let diag = diags.first().unwrap();
        let DiagnosticKind::ArgCountMismatch { expected, actual } = &diag.kind else {
            panic!("expected ArgCountMismatch, got {:?}", diag.kind);
        };
        assert_eq!(diags.len(), 1);
        assert_eq!(*expected, 1);
        assert_eq!(*actual, 2);
        // The span covers the whole call expression.
        let Decl::Var(var) = &program.decls[1] else {
            panic!("expected variable");
        };
        assert_eq!(diag.span, var.init.as_ref().unwrap().span);
    }

    #[test]
    fn scenario_array_size_inference() {
        let (program, store, diags) = check("var: i32[][] = {{1,2},{3,4}};");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
        let Decl::Var(var) = &program.decls[0] else {
            panic!("expected variable");
        };

        // Declared type adopted the fully sized i32[2][2].
        let declared = var.sem_ty.unwrap();
        assert_eq!(store.display(declared).to_string(), "i32[2][2]");

        // The initializer's interned type is the identical handle.
        assert_eq!(var.init.as_ref().unwrap().ty, Some(declared));

        // Both size expressions in the AST were synthesized as literal 2.
        let TypeExprKind::Array { elem, size } = &var.ty.kind else {
            panic!("expected array type expression");
        };
        let outer_size = size.as_ref().expect("outer size synthesized");
        assert!(matches!(
            outer_size.kind,
            ExprKind::Literal(ConstValue::Int(2))
        ));
        let TypeExprKind::Array { size, .. } = &elem.kind else {
            panic!("expected inner array type expression");
        };
        let inner_size = size.as_ref().expect("inner size synthesized");
        assert!(matches!(
            inner_size.kind,
            ExprKind::Literal(ConstValue::Int(2))
        ));
    }

    #[test]
    fn scenario_const_folding_into_symbol() {
        let arena = Arena::new();
        let mut diags = Diagnostics::new("test.rl");
        let lexed = rillc_lex::lex(&arena, "const k: i32 = 1 + 2 * 3;", &mut diags);
        let mut program = rillc_par::parse(&lexed.tokens, &mut diags).unwrap();
        let mut analyzer = Analyzer::new(&lexed.identifiers, &lexed.keywords, &mut diags);
        analyzer.run(&mut program);

        // The symbol carries CONST | COMPUTED_VALUE and the value.
        let name = lexed.identifiers.peek("k").unwrap();
        let symbol = analyzer
            .scopes()
            .lookup(analyzer.global_scope(), name, Namespace::Identifiers)
            .unwrap();
        assert!(symbol.flags.contains(SymbolFlags::CONST));
        assert!(symbol.flags.contains(SymbolFlags::COMPUTED_VALUE));
        assert_eq!(symbol.value, Some(ConstValue::Int(7)));

        // The initializer folded to 7, and the run was clean.
        let Decl::Var(var) = &program.decls[0] else {
            panic!("expected variable");
        };
        let init = var.init.as_ref().unwrap();
        assert!(init.is_const);
        assert_eq!(init.value, Some(ConstValue::Int(7)));
        assert!(diags.is_empty());
    }

    // ------------------------------------------------------------------
    // Casts and width propagation
    // ------------------------------------------------------------------

    #[test]
    fn widening_return_inserts_cast() {
        let (program, store, diags) = check("fn f(a: i32) -> i64 { return a; }");
        assert!(diags.is_empty());
        let Stmt::Return(ret) = &first_fn_body(&program)[0] else {
            panic!("expected return");
        };
        let value = ret.value.as_ref().unwrap();
        let ExprKind::Cast { target, inner } = &value.kind else {
            panic!("expected inserted cast, got {:?}", value.kind);
        };
        assert_eq!(*target, store.t_i64());
        assert_eq!(value.ty, Some(*target));
        assert_eq!(inner.ty, Some(store.t_i32()));
        assert!(store.can_implicit_cast(*target, inner.ty.unwrap()));
    }

    #[test]
    fn const_value_folds_through_cast() {
        let (program, store, diags) = check("const k: i32 = 3; x: f64 = k;");
        assert!(diags.is_empty());
        let Decl::Var(var) = &program.decls[1] else {
            panic!("expected variable");
        };
        let init = var.init.as_ref().unwrap();
        let ExprKind::Cast { target, inner } = &init.kind else {
            panic!("expected cast around const identifier");
        };
        assert_eq!(*target, store.t_f64());
        assert!(init.is_const);
        assert_eq!(init.value, Some(ConstValue::Float(3.0)));
        assert!(inner.is_const);
        assert_eq!(inner.value, Some(ConstValue::Int(3)));
    }

    #[test]
    fn typed_operand_propagates_width_to_literal() {
        let (program, store, diags) = check("fn f(a: i64) -> i64 { return a + 1; }");
        assert!(diags.is_empty());
        let Stmt::Return(ret) = &first_fn_body(&program)[0] else {
            panic!("expected return");
        };
        let ExprKind::Binary { rhs, .. } = &ret.value.as_ref().unwrap().kind else {
            panic!("expected binary");
        };
        // The literal adopted i64 directly; no cast node was needed.
        assert!(matches!(rhs.kind, ExprKind::Literal(_)));
        assert_eq!(rhs.ty, Some(store.t_i64()));
    }

    #[test]
    fn literal_left_operand_readopts_right_width() {
        let (program, store, diags) = check("fn f(a: i64) -> i64 { return 1 + a; }");
        assert!(diags.is_empty());
        let Stmt::Return(ret) = &first_fn_body(&program)[0] else {
            panic!("expected return");
        };
        let value = ret.value.as_ref().unwrap();
        assert_eq!(value.ty, Some(store.t_i64()));
        let ExprKind::Binary { lhs, .. } = &value.kind else {
            panic!("expected binary");
        };
        assert_eq!(lhs.ty, Some(store.t_i64()));
    }

    #[test]
    fn mixed_arithmetic_unifies_and_folds() {
        let (program, store, diags) = check("x: f64 = 1 + 2.5;");
        assert!(diags.is_empty());
        let Decl::Var(var) = &program.decls[0] else {
            panic!("expected variable");
        };
        let init = var.init.as_ref().unwrap();
        assert_eq!(init.ty, Some(store.t_f64()));
        assert!(init.is_const);
        assert_eq!(init.value, Some(ConstValue::Float(3.5)));
    }

    #[test]
    fn division_by_zero_constant_is_not_folded() {
        let (program, _, diags) = check("x: i32 = 1 / 0;");
        assert!(diags.is_empty());
        let Decl::Var(var) = &program.decls[0] else {
            panic!("expected variable");
        };
        let init = var.init.as_ref().unwrap();
        assert!(!init.is_const);
        assert_eq!(init.value, None);
    }

    #[test]
    fn comparison_folds_to_bool() {
        let (program, store, diags) = check("b: bool = 2 < 3;");
        assert!(diags.is_empty());
        let Decl::Var(var) = &program.decls[0] else {
            panic!("expected variable");
        };
        let init = var.init.as_ref().unwrap();
        assert_eq!(init.ty, Some(store.t_bool()));
        assert_eq!(init.value, Some(ConstValue::Bool(true)));
    }

    #[test]
    fn unary_folding() {
        let (program, _, diags) = check("a: i32 = -3; b: bool = !false;");
        assert!(diags.is_empty());
        let Decl::Var(a) = &program.decls[0] else {
            panic!();
        };
        assert_eq!(a.init.as_ref().unwrap().value, Some(ConstValue::Int(-3)));
        let Decl::Var(b) = &program.decls[1] else {
            panic!();
        };
        assert_eq!(b.init.as_ref().unwrap().value, Some(ConstValue::Bool(true)));
    }

    // ------------------------------------------------------------------
    // Name resolution and ordering
    // ------------------------------------------------------------------

    #[test]
    fn forward_function_call_is_allowed() {
        let (_, _, diags) =
            check("fn caller() -> i32 { return callee(); } fn callee() -> i32 { return 1; }");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
    }

    #[test]
    fn forward_global_reference_is_undeclared() {
        let (_, _, diags) = check("fn f() -> i32 { return g; } g: i32 = 1;");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::Undeclared { .. }
        ));
    }

    #[test]
    fn block_scope_ends_at_brace() {
        let (_, _, diags) = check("fn f() -> i32 { { x: i32 = 1; } return x; }");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::Undeclared { .. }
        ));
    }

    #[test]
    fn local_shadows_parameter() {
        let (_, _, diags) = check("fn f(a: i32) -> f64 { a: f64 = 1.0; return a; }");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
    }

    #[test]
    fn redeclaration_in_same_scope() {
        let (_, _, diags) = check("fn f() { x: i32 = 1; x: i32 = 2; }");
        let DiagnosticKind::Redeclaration { name } = only_diag_kind(&diags) else {
            panic!("expected Redeclaration");
        };
        assert_eq!(&**name, "x");
    }

    #[test]
    fn duplicate_function_names() {
        let (_, _, diags) = check("fn f() { } fn f() { }");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::Redeclaration { .. }
        ));
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    #[test]
    fn condition_must_be_bool() {
        let (_, store, diags) = check("fn f(a: i32) { while a { } }");
        let DiagnosticKind::TypeMismatch { expected, .. } = only_diag_kind(&diags) else {
            panic!("expected TypeMismatch");
        };
        assert_eq!(*expected, store.t_bool());
    }

    #[test]
    fn break_outside_loop() {
        let (_, _, diags) = check("fn f() { break; }");
        let DiagnosticKind::OutsideLoop { keyword } = only_diag_kind(&diags) else {
            panic!("expected OutsideLoop");
        };
        assert_eq!(*keyword, "break");
    }

    #[test]
    fn continue_inside_loop_is_fine() {
        let (_, _, diags) =
            check("fn f() { for i: i32 = 0; i < 3; i++ { continue; } while true { break; } }");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
    }

    #[test]
    fn void_function_returning_value() {
        let (_, _, diags) = check("fn f() { return 1; }");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::ReturnMismatch { .. }
        ));
    }

    #[test]
    fn bare_return_in_valued_function() {
        let (_, store, diags) = check("fn f() -> i32 { return; }");
        let DiagnosticKind::ReturnMismatch { expected, actual } = only_diag_kind(&diags) else {
            panic!("expected ReturnMismatch");
        };
        assert_eq!(*expected, store.t_i32());
        assert_eq!(*actual, None);
    }

    // ------------------------------------------------------------------
    // Operators and usage errors
    // ------------------------------------------------------------------

    #[test]
    fn logical_on_non_bool() {
        let (_, _, diags) = check("fn f(a: i32) { b: bool = a && true; }");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::BinopMismatch { op: "&&", .. }
        ));
    }

    #[test]
    fn not_on_integer() {
        let (_, _, diags) = check("fn f(a: i32) { b: bool = !a; }");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::UnopMismatch { op: "!", .. }
        ));
    }

    #[test]
    fn deref_of_non_pointer() {
        let (_, _, diags) = check("fn f(a: i32) { b: i32 = *a; }");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::UnopMismatch { op: "*", .. }
        ));
    }

    #[test]
    fn address_of_non_lvalue() {
        let (_, _, diags) = check("fn f() { p: i32* = &1; }");
        assert!(matches!(only_diag_kind(&diags), DiagnosticKind::NotLvalue));
    }

    #[test]
    fn address_of_and_deref_round_trip() {
        let (_, _, diags) = check("fn f(a: i32) -> i32 { p: i32* = &a; return *p; }");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
    }

    #[test]
    fn calling_a_non_function() {
        let (_, _, diags) = check("fn f(a: i32) { a(); }");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::NotCallable { .. }
        ));
    }

    #[test]
    fn indexing_a_scalar() {
        let (_, _, diags) = check("fn f(a: i32) { b: i32 = a[0]; }");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::NotIndexable { .. }
        ));
    }

    #[test]
    fn subscript_index_must_be_integer() {
        let (_, store, diags) = check("fn f(xs: i32[3]) { b: i32 = xs[1.5]; }");
        let DiagnosticKind::TypeMismatch { expected, .. } = only_diag_kind(&diags) else {
            panic!("expected TypeMismatch");
        };
        assert_eq!(*expected, store.t_i64());
    }

    #[test]
    fn subscript_through_pointer() {
        let (_, _, diags) = check("fn f(p: i32*) -> i32 { return p[0]; }");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
    }

    #[test]
    fn assignment_to_const() {
        let (_, _, diags) = check("fn f() { const k: i32 = 1; k = 2; }");
        let DiagnosticKind::ConstAssign { name } = only_diag_kind(&diags) else {
            panic!("expected ConstAssign");
        };
        assert_eq!(&**name, "k");
    }

    #[test]
    fn compound_assignment_checks_like_assignment() {
        let (_, _, diags) = check("fn f(a: i32) { a += 1; a *= 2; }");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
    }

    // ------------------------------------------------------------------
    // Initializer lists and arrays
    // ------------------------------------------------------------------

    #[test]
    fn single_dimension_inference() {
        let (program, store, diags) = check("xs: i32[] = {1, 2, 3};");
        assert!(diags.is_empty());
        let Decl::Var(var) = &program.decls[0] else {
            panic!();
        };
        assert_eq!(
            store.display(var.sem_ty.unwrap()).to_string(),
            "i32[3]"
        );
        let TypeExprKind::Array { size, .. } = &var.ty.kind else {
            panic!();
        };
        assert!(matches!(
            size.as_ref().unwrap().kind,
            ExprKind::Literal(ConstValue::Int(3))
        ));
    }

    #[test]
    fn sized_declaration_with_matching_list() {
        let (_, _, diags) = check("xs: i32[3] = {1, 2, 3};");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
    }

    #[test]
    fn array_size_mismatch() {
        let (_, _, diags) = check("xs: i32[2] = {1, 2, 3};");
        let DiagnosticKind::ArraySizeMismatch { expected, actual } = only_diag_kind(&diags)
        else {
            panic!("expected ArraySizeMismatch");
        };
        assert_eq!(*expected, 2);
        assert_eq!(*actual, 3);
    }

    #[test]
    fn dimension_mismatch() {
        let (_, _, diags) = check("xs: i32[][] = {1, 2};");
        let DiagnosticKind::DimensionMismatch { expected, actual } = only_diag_kind(&diags)
        else {
            panic!("expected DimensionMismatch");
        };
        assert_eq!(*expected, 2);
        assert_eq!(*actual, 1);
    }

    #[test]
    fn list_against_scalar_type() {
        let (_, _, diags) = check("x: i32 = {1};");
        assert!(matches!(
            only_diag_kind(&diags),
            DiagnosticKind::UnexpectedList { .. }
        ));
    }

    #[test]
    fn element_widening_inside_list() {
        let (program, store, diags) = check("xs: i64[] = {1, 2};");
        assert!(diags.is_empty());
        let Decl::Var(var) = &program.decls[0] else {
            panic!();
        };
        assert_eq!(store.display(var.sem_ty.unwrap()).to_string(), "i64[2]");
        // The literals adopted i64 via the hint; check the element types.
        let ExprKind::InitList { elements } = &var.init.as_ref().unwrap().kind else {
            panic!();
        };
        assert!(elements.iter().all(|e| e.ty == Some(store.t_i64())));
    }

    #[test]
    fn const_array_size_expression() {
        let (program, store, diags) = check("const n: i32 = 2 + 1; xs: f64[n * 2];");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
        let Decl::Var(var) = &program.decls[1] else {
            panic!();
        };
        assert_eq!(store.display(var.sem_ty.unwrap()).to_string(), "f64[6]");
    }

    #[test]
    fn non_const_array_size_expression() {
        let (_, _, diags) = check("fn f(n: i32) { xs: i32[n]; }");
        // NotConst for the size, then the declaration fails to resolve.
        assert_eq!(diags.len(), 2);
        assert!(matches!(
            diags.first().unwrap().kind,
            DiagnosticKind::NotConst
        ));
        assert!(matches!(
            diags.iter().nth(1).unwrap().kind,
            DiagnosticKind::VariableTypeResolutionFailed { .. }
        ));
    }

    // ------------------------------------------------------------------
    // Whole-tree invariants
    // ------------------------------------------------------------------

    fn assert_fully_typed(expr: &Expr) {
        assert!(expr.ty.is_some(), "untyped expression at {:?}", expr.span);
        match &expr.kind {
            ExprKind::Binary { lhs, rhs, .. } => {
                assert_fully_typed(lhs);
                assert_fully_typed(rhs);
            }
            ExprKind::Unary { operand, .. } | ExprKind::Postfix { operand, .. } => {
                assert_fully_typed(operand);
            }
            ExprKind::Assign { target, value, .. } => {
                assert_fully_typed(target);
                assert_fully_typed(value);
            }
            ExprKind::Call { callee, args } => {
                assert_fully_typed(callee);
                args.iter().for_each(assert_fully_typed);
            }
            ExprKind::Subscript { target, index } => {
                assert_fully_typed(target);
                assert_fully_typed(index);
            }
            ExprKind::InitList { elements } => elements.iter().for_each(assert_fully_typed),
            ExprKind::Cast { inner, .. } => assert_fully_typed(inner),
            ExprKind::Literal(_) | ExprKind::Ident(_) => {}
        }
    }

    fn assert_stmts_fully_typed(stmts: &[Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::Block(b) => assert_stmts_fully_typed(&b.stmts),
                Stmt::If(s) => {
                    assert_fully_typed(&s.cond);
                    assert_stmts_fully_typed(&s.then_branch.stmts);
                }
                Stmt::While(s) => {
                    assert_fully_typed(&s.cond);
                    assert_stmts_fully_typed(&s.body.stmts);
                }
                Stmt::For(s) => {
                    if let Some(cond) = &s.cond {
                        assert_fully_typed(cond);
                    }
                    if let Some(post) = &s.post {
                        assert_fully_typed(post);
                    }
                    assert_stmts_fully_typed(&s.body.stmts);
                }
                Stmt::Return(s) => {
                    if let Some(v) = &s.value {
                        assert_fully_typed(v);
                    }
                }
                Stmt::Var(v) => {
                    if let Some(init) = &v.init {
                        assert_fully_typed(init);
                    }
                }
                Stmt::Expr(e) => assert_fully_typed(e),
                Stmt::Break(_) | Stmt::Continue(_) => {}
            }
        }
    }

    #[test]
    fn clean_program_is_fully_typed() {
        let source = "
            total: i32 = 0;
            fn sum(xs: i32[4]) -> i64 {
                acc: i64 = 0;
                for i: i32 = 0; i < 4; i++ {
                    acc += xs[i];
                }
                return acc;
            }
            fn main() -> i32 {
                data: i32[] = {1, 2, 3, 4};
                if sum(data) > 5 {
                    return 1;
                }
                return 0;
            }
        ";
        let (program, _, diags) = check(source);
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
        for decl in &program.decls {
            match decl {
                Decl::Var(var) => {
                    if let Some(init) = &var.init {
                        assert_fully_typed(init);
                    }
                }
                Decl::Fn(func) => assert_stmts_fully_typed(&func.body.stmts),
            }
        }
    }

    #[test]
    fn analyzer_reports_all_errors_in_one_run() {
        // Three independent errors, all surfaced together.
        let source = "fn f() { x: i32 = y; break; q: bool = 1 && true; }";
        let (_, _, diags) = check(source);
        assert_eq!(diags.len(), 3);
        assert_eq!(diags.first().unwrap().span.start_line, 1);
    }

    #[test]
    fn analyzer_diagnostics_in_source_order() {
        let source = "fn f() { a: i32 = oops; }\nfn g() { b: i32 = later; }";
        let (_, _, diags) = check(source);
        assert_eq!(diags.len(), 2);
        let spans: Vec<_> = diags.iter().map(|d| d.span.start_line).collect();
        assert_eq!(spans, vec![1, 2]);
    }

    #[test]
    fn rejected_subtree_keeps_type_none() {
        let (program, _, diags) = check("fn f() { x: i32 = y + 1; }");
        assert!(!diags.is_empty());
        let Stmt::Var(var) = &first_fn_body(&program)[0] else {
            panic!();
        };
        let init = var.init.as_ref().unwrap();
        assert_eq!(init.ty, None);
    }

    #[test]
    fn function_type_parameters_check() {
        let (_, _, diags) =
            check("fn apply(op: fn(i32) -> i32, v: i32) -> i32 { return op(v); }");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
    }

    #[test]
    fn string_and_char_literals_type() {
        let (_, _, diags) = check("s: str = \"hello\"; c: char = 'x';");
        assert!(diags.is_empty(), "unexpected: {:?}", diags.first());
    }

    #[test]
    fn span_dummy_on_synthesized_literals_not_used() {
        // Synthesized size literals take the type expression's span, so
        // they stay within the declaration's extent.
        let (program, _, diags) = check("xs: i32[] = {1, 2};");
        assert!(diags.is_empty());
        let Decl::Var(var) = &program.decls[0] else {
            panic!();
        };
        let TypeExprKind::Array { size, .. } = &var.ty.kind else {
            panic!();
        };
        let lit = size.as_ref().unwrap();
        assert_ne!(lit.span, Span::DUMMY);
        assert!(var.span.contains(lit.span));
    }
}
