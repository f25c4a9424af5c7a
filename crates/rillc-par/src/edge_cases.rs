//! Edge case tests for the parser.

use crate::ast::*;
use crate::test_support::parse_source;
use rillc_util::DiagnosticKind;

#[test]
fn deeply_nested_parentheses() {
    let (program, diags) = parse_source("x: i32 = ((((((1))))));");
    assert!(diags.is_empty());
    assert!(program.is_some());
}

#[test]
fn condition_parentheses_are_optional() {
    let (a, d1) = parse_source("fn f(x: i32) { if x > 0 { } }");
    let (b, d2) = parse_source("fn f(x: i32) { if (x > 0) { } }");
    assert!(d1.is_empty() && d2.is_empty());
    assert!(a.is_some() && b.is_some());
}

#[test]
fn keyword_cannot_be_identifier() {
    let (program, diags) = parse_source("while: i32 = 1;");
    assert!(program.is_none());
    assert_eq!(diags.len(), 1);
}

#[test]
fn unknown_token_reaches_parser_as_error() {
    let (program, diags) = parse_source("x: i32 = @;");
    assert!(program.is_none());
    assert_eq!(diags.len(), 1);
    assert!(matches!(
        diags.first().unwrap().kind,
        DiagnosticKind::UnexpectedToken { .. }
    ));
}

#[test]
fn error_span_points_after_previous_token_for_missing_semicolon() {
    let (_, diags) = parse_source("fn f() { return 1 }");
    let diag = diags.first().unwrap();
    // The return expression ends at column 18; the caret belongs right
    // after it, not at the '}' that happens to follow.
    assert_eq!(diag.span.start_line, 1);
    assert_eq!(diag.span.start_col, 18);
}

#[test]
fn second_error_is_not_reported() {
    // Both declarations are broken; only the first is diagnosed.
    let (program, diags) = parse_source("x: = 1;\ny: = 2;");
    assert!(program.is_none());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.first().unwrap().span.start_line, 1);
}

#[test]
fn call_with_many_arguments() {
    let (program, diags) = parse_source("fn f() { g(1, 2.0, true, 'c', \"s\", x); }");
    assert!(diags.is_empty());
    assert!(program.is_some());
}

#[test]
fn empty_call_and_empty_params() {
    let (program, diags) = parse_source("fn f() { f(); }");
    assert!(diags.is_empty());
    assert!(program.is_some());
}

#[test]
fn address_of_and_deref_compose() {
    let (program, diags) = parse_source("fn f(x: i32) { y: i32 = *&x; }");
    assert!(diags.is_empty());
    assert!(program.is_some());
}

#[test]
fn subscript_of_subscript() {
    let (program, diags) = parse_source("fn f(m: i32[][]) -> i32 { return m[0][1]; }");
    assert!(diags.is_empty());
    assert!(program.is_some());
}

#[test]
fn initializer_list_with_expressions() {
    let (program, diags) = parse_source("xs: i32[] = {1 + 2, f(3), x};");
    assert!(diags.is_empty());
    assert!(program.is_some());
}

#[test]
fn missing_close_bracket_in_type() {
    let (program, diags) = parse_source("xs: i32[3;");
    assert!(program.is_none());
    assert_eq!(diags.len(), 1);
}

#[test]
fn else_without_if_is_error() {
    let (program, diags) = parse_source("fn f() { else { } }");
    assert!(program.is_none());
    assert_eq!(diags.len(), 1);
}

#[test]
fn brace_at_statement_level_is_a_block() {
    // '{ 1; }' inside a body is a nested block holding an expression
    // statement, not an initializer list.
    let (program, diags) = parse_source("fn f() { { 1; } }");
    assert!(diags.is_empty());
    assert!(program.is_some());
}

#[test]
fn function_type_parameter() {
    let (program, diags) = parse_source("fn apply(op: fn(i32) -> i32, v: i32) -> i32 { return op(v); }");
    assert!(diags.is_empty());
    let program = program.unwrap();
    let Decl::Fn(func) = &program.decls[0] else {
        panic!("expected function");
    };
    assert!(matches!(func.params[0].ty.kind, TypeExprKind::Fn { .. }));
}

#[test]
fn span_of_if_covers_else() {
    let (program, _) = parse_source("fn f(x: i32) { if x > 0 { } else { } }");
    let program = program.unwrap();
    let Decl::Fn(func) = &program.decls[0] else {
        panic!("expected function");
    };
    let Stmt::If(if_stmt) = &func.body.stmts[0] else {
        panic!("expected if");
    };
    let Some(ElseClause::Block(else_block)) = &if_stmt.else_branch else {
        panic!("expected else block");
    };
    assert!(if_stmt.span.contains(else_block.span));
    assert!(if_stmt.span.contains(if_stmt.then_branch.span));
    assert!(if_stmt.span.contains(if_stmt.cond.span));
}
