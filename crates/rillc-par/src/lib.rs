//! rillc-par - Recursive-Descent Parser
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The parser consumes the token sequence and produces an AST in which every
//! node carries a source span. It is a hand-written recursive-descent parser:
//! one function per production, consuming tokens through `current` / `peek` /
//! `advance` / `eat` / `expect`.
//!
//! ERROR DISCIPLINE: FIRST ERROR WINS
//! ----------------------------------
//! One parser, one compilation unit, one error. The first production that
//! fails emits the sole parse diagnostic (`UnexpectedToken`, `UnexpectedEof`
//! or `TrailingTokens`) and returns `None`; enclosing productions propagate
//! the `None` without emitting anything else. A failed parse yields no AST.
//!
//! Some expected-but-missing-token errors read better when the caret points
//! just after the previous token rather than at the next one (a missing `;`
//! should be reported at the end of the statement, not at whatever happens
//! to follow). The `*_after_prev` variants do exactly that.
//!
//! SPAN ACCOUNTING
//! ---------------
//! Every node's span is the union of the spans of its constituent tokens and
//! child nodes, built with `Span::join` as productions return.
//!
//! The parser never touches the semantic fields of the AST: `ty`,
//! `is_const` and `value` stay blank until semantic analysis.
//!
//! ============================================================================

pub mod ast;

mod expr;
mod items;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

use rillc_lex::{Token, TokenKind, TokenPayload};
use rillc_util::{DiagnosticKind, Diagnostics, Span};

use ast::Program;

/// Parse a token sequence into a program.
///
/// On syntactic failure the return is `None` and `diags` contains exactly
/// one parse diagnostic.
pub fn parse<'src>(tokens: &[Token<'src>], diags: &mut Diagnostics) -> Option<Program> {
    Parser::new(tokens, diags).parse_program()
}

/// Parser state over a borrowed token slice.
pub struct Parser<'a, 'src> {
    tokens: &'a [Token<'src>],
    /// Index of the next token to consume
    pos: usize,
    diags: &'a mut Diagnostics,
    /// Latched by the first error; suppresses all later emissions
    failed: bool,
}

impl<'a, 'src> Parser<'a, 'src> {
    /// Create a parser positioned at the first token.
    pub fn new(tokens: &'a [Token<'src>], diags: &'a mut Diagnostics) -> Self {
        Self {
            tokens,
            pos: 0,
            diags,
            failed: false,
        }
    }

    /// The token at the current position. A well-formed stream ends with
    /// `Eof`; an empty one behaves as if it held a single `Eof`.
    fn current(&self) -> Token<'src> {
        self.tokens.get(self.pos).copied().unwrap_or(Token {
            kind: TokenKind::Eof,
            lexeme: "",
            span: Span::DUMMY,
            payload: TokenPayload::None,
        })
    }

    /// Look ahead `offset` tokens without consuming.
    fn peek(&self, offset: usize) -> Token<'src> {
        self.tokens.get(self.pos + offset).copied().unwrap_or(Token {
            kind: TokenKind::Eof,
            lexeme: "",
            span: Span::DUMMY,
            payload: TokenPayload::None,
        })
    }

    /// True if the current token has the given kind.
    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume and return the current token. Never advances past `Eof`.
    fn advance(&mut self) -> Token<'src> {
        let tok = self.current();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    /// Consume the current token if it matches.
    fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or emit the parse error, pointing
    /// at the offending token.
    fn expect(&mut self, kind: TokenKind, expected: &str) -> Option<Token<'src>> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            self.unexpected(expected);
            None
        }
    }

    /// Like [`Parser::expect`], but anchors the caret just after the
    /// previous token - for "expected ';'"-style messages.
    fn expect_after_prev(&mut self, kind: TokenKind, expected: &str) -> Option<Token<'src>> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            self.unexpected_after_prev(expected);
            None
        }
    }

    /// The span of the most recently consumed token.
    fn prev_span(&self) -> Span {
        if self.pos == 0 {
            Span::DUMMY
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    /// Record the parse error unless one was already recorded.
    fn emit_error(&mut self, kind: DiagnosticKind, span: Span) {
        if self.failed {
            return;
        }
        self.failed = true;
        self.diags.emit(kind, span);
    }

    /// "Expected X" at the current token.
    fn unexpected(&mut self, expected: &str) {
        let tok = self.current();
        let kind = if tok.kind == TokenKind::Eof {
            DiagnosticKind::UnexpectedEof {
                expected: expected.into(),
            }
        } else {
            DiagnosticKind::UnexpectedToken {
                expected: expected.into(),
                found: tok.lexeme.into(),
            }
        };
        self.emit_error(kind, tok.span);
    }

    /// "Expected X" with the caret placed after the previous token.
    fn unexpected_after_prev(&mut self, expected: &str) {
        let tok = self.current();
        let span = self.prev_span().after();
        let kind = if tok.kind == TokenKind::Eof {
            DiagnosticKind::UnexpectedEof {
                expected: expected.into(),
            }
        } else {
            DiagnosticKind::UnexpectedToken {
                expected: expected.into(),
                found: tok.lexeme.into(),
            }
        };
        self.emit_error(kind, span);
    }

    /// `Program = { TopDecl } EOF`
    fn parse_program(mut self) -> Option<Program> {
        let mut decls = Vec::with_capacity(8);

        while !self.at(TokenKind::Eof) {
            let decl = self.parse_declaration()?;
            decls.push(decl);
        }

        // The stream is positioned at Eof; anything beyond it means the
        // token sequence kept going after the end marker.
        if self.pos + 1 < self.tokens.len() {
            let span = self.tokens[self.pos + 1].span;
            self.emit_error(DiagnosticKind::TrailingTokens, span);
            return None;
        }

        let span = match (decls.first(), decls.last()) {
            (Some(first), Some(last)) => first.span().join(last.span()),
            _ => self.current().span,
        };

        Some(Program { decls, span })
    }
}
