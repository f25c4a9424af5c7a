//! Type expressions: named primitives, pointer/array suffixes, function types.

use rillc_lex::TokenKind;

use crate::ast::{TypeExpr, TypeExprKind};
use crate::Parser;

impl<'a, 'src> Parser<'a, 'src> {
    /// `Type = TypeAtom { '*' | '[' [Expr] ']' }`
    ///
    /// Suffixes apply left-associatively in source order: `i32*[3]` is an
    /// array of three pointers, `i32[3]*` a pointer to an array of three.
    pub(crate) fn parse_type(&mut self) -> Option<TypeExpr> {
        let mut base = self.parse_type_atom()?;

        loop {
            if let Some(star) = self.eat(TokenKind::Star) {
                let span = base.span.join(star.span);
                base = TypeExpr {
                    kind: TypeExprKind::Ptr(Box::new(base)),
                    span,
                };
            } else if self.eat(TokenKind::LBracket).is_some() {
                let size = if self.at(TokenKind::RBracket) {
                    None
                } else {
                    Some(Box::new(self.parse_expression()?))
                };
                let rbracket = self
                    .expect_after_prev(TokenKind::RBracket, "']' after array size expression")?;
                let span = base.span.join(rbracket.span);
                base = TypeExpr {
                    kind: TypeExprKind::Array {
                        elem: Box::new(base),
                        size,
                    },
                    span,
                };
            } else {
                break;
            }
        }

        Some(base)
    }

    /// `TypeAtom = '(' Type ')' | FnType | BaseTypeKeyword`
    fn parse_type_atom(&mut self) -> Option<TypeExpr> {
        let tok = self.current();

        if tok.kind == TokenKind::LParen {
            let lparen = self.advance();
            let mut inner = self.parse_type()?;
            let rparen = self.expect(TokenKind::RParen, "')' after type")?;
            inner.span = lparen.span.join(rparen.span);
            return Some(inner);
        }

        if tok.kind == TokenKind::Fn {
            return self.parse_function_type();
        }

        if tok.kind.is_type_keyword() {
            let tok = self.advance();
            let Some(record) = tok.name() else {
                self.unexpected("type");
                return None;
            };
            return Some(TypeExpr {
                kind: TypeExprKind::Named(record),
                span: tok.span,
            });
        }

        self.unexpected("type");
        None
    }

    /// `FnType = 'fn' '(' [Type {',' Type}] ')' ['->' Type]`
    fn parse_function_type(&mut self) -> Option<TypeExpr> {
        let fn_tok = self.expect(TokenKind::Fn, "'fn'")?;
        self.expect(TokenKind::LParen, "'(' in function type")?;

        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                params.push(self.parse_type()?);
                if self.at(TokenKind::RParen) {
                    break;
                }
                self.expect(TokenKind::Comma, "',' or ')' in function type parameters")?;
            }
        }
        let rparen = self.expect(TokenKind::RParen, "')' after function type parameters")?;

        let mut span = fn_tok.span.join(rparen.span);
        let ret = if self.eat(TokenKind::Arrow).is_some() {
            let ty = self.parse_type()?;
            span = fn_tok.span.join(ty.span);
            Some(Box::new(ty))
        } else {
            None
        };

        Some(TypeExpr {
            kind: TypeExprKind::Fn { params, ret },
            span,
        })
    }
}
