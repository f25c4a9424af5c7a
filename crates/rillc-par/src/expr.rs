//! Expressions: the precedence ladder, postfix forms, primaries and
//! initializer lists.
//!
//! Precedence, low to high: assignment (right-assoc), `||`, `&&`, equality,
//! relational, additive, multiplicative, prefix unary, postfix, primary.

use rillc_lex::TokenKind;
use rillc_util::{DiagnosticKind, LiteralError, LiteralResult};

use crate::ast::{AssignOp, BinOp, ConstValue, Expr, ExprKind, PostfixOp, UnOp};
use crate::Parser;

/// Decode decimal digits into a signed 64-bit value.
pub(crate) fn decode_int_lit(lexeme: &str) -> LiteralResult<i64> {
    lexeme
        .parse::<i64>()
        .map_err(|_| LiteralError::IntOutOfRange(lexeme.into()))
}

/// Decode a float literal (integer '.' integer as produced by the lexer;
/// the decoder also accepts an exponent suffix).
pub(crate) fn decode_float_lit(lexeme: &str) -> LiteralResult<f64> {
    lexeme
        .parse::<f64>()
        .map_err(|_| LiteralError::Malformed(lexeme.into()))
}

fn assign_op_of(kind: TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Assign => Some(AssignOp::Assign),
        TokenKind::PlusEq => Some(AssignOp::AddAssign),
        TokenKind::MinusEq => Some(AssignOp::SubAssign),
        TokenKind::StarEq => Some(AssignOp::MulAssign),
        TokenKind::SlashEq => Some(AssignOp::DivAssign),
        TokenKind::PercentEq => Some(AssignOp::RemAssign),
        _ => None,
    }
}

fn logical_or_op(kind: TokenKind) -> Option<BinOp> {
    (kind == TokenKind::OrOr).then_some(BinOp::Or)
}

fn logical_and_op(kind: TokenKind) -> Option<BinOp> {
    (kind == TokenKind::AndAnd).then_some(BinOp::And)
}

fn equality_op(kind: TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::EqEq => Some(BinOp::Eq),
        TokenKind::BangEq => Some(BinOp::Ne),
        _ => None,
    }
}

fn relational_op(kind: TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Lt => Some(BinOp::Lt),
        TokenKind::Gt => Some(BinOp::Gt),
        TokenKind::LtEq => Some(BinOp::Le),
        TokenKind::GtEq => Some(BinOp::Ge),
        _ => None,
    }
}

fn additive_op(kind: TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Plus => Some(BinOp::Add),
        TokenKind::Minus => Some(BinOp::Sub),
        _ => None,
    }
}

fn multiplicative_op(kind: TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Star => Some(BinOp::Mul),
        TokenKind::Slash => Some(BinOp::Div),
        TokenKind::Percent => Some(BinOp::Rem),
        _ => None,
    }
}

fn prefix_op_of(kind: TokenKind) -> Option<UnOp> {
    match kind {
        TokenKind::Plus => Some(UnOp::Pos),
        TokenKind::Minus => Some(UnOp::Neg),
        TokenKind::Bang => Some(UnOp::Not),
        TokenKind::Star => Some(UnOp::Deref),
        TokenKind::Amp => Some(UnOp::AddrOf),
        TokenKind::PlusPlus => Some(UnOp::PreInc),
        TokenKind::MinusMinus => Some(UnOp::PreDec),
        _ => None,
    }
}

impl<'a, 'src> Parser<'a, 'src> {
    /// `Expr = LogicalOr [AssignOp Expr]`
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        let lhs = self.parse_logical_or()?;
        if let Some(op) = assign_op_of(self.current().kind) {
            return self.parse_assignment(lhs, op);
        }
        Some(lhs)
    }

    /// Assignment, right-associative. The left side must be a syntactic
    /// lvalue; constness and type agreement are semantic checks.
    fn parse_assignment(&mut self, lhs: Expr, op: AssignOp) -> Option<Expr> {
        let op_tok = self.current();
        if !lhs.is_lvalue() {
            self.emit_error(
                DiagnosticKind::UnexpectedToken {
                    expected: "assignable expression before assignment operator".into(),
                    found: op_tok.lexeme.into(),
                },
                lhs.span,
            );
            return None;
        }
        self.advance();

        // Right recursion gives right associativity: a = b = c.
        let rhs = self.parse_expression()?;
        let span = lhs.span.join(rhs.span);
        Some(Expr::new(
            ExprKind::Assign {
                op,
                target: Box::new(lhs),
                value: Box::new(rhs),
            },
            span,
        ))
    }

    /// Shared driver for the left-associative binary levels.
    fn parse_left_assoc(
        &mut self,
        next_level: fn(&mut Self) -> Option<Expr>,
        map_op: fn(TokenKind) -> Option<BinOp>,
    ) -> Option<Expr> {
        let mut lhs = next_level(self)?;
        while let Some(op) = map_op(self.current().kind) {
            self.advance();
            let rhs = next_level(self)?;
            let span = lhs.span.join(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Some(lhs)
    }

    fn parse_logical_or(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_logical_and, logical_or_op)
    }

    fn parse_logical_and(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_equality, logical_and_op)
    }

    fn parse_equality(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_relational, equality_op)
    }

    fn parse_relational(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_additive, relational_op)
    }

    fn parse_additive(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_multiplicative, additive_op)
    }

    fn parse_multiplicative(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_unary, multiplicative_op)
    }

    /// Prefix operators, applied recursively: `- ! * & + ++ --`.
    fn parse_unary(&mut self) -> Option<Expr> {
        if let Some(op) = prefix_op_of(self.current().kind) {
            let op_tok = self.advance();
            let operand = self.parse_unary()?;
            let span = op_tok.span.join(operand.span);
            return Some(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    /// Postfix `++`/`--`, subscripts and calls, chained left to right.
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current().kind {
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op_tok = self.advance();
                    let op = if op_tok.kind == TokenKind::PlusPlus {
                        PostfixOp::Inc
                    } else {
                        PostfixOp::Dec
                    };
                    let span = expr.span.join(op_tok.span);
                    expr = Expr::new(
                        ExprKind::Postfix {
                            op,
                            operand: Box::new(expr),
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    let rbracket =
                        self.expect(TokenKind::RBracket, "']' after subscript index")?;
                    let span = expr.span.join(rbracket.span);
                    expr = Expr::new(
                        ExprKind::Subscript {
                            target: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_argument_list()?;
                    let rparen = self.expect(TokenKind::RParen, "')' after call arguments")?;
                    let span = expr.span.join(rparen.span);
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }

        Some(expr)
    }

    /// Call arguments; an argument may itself be an initializer list.
    fn parse_argument_list(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if self.at(TokenKind::RParen) {
            return Some(args);
        }
        loop {
            let arg = if self.at(TokenKind::LBrace) {
                self.parse_initializer_list()?
            } else {
                self.parse_expression()?
            };
            args.push(arg);

            if self.at(TokenKind::RParen) {
                break;
            }
            self.expect(TokenKind::Comma, "',' or ')' in call arguments")?;
        }
        Some(args)
    }

    /// Literals, identifiers and parenthesized expressions.
    fn parse_primary(&mut self) -> Option<Expr> {
        let tok = self.current();
        match tok.kind {
            TokenKind::IntLit => {
                self.advance();
                match decode_int_lit(tok.lexeme) {
                    Ok(value) => Some(Expr::new(
                        ExprKind::Literal(ConstValue::Int(value)),
                        tok.span,
                    )),
                    Err(_) => {
                        self.emit_error(
                            DiagnosticKind::UnexpectedToken {
                                expected: "integer literal that fits in 64 bits".into(),
                                found: tok.lexeme.into(),
                            },
                            tok.span,
                        );
                        None
                    }
                }
            }
            TokenKind::FloatLit => {
                self.advance();
                match decode_float_lit(tok.lexeme) {
                    Ok(value) => Some(Expr::new(
                        ExprKind::Literal(ConstValue::Float(value)),
                        tok.span,
                    )),
                    Err(_) => {
                        self.emit_error(
                            DiagnosticKind::UnexpectedToken {
                                expected: "float literal".into(),
                                found: tok.lexeme.into(),
                            },
                            tok.span,
                        );
                        None
                    }
                }
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                let value = tok.kind == TokenKind::True;
                Some(Expr::new(
                    ExprKind::Literal(ConstValue::Bool(value)),
                    tok.span,
                ))
            }
            TokenKind::CharLit => {
                self.advance();
                let Some(c) = tok.char_value() else {
                    self.unexpected("char literal");
                    return None;
                };
                Some(Expr::new(ExprKind::Literal(ConstValue::Char(c)), tok.span))
            }
            TokenKind::StringLit => {
                self.advance();
                let Some(record) = tok.string_record() else {
                    self.unexpected("string literal");
                    return None;
                };
                Some(Expr::new(
                    ExprKind::Literal(ConstValue::Str(record)),
                    tok.span,
                ))
            }
            TokenKind::Identifier => {
                self.advance();
                let Some(record) = tok.name() else {
                    self.unexpected("identifier");
                    return None;
                };
                Some(Expr::new(ExprKind::Ident(record), tok.span))
            }
            TokenKind::LParen => {
                let lparen = self.advance();
                let mut inner = self.parse_expression()?;
                let rparen =
                    self.expect_after_prev(TokenKind::RParen, "')' after expression")?;
                inner.span = lparen.span.join(rparen.span);
                Some(inner)
            }
            _ => {
                self.unexpected_after_prev(
                    "expression (literal, identifier, or parenthesized expression)",
                );
                None
            }
        }
    }

    /// `InitList = '{' [Elem {',' Elem}] '}'` where an element is a nested
    /// list or any expression. An empty `{}` is allowed; a trailing comma
    /// is a diagnostic.
    pub(crate) fn parse_initializer_list(&mut self) -> Option<Expr> {
        let lbrace = self.expect(TokenKind::LBrace, "'{' to start initializer list")?;
        let mut elements = Vec::new();

        if let Some(rbrace) = self.eat(TokenKind::RBrace) {
            return Some(Expr::new(
                ExprKind::InitList { elements },
                lbrace.span.join(rbrace.span),
            ));
        }

        loop {
            let element = if self.at(TokenKind::LBrace) {
                self.parse_initializer_list()?
            } else {
                self.parse_expression()?
            };
            elements.push(element);

            if self.eat(TokenKind::Comma).is_some() {
                if self.at(TokenKind::RBrace) {
                    self.unexpected_after_prev("initializer element after ','");
                    return None;
                }
                continue;
            }

            let rbrace =
                self.expect_after_prev(TokenKind::RBrace, "',' or '}' in initializer list")?;
            return Some(Expr::new(
                ExprKind::InitList { elements },
                lbrace.span.join(rbrace.span),
            ));
        }
    }
}
