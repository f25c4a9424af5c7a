//! Statements: blocks, control flow, declarations, expression statements.

use rillc_lex::TokenKind;

use crate::ast::{
    Block, ElseClause, ForStmt, IfStmt, ReturnStmt, Stmt, WhileStmt,
};
use crate::Parser;

impl<'a, 'src> Parser<'a, 'src> {
    /// `Block = '{' { Stmt } '}'`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let lbrace = self.expect(TokenKind::LBrace, "'{'")?;
        let mut stmts = Vec::new();
        loop {
            if self.at(TokenKind::Eof) {
                self.unexpected_after_prev("'}' to close block");
                return None;
            }
            if let Some(rbrace) = self.eat(TokenKind::RBrace) {
                return Some(Block {
                    stmts,
                    span: lbrace.span.join(rbrace.span),
                });
            }
            stmts.push(self.parse_statement()?);
        }
    }

    /// Statement dispatch. An identifier followed by ':' starts a variable
    /// declaration; any other identifier-led form is an expression
    /// statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current().kind {
            TokenKind::If => self.parse_if_statement().map(Stmt::If),
            TokenKind::While => self.parse_while_statement().map(Stmt::While),
            TokenKind::For => self.parse_for_statement().map(Stmt::For),
            TokenKind::Return => self.parse_return_statement().map(Stmt::Return),
            TokenKind::Break => {
                let tok = self.advance();
                let semi = self.expect_after_prev(TokenKind::Semicolon, "';' after 'break'")?;
                Some(Stmt::Break(tok.span.join(semi.span)))
            }
            TokenKind::Continue => {
                let tok = self.advance();
                let semi =
                    self.expect_after_prev(TokenKind::Semicolon, "';' after 'continue'")?;
                Some(Stmt::Continue(tok.span.join(semi.span)))
            }
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            TokenKind::Fn => {
                self.unexpected("statement (function declarations are only allowed at top level)");
                None
            }
            TokenKind::Const => self
                .parse_var_decl_stmt()
                .map(|decl| Stmt::Var(Box::new(decl))),
            TokenKind::Identifier if self.peek(1).kind == TokenKind::Colon => self
                .parse_var_decl_stmt()
                .map(|decl| Stmt::Var(Box::new(decl))),
            _ => self.parse_expression_statement(),
        }
    }

    /// `IfStmt = 'if' Expr Block ['else' (IfStmt | Block)]`
    ///
    /// Parentheses around the condition are optional; the expression
    /// grammar covers them.
    fn parse_if_statement(&mut self) -> Option<IfStmt> {
        let if_tok = self.expect(TokenKind::If, "'if'")?;
        let cond = self.parse_expression()?;
        let then_branch = self.parse_block()?;
        let mut end_span = then_branch.span;

        let else_branch = if self.eat(TokenKind::Else).is_some() {
            if self.at(TokenKind::If) {
                let nested = self.parse_if_statement()?;
                end_span = nested.span;
                Some(ElseClause::If(Box::new(nested)))
            } else {
                let block = self.parse_block()?;
                end_span = block.span;
                Some(ElseClause::Block(block))
            }
        } else {
            None
        };

        Some(IfStmt {
            cond,
            then_branch,
            else_branch,
            span: if_tok.span.join(end_span),
        })
    }

    /// `WhileStmt = 'while' Expr Block`
    fn parse_while_statement(&mut self) -> Option<WhileStmt> {
        let while_tok = self.expect(TokenKind::While, "'while'")?;
        let cond = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = while_tok.span.join(body.span);
        Some(WhileStmt { cond, body, span })
    }

    /// `ForStmt = 'for' [Init] ';' [Expr] ';' [Expr] Block`
    ///
    /// All three header slots are optional; the initializer may be a
    /// variable declaration or an expression.
    fn parse_for_statement(&mut self) -> Option<ForStmt> {
        let for_tok = self.expect(TokenKind::For, "'for'")?;

        let init = if self.at(TokenKind::Semicolon) {
            None
        } else {
            let stmt = if self.at(TokenKind::Const)
                || (self.at(TokenKind::Identifier) && self.peek(1).kind == TokenKind::Colon)
            {
                Stmt::Var(Box::new(self.parse_variable_declaration()?))
            } else {
                Stmt::Expr(self.parse_expression()?)
            };
            Some(Box::new(stmt))
        };
        self.expect_after_prev(TokenKind::Semicolon, "';' after for-loop initializer")?;

        let cond = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_after_prev(TokenKind::Semicolon, "';' after for-loop condition")?;

        let post = if self.at(TokenKind::LBrace) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let body = self.parse_block()?;
        let span = for_tok.span.join(body.span);

        Some(ForStmt {
            init,
            cond,
            post,
            body,
            span,
        })
    }

    /// `ReturnStmt = 'return' [Expr] ';'`
    fn parse_return_statement(&mut self) -> Option<ReturnStmt> {
        let return_tok = self.expect(TokenKind::Return, "'return'")?;

        let value = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let semi =
            self.expect_after_prev(TokenKind::Semicolon, "';' after return statement")?;
        let span = return_tok.span.join(semi.span);
        Some(ReturnStmt { value, span })
    }

    /// `ExprStmt = Expr ';'`
    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let expr = self.parse_expression()?;
        self.expect_after_prev(TokenKind::Semicolon, "';' at end of expression statement")?;
        Some(Stmt::Expr(expr))
    }
}
