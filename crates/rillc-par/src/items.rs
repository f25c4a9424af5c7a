//! Top-level declarations: functions and variables.

use rillc_lex::TokenKind;

use crate::ast::{Decl, FnDecl, Param, VarDecl};
use crate::Parser;

impl<'a, 'src> Parser<'a, 'src> {
    /// `TopDecl = FunctionDecl | VariableDecl ';'`
    pub(crate) fn parse_declaration(&mut self) -> Option<Decl> {
        match self.current().kind {
            TokenKind::Fn => self.parse_function_declaration().map(Decl::Fn),
            TokenKind::Const | TokenKind::Identifier => {
                self.parse_var_decl_stmt().map(Decl::Var)
            }
            _ => {
                self.unexpected("function or variable declaration");
                None
            }
        }
    }

    /// `VariableDecl ';'` - the statement form, semicolon included.
    pub(crate) fn parse_var_decl_stmt(&mut self) -> Option<VarDecl> {
        let mut decl = self.parse_variable_declaration()?;
        let semi =
            self.expect_after_prev(TokenKind::Semicolon, "';' after variable declaration")?;
        decl.span = decl.span.join(semi.span);
        Some(decl)
    }

    /// `VariableDecl = ['const'] Identifier ':' Type ['=' (Expr | InitList)]`
    pub(crate) fn parse_variable_declaration(&mut self) -> Option<VarDecl> {
        let const_tok = self.eat(TokenKind::Const);

        let name_tok = self.expect(TokenKind::Identifier, "identifier in variable declaration")?;
        let Some(name) = name_tok.name() else {
            self.unexpected("identifier in variable declaration");
            return None;
        };

        let start_span = const_tok.map(|t| t.span).unwrap_or(name_tok.span);

        self.expect(TokenKind::Colon, "':' after variable name")?;
        let ty = self.parse_type()?;
        let mut span = start_span.join(ty.span);

        let init = if self.eat(TokenKind::Assign).is_some() {
            let value = if self.at(TokenKind::LBrace) {
                self.parse_initializer_list()?
            } else {
                self.parse_expression()?
            };
            span = start_span.join(value.span);
            Some(value)
        } else {
            None
        };

        Some(VarDecl {
            name,
            is_const: const_tok.is_some(),
            ty,
            init,
            span,
            sem_ty: None,
        })
    }

    /// `FunctionDecl = 'fn' Identifier '(' [Param {',' Param}] ')' ['->' Type] Block`
    pub(crate) fn parse_function_declaration(&mut self) -> Option<FnDecl> {
        let fn_tok = self.expect(TokenKind::Fn, "'fn'")?;

        let name_tok = self.expect(TokenKind::Identifier, "function name")?;
        let Some(name) = name_tok.name() else {
            self.unexpected("function name");
            return None;
        };

        self.expect(TokenKind::LParen, "'(' after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen, "')' after function parameters")?;

        let ret = if self.eat(TokenKind::Arrow).is_some() {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;
        let span = fn_tok.span.join(body.span);

        Some(FnDecl {
            name,
            params,
            ret,
            body,
            span,
            sem_ty: None,
        })
    }

    /// `Param {',' Param}` with the caller handling both parentheses.
    fn parse_parameter_list(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.at(TokenKind::RParen) {
            return Some(params);
        }
        loop {
            let name_tok = self.expect(TokenKind::Identifier, "parameter name")?;
            self.expect(TokenKind::Colon, "':' after parameter name")?;
            let ty = self.parse_type()?;
            let span = name_tok.span.join(ty.span);
            params.push(Param {
                name: name_tok.name(),
                ty,
                span,
                sem_ty: None,
            });

            if self.at(TokenKind::RParen) {
                break;
            }
            self.expect(TokenKind::Comma, "',' or ')' after parameter")?;
        }
        Some(params)
    }
}
