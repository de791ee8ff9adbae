//! A Pratt (top-down operator precedence) parser (spec §4.2): each prefix
//! position dispatches on the current token, each infix position dispatches
//! on the peek token's [`Precedence`], and `parse_expression` climbs the
//! precedence ladder by recursing with a tighter minimum precedence.

use emberc_ast::{
    ArrayLiteral, Block, BooleanLiteral, CallExpr, Expr, ExpressionStatement, FunctionLiteral,
    HashLiteral, Identifier, IfExpr, IndexExpr, InfixExpr, IntegerLiteral, LetStatement, Node,
    PrefixExpr, Program, ReturnStatement, Statement, StringLiteral,
};
use emberc_lex::{Lexer, Token, TokenWithSpan};
use emberc_util::{Diagnostic, Handler};

use crate::error::ParseError;
use crate::precedence::{precedence_of, Precedence};

pub struct Parser<'a> {
    tokens: Vec<TokenWithSpan>,
    pos: usize,
    handler: &'a mut Handler,
}

impl<'a> Parser<'a> {
    pub fn new(source: &str, handler: &'a mut Handler) -> Self {
        let tokens = {
            let mut lexer = Lexer::new(source, &mut *handler);
            let mut tokens = Vec::new();
            loop {
                let tok = lexer.next_token_spanned();
                let done = tok.token == Token::Eof;
                tokens.push(tok);
                if done {
                    break;
                }
            }
            tokens
        };
        Self { tokens, pos: 0, handler }
    }

    /// Parses the whole token stream. Parse errors are pushed onto the
    /// shared [`Handler`] and the offending statement is skipped rather
    /// than aborting the whole parse (spec §4.2: the parser recovers and
    /// keeps going wherever the grammar allows it).
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur_is(&Token::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        Program { statements }
    }

    fn cur(&self) -> &TokenWithSpan {
        &self.tokens[self.pos]
    }

    fn peek(&self) -> &TokenWithSpan {
        self.tokens.get(self.pos + 1).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn cur_is(&self, token: &Token) -> bool {
        &self.cur().token == token
    }

    fn peek_is(&self, token: &Token) -> bool {
        &self.peek().token == token
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Advances past `expected` if the peek token matches, reporting a
    /// diagnostic and returning `false` otherwise.
    fn expect_peek(&mut self, expected: &Token) -> bool {
        if self.peek_is(expected) {
            self.advance();
            true
        } else {
            self.error(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.peek().token.to_string(),
            });
            false
        }
    }

    fn error(&mut self, err: ParseError) {
        self.handler.report(Diagnostic::error(err.to_string(), self.cur().span));
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(&self.peek().token)
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(&self.cur().token)
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match &self.cur().token {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let start = self.cur().span;

        let name_span = self.peek().span;
        let name = match &self.peek().token {
            Token::Ident(sym) => {
                let name = Identifier { name: *sym, span: name_span };
                self.advance();
                name
            }
            _ => {
                self.error(ParseError::UnexpectedToken {
                    expected: "an identifier".to_string(),
                    found: self.peek().token.to_string(),
                });
                return None;
            }
        };

        if !self.expect_peek(&Token::Assign) {
            return None;
        }
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(&Token::Semicolon) {
            self.advance();
        }

        Some(Statement::Let(LetStatement {
            name,
            value,
            span: start.to(self.cur().span),
        }))
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let start = self.cur().span;
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(&Token::Semicolon) {
            self.advance();
        }

        Some(Statement::Return(ReturnStatement {
            value,
            span: start.to(self.cur().span),
        }))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let start = self.cur().span;
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(&Token::Semicolon) {
            self.advance();
        }

        Some(Statement::Expression(ExpressionStatement {
            expr,
            span: start.to(self.cur().span),
        }))
    }

    fn parse_block(&mut self) -> Block {
        let start = self.cur().span;
        self.advance(); // consume `{`

        let mut statements = Vec::new();
        while !self.cur_is(&Token::RBrace) && !self.cur_is(&Token::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }

        Block { statements, span: start.to(self.cur().span) }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(&Token::Semicolon) && precedence < self.peek_precedence() {
            self.advance();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        match &self.cur().token {
            Token::Ident(sym) => Some(Expr::Identifier(Identifier { name: *sym, span: self.cur().span })),
            Token::Int(value) => Some(Expr::IntegerLiteral(IntegerLiteral { value: *value, span: self.cur().span })),
            Token::Str(sym) => Some(Expr::StringLiteral(StringLiteral { value: *sym, span: self.cur().span })),
            Token::True => Some(Expr::BooleanLiteral(BooleanLiteral { value: true, span: self.cur().span })),
            Token::False => Some(Expr::BooleanLiteral(BooleanLiteral { value: false, span: self.cur().span })),
            Token::Bang | Token::Minus => self.parse_prefix_expr(),
            Token::LParen => self.parse_grouped_expr(),
            Token::If => self.parse_if_expr(),
            Token::Function => self.parse_function_literal(),
            Token::LBracket => self.parse_array_literal(),
            Token::LBrace => self.parse_hash_literal(),
            other => {
                self.error(ParseError::NoPrefixParseFn(other.to_string()));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        match self.cur().token {
            Token::LParen => self.parse_call_expr(left),
            Token::LBracket => self.parse_index_expr(left),
            _ => self.parse_infix_expr(left),
        }
    }

    fn parse_prefix_expr(&mut self) -> Option<Expr> {
        let start = self.cur().span;
        let operator = self.cur().token.to_string();
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix(PrefixExpr {
            operator,
            right: Box::new(right),
            span: start.to(self.cur().span),
        }))
    }

    fn parse_infix_expr(&mut self, left: Expr) -> Option<Expr> {
        let start = left.span();
        let operator = self.cur().token.to_string();
        let precedence = self.cur_precedence();
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix(InfixExpr {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            span: start.to(self.cur().span),
        }))
    }

    fn parse_grouped_expr(&mut self) -> Option<Expr> {
        self.advance(); // consume `(`
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&Token::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expr(&mut self) -> Option<Expr> {
        let start = self.cur().span;

        if !self.expect_peek(&Token::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(&Token::RParen) {
            return None;
        }
        if !self.expect_peek(&Token::LBrace) {
            return None;
        }
        let consequence = self.parse_block();

        let alternative = if self.peek_is(&Token::Else) {
            self.advance();
            if !self.expect_peek(&Token::LBrace) {
                return None;
            }
            Some(self.parse_block())
        } else {
            None
        };

        let end = alternative.as_ref().map(|b| b.span()).unwrap_or_else(|| consequence.span());
        Some(Expr::If(IfExpr {
            condition: Box::new(condition),
            consequence,
            alternative,
            span: start.to(end),
        }))
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let start = self.cur().span;

        if !self.expect_peek(&Token::LParen) {
            return None;
        }
        let params = self.parse_function_params()?;

        if !self.expect_peek(&Token::LBrace) {
            return None;
        }
        let body = self.parse_block();

        Some(Expr::FunctionLiteral(FunctionLiteral {
            params,
            span: start.to(body.span),
            body,
        }))
    }

    fn parse_function_params(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();

        if self.peek_is(&Token::RParen) {
            self.advance();
            return Some(params);
        }

        self.advance();
        params.push(self.parse_ident_param()?);

        while self.peek_is(&Token::Comma) {
            self.advance();
            self.advance();
            params.push(self.parse_ident_param()?);
        }

        if !self.expect_peek(&Token::RParen) {
            return None;
        }

        Some(params)
    }

    fn parse_ident_param(&mut self) -> Option<Identifier> {
        match &self.cur().token {
            Token::Ident(sym) => Some(Identifier { name: *sym, span: self.cur().span }),
            _ => {
                self.error(ParseError::UnexpectedToken {
                    expected: "an identifier".to_string(),
                    found: self.cur().token.to_string(),
                });
                None
            }
        }
    }

    fn parse_call_expr(&mut self, function: Expr) -> Option<Expr> {
        let start = function.span();
        let args = self.parse_expression_list(&Token::RParen)?;
        Some(Expr::Call(CallExpr {
            function: Box::new(function),
            args,
            span: start.to(self.cur().span),
        }))
    }

    fn parse_index_expr(&mut self, left: Expr) -> Option<Expr> {
        let start = left.span();
        self.advance(); // consume `[`
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&Token::RBracket) {
            return None;
        }
        Some(Expr::Index(IndexExpr {
            left: Box::new(left),
            index: Box::new(index),
            span: start.to(self.cur().span),
        }))
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let start = self.cur().span;
        let elements = self.parse_expression_list(&Token::RBracket)?;
        Some(Expr::ArrayLiteral(ArrayLiteral { elements, span: start.to(self.cur().span) }))
    }

    /// Parses a comma-separated expression list terminated by `end`,
    /// consuming both delimiters. Used for call arguments and array
    /// literals — the only two spots in the grammar with this shape.
    fn parse_expression_list(&mut self, end: &Token) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(&Token::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let start = self.cur().span;
        let mut pairs = Vec::new();

        while !self.peek_is(&Token::RBrace) {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(&Token::Colon) {
                return None;
            }
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if !self.peek_is(&Token::RBrace) && !self.expect_peek(&Token::Comma) {
                return None;
            }
        }

        if !self.expect_peek(&Token::RBrace) {
            return None;
        }

        Some(Expr::HashLiteral(HashLiteral { pairs, span: start.to(self.cur().span) }))
    }
}
