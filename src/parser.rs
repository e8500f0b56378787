//! Pratt (precedence-climbing) parser.
//!
//! Expression parsing is driven by two dispatch tables keyed by token kind:
//! prefix rules start an expression, infix rules extend one while the next
//! operator binds tighter than the current precedence. Failures are recorded
//! as messages on the parser and the failed statement is skipped; parsing
//! resumes at the next top-level statement.

use std::collections::HashMap;

use crate::ast::{Block, Expr, Ident, Program, Stmt};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::trace::Tracer;

/// Binding strength of operators, weakest first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
enum Precedence {
    Lowest,
    /// `==` `!=`
    Equals,
    /// `<` `>`
    LessGreater,
    /// `+` `-`
    Sum,
    /// `*` `/`
    Product,
    /// `-x` `!x`
    Prefix,
    /// `f(x)`
    Call,
    /// `xs[i]`
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::Lparen => Precedence::Call,
        TokenKind::Lbracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

type PrefixFn = fn(&mut Parser) -> Option<Expr>;
type InfixFn = fn(&mut Parser, Expr) -> Option<Expr>;

#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,

    cur_token: Token,
    peek_token: Token,

    errors: Vec<String>,

    prefix_fns: HashMap<TokenKind, PrefixFn>,
    infix_fns: HashMap<TokenKind, InfixFn>,

    tracer: Tracer,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Parser {
        let mut parser = Parser {
            lexer,
            cur_token: Token::new(TokenKind::Eof, ""),
            peek_token: Token::new(TokenKind::Eof, ""),
            errors: vec![],
            prefix_fns: HashMap::new(),
            infix_fns: HashMap::new(),
            tracer: Tracer::from_env(),
        };

        parser.register_prefix(TokenKind::Ident, Parser::parse_identifier);
        parser.register_prefix(TokenKind::Int, Parser::parse_integer_literal);
        parser.register_prefix(TokenKind::Str, Parser::parse_string_literal);
        parser.register_prefix(TokenKind::Bang, Parser::parse_prefix_expression);
        parser.register_prefix(TokenKind::Minus, Parser::parse_prefix_expression);
        parser.register_prefix(TokenKind::True, Parser::parse_boolean);
        parser.register_prefix(TokenKind::False, Parser::parse_boolean);
        parser.register_prefix(TokenKind::Lparen, Parser::parse_grouped_expression);
        parser.register_prefix(TokenKind::If, Parser::parse_if_expression);
        parser.register_prefix(TokenKind::Function, Parser::parse_function_literal);
        parser.register_prefix(TokenKind::Lbracket, Parser::parse_array_literal);
        parser.register_prefix(TokenKind::Lbrace, Parser::parse_hash_literal);

        parser.register_infix(TokenKind::Plus, Parser::parse_infix_expression);
        parser.register_infix(TokenKind::Minus, Parser::parse_infix_expression);
        parser.register_infix(TokenKind::Slash, Parser::parse_infix_expression);
        parser.register_infix(TokenKind::Asterisk, Parser::parse_infix_expression);
        parser.register_infix(TokenKind::Eq, Parser::parse_infix_expression);
        parser.register_infix(TokenKind::NotEq, Parser::parse_infix_expression);
        parser.register_infix(TokenKind::Lt, Parser::parse_infix_expression);
        parser.register_infix(TokenKind::Gt, Parser::parse_infix_expression);
        parser.register_infix(TokenKind::Lparen, Parser::parse_call_expression);
        parser.register_infix(TokenKind::Lbracket, Parser::parse_index_expression);

        // Load cur_token and peek_token.
        parser.next_token();
        parser.next_token();

        parser
    }

    /// Messages recorded for every construct that failed to parse, in
    /// source order. A non-empty list means the returned program is
    /// incomplete and must not be evaluated.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program { statements: vec![] };

        while !self.cur_token_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }

        program
    }

    fn register_prefix(&mut self, kind: TokenKind, f: PrefixFn) {
        self.prefix_fns.insert(kind, f);
    }

    fn register_infix(&mut self, kind: TokenKind, f: InfixFn) {
        self.infix_fns.insert(kind, f);
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn cur_token_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advance if the peek token has the wanted kind, else record an error.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn peek_error(&mut self, wanted: TokenKind) {
        self.errors.push(format!(
            "expected next token to be \"{}\", got \"{}\" instead",
            wanted, self.peek_token.kind
        ));
    }

    fn no_prefix_parse_fn_error(&mut self, kind: TokenKind) {
        self.errors
            .push(format!("no prefix parse function for \"{}\" found", kind));
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(self.cur_token.kind)
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek_token.kind)
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        self.tracer.enter("parse_statement");
        let stmt = match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        };
        self.tracer.exit("parse_statement");
        stmt
    }

    fn parse_let_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Ident {
            token: self.cur_token.clone(),
            name: self.cur_token.literal.clone(),
        };

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Stmt::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Stmt::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Stmt::Expr { token, expr })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        self.tracer.enter("parse_expression");
        let expr = self.parse_expression_inner(precedence);
        self.tracer.exit("parse_expression");
        expr
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> Option<Expr> {
        let prefix = match self.prefix_fns.get(&self.cur_token.kind) {
            Some(f) => *f,
            None => {
                let kind = self.cur_token.kind;
                self.no_prefix_parse_fn_error(kind);
                return None;
            }
        };

        let mut left = prefix(self)?;

        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let infix = match self.infix_fns.get(&self.peek_token.kind) {
                Some(f) => *f,
                None => return Some(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expr> {
        Some(Expr::Ident(Ident {
            token: self.cur_token.clone(),
            name: self.cur_token.literal.clone(),
        }))
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expr::Int { token, value }),
            Err(_) => {
                self.errors
                    .push(format!("could not parse \"{}\" as integer", token.literal));
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let value = token.literal.clone();
        Some(Expr::Str { token, value })
    }

    fn parse_boolean(&mut self) -> Option<Expr> {
        Some(Expr::Bool {
            token: self.cur_token.clone(),
            value: self.cur_token_is(TokenKind::True),
        })
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();

        self.next_token();
        let right = Box::new(self.parse_expression(Precedence::Prefix)?);

        Some(Expr::Prefix {
            token,
            operator,
            right,
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        let precedence = self.cur_precedence();

        self.next_token();
        let right = Box::new(self.parse_expression(precedence)?);

        Some(Expr::Infix {
            token,
            operator,
            left: Box::new(left),
            right,
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();

        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }

        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        self.next_token();
        let condition = Box::new(self.parse_expression(Precedence::Lowest)?);

        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::Lbrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expr::If {
            token,
            condition,
            consequence,
            alternative,
        })
    }

    fn parse_block_statement(&mut self) -> Block {
        let token = self.cur_token.clone();
        let mut statements = vec![];

        self.next_token();
        while !self.cur_token_is(TokenKind::Rbrace) && !self.cur_token_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        Block { token, statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expr::Function {
            token,
            parameters,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Ident>> {
        let mut parameters = vec![];

        if self.peek_token_is(TokenKind::Rparen) {
            self.next_token();
            return Some(parameters);
        }

        self.next_token();
        parameters.push(Ident {
            token: self.cur_token.clone(),
            name: self.cur_token.literal.clone(),
        });

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            parameters.push(Ident {
                token: self.cur_token.clone(),
                name: self.cur_token.literal.clone(),
            });
        }

        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }

        Some(parameters)
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let elements = self.parse_expression_list(TokenKind::Rbracket)?;
        Some(Expr::Array { token, elements })
    }

    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let mut pairs = vec![];

        if self.peek_token_is(TokenKind::Rbrace) {
            self.next_token();
            return Some(Expr::Hash { token, pairs });
        }

        loop {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if self.peek_token_is(TokenKind::Rbrace) {
                break;
            }
            // A comma commits to another pair, so a trailing comma fails on
            // the next key.
            if !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::Rbrace) {
            return None;
        }

        Some(Expr::Hash { token, pairs })
    }

    fn parse_call_expression(&mut self, function: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let arguments = self.parse_expression_list(TokenKind::Rparen)?;
        Some(Expr::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();

        self.next_token();
        let index = Box::new(self.parse_expression(Precedence::Lowest)?);

        if !self.expect_peek(TokenKind::Rbracket) {
            return None;
        }

        Some(Expr::Index {
            token,
            left: Box::new(left),
            index,
        })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut list = vec![];

        if self.peek_token_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }
}
