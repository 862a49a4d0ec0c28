use std::collections::HashMap;

use crate::ast::{Block, Expression, Infix, Prefix, Program, Statement};
use crate::lexer::Lexer;
use crate::token::{precedence_of, Precedence, Token, TokenKind};
use anyhow::{anyhow, Result};

type PrefixFn = fn(&mut Parser) -> Result<Expression>;
type InfixFn = fn(&mut Parser, Expression) -> Result<Expression>;

/// Pratt parser over the token stream. Handlers are registered per token
/// kind at construction and read-only afterwards; parse errors accumulate
/// in a list while parsing continues with the next statement.
pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,

    prefix_fns: HashMap<TokenKind, PrefixFn>,
    infix_fns: HashMap<TokenKind, InfixFn>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        let mut parser = Parser {
            lexer,
            cur_token: Token::new(TokenKind::Eof, ""),
            peek_token: Token::new(TokenKind::Eof, ""),
            errors: vec![],
            prefix_fns: HashMap::new(),
            infix_fns: HashMap::new(),
        };

        parser.register_prefix(TokenKind::Ident, Self::parse_identifier);
        parser.register_prefix(TokenKind::Int, Self::parse_integer_literal);
        parser.register_prefix(TokenKind::String, Self::parse_string_literal);
        parser.register_prefix(TokenKind::True, Self::parse_boolean);
        parser.register_prefix(TokenKind::False, Self::parse_boolean);
        parser.register_prefix(TokenKind::Sub, Self::parse_prefix_expression);
        parser.register_prefix(TokenKind::Not, Self::parse_prefix_expression);
        parser.register_prefix(TokenKind::Lparen, Self::parse_grouped_expression);
        parser.register_prefix(TokenKind::If, Self::parse_if_expression);
        parser.register_prefix(TokenKind::Func, Self::parse_func_literal);
        parser.register_prefix(TokenKind::Lbrack, Self::parse_array_literal);
        parser.register_prefix(TokenKind::Lbrace, Self::parse_map_literal);
        parser.register_prefix(TokenKind::Macro, Self::parse_macro_literal);

        parser.register_infix(TokenKind::Add, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Sub, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Mul, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Quo, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Rem, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Lss, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Gtr, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Leq, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Geq, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Eql, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Neq, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Assign, Self::parse_infix_expression);
        parser.register_infix(TokenKind::Lparen, Self::parse_call_expression);
        parser.register_infix(TokenKind::Lbrack, Self::parse_index_expression);

        parser.next_token();
        parser.next_token();

        parser
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn register_prefix(&mut self, kind: TokenKind, handler: PrefixFn) {
        self.prefix_fns.insert(kind, handler);
    }

    fn register_infix(&mut self, kind: TokenKind, handler: InfixFn) {
        self.infix_fns.insert(kind, handler);
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advances over the expected peek token or fails with the canonical
    /// missing-token message.
    fn expect_peek(&mut self, kind: TokenKind) -> Result<()> {
        if self.peek_is(kind) {
            self.next_token();
            Ok(())
        } else {
            Err(anyhow!(
                "expected token {:?}, got {:?}",
                kind,
                self.peek_token.kind
            ))
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program: Program = vec![];

        while !self.cur_is(TokenKind::Eof) {
            // Semicolons only separate statements.
            if self.cur_is(TokenKind::Semicolon) {
                self.next_token();
                continue;
            }
            match self.parse_statement() {
                Ok(statement) => program.push(statement),
                Err(error) => self.errors.push(error.to_string()),
            }
            self.next_token();
        }

        program
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.cur_token.kind {
            TokenKind::Var => self.parse_var_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_var_statement(&mut self) -> Result<Statement> {
        self.expect_peek(TokenKind::Ident)?;
        let name = self.cur_token.lexeme.clone();

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        Ok(Statement::Var(name, value))
    }

    fn parse_return_statement(&mut self) -> Result<Statement> {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        Ok(Statement::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;

        Ok(Statement::ExpressionStmt(expr))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression> {
        let prefix = match self.prefix_fns.get(&self.cur_token.kind) {
            Some(handler) => *handler,
            None => {
                return Err(anyhow!(
                    "no prefix parse function for {:?} found",
                    self.cur_token.kind
                ))
            }
        };
        let mut left = prefix(self)?;

        while precedence < precedence_of(self.peek_token.kind) {
            let infix = match self.infix_fns.get(&self.peek_token.kind) {
                Some(handler) => *handler,
                None => return Ok(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn parse_identifier(&mut self) -> Result<Expression> {
        Ok(Expression::Ident(self.cur_token.lexeme.clone()))
    }

    fn parse_integer_literal(&mut self) -> Result<Expression> {
        match self.cur_token.lexeme.parse::<i64>() {
            Ok(value) => Ok(Expression::IntLiteral(value)),
            Err(_) => Err(anyhow!(
                "could not parse {} as integer",
                self.cur_token.lexeme
            )),
        }
    }

    fn parse_string_literal(&mut self) -> Result<Expression> {
        Ok(Expression::StringLiteral(self.cur_token.lexeme.clone()))
    }

    fn parse_boolean(&mut self) -> Result<Expression> {
        Ok(Expression::Boolean(self.cur_is(TokenKind::True)))
    }

    fn parse_prefix_expression(&mut self) -> Result<Expression> {
        let op = match self.cur_token.kind {
            TokenKind::Sub => Prefix::Minus,
            TokenKind::Not => Prefix::Bang,
            _ => unreachable!(),
        };
        self.next_token();

        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::PrefixExpr(op, Box::from(right)))
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::Rparen)?;

        Ok(expression)
    }

    fn parse_if_expression(&mut self) -> Result<Expression> {
        self.expect_peek(TokenKind::Lparen)?;
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::Rparen)?;
        self.expect_peek(TokenKind::Lbrace)?;

        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::Lbrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expression::IfExpr(
            Box::from(condition),
            consequence,
            alternative,
        ))
    }

    fn parse_func_literal(&mut self) -> Result<Expression> {
        self.expect_peek(TokenKind::Ident)?;
        let name = self.cur_token.lexeme.clone();

        self.expect_peek(TokenKind::Lparen)?;
        let parameters = self.parse_parameters()?;

        self.expect_peek(TokenKind::Lbrace)?;
        let body = self.parse_block_statement()?;

        Ok(Expression::FuncLiteral(name, parameters, body))
    }

    fn parse_macro_literal(&mut self) -> Result<Expression> {
        self.expect_peek(TokenKind::Ident)?;
        let name = self.cur_token.lexeme.clone();

        self.expect_peek(TokenKind::Lparen)?;
        let parameters = self.parse_parameters()?;

        self.expect_peek(TokenKind::Lbrace)?;
        let body = self.parse_block_statement()?;

        Ok(Expression::MacroLiteral(name, parameters, body))
    }

    fn parse_parameters(&mut self) -> Result<Vec<String>> {
        let mut parameters = vec![];

        if self.peek_is(TokenKind::Rparen) {
            self.next_token();
            return Ok(parameters);
        }

        self.expect_peek(TokenKind::Ident)?;
        parameters.push(self.cur_token.lexeme.clone());

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            parameters.push(self.cur_token.lexeme.clone());
        }

        self.expect_peek(TokenKind::Rparen)?;

        Ok(parameters)
    }

    // Entered with the opening brace current; leaves the closing brace
    // current.
    fn parse_block_statement(&mut self) -> Result<Block> {
        self.next_token();

        let mut statements = vec![];
        while !self.cur_is(TokenKind::Rbrace) && !self.cur_is(TokenKind::Eof) {
            if self.cur_is(TokenKind::Semicolon) {
                self.next_token();
                continue;
            }
            statements.push(self.parse_statement()?);
            self.next_token();
        }

        Ok(statements)
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        let elements = self.parse_expression_list(TokenKind::Rbrack)?;

        Ok(Expression::ArrayLiteral(elements))
    }

    fn parse_map_literal(&mut self) -> Result<Expression> {
        let mut pairs = vec![];

        while !self.peek_is(TokenKind::Rbrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            self.expect_peek(TokenKind::Colon)?;
            self.next_token();

            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenKind::Rbrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }

        self.expect_peek(TokenKind::Rbrace)?;

        Ok(Expression::MapLiteral(pairs))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Result<Expression> {
        let op = match self.cur_token.kind {
            TokenKind::Add => Infix::Plus,
            TokenKind::Sub => Infix::Minus,
            TokenKind::Mul => Infix::Asterisk,
            TokenKind::Quo => Infix::Slash,
            TokenKind::Rem => Infix::Percent,
            TokenKind::Lss => Infix::Lt,
            TokenKind::Gtr => Infix::Gt,
            TokenKind::Leq => Infix::Leq,
            TokenKind::Geq => Infix::Geq,
            TokenKind::Eql => Infix::Eq,
            TokenKind::Neq => Infix::Neq,
            TokenKind::Assign => Infix::Assign,
            _ => unreachable!(),
        };
        let precedence = precedence_of(self.cur_token.kind);
        self.next_token();

        let right = self.parse_expression(precedence)?;

        Ok(Expression::InfixExpr(op, Box::from(left), Box::from(right)))
    }

    fn parse_call_expression(&mut self, callee: Expression) -> Result<Expression> {
        let arguments = self.parse_expression_list(TokenKind::Rparen)?;

        Ok(Expression::Call(Box::from(callee), arguments))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Result<Expression> {
        self.next_token();

        let index = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::Rbrack)?;

        Ok(Expression::IndexExpr(Box::from(left), Box::from(index)))
    }

    // Shared by array literals and call arguments.
    fn parse_expression_list(&mut self, end: TokenKind) -> Result<Vec<Expression>> {
        let mut result = vec![];

        if self.peek_is(end) {
            self.next_token();
            return Ok(result);
        }

        self.next_token();
        result.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            result.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;

        Ok(result)
    }
}
