use crate::ast::{BinaryOperator, Expression, Program, Statement, UnaryOperator};
use crate::token::{Token, TokenKind};

mod error;

pub use error::{ParseError, ParseResult};

/// Recursive-descent parser over a lexed token sequence.
///
/// Each expression method handles one precedence tier and calls into the
/// next-higher one for its operands; binary tiers fold left-to-right.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            if matches!(self.current_kind(), TokenKind::Newline) {
                self.advance();
                continue;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current_kind() {
            TokenKind::Print => self.parse_print(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            // Assignment needs one token of lookahead: a bare identifier is
            // otherwise an expression statement.
            TokenKind::Identifier(_) if matches!(self.peek_kind(), TokenKind::Assign) => {
                self.parse_assignment()
            }
            _ => Ok(Statement::Expr(self.parse_expression()?)),
        }
    }

    fn parse_print(&mut self) -> ParseResult<Statement> {
        self.advance(); // print
        self.expect_lparen()?;

        let mut arguments = Vec::new();
        if !matches!(self.current_kind(), TokenKind::RParen) {
            arguments.push(self.parse_expression()?);
            while matches!(self.current_kind(), TokenKind::Comma) {
                self.advance();
                arguments.push(self.parse_expression()?);
            }
        }

        self.expect_rparen()?;
        Ok(Statement::Print { arguments })
    }

    fn parse_assignment(&mut self) -> ParseResult<Statement> {
        let name = self.expect_identifier()?;
        self.expect_assign()?;
        let value = self.parse_expression()?;
        Ok(Statement::Assign { name, value })
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.advance(); // if
        let condition = self.parse_expression()?;
        self.expect_colon()?;
        let then_body = vec![self.parse_statement()?];

        // An `else` may sit on the next line.
        self.consume_newlines();
        let else_body = if matches!(self.current_kind(), TokenKind::Else) {
            self.advance();
            self.expect_colon()?;
            Some(vec![self.parse_statement()?])
        } else {
            None
        };

        Ok(Statement::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        self.advance(); // while
        let condition = self.parse_expression()?;
        self.expect_colon()?;
        let body = vec![self.parse_statement()?];
        Ok(Statement::While { condition, body })
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Greater => BinaryOperator::GreaterThan,
                TokenKind::Less => BinaryOperator::LessThan,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_additive(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinaryOperator::Mul,
                TokenKind::Slash => BinaryOperator::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let op = match self.current_kind() {
            TokenKind::Minus => UnaryOperator::Negate,
            TokenKind::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expression::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        match self.current_kind().clone() {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expression::Number(value))
            }
            TokenKind::String(value) => {
                self.advance();
                Ok(Expression::Str(value))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expression::Identifier(name))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen()?;
                Ok(expr)
            }
            _ => Err(self.error("number, string, identifier, or '('")),
        }
    }

    fn consume_newlines(&mut self) {
        while matches!(self.current_kind(), TokenKind::Newline) {
            self.advance();
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error("identifier"))
        }
    }

    fn expect_assign(&mut self) -> ParseResult<()> {
        if matches!(self.current_kind(), TokenKind::Assign) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("'='"))
        }
    }

    fn expect_colon(&mut self) -> ParseResult<()> {
        if matches!(self.current_kind(), TokenKind::Colon) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("':'"))
        }
    }

    fn expect_lparen(&mut self) -> ParseResult<()> {
        if matches!(self.current_kind(), TokenKind::LParen) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("'('"))
        }
    }

    fn expect_rparen(&mut self) -> ParseResult<()> {
        if matches!(self.current_kind(), TokenKind::RParen) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("')'"))
        }
    }

    fn at_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::EOF)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_kind(&self) -> &TokenKind {
        // Clamped to the trailing EOF token.
        let pos = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[pos].kind
    }

    fn advance(&mut self) {
        // Never steps past the EOF sentinel.
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        let current = self.current();
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: format!("{:?}", current.kind),
            line: current.span.line,
            column: current.span.column,
        }
    }
}

/// Parses a token sequence (as produced by [`crate::lexer::tokenize`]) into
/// a program. Empty input parses to an empty program.
pub fn parse(tokens: Vec<Token>) -> ParseResult<Program> {
    if tokens.is_empty() {
        return Ok(Program {
            statements: Vec::new(),
        });
    }
    Parser::new(tokens).parse_program()
}
