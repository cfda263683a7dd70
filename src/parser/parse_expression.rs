use super::ast::*;
use super::Parser;
use crate::error::{ParseError, ParseErrorKind};
use crate::expect;
use crate::table::OperatorTable;
use crate::token::TokenType;

impl<I: Iterator<Item = char>> Parser<I> {
    // <expression> ::= <unary> (<binary-operator> <unary>)*
    pub fn parse_expression(&mut self, operators: &OperatorTable) -> Result<Expression, ParseError> {
        let left = self.parse_unary(operators)?;
        self.parse_binary_rhs(operators, 0, left)
    }

    // The precedence of the current token, or -1 if it is not a binary operator
    fn current_precedence(&self, operators: &OperatorTable) -> i32 {
        match *self.peek_type() {
            TokenType::Char(op) => operators.precedence(op),
            _ => -1,
        }
    }

    // Precedence climbing: consumes operators binding at least as tight as min_precedence
    // A tighter operator after the right operand first absorbs that operand
    fn parse_binary_rhs(
        &mut self,
        operators: &OperatorTable,
        min_precedence: i32,
        left: Expression,
    ) -> Result<Expression, ParseError> {
        let mut left = left;
        loop {
            let precedence = self.current_precedence(operators);
            if precedence < min_precedence {
                return Ok(left);
            }
            let op = match *self.peek_type() {
                TokenType::Char(op) => op,
                _ => return Ok(left),
            };
            self.next();

            let mut right = self.parse_unary(operators)?;
            let next_precedence = self.current_precedence(operators);
            if precedence < next_precedence {
                log::trace!(
                    "{} ({}) yields to a tighter operator ({})",
                    op,
                    precedence,
                    next_precedence
                );
                right = self.parse_binary_rhs(operators, precedence + 1, right)?;
            }

            left = match op {
                '=' => Expression::Assign(Box::new(left), Box::new(right)),
                _ => Expression::Binary(op, Box::new(left), Box::new(right)),
            };
        }
    }

    // <unary> ::= <primary> | <operator-character> <unary>
    fn parse_unary(&mut self, operators: &OperatorTable) -> Result<Expression, ParseError> {
        match *self.peek_type() {
            TokenType::Char(op) if op.is_ascii() && op != '(' && op != ',' => {
                self.next();
                let operand = self.parse_unary(operators)?;
                Ok(Expression::Unary(op, Box::new(operand)))
            }
            _ => self.parse_primary(operators),
        }
    }

    // <primary> ::= <identifier-expression> | number | <parenthesized-expression>
    //             | <if-expression> | <for-expression> | <var-expression>
    fn parse_primary(&mut self, operators: &OperatorTable) -> Result<Expression, ParseError> {
        match *self.peek_type() {
            TokenType::Ident(_) => self.parse_identifier_expression(operators),
            TokenType::Number(value) => {
                self.next();
                Ok(Expression::Number(value))
            }
            TokenType::Char('(') => self.parse_parenthesized(operators),
            TokenType::If => self.parse_if(operators),
            TokenType::For => self.parse_for(operators),
            TokenType::Var => self.parse_var(operators),
            _ => Err(ParseError::new(
                self.peek_span(),
                ParseErrorKind::ExpectedExpression(self.peek().to_string()),
            )),
        }
    }

    // <parenthesized-expression> ::= '(' <expression> ')'
    fn parse_parenthesized(&mut self, operators: &OperatorTable) -> Result<Expression, ParseError> {
        self.next();
        let expression = self.parse_expression(operators)?;
        expect!(self, TokenType::Char(')'), "')'")?;
        Ok(expression)
    }

    // <identifier-expression> ::= identifier | identifier '(' (<expression> (',' <expression>)*)? ')'
    fn parse_identifier_expression(
        &mut self,
        operators: &OperatorTable,
    ) -> Result<Expression, ParseError> {
        let name = self.expect_identifier("identifier")?;
        if !matches!(self.peek_type(), TokenType::Char('(')) {
            return Ok(Expression::Variable(name));
        }
        self.next();

        let mut arguments = Vec::new();
        if !matches!(self.peek_type(), TokenType::Char(')')) {
            loop {
                arguments.push(self.parse_expression(operators)?);
                if matches!(self.peek_type(), TokenType::Char(')')) {
                    break;
                }
                expect!(self, TokenType::Char(','), "')' or ',' in argument list")?;
            }
        }
        self.next();

        Ok(Expression::Call(name, arguments))
    }

    // <if-expression> ::= 'if' <expression> 'then' <expression> 'else' <expression>
    fn parse_if(&mut self, operators: &OperatorTable) -> Result<Expression, ParseError> {
        self.next();
        let condition = self.parse_expression(operators)?;
        expect!(self, TokenType::Then, "'then'")?;
        let then = self.parse_expression(operators)?;
        expect!(self, TokenType::Else, "'else'")?;
        let otherwise = self.parse_expression(operators)?;
        Ok(Expression::If {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    // <for-expression> ::= 'for' identifier '=' <expression> ',' <expression> (',' <expression>)?
    //                      'in' <expression>
    fn parse_for(&mut self, operators: &OperatorTable) -> Result<Expression, ParseError> {
        self.next();
        let variable = self.expect_identifier("identifier after 'for'")?;
        expect!(self, TokenType::Char('='), "'=' after 'for'")?;
        let init = self.parse_expression(operators)?;
        expect!(self, TokenType::Char(','), "',' after for start value")?;
        let condition = self.parse_expression(operators)?;

        // The step value is optional
        let step = if matches!(self.peek_type(), TokenType::Char(',')) {
            self.next();
            Some(Box::new(self.parse_expression(operators)?))
        } else {
            None
        };

        expect!(self, TokenType::In, "'in' after 'for'")?;
        let body = self.parse_expression(operators)?;
        Ok(Expression::For {
            variable,
            init: Box::new(init),
            condition: Box::new(condition),
            step,
            body: Box::new(body),
        })
    }

    // <var-expression> ::= 'var' identifier ('=' <expression>)? (',' identifier ('=' <expression>)?)*
    //                      'in' <expression>
    fn parse_var(&mut self, operators: &OperatorTable) -> Result<Expression, ParseError> {
        self.next();
        let mut bindings = Vec::new();
        let mut name = self.expect_identifier("identifier after 'var'")?;
        loop {
            let init = if matches!(self.peek_type(), TokenType::Char('=')) {
                self.next();
                Some(self.parse_expression(operators)?)
            } else {
                None
            };
            bindings.push((name, init));

            if !matches!(self.peek_type(), TokenType::Char(',')) {
                break;
            }
            self.next();
            name = self.expect_identifier("identifier list after 'var'")?;
        }

        expect!(self, TokenType::In, "'in' after 'var'")?;
        let body = self.parse_expression(operators)?;
        Ok(Expression::Var {
            bindings,
            body: Box::new(body),
        })
    }
}
