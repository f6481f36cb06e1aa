//! Expression parsing implementation
//!
//! This module handles parsing of expressions with one recursive descent
//! function per precedence level.
//!
//! # Supported Expressions
//!
//! - Literals: integers, characters, strings
//! - Name references
//! - Binary operators: arithmetic, comparison, logical, bitwise, assignment
//! - Unary operators: `-`, `+`, `!`, `~`, `&`, `*`, `++`, `--`
//! - Postfix: `[]`, `()`, `++`, `--`
//! - Type casts: `(type)expr`
//! - `sizeof(type)`
//!
//! # Precedence
//!
//! Lowest to highest: assignment (right-associative), `||`, `&&`, `|`, `^`,
//! `&`, equality, relational, shift, additive, multiplicative, cast, unary,
//! postfix, primary.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_logical_or()?;

        let loc = self.current_location();
        let op = match self.peek() {
            TokenKind::Eq => BinOp::Assign,
            TokenKind::PlusEq => BinOp::AddAssign,
            TokenKind::MinusEq => BinOp::SubAssign,
            TokenKind::StarEq => BinOp::MulAssign,
            TokenKind::SlashEq => BinOp::DivAssign,
            TokenKind::PercentEq => BinOp::ModAssign,
            _ => return Ok(expr),
        };
        self.advance();

        let rhs = self.parse_assignment()?;
        Ok(self.binary(op, expr, rhs, loc))
    }

    fn binary(&mut self, op: BinOp, left: Expr, right: Expr, location: SourceLocation) -> Expr {
        self.make_expr(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        )
    }

    fn unary(&mut self, op: UnOp, operand: Expr, location: SourceLocation) -> Expr {
        self.make_expr(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            location,
        )
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&TokenKind::OrOr) {
            let loc = self.previous_location();
            let right = self.parse_logical_and()?;
            left = self.binary(BinOp::Or, left, right, loc);
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bitwise_or()?;

        while self.match_token(&TokenKind::AndAnd) {
            let loc = self.previous_location();
            let right = self.parse_bitwise_or()?;
            left = self.binary(BinOp::And, left, right, loc);
        }

        Ok(left)
    }

    /// Parse bitwise OR (|)
    fn parse_bitwise_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bitwise_xor()?;

        while self.match_token(&TokenKind::Pipe) {
            let loc = self.previous_location();
            let right = self.parse_bitwise_xor()?;
            left = self.binary(BinOp::BitOr, left, right, loc);
        }

        Ok(left)
    }

    /// Parse bitwise XOR (^)
    fn parse_bitwise_xor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bitwise_and()?;

        while self.match_token(&TokenKind::Caret) {
            let loc = self.previous_location();
            let right = self.parse_bitwise_and()?;
            left = self.binary(BinOp::BitXor, left, right, loc);
        }

        Ok(left)
    }

    /// Parse bitwise AND (&)
    fn parse_bitwise_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&TokenKind::Amp) {
            let loc = self.previous_location();
            let right = self.parse_equality()?;
            left = self.binary(BinOp::BitAnd, left, right, loc);
        }

        Ok(left)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::Ne,
                _ => break,
            };
            self.advance();

            let right = self.parse_relational()?;
            left = self.binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_shift()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Ge => BinOp::Ge,
                _ => break,
            };
            self.advance();

            let right = self.parse_shift()?;
            left = self.binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse bitwise shift (<< >>)
    fn parse_shift(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                TokenKind::LtLt => BinOp::BitShl,
                TokenKind::GtGt => BinOp::BitShr,
                _ => break,
            };
            self.advance();

            let right = self.parse_additive()?;
            left = self.binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();

            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_cast()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();

            let right = self.parse_cast()?;
            left = self.binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse cast: (type)expr
    fn parse_cast(&mut self) -> Result<Expr, ParseError> {
        // A cast is '(' immediately followed by a type keyword
        let is_cast = self.check(&TokenKind::LParen)
            && matches!(
                self.peek_ahead(1),
                Some(TokenKind::Int | TokenKind::Char | TokenKind::Void)
            );

        if is_cast {
            let loc = self.current_location();
            self.advance(); // consume '('
            let target = self.parse_type()?;
            self.expect_rparen("after cast type")?;
            let expr = self.parse_cast()?;

            return Ok(self.make_expr(
                ExprKind::Cast {
                    target,
                    expr: Box::new(expr),
                },
                loc,
            ));
        }

        self.parse_unary()
    }

    /// Parse unary (! ~ - + & * ++ -- sizeof)
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        let op = match self.peek() {
            TokenKind::Bang => Some(UnOp::Not),
            TokenKind::Tilde => Some(UnOp::BitNot),
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Amp => Some(UnOp::AddrOf),
            TokenKind::Star => Some(UnOp::Deref),
            TokenKind::PlusPlus => Some(UnOp::PreInc),
            TokenKind::MinusMinus => Some(UnOp::PreDec),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = self.parse_cast()?;
            return Ok(self.unary(op, operand, loc));
        }

        if self.match_token(&TokenKind::Plus) {
            // Unary plus: just return the operand
            return self.parse_cast();
        }

        if self.match_token(&TokenKind::Sizeof) {
            self.expect_lparen("after 'sizeof'")?;
            if !self.is_type_keyword() {
                return Err(self.error("sizeof only supports type operands"));
            }
            let target = self.parse_type()?;
            self.expect_rparen("after sizeof type")?;
            return Ok(self.make_expr(ExprKind::SizeofType(target), loc));
        }

        self.parse_postfix()
    }

    /// Parse postfix (++ -- [] ())
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();

            if self.match_token(&TokenKind::PlusPlus) {
                expr = self.unary(UnOp::PostInc, expr, loc);
            } else if self.match_token(&TokenKind::MinusMinus) {
                expr = self.unary(UnOp::PostDec, expr, loc);
            } else if self.match_token(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.expect_token(
                    &TokenKind::RBracket,
                    "Expected ']' after array index",
                )?;
                expr = self.make_expr(
                    ExprKind::Subscript {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    loc,
                );
            } else if self.match_token(&TokenKind::LParen) {
                let args = self.parse_argument_list()?;
                self.expect_rparen("after function arguments")?;

                // Only direct calls by name are supported
                let callee = match expr.kind {
                    ExprKind::Name { name, .. } => name,
                    _ => {
                        return Err(ParseError {
                            message: "Function call must be on identifier".to_string(),
                            location: loc,
                        });
                    }
                };

                expr = self.make_expr(ExprKind::Call { callee, args }, expr.location);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse argument list: (expr, expr, ...)
    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse primary (literals, names, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        let kind = match self.peek_token() {
            TokenKind::IntLiteral(n) => ExprKind::IntLiteral(n),
            TokenKind::CharLiteral(c) => ExprKind::CharLiteral(c),
            TokenKind::StringLiteral(s) => ExprKind::StringLiteral(s),
            TokenKind::Ident(name) => ExprKind::Name { name, decl: None },
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                return Ok(expr);
            }
            other => {
                return Err(ParseError {
                    message: format!("Unexpected token: {}", other),
                    location: loc,
                });
            }
        };
        self.advance();

        Ok(self.make_expr(kind, loc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_expression().unwrap()
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expr = parse_expr("a = b = 3");

        let ExprKind::Binary { op, left, right } = expr.kind else {
            panic!("Expected assignment");
        };
        assert_eq!(op, BinOp::Assign);
        assert!(matches!(left.kind, ExprKind::Name { ref name, .. } if name == "a"));
        assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Assign, .. }));
    }

    #[test]
    fn test_cast_of_call() {
        let expr = parse_expr("(int *)MALLOC(sizeof(int) * 4)");

        let ExprKind::Cast { target, expr } = expr.kind else {
            panic!("Expected cast");
        };
        assert!(target.is_pointer());
        let ExprKind::Call { callee, args } = expr.kind else {
            panic!("Expected call");
        };
        assert_eq!(callee, "MALLOC");
        assert!(matches!(
            args[0].kind,
            ExprKind::Binary { op: BinOp::Mul, .. }
        ));
    }

    #[test]
    fn test_parenthesized_is_not_cast() {
        let expr = parse_expr("(a) - 1");
        assert!(matches!(expr.kind, ExprKind::Binary { op: BinOp::Sub, .. }));
    }

    #[test]
    fn test_deref_and_subscript() {
        let expr = parse_expr("*p + a[2]");

        let ExprKind::Binary { left, right, .. } = expr.kind else {
            panic!("Expected binary");
        };
        assert!(matches!(left.kind, ExprKind::Unary { op: UnOp::Deref, .. }));
        assert!(matches!(right.kind, ExprKind::Subscript { .. }));
    }

    #[test]
    fn test_children_have_smaller_ids() {
        let expr = parse_expr("1 + 2");

        let ExprKind::Binary { left, right, .. } = &expr.kind else {
            panic!("Expected binary");
        };
        assert!(left.id < right.id);
        assert!(right.id < expr.id);
    }

    #[test]
    fn test_call_on_non_identifier_rejected() {
        let mut parser = Parser::new("(a + b)(1)").unwrap();
        let err = parser.parse_expression().unwrap_err();
        assert!(err.message.contains("identifier"));
    }
}
