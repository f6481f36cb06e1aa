//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Variable declarations: `int x = 42, *p;`
//! - Control flow: `if`, `while`, `for`
//! - `return`
//! - Compound statements: `{ ... }`
//! - Expression statements: function calls, assignments
//!
//! `do`/`while`, `break` and `continue` are parsed into the tree so the engine
//! can report them as unsupported constructs with an accurate location.
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | if_stmt | while_stmt | for_stmt | do_while_stmt
//!             | return_stmt | break_stmt | continue_stmt | block | expr_stmt | ";"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        // Check for keywords first
        if self.match_token(&TokenKind::Return) {
            return self.parse_return_statement();
        }

        if self.match_token(&TokenKind::If) {
            return self.parse_if_statement();
        }

        if self.match_token(&TokenKind::While) {
            return self.parse_while_statement();
        }

        if self.match_token(&TokenKind::Do) {
            return self.parse_do_while_statement();
        }

        if self.match_token(&TokenKind::For) {
            return self.parse_for_statement();
        }

        if self.match_token(&TokenKind::Break) {
            self.expect_semicolon("after 'break'")?;
            return Ok(Stmt::Break { location: loc });
        }

        if self.match_token(&TokenKind::Continue) {
            self.expect_semicolon("after 'continue'")?;
            return Ok(Stmt::Continue { location: loc });
        }

        if self.match_token(&TokenKind::LBrace) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            return Ok(Stmt::Block {
                statements,
                location: loc,
            });
        }

        if self.match_token(&TokenKind::Semicolon) {
            return Ok(Stmt::Empty { location: loc });
        }

        // Check for variable declaration (type followed by identifier)
        if self.is_type_keyword() {
            return self.parse_variable_declaration();
        }

        // Otherwise, it's an expression statement
        let expr = self.parse_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(Stmt::Expression {
            expr,
            location: loc,
        })
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        let expr = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_semicolon("after return")?;

        Ok(Stmt::Return {
            expr,
            location: loc,
        })
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        let body = Box::new(self.parse_statement()?);

        self.expect_token(
            &TokenKind::While,
            "Expected 'while' after do body",
        )?;
        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after do-while condition")?;
        self.expect_semicolon("after do-while")?;

        Ok(Stmt::DoWhile {
            body,
            condition,
            location: loc,
        })
    }

    /// Parse for statement
    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'for'")?;

        // Init (optional)
        let init = if self.match_token(&TokenKind::Semicolon) {
            None
        } else if self.is_type_keyword() {
            // Declaration includes its semicolon
            Some(Box::new(self.parse_variable_declaration()?))
        } else {
            let init_loc = self.current_location();
            let expr = self.parse_expression()?;
            self.expect_semicolon("after for init")?;
            Some(Box::new(Stmt::Expression {
                expr,
                location: init_loc,
            }))
        };

        // Condition (optional)
        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon("after for condition")?;

        // Increment (optional)
        let increment = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_rparen("after for clauses")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For {
            init,
            condition,
            increment,
            body,
            location: loc,
        })
    }

    /// Parse variable declaration: type declarator (, declarator)* ;
    pub(crate) fn parse_variable_declaration(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.match_token(&TokenKind::Extern);

        let base = self.parse_base_type()?;
        let mut decls = vec![self.parse_declarator(&base)?];
        while self.match_token(&TokenKind::Comma) {
            decls.push(self.parse_declarator(&base)?);
        }

        self.expect_semicolon("after variable declaration")?;

        Ok(Stmt::Declaration {
            decls,
            location: loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_body(body: &str) -> Vec<Stmt> {
        let source = format!("int main() {{ {} }}", body);
        let mut parser = Parser::new(&source).unwrap();
        let mut program = parser.parse_program().unwrap();
        match program.functions.remove(0).body {
            Some(Stmt::Block { statements, .. }) => statements,
            other => panic!("Expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_for_with_declaration_init() {
        let statements = parse_body("for (int i = 0; i < 3; i = i + 1) PRINT(i);");

        match &statements[0] {
            Stmt::For {
                init,
                condition,
                increment,
                body,
                ..
            } => {
                assert!(matches!(init.as_deref(), Some(Stmt::Declaration { .. })));
                assert!(condition.is_some());
                assert!(increment.is_some());
                assert!(matches!(**body, Stmt::Expression { .. }));
            }
            other => panic!("Expected for statement, got {:?}", other),
        }
    }

    #[test]
    fn test_for_with_empty_clauses() {
        let statements = parse_body("for (;;) { return 1; }");

        assert!(matches!(
            &statements[0],
            Stmt::For {
                init: None,
                condition: None,
                increment: None,
                ..
            }
        ));
    }

    #[test]
    fn test_dangling_else_binds_inner() {
        let statements = parse_body("if (a) if (b) x = 1; else x = 2;");

        let Stmt::If {
            then_branch,
            else_branch,
            ..
        } = &statements[0]
        else {
            panic!("Expected if");
        };
        assert!(else_branch.is_none());
        assert!(matches!(
            **then_branch,
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_multiple_declarators() {
        let statements = parse_body("int a = 1, *p, buf[8];");

        let Stmt::Declaration { decls, .. } = &statements[0] else {
            panic!("Expected declaration");
        };
        assert_eq!(decls.len(), 3);
        assert!(decls[0].init.is_some());
        assert!(decls[1].var_type.is_pointer());
        assert_eq!(decls[2].var_type.array_len, Some(8));
    }

    #[test]
    fn test_unsupported_statements_still_parse() {
        let statements = parse_body("do { break; } while (1); continue;");

        assert!(matches!(statements[0], Stmt::DoWhile { .. }));
        assert!(matches!(statements[1], Stmt::Continue { .. }));
    }
}
