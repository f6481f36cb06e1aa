//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing global variables, function definitions and prototypes
//! - `statements`: Parsing statements (if, while, for, etc.)
//! - `expressions`: Parsing expressions with one function per precedence level
//!
//! # Identity
//!
//! Every expression gets a fresh [`NodeId`] and every variable or parameter
//! declaration a fresh [`DeclId`] registered in the program's [`DeclTable`].
//! Name references are left unlinked; [`crate::parser::resolve`] links them.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, Error)]
#[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the C subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) decls: DeclTable,
    pub(crate) next_node: NodeId,
    pub(crate) in_function: bool,
}

impl Parser {
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        tracing::debug!(tokens = tokens.len(), "tokenized source");
        Ok(Self {
            tokens,
            position: 0,
            decls: DeclTable::default(),
            next_node: 0,
            in_function: false,
        })
    }

    /// Parse the entire program (top-level declarations)
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            self.parse_top_level_declaration(&mut program)?;
        }

        program.decls = std::mem::take(&mut self.decls);
        tracing::debug!(
            functions = program.functions.len(),
            globals = program.globals.len(),
            "parsed program"
        );
        Ok(program)
    }

    // ===== Node construction =====

    pub(crate) fn make_expr(&mut self, kind: ExprKind, location: SourceLocation) -> Expr {
        let id = self.next_node;
        self.next_node += 1;
        Expr { id, kind, location }
    }

    pub(crate) fn declare(&mut self, name: &str, var_type: &Type) -> DeclId {
        let is_global = !self.in_function;
        self.decls.declare(name, var_type.clone(), is_global)
    }

    // ===== Helper methods =====

    pub(crate) fn is_type_keyword(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Int | TokenKind::Char | TokenKind::Void | TokenKind::Extern
        )
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &TokenKind {
        &self.tokens[self.position].kind
    }

    /// The token `n` places after the current one
    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.position + n).map(|token| &token.kind)
    }

    pub(crate) fn peek_token(&self) -> TokenKind {
        self.peek().clone()
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.tokens[self.position.saturating_sub(1)].location
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.tokens[self.position].location
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: self.current_location(),
        }
    }

    pub(crate) fn expect_token(&mut self, kind: &TokenKind, message: &str) -> Result<(), ParseError> {
        if self.match_token(kind) {
            Ok(())
        } else {
            Err(self.error(format!("{}, found {}", message, self.peek())))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &TokenKind::LParen,
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &TokenKind::RParen,
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &TokenKind::RBrace,
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &TokenKind::Semicolon,
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(self.error(format!("Expected identifier, found {}", self.peek())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_function() {
        let source = "int main() { return 0; }";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.functions.len(), 1);
        let main = &program.functions[0];
        assert_eq!(main.name, "main");
        assert_eq!(main.params.len(), 0);
        assert_eq!(main.return_type.base, BaseType::Int);
        match &main.body {
            Some(Stmt::Block { statements, .. }) => assert_eq!(statements.len(), 1),
            other => panic!("Expected function body, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_expression_precedence() {
        let source = "int main() { int x = 1 + 2 * 3; }";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        let Some(Stmt::Block { statements, .. }) = &program.functions[0].body else {
            panic!("Expected block");
        };
        let Stmt::Declaration { decls, .. } = &statements[0] else {
            panic!("Expected declaration");
        };
        let init = decls[0].init.as_ref().unwrap();
        match &init.kind {
            ExprKind::Binary { op, right, .. } => {
                assert_eq!(*op, BinOp::Add);
                assert!(matches!(
                    right.kind,
                    ExprKind::Binary { op: BinOp::Mul, .. }
                ));
            }
            other => panic!("Expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_statement() {
        let source = "int main() { if (x > 0) return 1; else return 0; }";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.functions.len(), 1);
    }

    #[test]
    fn test_parse_prototypes_and_globals() {
        let source = "extern int GET(); extern void PRINT(int); int g = 3; int arr[4];\n\
                      int main() { return g; }";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.functions.len(), 3);
        assert!(program.functions[0].body.is_none());
        assert_eq!(program.functions[1].params.len(), 1);
        assert_eq!(program.globals.len(), 2);
        assert_eq!(program.globals[1].var_type.array_len, Some(4));
        assert!(program.decls.get(program.globals[0].id).unwrap().is_global);
    }

    #[test]
    fn test_node_ids_are_unique() {
        let source = "int main() { int a = 1; int b = a + 2; return a * b; }";
        let mut parser = Parser::new(source).unwrap();
        parser.parse_program().unwrap();

        // 1, a, 2, a + 2, a, b, a * b
        assert_eq!(parser.next_node, 7);
    }

    #[test]
    fn test_missing_semicolon() {
        let source = "int main() { int a = 1 return a; }";
        let mut parser = Parser::new(source).unwrap();
        let err = parser.parse_program().unwrap_err();

        assert!(err.message.contains("Expected ';'"));
        assert_eq!(err.location.line, 1);
    }
}
