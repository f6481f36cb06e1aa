//! Declaration parsing implementation
//!
//! This module handles parsing of top-level declarations:
//!
//! - Global variables: `int g = 1, *p, arr[8];`
//! - Function definitions: `type name(params) { ... }`
//! - Function prototypes: `extern int GET();`
//! - Type parsing: base types and pointers, plus array declarators
//!
//! # Grammar
//!
//! ```text
//! declaration  ::= "extern"? type ( function_rest | declarators ";" )
//! function_rest ::= identifier "(" params ")" ( ";" | "{" statements "}" )
//! declarators  ::= declarator ( "," declarator )*
//! declarator   ::= "*"* identifier ( "[" int "]" )? ( "=" expression )?
//! type         ::= base_type "*"*
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a top-level declaration (function or global variables)
    pub(crate) fn parse_top_level_declaration(
        &mut self,
        program: &mut Program,
    ) -> Result<(), ParseError> {
        self.match_token(&TokenKind::Extern);

        let base = self.parse_base_type()?;
        let mut first_type = base.clone();
        while self.match_token(&TokenKind::Star) {
            first_type = first_type.with_pointer();
        }
        let name = self.expect_identifier()?;
        let loc = self.previous_location();

        if self.check(&TokenKind::LParen) {
            let function = self.parse_function_rest(name, first_type, loc)?;
            program.functions.push(function);
            return Ok(());
        }

        let mut decls = vec![self.parse_declarator_rest(name, first_type, loc)?];
        while self.match_token(&TokenKind::Comma) {
            decls.push(self.parse_declarator(&base)?);
        }
        self.expect_semicolon("after global declaration")?;

        program.globals.extend(decls);
        Ok(())
    }

    /// Parse the part of a function after its name: `(params) { body }` or `(params);`
    fn parse_function_rest(
        &mut self,
        name: String,
        return_type: Type,
        location: SourceLocation,
    ) -> Result<FunctionDecl, ParseError> {
        self.in_function = true;
        let result = self.parse_function_signature_and_body(name, return_type, location);
        self.in_function = false;
        result
    }

    fn parse_function_signature_and_body(
        &mut self,
        name: String,
        return_type: Type,
        location: SourceLocation,
    ) -> Result<FunctionDecl, ParseError> {
        self.expect_lparen("after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect_rparen("after parameters")?;

        let body = if self.match_token(&TokenKind::Semicolon) {
            None
        } else {
            let body_loc = self.current_location();
            self.expect_token(
                &TokenKind::LBrace,
                "Expected '{' or ';' after function signature",
            )?;
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after function body")?;
            Some(Stmt::Block {
                statements,
                location: body_loc,
            })
        };

        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
            intrinsic: None,
            location,
        })
    }

    /// Parse parameter list: (type name, type name, ...)
    ///
    /// Names are optional so prototypes like `void PRINT(int)` parse.
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        // Special case: (void) means no parameters in C
        if self.check(&TokenKind::Void)
            && matches!(self.peek_ahead(1), Some(TokenKind::RParen))
        {
            self.advance(); // consume 'void'
            return Ok(params);
        }

        loop {
            let mut param_type = self.parse_type()?;
            let name = match self.peek_token() {
                TokenKind::Ident(name) => {
                    self.advance();
                    name
                }
                _ => String::new(),
            };

            // `int a[]` and `int a[N]` both decay to `int *a`
            if self.match_token(&TokenKind::LBracket) {
                if let TokenKind::IntLiteral(_) = self.peek_token() {
                    self.advance();
                }
                self.expect_token(
                    &TokenKind::RBracket,
                    "Expected ']' in array parameter",
                )?;
                param_type = param_type.with_pointer();
            }

            let id = self.declare(&name, &param_type);
            params.push(Param {
                id,
                name,
                param_type,
            });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse a base type keyword: `int`, `char` or `void`
    pub(crate) fn parse_base_type(&mut self) -> Result<Type, ParseError> {
        let base = if self.match_token(&TokenKind::Int) {
            BaseType::Int
        } else if self.match_token(&TokenKind::Char) {
            BaseType::Char
        } else if self.match_token(&TokenKind::Void) {
            BaseType::Void
        } else {
            return Err(self.error(format!("Expected type, found {}", self.peek())));
        };

        Ok(Type::new(base))
    }

    /// Parse type: base_type [*]*
    pub(crate) fn parse_type(&mut self) -> Result<Type, ParseError> {
        let mut ty = self.parse_base_type()?;
        while self.match_token(&TokenKind::Star) {
            ty = ty.with_pointer();
        }
        Ok(ty)
    }

    /// Parse one declarator of a declaration whose base type is already known
    pub(crate) fn parse_declarator(&mut self, base: &Type) -> Result<VarDecl, ParseError> {
        let mut var_type = base.clone();
        while self.match_token(&TokenKind::Star) {
            var_type = var_type.with_pointer();
        }
        let name = self.expect_identifier()?;
        let loc = self.previous_location();
        self.parse_declarator_rest(name, var_type, loc)
    }

    /// Parse an optional array length and initializer after a declarator's name
    pub(crate) fn parse_declarator_rest(
        &mut self,
        name: String,
        mut var_type: Type,
        location: SourceLocation,
    ) -> Result<VarDecl, ParseError> {
        if self.match_token(&TokenKind::LBracket) {
            let len = match self.peek_token() {
                TokenKind::IntLiteral(n) if n >= 0 => {
                    self.advance();
                    n as usize
                }
                _ => return Err(self.error("Array size must be a constant integer")),
            };
            self.expect_token(
                &TokenKind::RBracket,
                "Expected ']' after array size",
            )?;
            if self.check(&TokenKind::LBracket) {
                return Err(self.error("Multi-dimensional arrays are not supported"));
            }
            var_type = var_type.with_array(len);
        }

        if var_type.base == BaseType::Void && var_type.pointer_depth == 0 {
            return Err(ParseError {
                message: format!("Variable '{}' declared void", name),
                location,
            });
        }

        let init = if self.match_token(&TokenKind::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let id = self.declare(&name, &var_type);
        Ok(VarDecl {
            id,
            name,
            var_type,
            init,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_program().unwrap()
    }

    #[test]
    fn test_pointer_binds_to_declarator() {
        let program = parse("int *p, q, arr[3];");

        assert_eq!(program.globals.len(), 3);
        assert!(program.globals[0].var_type.is_pointer());
        assert_eq!(program.globals[1].var_type, Type::int());
        assert_eq!(program.globals[2].var_type, Type::int().with_array(3));
    }

    #[test]
    fn test_unnamed_prototype_params() {
        let program = parse("extern void FREE(void *); extern int GET(void);");

        assert_eq!(program.functions[0].params.len(), 1);
        assert!(program.functions[0].params[0].param_type.is_pointer());
        assert!(program.functions[1].params.is_empty());
    }

    #[test]
    fn test_array_parameter_decays() {
        let program = parse("int sum(int a[], int n) { return n; }");
        let params = &program.functions[0].params;

        assert!(params[0].param_type.is_pointer());
        assert!(!program.decls.get(params[0].id).unwrap().is_global);
    }

    #[test]
    fn test_void_variable_rejected() {
        let mut parser = Parser::new("void v;").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message.contains("declared void"));
    }
}
