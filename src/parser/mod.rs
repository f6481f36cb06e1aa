//! C source code front end
//!
//! This module transforms C source text into a resolved Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split across [`declarations`],
//!   [`statements`] and [`expressions`]
//! - [`resolve`]: Name linking and static types (AST → resolved AST)
//! - [`ast`]: AST node definitions and the declaration table
//!
//! # Supported C Subset
//!
//! - Types: `int`, `char`, `void`, pointers, one-dimensional arrays
//! - Statements: declarations, expressions, `if`, `while`, `for`, `return`, blocks
//! - Expressions: arithmetic, logical, bitwise, assignment, calls, subscripts,
//!   casts and `sizeof(type)`
//! - `#` lines are skipped; there is no preprocessor
//!
//! `do`/`while`, `break`, `continue`, string literals and `&` are accepted by
//! the parser and rejected by the engine.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one function per precedence level.
//! No external parser generator dependencies.

pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod resolve;
pub mod statements;
