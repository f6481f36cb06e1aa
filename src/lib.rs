//! # Introduction
//!
//! cwalk executes a small subset of C by walking its syntax tree. There is
//! no code generation: every expression is evaluated directly against a
//! model of frames, globals and a region-based heap.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → Resolver → AST → Interpreter → output
//! ```
//!
//! 1. [`parser`]: tokenises the source, builds an AST and resolves names
//!    and static types.
//! 2. [`interpreter`]: walks the resolved AST, executing statements and
//!    evaluating expressions against the memory model.
//! 3. [`memory`]: the in-process memory model: tagged [`memory::value::Value`]s,
//!    the [`memory::stack::CallStack`] of frames and the [`memory::heap::Heap`].
//!
//! ## Supported C subset
//!
//! Types: `int`, `char`, `void`, pointers, one-dimensional arrays.
//! Control flow: `if/else`, `while`, `for`, `return`.
//! Built-ins: `GET`, `PRINT`, `MALLOC`, `FREE`, plus `sizeof(type)`.
//!
//! ## Example
//!
//! ```
//! use cwalk::interpreter::config::InterpreterConfig;
//!
//! let mut output = Vec::new();
//! let source = "int main() { PRINT(5 + 3); return 0; }";
//! cwalk::run_source(source, std::io::empty(), &mut output, InterpreterConfig::default()).unwrap();
//! assert_eq!(output, b"8\n");
//! ```

pub mod error;
pub mod interpreter;
pub mod memory;
pub mod parser;

pub use error::Error;

use interpreter::config::InterpreterConfig;
use interpreter::engine::Interpreter;
use memory::value::Value;
use parser::parse::Parser;
use parser::resolve::resolve;
use std::io::{BufRead, Write};

/// Parse, resolve and run `source`, reading `GET` input from `input` and
/// writing `PRINT` output to `output`. Returns the entry function's value.
pub fn run_source<R: BufRead, W: Write>(
    source: &str,
    input: R,
    output: W,
    config: InterpreterConfig,
) -> Result<Value, Error> {
    let mut parser = Parser::new(source)?;
    let mut program = parser.parse_program()?;
    resolve(&mut program);

    let mut interpreter = Interpreter::with_config(program, input, output, config);
    Ok(interpreter.run()?)
}
