//! Loop statement execution (`while`, `for`).
//!
//! Adds `impl Interpreter` methods for the two loop forms supported by the
//! C subset. A `return` in the body is observed through the frame's return
//! state after each iteration; there is no other way out of a loop.
//!
//! `for` evaluates its increment after every body execution, including the
//! one that returned, and only then stops.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Expr, SourceLocation, Stmt};
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Executes a `while (condition) body` loop.
    ///
    /// The condition is evaluated before each iteration.
    pub(crate) fn execute_while(
        &mut self,
        condition: &Expr,
        body: &Stmt,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        loop {
            self.stack.current_mut().clear_cache();
            if !self.evaluate_condition(condition, location)? {
                break;
            }

            self.execute_statement(body)?;

            if self.stack.current().has_returned() {
                break;
            }
        }

        Ok(())
    }

    /// Executes a `for (init; condition; increment) body` loop.
    ///
    /// `init` runs once; a missing condition is always true.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        increment: Option<&Expr>,
        body: &Stmt,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if let Some(init) = init {
            self.execute_statement(init)?;
        }

        loop {
            if let Some(condition) = condition {
                self.stack.current_mut().clear_cache();
                if !self.evaluate_condition(condition, location)? {
                    break;
                }
            }

            self.execute_statement(body)?;

            // Runs even when the body just returned
            if let Some(increment) = increment {
                self.stack.current_mut().clear_cache();
                self.evaluate_expr(increment)?;
            }

            if self.stack.current().has_returned() {
                break;
            }
        }

        Ok(())
    }
}
