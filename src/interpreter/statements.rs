//! Statement execution implementation
//!
//! This module handles the execution of all statement types, including:
//!
//! - Variable declarations and initializations
//! - Control flow (if/else; loops live in [`super::loops`])
//! - Returns
//! - Blocks and compound statements
//!
//! # Implementation
//!
//! All statement execution methods are implemented as `pub(crate)` methods
//! on the [`Interpreter`] struct, allowing them to access and modify the
//! interpreter's state (stack, heap, globals, etc.).
//!
//! # Control Flow
//!
//! `return` only records the value in the current frame. Every statement
//! checks that record first and does nothing once the frame has returned,
//! so the statements after a `return` (including the rest of any enclosing
//! block, branch or loop) are skipped without unwinding.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{sizeof_type, value::Value};
use crate::parser::ast::*;
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Execute a single statement in the current frame
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        if self.stack.current().has_returned() {
            return Ok(());
        }
        tracing::trace!(
            line = stmt.location().line,
            function = %self.stack.current().function_name,
            "statement"
        );

        match stmt {
            Stmt::Block { statements, .. } => {
                for statement in statements {
                    self.execute_statement(statement)?;
                }
                Ok(())
            }

            Stmt::Declaration { decls, .. } => {
                self.stack.current_mut().clear_cache();
                for decl in decls {
                    self.declare_variable(decl)?;
                }
                Ok(())
            }

            Stmt::Expression { expr, .. } => {
                self.stack.current_mut().clear_cache();
                self.evaluate_expr(expr)?;
                Ok(())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                location,
            } => {
                self.stack.current_mut().clear_cache();
                if self.evaluate_condition(condition, *location)? {
                    self.execute_statement(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_statement(else_branch)
                } else {
                    Ok(())
                }
            }

            Stmt::While {
                condition,
                body,
                location,
            } => self.execute_while(condition, body, *location),

            Stmt::For {
                init,
                condition,
                increment,
                body,
                location,
            } => self.execute_for(
                init.as_deref(),
                condition.as_ref(),
                increment.as_ref(),
                body,
                *location,
            ),

            Stmt::Return { expr, .. } => {
                self.stack.current_mut().clear_cache();
                let value = match expr {
                    Some(expr) => self.evaluate_expr(expr)?,
                    None => Value::Uninitialized,
                };
                self.stack.current_mut().set_returned(value);
                Ok(())
            }

            Stmt::Empty { .. } => Ok(()),

            Stmt::DoWhile { location, .. } => {
                Err(RuntimeError::unsupported("do-while loop", *location))
            }
            Stmt::Break { location } => Err(RuntimeError::unsupported("break statement", *location)),
            Stmt::Continue { location } => {
                Err(RuntimeError::unsupported("continue statement", *location))
            }
        }
    }

    /// Bind one declared variable in the current frame, or globally when it
    /// was declared outside any function
    ///
    /// Arrays get fresh storage and are bound to a pointer to its first
    /// element; a local array's storage is released with its frame.
    pub(crate) fn declare_variable(&mut self, decl: &VarDecl) -> Result<(), RuntimeError> {
        let is_global = self
            .program
            .decls
            .get(decl.id)
            .map_or(self.stack.depth() == 0, |info| info.is_global);

        let value = if decl.var_type.is_array() {
            if decl.init.is_some() {
                return Err(RuntimeError::unsupported(
                    "array initializer",
                    decl.location,
                ));
            }
            if !is_global {
                self.release_local_array(decl.id);
            }
            let size = sizeof_type(&decl.var_type).ok_or_else(|| {
                RuntimeError::InvalidAllocation {
                    message: format!(
                        "array of {} elements is too large",
                        decl.var_type.array_len.unwrap_or_default()
                    ),
                    location: decl.location,
                }
            })?;
            let ptr = self
                .heap
                .allocate_array(size)
                .map_err(|err| RuntimeError::from_heap(err, decl.location))?;
            if !is_global {
                self.stack.current_mut().own_region(ptr.region);
            }
            Value::Pointer(ptr)
        } else {
            match &decl.init {
                Some(init) => {
                    let value = self.evaluate_expr(init)?;
                    coerce_for_store(Some(&decl.var_type), value)
                }
                None => Value::Uninitialized,
            }
        };

        if is_global {
            self.globals.bind(decl.id, value);
        } else {
            self.stack.current_mut().bind(decl.id, value);
        }
        Ok(())
    }

    /// Drop the storage an earlier run of this array declaration left in the
    /// current frame (a declaration inside a loop body runs once per iteration)
    fn release_local_array(&mut self, decl: DeclId) {
        let frame = self.stack.current_mut();
        let previous = frame.lookup(decl).and_then(|value| value.as_pointer());
        if let Some(ptr) = previous {
            if frame.disown_region(ptr.region) {
                self.heap.drop_region(ptr.region);
            }
        }
    }

    /// Evaluate a condition to a boolean; every pointer is true
    pub(crate) fn evaluate_condition(
        &mut self,
        condition: &Expr,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        let value = self.evaluate_expr(condition)?;
        value
            .truthy()
            .ok_or_else(|| RuntimeError::UninitializedRead {
                what: "value in condition".to_string(),
                location,
            })
    }
}

/// Convert a value to what a location of type `ty` holds: `char` locations
/// keep only the low 8 bits, everything else stores the value unchanged.
pub(crate) fn coerce_for_store(ty: Option<&Type>, value: Value) -> Value {
    match (ty, value) {
        (Some(ty), Value::Integer(n)) if ty.is_char() => Value::Integer(n as i8 as i64),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_store_truncates() {
        let char_ty = Type::new(BaseType::Char);

        assert_eq!(
            coerce_for_store(Some(&char_ty), Value::Integer(300)),
            Value::Integer(44)
        );
        assert_eq!(
            coerce_for_store(Some(&char_ty), Value::Integer(200)),
            Value::Integer(-56)
        );
        assert_eq!(
            coerce_for_store(Some(&Type::int()), Value::Integer(300)),
            Value::Integer(300)
        );
        assert_eq!(
            coerce_for_store(None, Value::Uninitialized),
            Value::Uninitialized
        );
    }
}
