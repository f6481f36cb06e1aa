//! Assignment and l-value resolution
//!
//! This module provides the store side of the interpreter:
//!
//! - Resolving an l-value expression to a [`Place`] (a variable or a cell)
//! - Plain and compound assignment
//! - Pre/post increment and decrement
//!
//! # Nameable Locations
//!
//! A name, a dereference `*p` and a subscript `a[i]` (evaluated as
//! `*(a + i)`) are assignable. Array names are not. Stores are
//! type-directed: writing to a `char` location keeps the low 8 bits.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::ops::binary::apply_binary;
use crate::interpreter::statements::coerce_for_store;
use crate::memory::value::{Pointer, Value};
use crate::parser::ast::*;
use std::io::{BufRead, Write};

/// A resolved assignable location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Place {
    /// Variable bound in the current frame
    Local(DeclId),
    /// Global variable
    Global(DeclId),
    /// Cell of a heap block or array
    Memory(Pointer),
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Evaluate `left = right` or a compound assignment such as `left += right`
    pub(crate) fn evaluate_assignment(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let place = self.resolve_place(left)?;
        let store_type = self.program.decls.type_of(left.id).cloned();

        let value = match op.compound_base() {
            None => self.evaluate_expr(right)?,
            Some(base) => {
                let current = self.read_place(place, location)?;
                self.stack.current_mut().cache_value(left.id, current);
                let rhs = self.evaluate_expr(right)?;
                let strides = (self.stride_of(left.id), self.stride_of(right.id));
                apply_binary(base, current, rhs, strides, location)?
            }
        };

        let value = coerce_for_store(store_type.as_ref(), value);
        self.write_place(place, value, location)?;
        Ok(value)
    }

    /// Evaluate `++x`, `--x`, `x++` or `x--`; pointers move by one element
    pub(crate) fn evaluate_increment(
        &mut self,
        operand: &Expr,
        delta: i64,
        post: bool,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let place = self.resolve_place(operand)?;
        let current = self.read_place(place, location)?;

        let stride = self.stride_of(operand.id);
        let updated = apply_binary(
            BinOp::Add,
            current,
            Value::Integer(delta),
            (stride, 1),
            location,
        )?;
        let store_type = self.program.decls.type_of(operand.id);
        let updated = coerce_for_store(store_type, updated);

        self.write_place(place, updated, location)?;
        Ok(if post { current } else { updated })
    }

    /// Resolve an l-value expression to the location it names
    pub(crate) fn resolve_place(&mut self, target: &Expr) -> Result<Place, RuntimeError> {
        let location = target.location;

        match &target.kind {
            ExprKind::Name { name, decl } => {
                let unbound = || RuntimeError::UnboundName {
                    name: name.clone(),
                    location,
                };
                let id = decl.ok_or_else(unbound)?;

                if self
                    .program
                    .decls
                    .get(id)
                    .is_some_and(|info| info.var_type.is_array())
                {
                    return Err(RuntimeError::TypeMismatch {
                        message: format!("array '{}' is not assignable", name),
                        location,
                    });
                }

                if self.stack.current().lookup(id).is_some() {
                    Ok(Place::Local(id))
                } else if self.globals.lookup(id).is_some() {
                    Ok(Place::Global(id))
                } else {
                    Err(unbound())
                }
            }
            ExprKind::Unary {
                op: UnOp::Deref, ..
            }
            | ExprKind::Subscript { .. } => Ok(Place::Memory(self.evaluate_place_pointer(target)?)),
            _ => Err(RuntimeError::unsupported(
                "assignment to an expression that is not a variable, dereference or subscript",
                location,
            )),
        }
    }

    /// Address named by `*p` or `a[i]`
    pub(crate) fn evaluate_place_pointer(&mut self, target: &Expr) -> Result<Pointer, RuntimeError> {
        let location = target.location;

        match &target.kind {
            ExprKind::Unary {
                op: UnOp::Deref,
                operand,
            } => self.evaluate_pointer_operand(operand, location),
            ExprKind::Subscript { base, index } => {
                let base_value = self.evaluate_expr(base)?;
                let index_value = self.evaluate_expr(index)?;
                let strides = (self.stride_of(base.id), self.stride_of(index.id));
                let address = apply_binary(BinOp::Add, base_value, index_value, strides, location)?;
                expect_pointer(address, location)
            }
            _ => Err(RuntimeError::unsupported(
                "address of a non-memory expression",
                location,
            )),
        }
    }

    /// Evaluate an expression that must produce a pointer to dereference
    pub(crate) fn evaluate_pointer_operand(
        &mut self,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Pointer, RuntimeError> {
        let value = self.evaluate_expr(operand)?;
        expect_pointer(value, location)
    }

    fn read_place(&self, place: Place, location: SourceLocation) -> Result<Value, RuntimeError> {
        match place {
            Place::Local(id) => Ok(self.stack.current().lookup(id).unwrap_or_default()),
            Place::Global(id) => Ok(self.globals.lookup(id).unwrap_or_default()),
            Place::Memory(ptr) => self
                .heap
                .read(ptr)
                .map_err(|err| RuntimeError::from_heap(err, location)),
        }
    }

    fn write_place(
        &mut self,
        place: Place,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match place {
            Place::Local(id) => {
                self.stack.current_mut().assign(id, value);
                Ok(())
            }
            Place::Global(id) => {
                self.globals.assign(id, value);
                Ok(())
            }
            Place::Memory(ptr) => self
                .heap
                .write(ptr, value)
                .map_err(|err| RuntimeError::from_heap(err, location)),
        }
    }
}

fn expect_pointer(value: Value, location: SourceLocation) -> Result<Pointer, RuntimeError> {
    match value {
        Value::Pointer(ptr) => Ok(ptr),
        Value::Uninitialized => Err(RuntimeError::UninitializedRead {
            what: "pointer".to_string(),
            location,
        }),
        Value::Integer(_) => Err(RuntimeError::InvalidDereference { value, location }),
    }
}
