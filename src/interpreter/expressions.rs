//! Expression evaluation implementation
//!
//! This module handles evaluation of all expression types, including:
//!
//! - Literals (integers, characters)
//! - Name references
//! - Binary and unary operators (see [`super::ops`])
//! - Array subscripting
//! - Function calls (including built-ins)
//! - Type casts and `sizeof(type)`
//!
//! # Caching
//!
//! Every evaluated node stores its value in the current frame's cache, keyed
//! by node id. Children are always evaluated, and therefore cached, before
//! their parent. The result of a call is cached in the caller's frame, after
//! the callee's frame has been popped.

use crate::interpreter::engine::{ensure_sufficient_stack, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::statements::coerce_for_store;
use crate::memory::{element_size, sizeof_type, stack::Frame, value::Value};
use crate::parser::ast::*;
use std::io::{BufRead, Write};
use std::rc::Rc;

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Evaluate an expression, cache its value and return it
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        let value = ensure_sufficient_stack(|| self.evaluate_expr_uncached(expr))?;
        self.stack.current_mut().cache_value(expr.id, value);
        Ok(value)
    }

    fn evaluate_expr_uncached(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        let location = expr.location;

        match &expr.kind {
            ExprKind::IntLiteral(n) => Ok(Value::Integer(*n)),

            ExprKind::CharLiteral(c) => Ok(Value::Integer(*c as i64)),

            ExprKind::StringLiteral(_) => Err(RuntimeError::unsupported("string literal", location)),

            ExprKind::Name { name, decl } => self.lookup_name(name, *decl, location),

            ExprKind::Binary { op, left, right } => {
                if op.is_assignment() {
                    self.evaluate_assignment(*op, left, right, location)
                } else {
                    self.evaluate_binary(*op, left, right, location)
                }
            }

            ExprKind::Unary { op, operand } => self.evaluate_unary(*op, operand, location),

            ExprKind::Call { callee, args } => self.evaluate_call(callee, args, location),

            ExprKind::Subscript { .. } => {
                let ptr = self.evaluate_place_pointer(expr)?;
                self.heap
                    .read(ptr)
                    .map_err(|err| RuntimeError::from_heap(err, location))
            }

            ExprKind::Cast { target, expr } => {
                let value = self.evaluate_expr(expr)?;
                Ok(coerce_for_store(Some(target), value))
            }

            ExprKind::SizeofType(ty) => sizeof_type(ty)
                .and_then(|size| i64::try_from(size).ok())
                .map(Value::Integer)
                .ok_or_else(|| RuntimeError::InvalidAllocation {
                    message: "sizeof operand is too large".to_string(),
                    location,
                }),
        }
    }

    /// Resolve a name reference: the current frame first, then the globals
    pub(crate) fn lookup_name(
        &self,
        name: &str,
        decl: Option<DeclId>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        decl.and_then(|id| {
            self.stack
                .current()
                .lookup(id)
                .or_else(|| self.globals.lookup(id))
        })
        .ok_or_else(|| RuntimeError::UnboundName {
            name: name.to_string(),
            location,
        })
    }

    /// Stride of pointer arithmetic on the value of node `node`
    pub(crate) fn stride_of(&self, node: NodeId) -> i64 {
        self.program.decls.type_of(node).map_or(1, element_size)
    }

    /// Evaluate a call: arguments left to right in the caller's frame, then
    /// either a built-in or a user function
    fn evaluate_call(
        &mut self,
        callee: &str,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate_expr(arg)?);
        }

        let program = Rc::clone(&self.program);
        let declared = self
            .globals
            .function(callee)
            .map(|index| &program.functions[index]);

        // A tagged prototype names its intrinsic; an undeclared call still
        // reaches one by name
        let intrinsic = declared
            .and_then(|function| function.intrinsic)
            .or_else(|| Intrinsic::from_name(callee));
        if let Some(intrinsic) = intrinsic {
            return self.call_intrinsic(intrinsic, &values, location);
        }

        let function = declared.ok_or_else(|| RuntimeError::UnboundName {
            name: callee.to_string(),
            location,
        })?;
        self.call_function(function, values, location)
    }

    /// Call a user function with already evaluated arguments
    ///
    /// Pushes a frame binding each parameter positionally, runs the body and
    /// pops the frame again, releasing any array storage it owned. Yields the
    /// returned value, or `Uninitialized` if the body never returned.
    pub(crate) fn call_function(
        &mut self,
        function: &FunctionDecl,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let Some(body) = &function.body else {
            return Err(RuntimeError::UnboundName {
                name: function.name.clone(),
                location,
            });
        };

        if args.len() != function.params.len() {
            return Err(RuntimeError::ArityMismatch {
                function: function.name.clone(),
                expected: function.params.len(),
                got: args.len(),
                location,
            });
        }

        if self.stack.depth() >= self.config.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                depth: self.config.max_call_depth,
                location,
            });
        }

        let mut frame = Frame::new(function.name.as_str());
        for (param, value) in function.params.iter().zip(args) {
            frame.bind(param.id, coerce_for_store(Some(&param.param_type), value));
        }
        self.stack.push(frame);
        tracing::debug!(
            callee = %function.name,
            depth = self.stack.depth(),
            "call"
        );

        let result = self.execute_statement(body);

        if let Some(mut frame) = self.stack.pop() {
            for region in frame.take_owned_regions() {
                self.heap.drop_region(region);
            }
            result?;

            let value = coerce_for_store(Some(&function.return_type), frame.return_value());
            tracing::debug!(
                callee = %function.name,
                depth = self.stack.depth(),
                value = %value,
                "return"
            );
            return Ok(value);
        }

        result.map(|()| Value::Uninitialized)
    }
}
