//! Built-in function implementations
//!
//! This module provides the implementation of the built-in functions that are
//! directly handled by the interpreter rather than being defined in user code.
//! They are intercepted by name before ordinary call dispatch and run in the
//! caller's frame; no new frame is pushed.
//!
//! # Supported Built-ins
//!
//! - `GET()`: Read the next whitespace-delimited integer from the input stream
//! - `PRINT(n)`: Write `n` in decimal followed by a newline
//! - `MALLOC(size)`: Allocate a heap block of `size` bytes
//! - `FREE(ptr)`: Release the heap block whose base is exactly `ptr`
//!
//! `PRINT` and `FREE` yield no value (`Uninitialized`).

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{Intrinsic, SourceLocation};
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub(crate) fn call_intrinsic(
        &mut self,
        intrinsic: Intrinsic,
        args: &[Value],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if args.len() != intrinsic.arity() {
            return Err(RuntimeError::ArityMismatch {
                function: intrinsic.name().to_string(),
                expected: intrinsic.arity(),
                got: args.len(),
                location,
            });
        }

        match intrinsic {
            Intrinsic::Get => self.builtin_get(location),
            Intrinsic::Print => self.builtin_print(args[0], location),
            Intrinsic::Malloc => self.builtin_malloc(args[0], location),
            Intrinsic::Free => self.builtin_free(args[0], location),
        }
    }

    fn builtin_get(&mut self, location: SourceLocation) -> Result<Value, RuntimeError> {
        let n = self.read_integer(location)?;
        tracing::debug!(value = n, "GET");
        Ok(Value::Integer(n))
    }

    fn builtin_print(&mut self, arg: Value, location: SourceLocation) -> Result<Value, RuntimeError> {
        let n = match arg {
            Value::Integer(n) => n,
            Value::Uninitialized => {
                return Err(RuntimeError::UninitializedRead {
                    what: "argument to PRINT".to_string(),
                    location,
                });
            }
            Value::Pointer(_) => {
                return Err(RuntimeError::TypeMismatch {
                    message: format!("PRINT expects an integer, got {}", arg.kind_name()),
                    location,
                });
            }
        };

        writeln!(self.output, "{}", n).map_err(|err| RuntimeError::Output {
            message: err.to_string(),
            location,
        })?;
        Ok(Value::Uninitialized)
    }

    fn builtin_malloc(&mut self, arg: Value, location: SourceLocation) -> Result<Value, RuntimeError> {
        let size = match arg {
            Value::Integer(n) => n,
            Value::Uninitialized => {
                return Err(RuntimeError::UninitializedRead {
                    what: "argument to MALLOC".to_string(),
                    location,
                });
            }
            Value::Pointer(_) => {
                return Err(RuntimeError::TypeMismatch {
                    message: "MALLOC expects an integer size, got pointer".to_string(),
                    location,
                });
            }
        };

        let size = usize::try_from(size).map_err(|_| RuntimeError::InvalidAllocation {
            message: format!("size {} is negative", size),
            location,
        })?;

        let ptr = self
            .heap
            .allocate(size)
            .map_err(|err| RuntimeError::from_heap(err, location))?;
        Ok(Value::Pointer(ptr))
    }

    fn builtin_free(&mut self, arg: Value, location: SourceLocation) -> Result<Value, RuntimeError> {
        match arg {
            Value::Pointer(ptr) => {
                self.heap
                    .release(ptr)
                    .map_err(|err| RuntimeError::from_heap(err, location))?;
                Ok(Value::Uninitialized)
            }
            Value::Integer(_) => Err(RuntimeError::InvalidFree {
                value: arg,
                location,
            }),
            Value::Uninitialized => Err(RuntimeError::UninitializedRead {
                what: "argument to FREE".to_string(),
                location,
            }),
        }
    }
}
