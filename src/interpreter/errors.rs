//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to lexing or parse errors).
//!
//! All runtime errors are fatal - they halt execution and are never exposed
//! to the interpreted program as a value.

use crate::memory::heap::HeapError;
use crate::memory::value::Value;
use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Reference to a variable or function with no binding
    #[error("Unbound name '{name}' at line {}", .location.line)]
    UnboundName {
        name: String,
        location: SourceLocation,
    },

    /// Function argument count mismatch
    #[error(
        "Function '{function}' expects {expected} argument{}, got {got} at line {}",
        plural(.expected),
        .location.line
    )]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    /// Division by zero or modulo by zero
    #[error("{operation} at line {}", .location.line)]
    DivisionByZero {
        operation: String,
        location: SourceLocation,
    },

    /// Release of an address that is not the base of a live heap block
    #[error("Invalid free of {value} at line {}", .location.line)]
    InvalidFree {
        value: Value,
        location: SourceLocation,
    },

    /// A tree node outside the supported subset
    #[error("Unsupported construct: {construct} at line {}", .location.line)]
    UnsupportedConstruct {
        construct: String,
        location: SourceLocation,
    },

    /// Entry function not found
    #[error("No {name}() function found")]
    NoEntryFunction { name: String },

    /// Attempted to use an uninitialized value
    #[error("Read of uninitialized {what} at line {}", .location.line)]
    UninitializedRead {
        what: String,
        location: SourceLocation,
    },

    /// Dereference of a non-pointer or of released storage
    #[error("Invalid dereference of {value} at line {}", .location.line)]
    InvalidDereference {
        value: Value,
        location: SourceLocation,
    },

    /// Operand kinds an operator cannot combine
    #[error("Type error at line {}: {message}", .location.line)]
    TypeMismatch {
        message: String,
        location: SourceLocation,
    },

    /// Negative allocation size or heap limit exceeded
    #[error("Invalid allocation at line {}: {message}", .location.line)]
    InvalidAllocation {
        message: String,
        location: SourceLocation,
    },

    /// Call depth limit exceeded
    #[error("Stack overflow: call depth exceeded {depth} at line {}", .location.line)]
    StackOverflow {
        depth: usize,
        location: SourceLocation,
    },

    /// Read-integer failed
    #[error("Input error at line {}: {message}", .location.line)]
    Input {
        message: String,
        location: SourceLocation,
    },

    /// Writing program output failed
    #[error("Output error at line {}: {message}", .location.line)]
    Output {
        message: String,
        location: SourceLocation,
    },
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

impl RuntimeError {
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            RuntimeError::UnboundName { location, .. }
            | RuntimeError::ArityMismatch { location, .. }
            | RuntimeError::DivisionByZero { location, .. }
            | RuntimeError::InvalidFree { location, .. }
            | RuntimeError::UnsupportedConstruct { location, .. }
            | RuntimeError::UninitializedRead { location, .. }
            | RuntimeError::InvalidDereference { location, .. }
            | RuntimeError::TypeMismatch { location, .. }
            | RuntimeError::InvalidAllocation { location, .. }
            | RuntimeError::StackOverflow { location, .. }
            | RuntimeError::Input { location, .. }
            | RuntimeError::Output { location, .. } => Some(*location),
            RuntimeError::NoEntryFunction { .. } => None,
        }
    }

    /// Stable name of the error kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::UnboundName { .. } => "UnboundName",
            RuntimeError::ArityMismatch { .. } => "ArityMismatch",
            RuntimeError::DivisionByZero { .. } => "DivisionByZero",
            RuntimeError::InvalidFree { .. } => "InvalidFree",
            RuntimeError::UnsupportedConstruct { .. } => "UnsupportedConstruct",
            RuntimeError::NoEntryFunction { .. } => "NoEntryFunction",
            RuntimeError::UninitializedRead { .. } => "UninitializedRead",
            RuntimeError::InvalidDereference { .. } => "InvalidDereference",
            RuntimeError::TypeMismatch { .. } => "TypeMismatch",
            RuntimeError::InvalidAllocation { .. } => "InvalidAllocation",
            RuntimeError::StackOverflow { .. } => "StackOverflow",
            RuntimeError::Input { .. } => "Input",
            RuntimeError::Output { .. } => "Output",
        }
    }

    /// Attach a location to a heap failure
    pub fn from_heap(err: HeapError, location: SourceLocation) -> Self {
        match err {
            HeapError::OutOfMemory { .. } => RuntimeError::InvalidAllocation {
                message: err.to_string(),
                location,
            },
            HeapError::NotABlockBase(ptr) => RuntimeError::InvalidFree {
                value: Value::Pointer(ptr),
                location,
            },
            HeapError::Dangling(ptr) => RuntimeError::InvalidDereference {
                value: Value::Pointer(ptr),
                location,
            },
        }
    }

    pub(crate) fn unsupported(construct: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::UnsupportedConstruct {
            construct: construct.into(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::value::{Pointer, RegionId};

    #[test]
    fn test_messages() {
        let loc = SourceLocation::new(7, 3);

        let err = RuntimeError::DivisionByZero {
            operation: "Division by zero".to_string(),
            location: loc,
        };
        assert_eq!(err.to_string(), "Division by zero at line 7");

        let err = RuntimeError::ArityMismatch {
            function: "f".to_string(),
            expected: 1,
            got: 2,
            location: loc,
        };
        assert_eq!(err.to_string(), "Function 'f' expects 1 argument, got 2 at line 7");
        assert_eq!(err.kind(), "ArityMismatch");
    }

    #[test]
    fn test_heap_errors_map_to_kinds() {
        let loc = SourceLocation::new(2, 1);
        let ptr = Pointer::new(RegionId(0), 4);

        let err = RuntimeError::from_heap(HeapError::NotABlockBase(ptr), loc);
        assert_eq!(err.kind(), "InvalidFree");
        assert_eq!(err.location(), Some(loc));

        let err = RuntimeError::from_heap(HeapError::Dangling(ptr), loc);
        assert_eq!(err.kind(), "InvalidDereference");
    }

    #[test]
    fn test_entry_error_has_no_location() {
        let err = RuntimeError::NoEntryFunction {
            name: "main".to_string(),
        };
        assert_eq!(err.location(), None);
        assert_eq!(err.to_string(), "No main() function found");
    }
}
