//! Interpreter configuration
//!
//! Runtime limits and the entry point of a run.
//! Configuration specifies constraints only; enforcement is handled by the engine.

use super::constants::{DEFAULT_ENTRY_POINT, DEFAULT_HEAP_LIMIT, DEFAULT_MAX_CALL_DEPTH};

/// Interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Function invoked with no arguments after globals are initialized
    pub entry_point: String,

    /// Maximum number of nested function calls
    pub max_call_depth: usize,

    /// Maximum bytes held by heap blocks and arrays together
    pub heap_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            heap_limit: DEFAULT_HEAP_LIMIT,
        }
    }
}

impl InterpreterConfig {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn with_heap_limit(mut self, heap_limit: usize) -> Self {
        self.heap_limit = heap_limit;
        self
    }
}
