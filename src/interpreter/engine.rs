// Execution engine for the interpreter

use crate::interpreter::config::InterpreterConfig;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::globals::GlobalEnvironment;
use crate::memory::{heap::Heap, stack::CallStack, value::Value};
use crate::parser::ast::{Program, SourceLocation};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::rc::Rc;

/// Minimum stack space to keep available before recursing (100KB red zone)
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB)
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the host stack first if it is nearly exhausted
#[inline]
pub(crate) fn ensure_sufficient_stack<T>(f: impl FnOnce() -> T) -> T {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// The main interpreter that executes a resolved program
///
/// Owns every piece of mutable execution state; all evaluation goes through
/// `&mut self`, so one interpreter is only ever driven by one caller at a time.
pub struct Interpreter<R, W> {
    /// Resolved program. Shared so the tree can be walked while `self` is mutated.
    pub(crate) program: Rc<Program>,

    /// Call stack, never empty
    pub(crate) stack: CallStack,

    /// Heap blocks and array storage
    pub(crate) heap: Heap,

    /// Global variables and the function table
    pub(crate) globals: GlobalEnvironment,

    /// Source of integers for `GET`
    input: R,

    /// Tokens read from `input` but not consumed yet
    pending_input: VecDeque<String>,

    /// Sink for `PRINT`
    pub(crate) output: W,

    pub(crate) config: InterpreterConfig,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Create an interpreter with the default configuration
    pub fn new(program: Program, input: R, output: W) -> Self {
        Self::with_config(program, input, output, InterpreterConfig::default())
    }

    pub fn with_config(program: Program, input: R, output: W, config: InterpreterConfig) -> Self {
        let globals = GlobalEnvironment::new(&program, &config.entry_point);

        Interpreter {
            program: Rc::new(program),
            stack: CallStack::new(),
            heap: Heap::new(config.heap_limit),
            globals,
            input,
            pending_input: VecDeque::new(),
            output,
            config,
        }
    }

    /// Run the program from start to finish
    ///
    /// Global declarations are evaluated in source order in the root frame,
    /// then the entry function is called with no arguments. Returns the entry
    /// function's return value (`Uninitialized` if it never returns).
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        let program = Rc::clone(&self.program);
        tracing::info!(entry = %self.config.entry_point, "run started");

        for decl in &program.globals {
            self.stack.current_mut().clear_cache();
            self.declare_variable(decl)?;
        }

        let entry = self
            .globals
            .entry()
            .map(|index| &program.functions[index])
            .filter(|function| function.body.is_some())
            .ok_or_else(|| RuntimeError::NoEntryFunction {
                name: self.config.entry_point.clone(),
            })?;

        let value = self.call_function(entry, Vec::new(), entry.location)?;

        self.output.flush().map_err(|err| RuntimeError::Output {
            message: err.to_string(),
            location: entry.location,
        })?;

        tracing::info!(
            result = %value,
            live_blocks = self.heap.block_count(),
            "run finished"
        );
        Ok(value)
    }

    /// Read the next whitespace-delimited integer from the input stream
    pub(crate) fn read_integer(&mut self, location: SourceLocation) -> Result<i64, RuntimeError> {
        loop {
            if let Some(token) = self.pending_input.pop_front() {
                return token.parse::<i64>().map_err(|_| RuntimeError::Input {
                    message: format!("expected an integer, found '{}'", token),
                    location,
                });
            }

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|err| RuntimeError::Input {
                    message: err.to_string(),
                    location,
                })?;
            if read == 0 {
                return Err(RuntimeError::Input {
                    message: "no integer left in input".to_string(),
                    location,
                });
            }
            self.pending_input
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    // ===== Accessors =====

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn globals(&self) -> &GlobalEnvironment {
        &self.globals
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }
}
