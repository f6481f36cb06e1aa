//! Tree-walking execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter, owning the stack, heap and globals
//! - [`statements`] and [`loops`]: Statement execution
//! - [`expressions`] and [`ops`]: Expression evaluation and calls
//! - [`builtins`]: `GET`, `PRINT`, `MALLOC` and `FREE`
//! - [`globals`]: Global bindings and the function table
//! - [`config`]: Runtime limits and the entry point
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! The interpreter walks the resolved AST directly. Each function call pushes
//! a [`crate::memory::stack::Frame`]; a `return` marks the frame as returned
//! and every later statement in that frame is skipped.

pub mod builtins;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod expressions;
pub mod globals;
pub mod loops;
pub mod ops;
pub mod statements;
