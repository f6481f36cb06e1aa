//! Call stack implementation
//!
//! This module provides the call stack for function execution:
//! - [`CallStack`]: The call stack containing frames
//! - [`Frame`]: A single function's activation record
//! - [`ReturnState`]: Whether the frame's function has executed `return`
//!
//! # Bindings and Cache
//!
//! A frame has exactly one flat binding scope keyed by [`DeclId`]; there is no
//! block-level shadowing. Alongside the bindings each frame keeps a cache of
//! the values of the expressions evaluated during the current statement,
//! keyed by [`NodeId`]. The cache is cleared whenever a new statement starts.
//!
//! # Root Frame
//!
//! The stack is never empty: a root frame hosting global initializers is
//! created with the stack and cannot be popped.

use super::value::{RegionId, Value};
use crate::interpreter::constants::GLOBAL_FRAME_NAME;
use crate::parser::ast::{DeclId, NodeId};
use rustc_hash::FxHashMap;

/// Return signal of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnState {
    #[default]
    Running,
    Returned(Value),
}

/// Stack frame for a function call
#[derive(Debug, Clone)]
pub struct Frame {
    pub function_name: String,
    bindings: FxHashMap<DeclId, Value>,
    cache: FxHashMap<NodeId, Value>,
    return_state: ReturnState,
    owned_regions: Vec<RegionId>, // Array storage released when the frame is popped
}

impl Frame {
    pub fn new(function_name: impl Into<String>) -> Self {
        Frame {
            function_name: function_name.into(),
            bindings: FxHashMap::default(),
            cache: FxHashMap::default(),
            return_state: ReturnState::Running,
            owned_regions: Vec::new(),
        }
    }

    /// Bind a declaration, replacing any earlier binding
    pub fn bind(&mut self, decl: DeclId, value: Value) {
        self.bindings.insert(decl, value);
    }

    pub fn lookup(&self, decl: DeclId) -> Option<Value> {
        self.bindings.get(&decl).copied()
    }

    /// Overwrite an existing binding. Returns false if `decl` is not bound here.
    pub fn assign(&mut self, decl: DeclId, value: Value) -> bool {
        match self.bindings.get_mut(&decl) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn cache_value(&mut self, node: NodeId, value: Value) {
        self.cache.insert(node, value);
    }

    /// Value of an expression evaluated during the current statement
    pub fn cached(&self, node: NodeId) -> Option<Value> {
        self.cache.get(&node).copied()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn return_state(&self) -> ReturnState {
        self.return_state
    }

    pub fn has_returned(&self) -> bool {
        matches!(self.return_state, ReturnState::Returned(_))
    }

    pub fn set_returned(&mut self, value: Value) {
        self.return_state = ReturnState::Returned(value);
    }

    /// The returned value, or `Uninitialized` if the function never returned
    pub fn return_value(&self) -> Value {
        match self.return_state {
            ReturnState::Returned(value) => value,
            ReturnState::Running => Value::Uninitialized,
        }
    }

    pub fn own_region(&mut self, region: RegionId) {
        self.owned_regions.push(region);
    }

    /// Stop owning `region`; false if this frame never owned it
    pub fn disown_region(&mut self, region: RegionId) -> bool {
        match self.owned_regions.iter().position(|owned| *owned == region) {
            Some(index) => {
                self.owned_regions.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn take_owned_regions(&mut self) -> Vec<RegionId> {
        std::mem::take(&mut self.owned_regions)
    }
}

/// The call stack
#[derive(Debug, Clone)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    /// Create a stack holding only the root frame
    pub fn new() -> Self {
        CallStack {
            frames: vec![Frame::new(GLOBAL_FRAME_NAME)],
        }
    }

    /// Push a new stack frame
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pop the top stack frame. The root frame is never popped.
    pub fn pop(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Get the current (top) frame
    pub fn current(&self) -> &Frame {
        // The root frame guarantees a last element
        &self.frames[self.frames.len() - 1]
    }

    /// Get a mutable reference to the current frame
    pub fn current_mut(&mut self) -> &mut Frame {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    /// All frames, root first
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of active function calls (the root frame is not counted)
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_frame_cannot_be_popped() {
        let mut stack = CallStack::new();

        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current().function_name, GLOBAL_FRAME_NAME);
        assert!(stack.pop().is_none());
        assert_eq!(stack.frames().len(), 1);
    }

    #[test]
    fn test_push_and_pop() {
        let mut stack = CallStack::new();
        stack.push(Frame::new("main"));
        stack.push(Frame::new("fact"));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current().function_name, "fact");
        assert_eq!(stack.pop().unwrap().function_name, "fact");
        assert_eq!(stack.current().function_name, "main");
    }

    #[test]
    fn test_bindings() {
        let mut frame = Frame::new("f");

        assert!(!frame.assign(0, Value::Integer(1)));
        frame.bind(0, Value::Uninitialized);
        assert!(frame.assign(0, Value::Integer(1)));
        assert_eq!(frame.lookup(0), Some(Value::Integer(1)));
        assert_eq!(frame.lookup(1), None);
        assert_eq!(frame.binding_count(), 1);
    }

    #[test]
    fn test_cache_cleared_per_statement() {
        let mut frame = Frame::new("f");
        frame.cache_value(3, Value::Integer(8));

        assert_eq!(frame.cached(3), Some(Value::Integer(8)));
        frame.clear_cache();
        assert_eq!(frame.cached(3), None);
    }

    #[test]
    fn test_return_state() {
        let mut frame = Frame::new("f");

        assert_eq!(frame.return_state(), ReturnState::Running);
        assert_eq!(frame.return_value(), Value::Uninitialized);
        frame.set_returned(Value::Integer(120));
        assert!(frame.has_returned());
        assert_eq!(frame.return_value(), Value::Integer(120));
    }

    #[test]
    fn test_owned_regions() {
        let mut frame = Frame::new("f");
        frame.own_region(RegionId(4));

        assert_eq!(frame.take_owned_regions(), vec![RegionId(4)]);
        assert!(frame.take_owned_regions().is_empty());
    }

    #[test]
    fn test_disown_region() {
        let mut frame = Frame::new("f");
        frame.own_region(RegionId(1));
        frame.own_region(RegionId(2));

        assert!(frame.disown_region(RegionId(1)));
        assert!(!frame.disown_region(RegionId(1)));
        assert!(!frame.disown_region(RegionId(7)));
        assert_eq!(frame.take_owned_regions(), vec![RegionId(2)]);
    }
}
