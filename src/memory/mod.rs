//! Memory model for the interpreter
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Runtime value representation (Integer, Pointer, Uninitialized)
//! - [`stack`]: Call stack with frames, bindings and the expression cache
//! - [`heap`]: Region store for `MALLOC` blocks and array storage
//!
//! # Type Sizes
//!
//! Unlike real C, this interpreter uses fixed, platform-independent sizes:
//! - `int`: 4 bytes
//! - `char`: 1 byte
//! - `pointer`: 8 bytes (regardless of pointee type)
//! - `void` pointee: 1 byte, so `void *` arithmetic is byte arithmetic
//!
//! # Pointer Arithmetic
//!
//! Pointer arithmetic is scaled by pointee size:
//! ```text
//! ptr + n  →  ptr + (n * sizeof(*ptr))
//! ```
//!
//! Helper functions [`pointer_add`] and [`pointer_diff`] handle this scaling.

pub mod heap;
pub mod stack;
pub mod value;

use crate::interpreter::constants::{CHAR_SIZE, INT_SIZE, POINTER_SIZE, VOID_ELEMENT_SIZE};
use crate::parser::ast::{BaseType, Type};
use value::Pointer;

/// Calculate the size of a type in bytes, or `None` if an array's size
/// does not fit in `usize`
pub fn sizeof_type(t: &Type) -> Option<usize> {
    let element = if t.pointer_depth > 0 {
        POINTER_SIZE
    } else {
        match t.base {
            BaseType::Int => INT_SIZE,
            BaseType::Char => CHAR_SIZE,
            BaseType::Void => VOID_ELEMENT_SIZE,
        }
    };

    element.checked_mul(t.array_len.unwrap_or(1))
}

/// Stride of pointer arithmetic on a value of type `t`.
/// Falls back to 1 when `t` is not a pointer or array.
pub fn element_size(t: &Type) -> i64 {
    t.pointee()
        .and_then(|pointee| sizeof_type(&pointee))
        .and_then(|size| i64::try_from(size).ok())
        .unwrap_or(1)
}

/// Perform pointer arithmetic: ptr + n (scaled by element size)
pub fn pointer_add(ptr: Pointer, n: i64, element_size: i64) -> Pointer {
    ptr.offset_by(n.wrapping_mul(element_size))
}

/// Calculate the difference between two pointers (in elements, not bytes).
/// `None` if they point into different regions.
pub fn pointer_diff(a: Pointer, b: Pointer, element_size: i64) -> Option<i64> {
    if a.region != b.region {
        return None;
    }
    let bytes = a.offset.wrapping_sub(b.offset);
    Some(bytes / element_size.max(1))
}
