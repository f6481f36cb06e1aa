//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime values
//! in the interpreter. Unlike C's raw memory model, values are tagged.
//!
//! # Value Types
//!
//! - [`Value::Integer`]: 64-bit signed integer (`int` and `char` alike)
//! - [`Value::Pointer`]: a region plus a byte offset into it
//! - [`Value::Uninitialized`]: Marker for a variable or cell never written
//!
//! # Initialization Tracking
//!
//! The `Uninitialized` variant may be copied around freely but using it as an
//! operand is a runtime error, so reads of uninitialized memory are caught.

use std::fmt;

/// Identifies one storage region: a heap block or the backing store of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(pub u32);

/// A pointer into a region. Pointers are never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pointer {
    pub region: RegionId,
    /// Offset in bytes from the start of the region
    pub offset: i64,
}

impl Pointer {
    pub fn new(region: RegionId, offset: i64) -> Self {
        Pointer { region, offset }
    }

    /// The same pointer moved by `bytes`
    pub fn offset_by(self, bytes: i64) -> Self {
        Pointer {
            region: self.region,
            offset: self.offset.wrapping_add(bytes),
        }
    }
}

/// Runtime values in the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    Integer(i64),
    Pointer(Pointer),
    #[default]
    Uninitialized,
}

impl Value {
    /// Check if this value is initialized
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Value::Uninitialized)
    }

    /// Get the integer value, returns None if not an Integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the pointer value, returns None if not a Pointer
    pub fn as_pointer(&self) -> Option<Pointer> {
        match self {
            Value::Pointer(ptr) => Some(*ptr),
            _ => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Value::Pointer(_))
    }

    /// C truthiness: non-zero integers and every pointer are true.
    /// `None` for `Uninitialized`.
    pub fn truthy(&self) -> Option<bool> {
        match self {
            Value::Integer(n) => Some(*n != 0),
            Value::Pointer(_) => Some(true),
            Value::Uninitialized => None,
        }
    }

    /// Short name of the variant, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Pointer(_) => "pointer",
            Value::Uninitialized => "uninitialized value",
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(b as i64)
    }
}

impl From<Pointer> for Value {
    fn from(ptr: Pointer) -> Self {
        Value::Pointer(ptr)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<region {}+{}>", self.region.0, self.offset)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Pointer(ptr) => write!(f, "{}", ptr),
            Value::Uninitialized => write!(f, "<uninitialized>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert_eq!(Value::Integer(0).truthy(), Some(false));
        assert_eq!(Value::Integer(-3).truthy(), Some(true));
        assert_eq!(
            Value::Pointer(Pointer::new(RegionId(0), 0)).truthy(),
            Some(true)
        );
        assert_eq!(Value::Uninitialized.truthy(), None);
    }

    #[test]
    fn test_default_is_uninitialized() {
        assert!(!Value::default().is_initialized());
        assert_eq!(Value::from(true), Value::Integer(1));
    }

    #[test]
    fn test_display() {
        let ptr = Pointer::new(RegionId(2), 8);
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::Pointer(ptr).to_string(), "<region 2+8>");
        assert_eq!(ptr.offset_by(-4).offset, 4);
    }
}
