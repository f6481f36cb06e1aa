//! Unary operator evaluation

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub(crate) fn evaluate_unary(
        &mut self,
        op: UnOp,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        use UnOp::*;

        match op {
            Neg | Not | BitNot => {
                let value = self.evaluate_expr(operand)?;
                apply_unary(op, value, location)
            }
            PreInc => self.evaluate_increment(operand, 1, false, location),
            PreDec => self.evaluate_increment(operand, -1, false, location),
            PostInc => self.evaluate_increment(operand, 1, true, location),
            PostDec => self.evaluate_increment(operand, -1, true, location),
            Deref => {
                let ptr = self.evaluate_pointer_operand(operand, location)?;
                self.heap
                    .read(ptr)
                    .map_err(|err| RuntimeError::from_heap(err, location))
            }
            AddrOf => Err(RuntimeError::unsupported("address-of operator", location)),
        }
    }
}

/// Apply `-`, `!` or `~` to a value
fn apply_unary(op: UnOp, value: Value, location: SourceLocation) -> Result<Value, RuntimeError> {
    match (op, value) {
        (_, Value::Uninitialized) => Err(RuntimeError::UninitializedRead {
            what: "operand of unary operator".to_string(),
            location,
        }),
        (UnOp::Neg, Value::Integer(n)) => Ok(Value::Integer(n.wrapping_neg())),
        (UnOp::BitNot, Value::Integer(n)) => Ok(Value::Integer(!n)),
        (UnOp::Not, Value::Integer(n)) => Ok((n == 0).into()),
        (UnOp::Not, Value::Pointer(_)) => Ok(false.into()),
        _ => Err(RuntimeError::TypeMismatch {
            message: format!("unary operator cannot be applied to {}", value.kind_name()),
            location,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::value::{Pointer, RegionId};

    const LOC: SourceLocation = SourceLocation { line: 3, column: 1 };

    #[test]
    fn test_integer_unary() {
        assert_eq!(apply_unary(UnOp::Neg, Value::Integer(5), LOC), Ok(Value::Integer(-5)));
        assert_eq!(apply_unary(UnOp::BitNot, Value::Integer(0), LOC), Ok(Value::Integer(-1)));
        assert_eq!(apply_unary(UnOp::Not, Value::Integer(0), LOC), Ok(Value::Integer(1)));
        assert_eq!(apply_unary(UnOp::Not, Value::Integer(9), LOC), Ok(Value::Integer(0)));
    }

    #[test]
    fn test_pointer_unary() {
        let ptr = Value::Pointer(Pointer::new(RegionId(0), 0));

        assert_eq!(apply_unary(UnOp::Not, ptr, LOC), Ok(Value::Integer(0)));
        assert!(matches!(
            apply_unary(UnOp::Neg, ptr, LOC),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_uninitialized_operand() {
        assert!(matches!(
            apply_unary(UnOp::Neg, Value::Uninitialized, LOC),
            Err(RuntimeError::UninitializedRead { .. })
        ));
    }
}
