//! Binary operator evaluation
//!
//! Operands are evaluated left to right; the operator itself is the pure
//! function [`apply_binary`], shared with compound assignment.
//!
//! Integer arithmetic wraps on overflow and shifts use the low 6 bits of the
//! right operand. `&&` and `||` evaluate both sides. Pointer arithmetic is
//! scaled by the element size of the pointer operand's static type.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{Pointer, Value};
use crate::memory::{pointer_add, pointer_diff};
use crate::parser::ast::{BinOp, Expr, SourceLocation};
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub(crate) fn evaluate_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let lhs = self.evaluate_expr(left)?;
        let rhs = self.evaluate_expr(right)?;

        let strides = (self.stride_of(left.id), self.stride_of(right.id));
        apply_binary(op, lhs, rhs, strides, location)
    }
}

/// Apply a non-assignment binary operator to two values.
///
/// `strides` holds the element sizes used when the left or right operand
/// is a pointer.
pub(crate) fn apply_binary(
    op: BinOp,
    lhs: Value,
    rhs: Value,
    strides: (i64, i64),
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => integer_op(op, a, b, location),

        (Value::Pointer(p), Value::Integer(n)) => match op {
            BinOp::Add => Ok(pointer_add(p, n, strides.0).into()),
            BinOp::Sub => Ok(pointer_add(p, n.wrapping_neg(), strides.0).into()),
            // Pointers are never null, so they never equal an integer
            BinOp::Eq => Ok(false.into()),
            BinOp::Ne => Ok(true.into()),
            BinOp::And => Ok((n != 0).into()),
            BinOp::Or => Ok(true.into()),
            _ => Err(mismatch(op, lhs, rhs, location)),
        },

        (Value::Integer(n), Value::Pointer(p)) => match op {
            BinOp::Add => Ok(pointer_add(p, n, strides.1).into()),
            BinOp::Eq => Ok(false.into()),
            BinOp::Ne => Ok(true.into()),
            BinOp::And => Ok((n != 0).into()),
            BinOp::Or => Ok(true.into()),
            _ => Err(mismatch(op, lhs, rhs, location)),
        },

        (Value::Pointer(a), Value::Pointer(b)) => pointer_op(op, a, b, strides.0, location),

        _ => Err(RuntimeError::UninitializedRead {
            what: format!("operand of '{}'", op.symbol()),
            location,
        }),
    }
}

fn integer_op(op: BinOp, a: i64, b: i64, location: SourceLocation) -> Result<Value, RuntimeError> {
    let result = match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero {
                    operation: "Division by zero".to_string(),
                    location,
                });
            }
            a.wrapping_div(b)
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero {
                    operation: "Modulo by zero".to_string(),
                    location,
                });
            }
            a.wrapping_rem(b)
        }
        BinOp::Eq => (a == b) as i64,
        BinOp::Ne => (a != b) as i64,
        BinOp::Lt => (a < b) as i64,
        BinOp::Le => (a <= b) as i64,
        BinOp::Gt => (a > b) as i64,
        BinOp::Ge => (a >= b) as i64,
        BinOp::And => (a != 0 && b != 0) as i64,
        BinOp::Or => (a != 0 || b != 0) as i64,
        BinOp::BitAnd => a & b,
        BinOp::BitOr => a | b,
        BinOp::BitXor => a ^ b,
        BinOp::BitShl => a.wrapping_shl((b & 63) as u32),
        BinOp::BitShr => a.wrapping_shr((b & 63) as u32),
        BinOp::Assign
        | BinOp::AddAssign
        | BinOp::SubAssign
        | BinOp::MulAssign
        | BinOp::DivAssign
        | BinOp::ModAssign => {
            return Err(RuntimeError::unsupported(
                format!("'{}' as a pure operator", op.symbol()),
                location,
            ));
        }
    };

    Ok(Value::Integer(result))
}

fn pointer_op(
    op: BinOp,
    a: Pointer,
    b: Pointer,
    stride: i64,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let same_region = a.region == b.region;

    match op {
        BinOp::Sub => pointer_diff(a, b, stride)
            .map(Value::Integer)
            .ok_or_else(|| RuntimeError::TypeMismatch {
                message: "subtraction of pointers into different regions".to_string(),
                location,
            }),
        BinOp::Eq => Ok((a == b).into()),
        BinOp::Ne => Ok((a != b).into()),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge if same_region => {
            let result = match op {
                BinOp::Lt => a.offset < b.offset,
                BinOp::Le => a.offset <= b.offset,
                BinOp::Gt => a.offset > b.offset,
                _ => a.offset >= b.offset,
            };
            Ok(result.into())
        }
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => Err(RuntimeError::TypeMismatch {
            message: "comparison of pointers into different regions".to_string(),
            location,
        }),
        BinOp::And | BinOp::Or => Ok(true.into()),
        _ => Err(mismatch(op, Value::Pointer(a), Value::Pointer(b), location)),
    }
}

fn mismatch(op: BinOp, lhs: Value, rhs: Value, location: SourceLocation) -> RuntimeError {
    RuntimeError::TypeMismatch {
        message: format!(
            "operator '{}' cannot combine {} and {}",
            op.symbol(),
            lhs.kind_name(),
            rhs.kind_name()
        ),
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::value::RegionId;

    const LOC: SourceLocation = SourceLocation { line: 1, column: 1 };

    fn int_op(op: BinOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
        apply_binary(op, Value::Integer(a), Value::Integer(b), (1, 1), LOC)
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(int_op(BinOp::Add, 5, 3), Ok(Value::Integer(8)));
        assert_eq!(int_op(BinOp::Div, -7, 2), Ok(Value::Integer(-3)));
        assert_eq!(int_op(BinOp::Mod, -7, 2), Ok(Value::Integer(-1)));
        assert_eq!(int_op(BinOp::Add, i64::MAX, 1), Ok(Value::Integer(i64::MIN)));
        assert_eq!(int_op(BinOp::BitShl, 1, 65), Ok(Value::Integer(2)));
        assert_eq!(int_op(BinOp::And, 2, 0), Ok(Value::Integer(0)));
        assert_eq!(int_op(BinOp::Or, 0, -1), Ok(Value::Integer(1)));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            int_op(BinOp::Div, 1, 0),
            Err(RuntimeError::DivisionByZero { .. })
        ));
        assert!(matches!(
            int_op(BinOp::Mod, 1, 0),
            Err(RuntimeError::DivisionByZero { ref operation, .. }) if operation == "Modulo by zero"
        ));
    }

    #[test]
    fn test_pointer_arithmetic_scales() {
        let p = Pointer::new(RegionId(0), 4);

        assert_eq!(
            apply_binary(BinOp::Add, p.into(), Value::Integer(2), (4, 1), LOC),
            Ok(Value::Pointer(Pointer::new(RegionId(0), 12)))
        );
        assert_eq!(
            apply_binary(BinOp::Add, Value::Integer(1), p.into(), (1, 8), LOC),
            Ok(Value::Pointer(Pointer::new(RegionId(0), 12)))
        );
        assert_eq!(
            apply_binary(BinOp::Sub, p.into(), Value::Integer(1), (4, 1), LOC),
            Ok(Value::Pointer(Pointer::new(RegionId(0), 0)))
        );
    }

    #[test]
    fn test_pointer_difference() {
        let a = Pointer::new(RegionId(0), 12);
        let b = Pointer::new(RegionId(0), 4);
        let other = Pointer::new(RegionId(1), 0);

        assert_eq!(
            apply_binary(BinOp::Sub, a.into(), b.into(), (4, 4), LOC),
            Ok(Value::Integer(2))
        );
        assert!(matches!(
            apply_binary(BinOp::Sub, a.into(), other.into(), (4, 4), LOC),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_pointer_comparisons() {
        let a = Pointer::new(RegionId(0), 0);
        let b = Pointer::new(RegionId(0), 4);

        assert_eq!(
            apply_binary(BinOp::Lt, a.into(), b.into(), (4, 4), LOC),
            Ok(Value::Integer(1))
        );
        assert_eq!(
            apply_binary(BinOp::Eq, a.into(), Value::Integer(0), (4, 1), LOC),
            Ok(Value::Integer(0))
        );
        assert!(matches!(
            apply_binary(BinOp::Mul, a.into(), b.into(), (4, 4), LOC),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_uninitialized_operand() {
        assert!(matches!(
            apply_binary(BinOp::Add, Value::Uninitialized, Value::Integer(1), (1, 1), LOC),
            Err(RuntimeError::UninitializedRead { .. })
        ));
    }
}
