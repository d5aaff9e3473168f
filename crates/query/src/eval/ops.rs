//! Operator semantics over values.

use crate::ast::Operator;
use crate::error::{QueryError, QueryResult};
use alloc::string::String;
use core::cmp::Ordering;
use sift_core::Value;

/// Applies a comparison operator. Ordering comparisons involving null are false;
/// equality treats two nulls as equal, like the hash index does.
///
/// Equality is `Value` equality, so an `Int64` never equals a `Float64`. Ordering
/// compares mixed integers and floats by magnitude only: `1 <= 1.0` and
/// `1 >= 1.0` both hold.
pub(super) fn compare(op: Operator, left: &Value, right: &Value) -> bool {
    match op {
        Operator::Eq => left == right,
        Operator::Ne => left != right,
        _ if left.is_null() || right.is_null() => false,
        Operator::Lt => order(left, right) == Ordering::Less,
        Operator::Le => order(left, right) != Ordering::Greater,
        Operator::Gt => order(left, right) == Ordering::Greater,
        Operator::Ge => order(left, right) != Ordering::Less,
        _ => false,
    }
}

fn order(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Int64(a), Value::Float64(b)) => cmp_magnitude(*a as f64, *b),
        (Value::Float64(a), Value::Int64(b)) => cmp_magnitude(*a, *b as f64),
        _ => left.cmp(right),
    }
}

fn cmp_magnitude(a: f64, b: f64) -> Ordering {
    // NaN sorts above every number, as in `Value`'s order
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Applies an arithmetic operator. Null operands propagate; mixing integers and
/// floats widens to float; `+` on two strings concatenates.
pub(super) fn arithmetic(op: Operator, left: Value, right: Value) -> QueryResult<Value> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
        (Value::Int64(a), Value::Int64(b)) => int_arithmetic(op, a, b),
        (Value::Int64(a), Value::Float64(b)) => Ok(float_arithmetic(op, a as f64, b)),
        (Value::Float64(a), Value::Int64(b)) => Ok(float_arithmetic(op, a, b as f64)),
        (Value::Float64(a), Value::Float64(b)) => Ok(float_arithmetic(op, a, b)),
        (Value::String(a), Value::String(b)) if op == Operator::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(&a);
            joined.push_str(&b);
            Ok(Value::String(joined))
        }
        (left, right) => {
            let value = if left.data_type().map_or(false, |t| t.is_numeric()) {
                right
            } else {
                left
            };
            Err(QueryError::InvalidOperand { op, value })
        }
    }
}

fn int_arithmetic(op: Operator, a: i64, b: i64) -> QueryResult<Value> {
    if matches!(op, Operator::Div | Operator::Mod) && b == 0 {
        return Err(QueryError::DivisionByZero);
    }
    let result = match op {
        Operator::Add => a.checked_add(b),
        Operator::Sub => a.checked_sub(b),
        Operator::Mul => a.checked_mul(b),
        Operator::Div => a.checked_div(b),
        Operator::Mod => a.checked_rem(b),
        _ => return Err(QueryError::InvalidOperand { op, value: Value::Int64(a) }),
    };
    result.map(Value::Int64).ok_or(QueryError::Overflow { op })
}

fn float_arithmetic(op: Operator, a: f64, b: f64) -> Value {
    Value::Float64(match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => a / b,
        Operator::Mod => a % b,
        _ => f64::NAN,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_nulls() {
        assert!(compare(Operator::Eq, &Value::Null, &Value::Null));
        assert!(!compare(Operator::Lt, &Value::Null, &Value::Int64(1)));
        assert!(!compare(Operator::Ge, &Value::Int64(1), &Value::Null));
        assert!(compare(Operator::Ne, &Value::Null, &Value::Int64(1)));
    }

    #[test]
    fn test_compare_mixed_numbers() {
        let one = Value::Int64(1);
        let one_f = Value::Float64(1.0);
        assert!(compare(Operator::Lt, &one, &Value::Float64(1.5)));
        assert!(!compare(Operator::Lt, &one, &one_f));
        assert!(!compare(Operator::Gt, &one_f, &one));
        assert!(compare(Operator::Le, &one, &one_f));
        assert!(compare(Operator::Ge, &one, &one_f));
        assert!(compare(Operator::Ge, &one_f, &one));
        assert!(compare(Operator::Gt, &Value::Float64(2.5), &Value::Int64(2)));
        assert!(compare(Operator::Lt, &Value::Int64(3), &Value::Float64(f64::NAN)));
        // Equality stays strict so that it agrees with hash index keys.
        assert!(!compare(Operator::Eq, &one, &one_f));
        assert!(compare(Operator::Ne, &one, &one_f));
    }

    #[test]
    fn test_int_arithmetic() {
        assert_eq!(
            arithmetic(Operator::Add, Value::Int64(2), Value::Int64(3)),
            Ok(Value::Int64(5))
        );
        assert_eq!(
            arithmetic(Operator::Mod, Value::Int64(7), Value::Int64(4)),
            Ok(Value::Int64(3))
        );
        assert_eq!(
            arithmetic(Operator::Div, Value::Int64(7), Value::Int64(0)),
            Err(QueryError::DivisionByZero)
        );
        assert_eq!(
            arithmetic(Operator::Mul, Value::Int64(i64::MAX), Value::Int64(2)),
            Err(QueryError::Overflow { op: Operator::Mul })
        );
    }

    #[test]
    fn test_float_and_mixed_arithmetic() {
        assert_eq!(
            arithmetic(Operator::Add, Value::Int64(1), Value::Float64(0.5)),
            Ok(Value::Float64(1.5))
        );
        assert_eq!(
            arithmetic(Operator::Div, Value::Float64(1.0), Value::Int64(4)),
            Ok(Value::Float64(0.25))
        );
    }

    #[test]
    fn test_null_propagates() {
        assert_eq!(
            arithmetic(Operator::Sub, Value::Null, Value::Int64(1)),
            Ok(Value::Null)
        );
    }

    #[test]
    fn test_string_concat_and_errors() {
        assert_eq!(
            arithmetic(Operator::Add, Value::from("ab"), Value::from("cd")),
            Ok(Value::from("abcd"))
        );
        assert_eq!(
            arithmetic(Operator::Sub, Value::from("ab"), Value::from("cd")),
            Err(QueryError::InvalidOperand {
                op: Operator::Sub,
                value: Value::from("ab"),
            })
        );
        assert_eq!(
            arithmetic(Operator::Add, Value::Int64(1), Value::Boolean(true)),
            Err(QueryError::InvalidOperand {
                op: Operator::Add,
                value: Value::Boolean(true),
            })
        );
    }
}
