//! Pure arithmetic tools: `multiply` and `remainder`.
//!
//! Integer operands stay integral (JSON `350`, not `350.0`); any float
//! operand switches the computation to f64.

use super::registry::ToolDefinition;
use super::schema::{ParamDef, ParamType, ToolArgs, ToolSchema};
use crate::types::ToolError;
use serde_json::{Number, Value};

pub const MULTIPLY: &str = "multiply";
pub const REMAINDER: &str = "remainder";

/// Operand pair of a binary numeric tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operands {
    Int(i64, i64),
    Float(f64, f64),
}

impl Operands {
    fn from_numbers(a: &Number, b: &Number) -> Self {
        match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Operands::Int(a, b),
            _ => Operands::Float(to_f64(a), to_f64(b)),
        }
    }

    fn from_args(args: &ToolArgs) -> Result<Self, ToolError> {
        Ok(Self::from_numbers(args.number("a")?, args.number("b")?))
    }
}

// Every serde_json number converts to f64 without the arbitrary_precision feature.
fn to_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn float_value(tool: &str, x: f64) -> Result<Value, ToolError> {
    Number::from_f64(x)
        .map(Value::Number)
        .ok_or_else(|| ToolError::argument(tool, format!("result {} is not a finite number", x)))
}

// JSON has no infinity; an overflowing product is reported as `null`.
fn product_value(x: f64) -> Value {
    Number::from_f64(x).map_or(Value::Null, Value::Number)
}

/// `a * b`. Never fails: integer products that overflow i64 fall back to
/// f64, and f64 products beyond the finite range become `null`.
pub fn multiply(ops: Operands) -> Result<Value, ToolError> {
    Ok(match ops {
        Operands::Int(a, b) => match a.checked_mul(b) {
            Some(product) => Value::from(product),
            None => product_value(a as f64 * b as f64),
        },
        Operands::Float(a, b) => product_value(a * b),
    })
}

/// Truncating remainder `a % b`; the sign follows the dividend.
pub fn remainder(ops: Operands) -> Result<Value, ToolError> {
    match ops {
        Operands::Int(_, 0) => Err(ToolError::DivisionByZero),
        // i64::MIN % -1 overflows; the mathematical answer is 0.
        Operands::Int(a, b) => Ok(Value::from(a.checked_rem(b).unwrap_or(0))),
        Operands::Float(_, b) if b == 0.0 => Err(ToolError::DivisionByZero),
        Operands::Float(a, b) => float_value(REMAINDER, a % b),
    }
}

fn pair_schema() -> ToolSchema {
    ToolSchema::new(vec![
        ParamDef::new("a", ParamType::Number, "First number"),
        ParamDef::new("b", ParamType::Number, "Second number"),
    ])
}

pub fn multiply_tool() -> ToolDefinition {
    ToolDefinition::from_fn(MULTIPLY, "Multiply two numbers", pair_schema(), |args| {
        multiply(Operands::from_args(args)?)
    })
}

pub fn remainder_tool() -> ToolDefinition {
    ToolDefinition::from_fn(
        REMAINDER,
        "Find the remainder of two numbers",
        pair_schema(),
        |args| remainder(Operands::from_args(args)?),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_multiply_integers() {
        assert_eq!(multiply(Operands::Int(7, 50)).unwrap(), json!(350));
        assert_eq!(multiply(Operands::Int(25, 18)).unwrap(), json!(450));
    }

    #[test]
    fn test_multiply_overflow_falls_back_to_float() {
        let product = multiply(Operands::Int(i64::MAX, 2)).unwrap();
        assert!(product.is_f64());
    }

    #[test]
    fn test_multiply_float_overflow_is_null_success() {
        assert_eq!(multiply(Operands::Float(1e200, 1e200)), Ok(Value::Null));
        assert_eq!(multiply(Operands::Float(-1e200, 1e200)), Ok(Value::Null));
    }

    #[test]
    fn test_multiply_floats() {
        assert_eq!(multiply(Operands::Float(1.5, 4.0)).unwrap(), json!(6.0));
    }

    #[test]
    fn test_remainder_cases() {
        assert_eq!(remainder(Operands::Int(15, 4)).unwrap(), json!(3));
        assert_eq!(remainder(Operands::Int(15, 15)).unwrap(), json!(0));
        assert_eq!(remainder(Operands::Int(-7, 3)).unwrap(), json!(-1));
        assert_eq!(remainder(Operands::Int(i64::MIN, -1)).unwrap(), json!(0));
        assert_eq!(remainder(Operands::Float(7.5, 2.0)).unwrap(), json!(1.5));
    }

    #[test]
    fn test_remainder_by_zero() {
        assert_eq!(remainder(Operands::Int(5, 0)), Err(ToolError::DivisionByZero));
        assert_eq!(remainder(Operands::Float(5.0, 0.0)), Err(ToolError::DivisionByZero));
        assert_eq!(remainder(Operands::Float(5.0, -0.0)), Err(ToolError::DivisionByZero));
    }

    #[test]
    fn test_mixed_operands_use_float() {
        let a = Number::from(7);
        let b = Number::from_f64(2.5).unwrap();
        assert_eq!(Operands::from_numbers(&a, &b), Operands::Float(7.0, 2.5));
    }

    proptest! {
        #[test]
        fn prop_multiply_is_deterministic(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(multiply(Operands::Int(a, b)), multiply(Operands::Int(a, b)));
        }

        #[test]
        fn prop_remainder_by_zero_always_fails(a in any::<i64>()) {
            prop_assert_eq!(remainder(Operands::Int(a, 0)), Err(ToolError::DivisionByZero));
        }

        #[test]
        fn prop_remainder_truncates(a in any::<i64>(), b in any::<i64>().prop_filter("non-zero", |b| *b != 0)) {
            let expected = a.wrapping_rem(b);
            prop_assert_eq!(remainder(Operands::Int(a, b)).unwrap(), json!(expected));
            // |a % b| < |b| and the sign follows the dividend
            prop_assert!(expected.unsigned_abs() < b.unsigned_abs());
            prop_assert!(expected == 0 || (expected < 0) == (a < 0));
        }
    }
}
