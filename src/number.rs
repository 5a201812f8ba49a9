use std::cmp::Ordering;

use num::Zero;

use crate::ast::Operator;
use crate::error::Error;
use crate::value::Value;

fn type_error(op: Operator, expected: &'static str, value: &Value) -> Error {
    Error::TypeError {
        operator: op.to_string(),
        expected,
        value: format!("{:?}", value),
    }
}

fn expect_number(op: Operator, value: &Value) -> Result<f64, Error> {
    value.as_number().ok_or_else(|| type_error(op, "number", value))
}

fn nonzero(n: f64) -> Result<f64, Error> {
    if n.is_zero() {
        Err(Error::DivisionByZero)
    } else {
        Ok(n)
    }
}

/// `+ - * / %` on two numbers.
pub fn arithmetic(op: Operator, lhs: &Value, rhs: &Value)
    -> Result<Value, Error> {

    let a = expect_number(op, lhs)?;
    let b = expect_number(op, rhs)?;
    let n = match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => a / nonzero(b)?,
        Operator::Rem => a % nonzero(b)?,
        _ => return Err(type_error(op, "arithmetic", lhs)),
    };
    Ok(Value::number(n))
}

/// `< > <= >=` on two numbers.
pub fn compare(op: Operator, lhs: &Value, rhs: &Value)
    -> Result<Value, Error> {

    let a = expect_number(op, lhs)?;
    let b = expect_number(op, rhs)?;
    // NaN is unordered: every comparison is false.
    let result = a.partial_cmp(&b).map_or(false, |ord| match op {
        Operator::Less => ord == Ordering::Less,
        Operator::Greater => ord == Ordering::Greater,
        Operator::LessEqual => ord != Ordering::Greater,
        Operator::GreaterEqual => ord != Ordering::Less,
        _ => false,
    });
    Ok(Value::boolean(result))
}

#[cfg(test)]
mod test {
    use crate::ast::Operator;
    use crate::error::Error;
    use crate::value::Value;
    use super::{arithmetic, compare};

    fn n(x: f64) -> Value {
        Value::number(x)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(arithmetic(Operator::Add, &n(2.0), &n(3.0)), Ok(n(5.0)));
        assert_eq!(arithmetic(Operator::Div, &n(7.0), &n(2.0)), Ok(n(3.5)));
        assert_eq!(arithmetic(Operator::Rem, &n(7.0), &n(4.0)), Ok(n(3.0)));
        assert_eq!(arithmetic(Operator::Rem, &n(-7.0), &n(4.0)), Ok(n(-3.0)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(arithmetic(Operator::Div, &n(1.0), &n(0.0)),
            Err(Error::DivisionByZero));
        assert_eq!(arithmetic(Operator::Rem, &n(1.0), &n(-0.0)),
            Err(Error::DivisionByZero));
    }

    #[test]
    fn test_arithmetic_type_error() {
        let err = arithmetic(Operator::Add, &n(1.0), &Value::string("x"))
            .unwrap_err();
        assert_eq!(err.to_string(),
            "Expected number operand for `+` but got \"x\"");
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(Operator::Less, &n(1.0), &n(2.0)),
            Ok(Value::boolean(true)));
        assert_eq!(compare(Operator::GreaterEqual, &n(2.0), &n(2.0)),
            Ok(Value::boolean(true)));
        assert_eq!(compare(Operator::Less, &n(f64::NAN), &n(1.0)),
            Ok(Value::boolean(false)));
        assert!(compare(Operator::Less, &n(1.0), &Value::string("2")).is_err());
        assert!(compare(Operator::Less, &Value::boolean(true), &n(1.0))
            .is_err());
    }

    #[test]
    fn test_strings_are_not_ordered() {
        let err = compare(Operator::Less, &Value::string("a"),
            &Value::string("b")).unwrap_err();
        assert_eq!(err, Error::TypeError {
            operator: "<".to_string(),
            expected: "number",
            value: "\"a\"".to_string(),
        });
        assert_eq!(err.to_string(),
            "Expected number operand for `<` but got \"a\"");
    }
}
