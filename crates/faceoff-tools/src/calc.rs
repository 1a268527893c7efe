//! Two-operand arithmetic over decimal text.
//!
//! The result is printed with as many decimal places as the widest
//! operand carried: `0.1 + 0.2` yields `0.3`, `0.11 + 0.2` yields
//! `0.31`, and integer inputs yield an integer-looking result.

#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error("{0:?} is not a number")]
    BadNumber(String),
    #[error("{0:?} is not a supported operator; use + or -")]
    UnsupportedOperator(String),
}

/// Evaluates `lhs op rhs` and formats the result to match the inputs'
/// precision.
pub fn evaluate(lhs: &str, op: &str, rhs: &str) -> Result<String, CalcError> {
    let a: f64 = lhs
        .trim()
        .parse()
        .map_err(|_| CalcError::BadNumber(lhs.to_string()))?;
    let b: f64 = rhs
        .trim()
        .parse()
        .map_err(|_| CalcError::BadNumber(rhs.to_string()))?;

    let result = match op {
        "+" => a + b,
        "-" => a - b,
        _ => return Err(CalcError::UnsupportedOperator(op.to_string())),
    };

    let decimals = fraction_digits(lhs).max(fraction_digits(rhs));
    Ok(format!("{result:.decimals$}"))
}

/// The number of digits after the decimal point in the textual form.
fn fraction_digits(text: &str) -> usize {
    match text.trim().split_once('.') {
        Some((_, frac)) => frac.len(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_inputs_give_integer_output() {
        assert_eq!(evaluate("2", "+", "3").unwrap(), "5");
        assert_eq!(evaluate("2", "-", "7").unwrap(), "-5");
    }

    #[test]
    fn test_output_precision_follows_the_widest_input() {
        assert_eq!(evaluate("0.1", "+", "0.2").unwrap(), "0.3");
        assert_eq!(evaluate("0.11", "+", "0.2").unwrap(), "0.31");
        assert_eq!(evaluate("1.5", "-", "2").unwrap(), "-0.5");
    }

    #[test]
    fn test_bad_number_is_reported() {
        assert!(matches!(
            evaluate("banana", "+", "1"),
            Err(CalcError::BadNumber(_))
        ));
        assert!(matches!(
            evaluate("1", "+", ""),
            Err(CalcError::BadNumber(_))
        ));
    }

    #[test]
    fn test_unsupported_operator_is_reported() {
        assert!(matches!(
            evaluate("1", "*", "2"),
            Err(CalcError::UnsupportedOperator(_))
        ));
    }
}
