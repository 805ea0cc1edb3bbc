//! Exact integer and rational helpers.
//!
//! Integers are [`BigInt`] and rationals are [`BigRational`], which is always
//! kept in lowest terms with a positive denominator. Nothing here ever rounds.

use gate_core::errors::{dimension_mismatch, serde_error, ErrorInfo, GateError};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// Builds `numer / denom` in lowest terms.
pub fn ratio(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Result<BigRational, GateError> {
    let numer = numer.into();
    let denom = denom.into();
    if denom.is_zero() {
        return Err(GateError::ZeroDenominator(
            ErrorInfo::new("zero-denominator", "rational constructed with zero denominator")
                .with_context("numerator", numer.to_string()),
        ));
    }
    Ok(BigRational::new(numer, denom))
}

/// Lifts an integer into the rationals.
pub fn to_rational(value: &BigInt) -> BigRational {
    BigRational::from_integer(value.clone())
}

/// Divides `a` by `b`, failing unless the division is exact.
pub fn exact_div(a: &BigInt, b: &BigInt) -> Result<BigInt, GateError> {
    if b.is_zero() {
        return Err(GateError::ZeroDenominator(
            ErrorInfo::new("division-by-zero", "exact division by zero")
                .with_context("dividend", a.to_string()),
        ));
    }
    let (quotient, remainder) = a.div_rem(b);
    if !remainder.is_zero() {
        return Err(GateError::DivisionNotExact(
            ErrorInfo::new("inexact-division", "integer division left a remainder")
                .with_context("dividend", a.to_string())
                .with_context("divisor", b.to_string())
                .with_context("remainder", remainder.to_string()),
        ));
    }
    Ok(quotient)
}

/// Returns `-1`, `0` or `1`.
pub fn sign(value: &BigInt) -> i8 {
    if value.is_positive() {
        1
    } else if value.is_negative() {
        -1
    } else {
        0
    }
}

/// Non-negative gcd of all values; zero for an empty or all-zero input.
pub fn gcd_all<'a>(values: impl IntoIterator<Item = &'a BigInt>) -> BigInt {
    values
        .into_iter()
        .fold(BigInt::zero(), |acc, value| acc.gcd(value))
}

/// Positive lcm of all values, ignoring zeros; one for an empty input.
pub fn lcm_all<'a>(values: impl IntoIterator<Item = &'a BigInt>) -> BigInt {
    values
        .into_iter()
        .filter(|value| !value.is_zero())
        .fold(BigInt::one(), |acc, value| acc.lcm(value))
}

/// Exact dot product of two integer vectors of equal length.
pub fn dot(lhs: &[BigInt], rhs: &[BigInt]) -> Result<BigInt, GateError> {
    if lhs.len() != rhs.len() {
        return Err(dimension_mismatch(
            "dot-length",
            "dot product of vectors with different lengths",
            lhs.len(),
            rhs.len(),
        ));
    }
    Ok(lhs
        .iter()
        .zip(rhs)
        .fold(BigInt::zero(), |acc, (a, b)| acc + a * b))
}

/// Converts a slice of machine integers into big integers.
pub fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().copied().map(BigInt::from).collect()
}

/// Parses a rational label such as `"+1/2"`, `"-3"` or `"4/6"`.
pub fn parse_rational(text: &str) -> Result<BigRational, GateError> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let parse = |part: &str| {
        part.trim()
            .parse::<BigInt>()
            .map_err(|err| serde_error("rational-parse", format!("`{text}`: {err}")))
    };
    match body.split_once('/') {
        Some((numer, denom)) => ratio(parse(numer)?, parse(denom)?),
        None => Ok(BigRational::from_integer(parse(body)?)),
    }
}

/// Renders a rational as `p/q`, or `p` when integral.
pub fn format_rational(value: &BigRational) -> String {
    if value.is_integer() {
        value.numer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_reduces_and_normalises_sign() {
        let value = ratio(4, -6).unwrap();
        assert_eq!(value.numer(), &BigInt::from(-2));
        assert_eq!(value.denom(), &BigInt::from(3));
        assert_eq!(ratio(1, 0).unwrap_err().code(), "zero-denominator");
    }

    #[test]
    fn exact_div_rejects_remainders() {
        assert_eq!(
            exact_div(&BigInt::from(12), &BigInt::from(-4)).unwrap(),
            BigInt::from(-3)
        );
        let err = exact_div(&BigInt::from(7), &BigInt::from(2)).unwrap_err();
        assert!(matches!(err, GateError::DivisionNotExact(_)));
        let err = exact_div(&BigInt::from(7), &BigInt::zero()).unwrap_err();
        assert!(matches!(err, GateError::ZeroDenominator(_)));
    }

    #[test]
    fn gcd_and_lcm_fold() {
        let values = ints(&[-12, 18, 0, 30]);
        assert_eq!(gcd_all(&values), BigInt::from(6));
        assert_eq!(lcm_all(&ints(&[4, 6, 0])), BigInt::from(12));
        assert_eq!(gcd_all(&ints(&[0, 0])), BigInt::zero());
        assert_eq!(lcm_all(&[]), BigInt::one());
    }

    #[test]
    fn labels_parse_exactly() {
        assert_eq!(parse_rational("+1/2").unwrap(), ratio(1, 2).unwrap());
        assert_eq!(parse_rational("-1/6").unwrap(), ratio(-1, 6).unwrap());
        assert_eq!(parse_rational("4/6").unwrap(), ratio(2, 3).unwrap());
        assert_eq!(parse_rational(" 7 ").unwrap(), ratio(7, 1).unwrap());
        assert!(parse_rational("1/0").is_err());
        assert!(parse_rational("half").is_err());
        assert_eq!(format_rational(&ratio(-2, 4).unwrap()), "-1/2");
        assert_eq!(format_rational(&ratio(6, 3).unwrap()), "2");
    }

    #[test]
    fn dot_checks_lengths() {
        assert_eq!(dot(&ints(&[2, 3]), &ints(&[2, -1])).unwrap(), BigInt::one());
        assert!(dot(&ints(&[1]), &ints(&[1, 2])).is_err());
    }
}
