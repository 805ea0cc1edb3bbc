//! Extended Euclid and Bezout vectors.

use gate_core::errors::{ErrorInfo, GateError};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::arith::{dot, gcd_all};

/// Iterative extended Euclid: returns `(g, x, y)` with `a*x + b*y = g` and `g >= 0`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let (q, rem) = old_r.div_rem(&r);
        old_r = std::mem::replace(&mut r, rem);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    if old_r.is_negative() {
        (-old_r, -old_s, -old_t)
    } else {
        (old_r, old_s, old_t)
    }
}

/// Builds an integer vector `w` with `k . w = 1`.
///
/// Components are folded left to right: the running gcd `g` of the processed
/// prefix and its coefficient vector are combined with the next component by a
/// two-term extended Euclid step. Fails for the zero vector and for vectors
/// whose entries share a common factor, where no such `w` exists.
pub fn bezout_vector(k: &[BigInt]) -> Result<Vec<BigInt>, GateError> {
    let Some(first) = k.iter().position(|value| !value.is_zero()) else {
        return Err(GateError::BezoutImpossible(
            ErrorInfo::new("zero-vector", "bezout vector requested for the zero vector")
                .with_context("len", k.len().to_string()),
        ));
    };

    let mut coeffs = vec![BigInt::zero(); k.len()];
    coeffs[first] = k[first].signum();
    let mut g = k[first].abs();
    for (idx, value) in k.iter().enumerate().skip(first + 1) {
        if value.is_zero() {
            continue;
        }
        let (next, x, y) = extended_gcd(&g, value);
        for coeff in coeffs.iter_mut() {
            *coeff *= &x;
        }
        coeffs[idx] += y;
        g = next;
    }

    let product = dot(k, &coeffs)?;
    if product == -BigInt::one() {
        for coeff in coeffs.iter_mut() {
            *coeff = -&*coeff;
        }
    } else if !product.is_one() {
        return Err(GateError::BezoutImpossible(
            ErrorInfo::new("not-primitive", "entries share a common factor; k . w = 1 has no solution")
                .with_context("gcd", gcd_all(k).to_string())
                .with_hint("canonicalize k to its primitive vector first"),
        ));
    }
    tracing::trace!(len = k.len(), "bezout vector constructed");
    Ok(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::ints;

    #[test]
    fn extended_gcd_signs() {
        for (a, b) in [(240, 46), (-240, 46), (0, -7), (-7, 0), (0, 0), (17, 5)] {
            let (a, b) = (BigInt::from(a), BigInt::from(b));
            let (g, x, y) = extended_gcd(&a, &b);
            assert!(!g.is_negative());
            assert_eq!(&a * &x + &b * &y, g);
            assert_eq!(g, a.gcd(&b));
        }
    }

    #[test]
    fn two_component_identity() {
        let k = ints(&[2, 3]);
        let w = bezout_vector(&k).unwrap();
        assert_eq!(dot(&k, &w).unwrap(), BigInt::one());
    }

    #[test]
    fn leading_zeros_and_negatives() {
        let k = ints(&[0, 0, -6, 10, 15]);
        let w = bezout_vector(&k).unwrap();
        assert_eq!(w[0], BigInt::zero());
        assert_eq!(w[1], BigInt::zero());
        assert_eq!(dot(&k, &w).unwrap(), BigInt::one());
    }

    #[test]
    fn impossible_inputs() {
        let err = bezout_vector(&ints(&[0, 0])).unwrap_err();
        assert_eq!(err.code(), "zero-vector");
        let err = bezout_vector(&ints(&[4, 6])).unwrap_err();
        assert_eq!(err.code(), "not-primitive");
        assert_eq!(err.info().context["gcd"], "2");
    }
}
