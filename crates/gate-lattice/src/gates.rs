//! Exact pass/fail checks on levels, residues and transforms.

use std::collections::BTreeMap;

use gate_core::errors::{ErrorInfo, GateError};
use gate_core::Verdict;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::arith::format_rational;
use crate::bezout::extended_gcd;
use crate::matrix::IntMatrix;

/// Outcome of a single named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCheck {
    /// Upper-case gate name used in status lines.
    pub name: String,
    /// Verdict.
    pub verdict: Verdict,
    /// Short diagnostic, `ok` on success.
    pub detail: String,
}

impl GateCheck {
    fn new(name: &str, pass: bool, detail: impl Into<String>) -> Self {
        let detail = if pass { "ok".to_owned() } else { detail.into() };
        Self {
            name: name.to_owned(),
            verdict: Verdict::from_pass(pass),
            detail,
        }
    }

    /// Whether the check passed.
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// `NAME:VERDICT:detail`.
    pub fn status_line(&self) -> String {
        format!("{}:{}:{}", self.name, self.verdict, self.detail)
    }
}

/// Passes when every named level is an integer.
pub fn integrality_gate(name: &str, levels: &BTreeMap<String, BigRational>) -> GateCheck {
    let fractional: Vec<String> = levels
        .iter()
        .filter(|(_, value)| !value.is_integer())
        .map(|(key, value)| format!("{key}={}", format_rational(value)))
        .collect();
    GateCheck::new(
        name,
        fractional.is_empty(),
        format!("non-integral levels: {}", fractional.join(", ")),
    )
}

fn check_modulus(modulus: &BigInt) -> Result<(), GateError> {
    if modulus.is_positive() {
        return Ok(());
    }
    Err(GateError::ZeroDenominator(
        ErrorInfo::new("non-positive-modulus", "congruence modulus must be positive")
            .with_context("modulus", modulus.to_string()),
    ))
}

/// Passes when `k = ell (mod modulus)`.
pub fn congruence_gate(
    name: &str,
    k: &BigInt,
    ell: &BigInt,
    modulus: &BigInt,
) -> Result<GateCheck, GateError> {
    check_modulus(modulus)?;
    let pass = (k - ell).mod_floor(modulus).is_zero();
    Ok(GateCheck::new(
        name,
        pass,
        format!("{k} is not congruent to {ell} mod {modulus}"),
    ))
}

/// Passes when `value mod modulus` equals `expected`.
pub fn residue_gate(
    name: &str,
    value: &BigInt,
    modulus: &BigInt,
    expected: &BigInt,
) -> Result<GateCheck, GateError> {
    check_modulus(modulus)?;
    let residue = value.mod_floor(modulus);
    let pass = &residue == expected;
    Ok(GateCheck::new(
        name,
        pass,
        format!("{value} mod {modulus} = {residue}, expected {expected}"),
    ))
}

/// Combines `x = r_i (mod m_i)` into a single `(residue, modulus)` with
/// `0 <= residue < lcm(m_i)`.
///
/// Moduli need not be coprime; inconsistent residues are rejected. An empty
/// system is `x = 0 (mod 1)`.
pub fn crt_combine(congruences: &[(BigInt, BigInt)]) -> Result<(BigInt, BigInt), GateError> {
    let mut residue = BigInt::zero();
    let mut modulus = BigInt::one();
    for (r, m) in congruences {
        check_modulus(m)?;
        let (g, p, _) = extended_gcd(&modulus, m);
        let diff = r - &residue;
        if !diff.is_multiple_of(&g) {
            return Err(GateError::DivisionNotExact(
                ErrorInfo::new("crt-inconsistent", "congruences have no common solution")
                    .with_context("residue", r.to_string())
                    .with_context("modulus", m.to_string())
                    .with_context("gcd", g.to_string()),
            ));
        }
        let lcm = &modulus / &g * m;
        let step = (&diff / &g * &p).mod_floor(&(m / &g));
        residue = (&residue + &modulus * step).mod_floor(&lcm);
        modulus = lcm;
    }
    Ok((residue, modulus))
}

/// Passes when the square matrix has determinant `+1` or `-1`; the sign is
/// reported in the detail.
pub fn unimodular_gate(name: &str, matrix: &IntMatrix) -> Result<GateCheck, GateError> {
    let det = matrix.determinant()?;
    let pass = det.abs().is_one();
    let label = if det.is_positive() {
        format!("det=+{det}")
    } else {
        format!("det={det}")
    };
    Ok(GateCheck {
        name: name.to_owned(),
        verdict: Verdict::from_pass(pass),
        detail: label,
    })
}
