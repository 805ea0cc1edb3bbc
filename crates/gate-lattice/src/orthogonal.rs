//! Projection of a lattice away from a distinguished direction.

use gate_core::errors::{dimension_mismatch, ErrorInfo, GateError};
use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::arith::dot;
use crate::matrix::IntMatrix;

/// Replaces every column `c` of `m` with `c - (k . c) w`.
///
/// `w` must be a Bezout partner of `k` (`k . w = 1`), so every resulting
/// column is integral and orthogonal to `k`. A matrix without columns is
/// returned unchanged.
pub fn orthogonalize_against(
    m: &IntMatrix,
    k: &[BigInt],
    w: &[BigInt],
) -> Result<IntMatrix, GateError> {
    if k.len() != m.rows() {
        return Err(dimension_mismatch(
            "orthogonalize-k",
            "k must have one entry per matrix row",
            m.rows(),
            k.len(),
        ));
    }
    if w.len() != m.rows() {
        return Err(dimension_mismatch(
            "orthogonalize-w",
            "w must have one entry per matrix row",
            m.rows(),
            w.len(),
        ));
    }
    if m.cols() == 0 {
        return Ok(m.clone());
    }
    let kw = dot(k, w)?;
    if !kw.is_one() {
        return Err(GateError::BezoutImpossible(
            ErrorInfo::new("partner-not-unit", "w is not a Bezout partner of k")
                .with_context("k.w", kw.to_string())
                .with_hint("construct w with bezout_vector(k)"),
        ));
    }

    let mut out = m.clone();
    for col in 0..m.cols() {
        let column = m.column(col);
        let s = dot(k, &column)?;
        if s.is_zero() {
            continue;
        }
        let projected: Vec<BigInt> = column
            .iter()
            .zip(w)
            .map(|(c, wi)| c - &s * wi)
            .collect();
        out.set_column(col, &projected)?;
    }
    tracing::trace!(rows = m.rows(), cols = m.cols(), "orthogonalized against k");
    Ok(out)
}

/// Whether `k^T m = 0`, i.e. `k` is orthogonal to every column of `m`.
pub fn annihilates(k: &[BigInt], m: &IntMatrix) -> bool {
    k.len() == m.rows()
        && m.columns()
            .iter()
            .all(|column| dot(k, column).is_ok_and(|value| value.is_zero()))
}
