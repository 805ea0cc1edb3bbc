//! Primitive integer representatives of lattice rays.

use gate_core::errors::{ErrorInfo, GateError};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::arith::{dot, gcd_all, lcm_all};
use crate::serde_num;

/// Integer vector with gcd one and a positive first non-zero entry.
///
/// Only the canonicalizer builds these, so two rays compare equal exactly when
/// their primitive vectors are entry-wise equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveVector(Vec<BigInt>);

impl PrimitiveVector {
    /// Entries of the vector.
    pub fn entries(&self) -> &[BigInt] {
        &self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a primitive vector has a non-zero entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Releases the entries.
    pub fn into_inner(self) -> Vec<BigInt> {
        self.0
    }

    /// Exact dot product with an integer vector.
    pub fn dot(&self, other: &[BigInt]) -> Result<BigInt, GateError> {
        dot(&self.0, other)
    }

    /// Entries lifted into the rationals.
    pub fn to_rational(&self) -> Vec<BigRational> {
        self.0
            .iter()
            .map(|value| BigRational::from_integer(value.clone()))
            .collect()
    }
}

impl AsRef<[BigInt]> for PrimitiveVector {
    fn as_ref(&self) -> &[BigInt] {
        &self.0
    }
}

impl Serialize for PrimitiveVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_num::vec::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for PrimitiveVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries: Vec<BigInt> = serde_num::vec::deserialize(deserializer)?;
        if !is_primitive(&entries) {
            return Err(serde::de::Error::custom(
                "vector is not primitive (gcd 1, first non-zero entry positive)",
            ));
        }
        Ok(Self(entries))
    }
}

fn zero_vector(len: usize) -> GateError {
    GateError::ZeroVectorCanonicalization(
        ErrorInfo::new("zero-vector", "the zero vector has no primitive representative")
            .with_context("len", len.to_string())
            .with_hint("special-case the zero vector before canonicalizing"),
    )
}

/// Canonicalizes a rational vector into its primitive integer representative.
///
/// Clears denominators with their lcm, divides by the gcd of the resulting
/// integers, and negates if the first non-zero entry is negative.
pub fn canonicalize(values: &[BigRational]) -> Result<PrimitiveVector, GateError> {
    let scale = lcm_all(values.iter().map(|value| value.denom()));
    let scaled: Vec<BigInt> = values
        .iter()
        .map(|value| value.numer() * (&scale / value.denom()))
        .collect();
    canonicalize_int(&scaled)
}

/// Integer entry point of [`canonicalize`].
pub fn canonicalize_int(values: &[BigInt]) -> Result<PrimitiveVector, GateError> {
    let g = gcd_all(values);
    if g.is_zero() {
        return Err(zero_vector(values.len()));
    }
    let negate = values
        .iter()
        .find(|value| !value.is_zero())
        .is_some_and(Signed::is_negative);
    let entries = values
        .iter()
        .map(|value| {
            let reduced = value / &g;
            if negate {
                -reduced
            } else {
                reduced
            }
        })
        .collect();
    Ok(PrimitiveVector(entries))
}

/// Like [`canonicalize`], but maps the zero vector to `None`.
pub fn try_canonicalize(values: &[BigRational]) -> Option<PrimitiveVector> {
    canonicalize(values).ok()
}

/// Whether `values` already is a primitive vector.
pub fn is_primitive(values: &[BigInt]) -> bool {
    let leading_positive = values
        .iter()
        .find(|value| !value.is_zero())
        .is_some_and(Signed::is_positive);
    leading_positive && gcd_all(values).is_one()
}

/// Drops repeated vectors, keeping the first occurrence of each.
pub fn dedup_primitive(vectors: Vec<PrimitiveVector>) -> Vec<PrimitiveVector> {
    let mut unique: Vec<PrimitiveVector> = Vec::with_capacity(vectors.len());
    for vector in vectors {
        if !unique.contains(&vector) {
            unique.push(vector);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::{ints, ratio};

    #[test]
    fn clears_denominators_then_gcd() {
        let values = vec![
            ratio(-1, 2).unwrap(),
            ratio(1, 3).unwrap(),
            ratio(0, 1).unwrap(),
        ];
        let primitive = canonicalize(&values).unwrap();
        assert_eq!(primitive.entries(), ints(&[3, -2, 0]).as_slice());
    }

    #[test]
    fn zero_vector_has_no_representative() {
        let err = canonicalize_int(&ints(&[0, 0, 0])).unwrap_err();
        assert!(matches!(err, GateError::ZeroVectorCanonicalization(_)));
        assert!(canonicalize_int(&[]).is_err());
        assert!(try_canonicalize(&[ratio(0, 5).unwrap()]).is_none());
    }

    #[test]
    fn primitive_check_and_dedup() {
        assert!(is_primitive(&ints(&[0, 2, -3])));
        assert!(!is_primitive(&ints(&[0, -2, 3])));
        assert!(!is_primitive(&ints(&[2, 4])));
        let a = canonicalize_int(&ints(&[2, -4])).unwrap();
        let b = canonicalize_int(&ints(&[-1, 2])).unwrap();
        let c = canonicalize_int(&ints(&[0, 1])).unwrap();
        let unique = dedup_primitive(vec![a.clone(), c.clone(), b]);
        assert_eq!(unique, vec![a, c]);
    }
}
