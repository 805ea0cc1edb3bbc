//! Serde adapters for exact numbers.
//!
//! Integers are written as decimal strings and rationals as `p/q` strings so
//! no JSON consumer can silently round them. Readers accept either JSON/YAML
//! integers or strings.

use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::arith::{format_rational, parse_rational};
use crate::matrix::Matrix;

/// Exact number with a lossless text form.
pub trait NumText: Sized {
    /// Renders the value.
    fn to_text(&self) -> String;
    /// Parses the value.
    fn from_text(text: &str) -> Result<Self, String>;
}

impl NumText for BigInt {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        trimmed
            .strip_prefix('+')
            .unwrap_or(trimmed)
            .parse::<BigInt>()
            .map_err(|err| format!("invalid integer `{text}`: {err}"))
    }
}

impl NumText for BigRational {
    fn to_text(&self) -> String {
        format_rational(self)
    }

    fn from_text(text: &str) -> Result<Self, String> {
        parse_rational(text).map_err(|err| err.to_string())
    }
}

/// Text of a number as read from a document, before exact parsing.
///
/// Bare integers of any width are accepted, so `serde_json`/`serde_yaml`
/// inputs beyond `i64` load without quoting.
struct NumRepr(String);

impl NumRepr {
    fn parse<T: NumText>(self) -> Result<T, String> {
        T::from_text(&self.0)
    }
}

struct NumReprVisitor;

impl<'de> de::Visitor<'de> for NumReprVisitor {
    type Value = NumRepr;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<NumRepr, E> {
        Ok(NumRepr(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<NumRepr, E> {
        Ok(NumRepr(value.to_string()))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<NumRepr, E> {
        Ok(NumRepr(value.to_string()))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<NumRepr, E> {
        Ok(NumRepr(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<NumRepr, E> {
        Err(E::invalid_type(de::Unexpected::Float(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<NumRepr, E> {
        Ok(NumRepr(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<NumRepr, E> {
        Ok(NumRepr(value))
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<NumRepr, A::Error> {
        // serde_json `arbitrary_precision` hands oversized numbers over as a
        // single-entry map carrying the literal.
        let Some((_, text)) = map.next_entry::<String, String>()? else {
            return Err(de::Error::invalid_length(0, &self));
        };
        Ok(NumRepr(text))
    }
}

impl<'de> Deserialize<'de> for NumRepr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumReprVisitor)
    }
}

struct Text<'a, T>(&'a T);

impl<T: NumText> Serialize for Text<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_text())
    }
}

/// `#[serde(with = "serde_num::num")]` for a single exact number.
pub mod num {
    use super::*;

    /// Serializes one number as text.
    pub fn serialize<T: NumText, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        Text(value).serialize(serializer)
    }

    /// Deserializes one number from an integer or text.
    pub fn deserialize<'de, T: NumText, D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
        NumRepr::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// `#[serde(with = "serde_num::vec")]` for a vector of exact numbers.
pub mod vec {
    use super::*;

    /// Serializes a vector of numbers as text.
    pub fn serialize<T: NumText, S: Serializer>(values: &[T], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(Text))
    }

    /// Deserializes a vector of numbers.
    pub fn deserialize<'de, T: NumText, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<T>, D::Error> {
        Vec::<NumRepr>::deserialize(deserializer)?
            .into_iter()
            .map(|repr| repr.parse().map_err(de::Error::custom))
            .collect()
    }
}

/// `#[serde(with = "serde_num::rows")]` for nested row vectors.
pub mod rows {
    use super::*;

    struct Row<'a, T>(&'a [T]);

    impl<T: NumText> Serialize for Row<'_, T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.0.iter().map(Text))
        }
    }

    /// Serializes rows of numbers as text.
    pub fn serialize<T: NumText, S: Serializer>(
        rows: &[Vec<T>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(rows.iter().map(|row| Row(row.as_slice())))
    }

    /// Deserializes rows of numbers.
    pub fn deserialize<'de, T: NumText, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<T>>, D::Error> {
        Vec::<Vec<NumRepr>>::deserialize(deserializer)?
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|repr| repr.parse().map_err(de::Error::custom))
                    .collect()
            })
            .collect()
    }
}

/// `#[serde(with = "serde_num::map")]` for name-keyed exact numbers.
pub mod map {
    use super::*;

    /// Serializes a map of numbers as text values.
    pub fn serialize<T: NumText, S: Serializer>(
        values: &BTreeMap<String, T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(values.iter().map(|(key, value)| (key, Text(value))))
    }

    /// Deserializes a map of numbers.
    pub fn deserialize<'de, T: NumText, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, T>, D::Error> {
        BTreeMap::<String, NumRepr>::deserialize(deserializer)?
            .into_iter()
            .map(|(key, repr)| Ok((key, repr.parse().map_err(de::Error::custom)?)))
            .collect()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(bound(serialize = "T: NumText", deserialize = "T: NumText"))]
struct MatrixRepr<T> {
    rows: usize,
    cols: usize,
    #[serde(with = "rows")]
    entries: Vec<Vec<T>>,
}

impl<T> Serialize for Matrix<T>
where
    T: NumText + Clone + num_traits::Zero,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MatrixRepr {
            rows: self.rows(),
            cols: self.cols(),
            entries: self.to_rows(),
        }
        .serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Matrix<T>
where
    T: NumText + Clone + num_traits::Zero,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = MatrixRepr::<T>::deserialize(deserializer)?;
        if repr.entries.len() != repr.rows {
            return Err(de::Error::custom(MismatchedRows {
                declared: repr.rows,
                found: repr.entries.len(),
            }));
        }
        Matrix::from_rows_with_cols(repr.entries, repr.cols).map_err(de::Error::custom)
    }
}

struct MismatchedRows {
    declared: usize,
    found: usize,
}

impl fmt::Display for MismatchedRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix declares {} rows but lists {}",
            self.declared, self.found
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Pow};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        #[serde(with = "super::vec")]
        values: Vec<BigInt>,
    }

    #[test]
    fn bare_integers_beyond_i64_are_exact() {
        let row: Row = serde_json::from_str(r#"{"values": [9223372036854775808, -9223372036854775809]}"#)
            .unwrap();
        let two_63 = Pow::pow(BigInt::from(2), 63u32);
        assert_eq!(row.values, vec![two_63.clone(), -two_63 - BigInt::one()]);

        let wide: Row = serde_json::from_str(r#"{"values": [1180591620717411303424]}"#).unwrap();
        assert_eq!(wide.values, vec![Pow::pow(BigInt::from(2), 70u32)]);

        let text = serde_json::to_string(&row).unwrap();
        assert!(text.contains("\"9223372036854775808\""));
        let back: Row = serde_json::from_str(&text).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn yaml_reads_bare_and_quoted_entries() {
        let row: Row = serde_yaml::from_str("values: [9223372036854775808, \"-12\", 7]").unwrap();
        assert_eq!(row.values[0], Pow::pow(BigInt::from(2), 63u32));
        assert_eq!(row.values[1], BigInt::from(-12));
        assert_eq!(row.values[2], BigInt::from(7));
    }

    #[test]
    fn floats_are_rejected() {
        assert!(serde_json::from_str::<Row>(r#"{"values": [1.5]}"#).is_err());
        assert!(serde_yaml::from_str::<Row>("values: [2.5]").is_err());
    }
}
