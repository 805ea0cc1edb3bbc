//! Error type of the lattice gate workspace.
//!
//! Every failure carries an [`ErrorInfo`] whose `code` is what tests and
//! certificate consumers match on; messages are free text.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and context of a failed lattice or constraint operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case code such as `not-primitive` or `row-join`.
    pub code: String,
    /// One-line description.
    pub message: String,
    /// Shapes, ids and offending values, keyed by name.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// What to change in the input, when that is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records `key = value`; a repeated key keeps the last value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Failure families of the lattice and MUS operations.
///
/// Every variant is a local, structural failure of a single operation. None of
/// them is retried; callers surface them as a missing or invalid certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum GateError {
    /// Row or column counts are incompatible.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(ErrorInfo),
    /// A rational was built with, or a value divided by, zero.
    #[error("zero denominator: {0}")]
    ZeroDenominator(ErrorInfo),
    /// An exact integer division left a remainder.
    #[error("division not exact: {0}")]
    DivisionNotExact(ErrorInfo),
    /// The all-zero vector has no primitive representative.
    #[error("zero vector canonicalization: {0}")]
    ZeroVectorCanonicalization(ErrorInfo),
    /// No integer vector `w` with `k . w = 1` exists for the input.
    #[error("bezout impossible: {0}")]
    BezoutImpossible(ErrorInfo),
    /// The input exceeds the configured size limits.
    #[error("input too large: {0}")]
    InputTooLarge(ErrorInfo),
    /// Malformed constraint system or MUS request.
    #[error("constraint error: {0}")]
    Constraint(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        for (key, value) in &self.context {
            write!(f, "; {key}={value}")?;
        }
        match &self.hint {
            Some(hint) => write!(f, " (hint: {hint})"),
            None => Ok(()),
        }
    }
}

impl GateError {
    /// Payload of any family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            GateError::DimensionMismatch(info)
            | GateError::ZeroDenominator(info)
            | GateError::DivisionNotExact(info)
            | GateError::ZeroVectorCanonicalization(info)
            | GateError::BezoutImpossible(info)
            | GateError::InputTooLarge(info)
            | GateError::Constraint(info)
            | GateError::Serde(info) => info,
        }
    }

    /// Shorthand for `info().code`.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}

/// Builds a [`GateError::DimensionMismatch`] recording both shapes.
pub fn dimension_mismatch(
    code: &str,
    message: impl Into<String>,
    expected: impl ToString,
    found: impl ToString,
) -> GateError {
    GateError::DimensionMismatch(
        ErrorInfo::new(code, message)
            .with_context("expected", expected.to_string())
            .with_context("found", found.to_string()),
    )
}

/// Builds a [`GateError::Constraint`] error.
pub fn constraint_error(code: &str, message: impl Into<String>) -> GateError {
    GateError::Constraint(ErrorInfo::new(code, message))
}

/// Builds a [`GateError::Serde`] error from any displayable cause.
pub fn serde_error(code: &str, err: impl ToString) -> GateError {
    GateError::Serde(ErrorInfo::new(code, err.to_string()))
}
