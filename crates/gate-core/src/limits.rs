use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, GateError};

/// Size guard applied before any matrix computation.
///
/// Matrices seen in practice have a few dozen rows and columns; anything
/// larger is rejected with [`GateError::InputTooLarge`] rather than truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum accepted number of rows.
    #[serde(default = "Limits::default_max_rows")]
    pub max_rows: usize,
    /// Maximum accepted number of columns.
    #[serde(default = "Limits::default_max_cols")]
    pub max_cols: usize,
}

impl Limits {
    const fn default_max_rows() -> usize {
        64
    }

    const fn default_max_cols() -> usize {
        64
    }

    /// Limits that accept every shape.
    pub const fn unbounded() -> Self {
        Self {
            max_rows: usize::MAX,
            max_cols: usize::MAX,
        }
    }

    /// Returns a copy with zero caps raised to one.
    pub fn sanitised(&self) -> Self {
        Self {
            max_rows: self.max_rows.max(1),
            max_cols: self.max_cols.max(1),
        }
    }

    /// Checks a `rows x cols` shape against the limits.
    pub fn check(&self, rows: usize, cols: usize) -> Result<(), GateError> {
        if rows <= self.max_rows && cols <= self.max_cols {
            return Ok(());
        }
        Err(GateError::InputTooLarge(
            ErrorInfo::new("matrix-too-large", "matrix exceeds configured size limits")
                .with_context("rows", rows.to_string())
                .with_context("cols", cols.to_string())
                .with_context("max_rows", self.max_rows.to_string())
                .with_context("max_cols", self.max_cols.to_string())
                .with_hint("raise `max_rows`/`max_cols` in the limits configuration"),
        ))
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_rows: Self::default_max_rows(),
            max_cols: Self::default_max_cols(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_small_shapes() {
        let limits = Limits::default();
        assert!(limits.check(0, 0).is_ok());
        assert!(limits.check(64, 64).is_ok());
    }

    #[test]
    fn oversized_shape_is_rejected() {
        let limits = Limits {
            max_rows: 2,
            max_cols: 3,
        };
        let err = limits.check(3, 1).unwrap_err();
        assert_eq!(err.code(), "matrix-too-large");
        assert_eq!(err.info().context["rows"], "3");
    }

    #[test]
    fn sanitised_raises_zero_caps() {
        let limits = Limits {
            max_rows: 0,
            max_cols: 5,
        }
        .sanitised();
        assert_eq!(limits.max_rows, 1);
        assert_eq!(limits.max_cols, 5);
    }
}
