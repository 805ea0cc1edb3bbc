#![deny(missing_docs)]
#![doc = "Shared error, size-limit, provenance, and canonical serialization types for the lattice gate workspace."]

pub mod errors;
/// Canonical hashing helpers.
pub mod hash;
/// Size guards applied before matrix computations.
pub mod limits;
pub mod provenance;
/// Canonical JSON helpers.
pub mod serde;

pub use errors::{constraint_error, dimension_mismatch, serde_error, ErrorInfo, GateError};
pub use hash::{hash_bytes, stable_hash_string};
pub use limits::Limits;
pub use provenance::{CertProvenance, SchemaVersion};
pub use serde::{from_json_slice, to_canonical_json_bytes, to_canonical_json_pretty};

/// Outcome label used in certificate status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ::serde::Serialize, ::serde::Deserialize)]
pub enum Verdict {
    /// The gate holds.
    #[serde(rename = "PASS")]
    Pass,
    /// The gate was evaluated and does not hold.
    #[serde(rename = "FAIL")]
    Fail,
    /// The gate does not apply to the input ("not determined").
    #[serde(rename = "ND")]
    NotDetermined,
}

impl Verdict {
    /// Maps a boolean check onto [`Verdict::Pass`] or [`Verdict::Fail`].
    pub fn from_pass(pass: bool) -> Self {
        if pass {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// Returns the status-line label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::NotDetermined => "ND",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
