//! Provenance and schema descriptors shared across gate certificates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information attached to every emitted certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CertProvenance {
    /// Schema of the certificate payload.
    pub schema_version: SchemaVersion,
    /// SHA-256 of the raw input the certificate was computed from.
    pub input_hash: String,
    /// Path or label of the input, as given by the caller.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub input_label: String,
    /// Version map for all tools involved in the computation.
    pub tool_versions: BTreeMap<String, String>,
}

impl CertProvenance {
    /// Creates provenance for an input hash, stamping this crate's version.
    pub fn new(input_hash: impl Into<String>) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            env!("CARGO_PKG_NAME").to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Self {
            schema_version: SchemaVersion::default(),
            input_hash: input_hash.into(),
            input_label: String::new(),
            tool_versions,
        }
    }

    /// Records a human readable label for the input.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.input_label = label.into();
        self
    }

    /// Records an additional tool version.
    pub fn with_tool(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.tool_versions.insert(name.into(), version.into());
        self
    }
}
