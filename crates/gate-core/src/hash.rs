use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::GateError;
use crate::serde::to_canonical_json_bytes;

/// `sha256:`-tagged digest of the canonical JSON form of `value`.
///
/// Key order in the source struct does not affect the result.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, GateError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(hash_bytes(&bytes))
}

/// `sha256:`-tagged digest of raw bytes, used for input files.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("sha256:{:x}", digest)
}
