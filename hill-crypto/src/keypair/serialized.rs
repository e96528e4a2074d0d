use crate::errors::HillCryptoError;

use serde::{Deserialize, Serialize};

/// The persisted form of a Hill key.
///
/// Only the encryption matrix is stored, row-major; the decryption matrix is derived
/// again by inversion when the key is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedKey {
    /// Size of the ring Z_n the key lives in.
    pub modulus: u64,
    /// Dimension `d` of the key matrix.
    pub block_length: usize,
    /// The `d²` entries of the encryption matrix.
    pub entries: Vec<i64>,
}

impl SerializedKey {
    pub fn to_json(&self) -> Result<String, HillCryptoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, HillCryptoError> {
        Ok(serde_json::from_str(data)?)
    }
}
