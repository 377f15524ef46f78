//! Encryption of the grid column count.
//!
//! The count is serialized as its minimal big-endian byte string (a single
//! zero byte for 0) before OAEP encryption.

use crate::crypto::keys::GeometryKey;
use crate::error::{Error, Result};

/// Encrypt the column count under the key's public half.
pub fn encrypt_columns<K: GeometryKey + ?Sized>(columns: u32, key: &K) -> Result<Vec<u8>> {
    key.encrypt(&to_minimal_be(columns))
}

/// Decrypt a column count produced by [`encrypt_columns`].
pub fn decrypt_columns<K: GeometryKey + ?Sized>(ciphertext: &[u8], key: &K) -> Result<u32> {
    let bytes = key.decrypt(ciphertext)?;
    from_be(&bytes)
}

fn to_minimal_be(n: u32) -> Vec<u8> {
    let bytes = n.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    bytes[start..].to_vec()
}

fn from_be(bytes: &[u8]) -> Result<u32> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let significant = &bytes[start..];
    if bytes.is_empty() || significant.len() > 4 {
        return Err(Error::InvalidGrid(format!(
            "decrypted column count has {} bytes",
            bytes.len()
        )));
    }

    Ok(significant
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | b as u32))
}
