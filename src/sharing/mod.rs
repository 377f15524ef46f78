//! Threshold secret sharing of text secrets.
//!
//! The UTF-8 bytes of the secret are PKCS#7-padded to a multiple of
//! [`PAD_BLOCK_SIZE`] and split with byte-wise Shamir sharing over GF(256).
//! Combining reverses both steps; any failure along the way surfaces as
//! [`Error::Reconstruction`].

mod field;
pub mod padding;
mod shamir;

pub use shamir::{combine_bytes, split_bytes, Share};

use crate::config::PAD_BLOCK_SIZE;
use crate::error::{Error, Result};

/// Split a text secret into `share_count` shares with reconstruction
/// threshold `threshold`.
pub fn split(secret: &str, threshold: u8, share_count: u8) -> Result<Vec<Share>> {
    let padded = padding::pad(secret.as_bytes(), PAD_BLOCK_SIZE);
    split_bytes(&padded, threshold, share_count)
}

/// Recombine at least `threshold` shares into the text secret.
pub fn combine(shares: &[Share], threshold: u8) -> Result<String> {
    let padded = combine_bytes(shares, threshold)?;
    let bytes = padding::unpad(&padded, PAD_BLOCK_SIZE)?;
    String::from_utf8(bytes).map_err(|_| {
        Error::Reconstruction("recovered secret is not valid UTF-8".to_string())
    })
}

/// Payload length of every share produced for a secret of `secret_len` bytes.
pub fn share_payload_len(secret_len: usize) -> usize {
    padding::padded_len(secret_len, PAD_BLOCK_SIZE)
}
