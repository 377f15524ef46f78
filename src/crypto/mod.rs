//! Cryptographic operations for shamir-stego.
//!
//! This module provides:
//! - RSA keypair generation and PEM persistence
//! - RSA-OAEP encryption of the grid column count

mod geometry;
mod keys;

pub use geometry::{decrypt_columns, encrypt_columns};
pub use keys::{GeometryKey, KeyPair};
