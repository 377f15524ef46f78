//! Shamir Stego
//!
//! Hides a text secret in a carrier image as threshold shares, one share per
//! image block, and recovers it from any sufficient subset of intact blocks.
//!
//! # Features
//!
//! - **Threshold Sharing**: byte-wise Shamir sharing over GF(256), any `k` of `n` shares suffice
//! - **Block Grid**: the carrier is cut into a grid of blocks, each holding one share
//! - **Value-Channel Encoding**: share digits are written into pixel brightness with exact integer arithmetic
//! - **RSA-OAEP Geometry**: the grid column count is encrypted, so extraction needs the private key
//!
//! # Architecture
//!
//! ```text
//! Secret → Pad (PKCS#7) → Split (Shamir) → Plan Grid → Embed (value channel) → Stego PNG
//!                                            └→ Columns → Encrypt (RSA-OAEP) → Side-file
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use shamir_stego::{KeyPair, StegoConfig, StegoPipeline};
//! use shamir_stego::stego::load_carrier;
//! use std::path::Path;
//!
//! let keys = KeyPair::load_or_generate(Path::new("private_key.pem"), 2048).unwrap();
//! let pipeline = StegoPipeline::new(StegoConfig::new(3, 5), keys).unwrap();
//!
//! let carrier = load_carrier(Path::new("carrier.png")).unwrap();
//! let output = pipeline.embed("secret", &carrier).unwrap();
//!
//! let secret = pipeline
//!     .recover(&output.image, &output.encrypted_columns, "secret".len())
//!     .unwrap();
//! assert_eq!(secret, "secret");
//! ```

pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod layout;
pub mod sharing;
pub mod stego;

pub use config::StegoConfig;
pub use crypto::{GeometryKey, KeyPair};
pub use error::{Error, Result};
pub use sharing::Share;
pub use stego::{EmbedOutput, StegoArtifacts, StegoPipeline};
