//! Configuration constants and types for shamir-stego.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Block size the secret is PKCS#7-padded to before splitting.
pub const PAD_BLOCK_SIZE: usize = 16;

/// Pixels at the start of every block reserved for the share header
/// (digit count, share index).
pub const HEADER_PIXELS: usize = 2;

/// Largest integer the value channel can hold.
pub const MAX_CHANNEL_VALUE: u8 = 255;

/// Default reconstruction threshold.
pub const DEFAULT_THRESHOLD: u8 = 3;

/// Default number of distributed shares.
pub const DEFAULT_SHARE_COUNT: u8 = 5;

/// Default RSA modulus size in bits.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Smallest accepted RSA modulus size.
pub const MIN_KEY_BITS: usize = 1024;

/// Largest accepted RSA modulus size.
pub const MAX_KEY_BITS: usize = 4096;

/// Artifact naming.
pub mod artifact_names {
    /// Extension of the stego image (always lossless PNG).
    pub const IMAGE_EXTENSION: &str = "png";

    /// Suffix appended to the stego image stem for the encrypted column count.
    pub const GEOMETRY_SUFFIX: &str = "_cols.bin";
}

/// Parameters shared by embedding and recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StegoConfig {
    /// Minimum number of shares needed to recover the secret (k).
    pub threshold: u8,

    /// Number of shares the secret is split into (n).
    pub share_count: u8,

    /// RSA modulus size used when a new keypair has to be generated.
    #[serde(default = "default_key_bits")]
    pub key_bits: usize,
}

fn default_key_bits() -> usize {
    DEFAULT_KEY_BITS
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            share_count: DEFAULT_SHARE_COUNT,
            key_bits: DEFAULT_KEY_BITS,
        }
    }
}

impl StegoConfig {
    /// Create a configuration with the given threshold parameters.
    pub fn new(threshold: u8, share_count: u8) -> Self {
        Self {
            threshold,
            share_count,
            ..Self::default()
        }
    }

    /// Override the RSA key size.
    pub fn with_key_bits(mut self, key_bits: usize) -> Self {
        self.key_bits = key_bits;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(Error::InvalidParameters(
                "threshold must be at least 1".to_string(),
            ));
        }
        if self.threshold > self.share_count {
            return Err(Error::InvalidParameters(format!(
                "threshold {} exceeds share count {}",
                self.threshold, self.share_count
            )));
        }
        if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&self.key_bits) {
            return Err(Error::InvalidParameters(format!(
                "key size must be between {} and {} bits",
                MIN_KEY_BITS, MAX_KEY_BITS
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StegoConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        assert!(StegoConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(StegoConfig::new(0, 5).validate().is_err());
        assert!(StegoConfig::new(6, 5).validate().is_err());
        assert!(StegoConfig::new(1, 1).validate().is_ok());
        assert!(StegoConfig::new(5, 5).validate().is_ok());
    }

    #[test]
    fn test_key_bits_bounds() {
        assert!(StegoConfig::default().with_key_bits(512).validate().is_err());
        assert!(StegoConfig::default().with_key_bits(8192).validate().is_err());
        assert!(StegoConfig::default().with_key_bits(1024).validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stego.json");
        let config = StegoConfig::new(2, 4).with_key_bits(1024);

        config.save(&path).unwrap();
        let loaded = StegoConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_key_bits_uses_default() {
        let config: StegoConfig =
            serde_json::from_str(r#"{"threshold": 2, "share_count": 3}"#).unwrap();
        assert_eq!(config.key_bits, DEFAULT_KEY_BITS);
    }
}
