//! RSA keypairs guarding the grid geometry.

use crate::error::{Error, Result};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Capability to encrypt with a public key and decrypt with the matching
/// private key.
pub trait GeometryKey {
    /// Encrypt `plaintext` under the public key.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt `ciphertext` with the private key.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// An RSA keypair used with OAEP (SHA-256) padding.
#[derive(Clone)]
pub struct KeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("fingerprint", &self.fingerprint().unwrap_or_default())
            .field("private", &"[REDACTED]")
            .finish()
    }
}

impl KeyPair {
    /// Generate a fresh keypair with a modulus of `bits` bits.
    pub fn generate(bits: usize) -> Result<Self> {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), bits)?;
        tracing::info!(bits, "generated RSA keypair");
        Ok(Self::from_private(private))
    }

    /// Wrap an existing private key.
    pub fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        Self { private, public }
    }

    /// Load a private key stored as PKCS#8 or PKCS#1 PEM.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::KeyNotFound(path.to_path_buf()));
        }

        let pem = fs::read_to_string(path)?;
        let private = parse_private(&pem)
            .map_err(|e| Error::Key(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_private(private))
    }

    /// Load the keypair at `path`, generating and saving a new one when the
    /// file is missing or holds only a public key.
    pub fn load_or_generate(path: &Path, bits: usize) -> Result<Self> {
        if path.exists() {
            let pem = fs::read_to_string(path)?;
            if let Ok(private) = parse_private(&pem) {
                return Ok(Self::from_private(private));
            }
            if !holds_public_key(&pem) {
                return Err(Error::Key(format!(
                    "{} does not hold an RSA key",
                    path.display()
                )));
            }
            tracing::warn!(path = %path.display(), "key file has no private key, replacing it");
        }

        let keys = Self::generate(bits)?;
        keys.save(path)?;
        Ok(keys)
    }

    /// Write the private key as PKCS#8 PEM.
    pub fn save(&self, path: &Path) -> Result<()> {
        let pem = self
            .private
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| Error::Key(e.to_string()))?;
        fs::write(path, pem.as_bytes())?;
        Ok(())
    }

    /// Write only the public key as SPKI PEM.
    pub fn save_public(&self, path: &Path) -> Result<()> {
        let pem = self
            .public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| Error::Key(e.to_string()))?;
        fs::write(path, pem)?;
        Ok(())
    }

    /// The public half.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Hex SHA-256 of the DER-encoded public key.
    pub fn fingerprint(&self) -> Result<String> {
        let der = self
            .public
            .to_public_key_der()
            .map_err(|e| Error::Key(e.to_string()))?;
        Ok(hex::encode(Sha256::digest(der.as_bytes())))
    }
}

/// Parse a PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1 (`BEGIN RSA PRIVATE KEY`)
/// private key.
fn parse_private(pem: &str) -> std::result::Result<RsaPrivateKey, String> {
    RsaPrivateKey::from_pkcs8_pem(pem).or_else(|pkcs8_err| {
        RsaPrivateKey::from_pkcs1_pem(pem).map_err(|_| pkcs8_err.to_string())
    })
}

fn holds_public_key(pem: &str) -> bool {
    RsaPublicKey::from_public_key_pem(pem).is_ok() || RsaPublicKey::from_pkcs1_pem(pem).is_ok()
}

impl GeometryKey for KeyPair {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.public
            .encrypt(&mut rand::thread_rng(), Oaep::new::<Sha256>(), plaintext)
            .map_err(|e| Error::Encryption(e.to_string()))
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.private
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|_| Error::Decryption)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::OnceLock;
    use tempfile::TempDir;

    /// Two distinct 1024-bit keypairs, generated once per test binary.
    pub(crate) fn test_keys() -> &'static (KeyPair, KeyPair) {
        static KEYS: OnceLock<(KeyPair, KeyPair)> = OnceLock::new();
        KEYS.get_or_init(|| (KeyPair::generate(1024).unwrap(), KeyPair::generate(1024).unwrap()))
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let (keys, _) = test_keys();
        let ciphertext = keys.encrypt(b"\x19").unwrap();
        assert_eq!(keys.decrypt(&ciphertext).unwrap(), b"\x19");
    }

    #[test]
    fn test_wrong_key_fails() {
        let (keys, other) = test_keys();
        let ciphertext = keys.encrypt(b"\x19").unwrap();
        assert!(matches!(other.decrypt(&ciphertext), Err(Error::Decryption)));
    }

    #[test]
    fn test_oaep_is_randomized() {
        let (keys, _) = test_keys();
        assert_ne!(keys.encrypt(b"same").unwrap(), keys.encrypt(b"same").unwrap());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("private_key.pem");
        let (keys, _) = test_keys();

        keys.save(&path).unwrap();
        let loaded = KeyPair::load(&path).unwrap();

        assert_eq!(loaded.fingerprint().unwrap(), keys.fingerprint().unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = KeyPair::load(&dir.path().join("absent.pem"));
        assert!(matches!(result, Err(Error::KeyNotFound(_))));
    }

    #[test]
    fn test_load_or_generate_keeps_existing_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("private_key.pem");
        let (keys, _) = test_keys();
        keys.save(&path).unwrap();

        let loaded = KeyPair::load_or_generate(&path, 1024).unwrap();

        assert_eq!(loaded.fingerprint().unwrap(), keys.fingerprint().unwrap());
    }

    #[test]
    fn test_load_or_generate_replaces_public_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("private_key.pem");
        let (keys, _) = test_keys();
        keys.save_public(&path).unwrap();

        let regenerated = KeyPair::load_or_generate(&path, 1024).unwrap();

        assert_ne!(regenerated.fingerprint().unwrap(), keys.fingerprint().unwrap());
        let reloaded = KeyPair::load(&path).unwrap();
        assert_eq!(reloaded.fingerprint().unwrap(), regenerated.fingerprint().unwrap());
    }

    #[test]
    fn test_load_pkcs1_private_key() {
        use rsa::pkcs1::EncodeRsaPrivateKey;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("private_key.pem");
        let (keys, _) = test_keys();
        let pem = keys.private.to_pkcs1_pem(LineEnding::LF).unwrap();
        fs::write(&path, pem.as_bytes()).unwrap();

        let loaded = KeyPair::load(&path).unwrap();
        assert_eq!(loaded.fingerprint().unwrap(), keys.fingerprint().unwrap());

        let kept = KeyPair::load_or_generate(&path, 1024).unwrap();
        assert_eq!(kept.fingerprint().unwrap(), keys.fingerprint().unwrap());
        // An existing private key is never rewritten.
        assert_eq!(fs::read_to_string(&path).unwrap(), pem.as_str());
    }

    #[test]
    fn test_load_or_generate_replaces_pkcs1_public_only_file() {
        use rsa::pkcs1::EncodeRsaPublicKey;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("private_key.pem");
        let (keys, _) = test_keys();
        let pem = keys.public.to_pkcs1_pem(LineEnding::LF).unwrap();
        fs::write(&path, pem).unwrap();

        let regenerated = KeyPair::load_or_generate(&path, 1024).unwrap();

        assert_ne!(regenerated.fingerprint().unwrap(), keys.fingerprint().unwrap());
        let reloaded = KeyPair::load(&path).unwrap();
        assert_eq!(reloaded.fingerprint().unwrap(), regenerated.fingerprint().unwrap());
    }

    #[test]
    fn test_load_or_generate_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("private_key.pem");
        fs::write(&path, "not a key").unwrap();

        assert!(matches!(
            KeyPair::load_or_generate(&path, 1024),
            Err(Error::Key(_))
        ));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let (keys, _) = test_keys();
        let debug = format!("{:?}", keys);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("PRIVATE"));
    }
}
