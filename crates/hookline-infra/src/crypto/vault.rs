//! AES-256-GCM vault encryption for secure header values at rest.
//!
//! `VaultCrypto` provides symmetric encryption with random nonces. The
//! master key can come from:
//! - A raw 32-byte key
//! - A password (Argon2id key derivation)
//! - The OS keychain (auto-generated, zero-friction default)
//!
//! Encrypted format: `nonce (12 bytes) || ciphertext`, base64-encoded in
//! its string form since header ciphertext is stored inside JSON
//! definitions.
//!
//! SECURITY: Error types never contain plaintext or key material.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hookline_core::pipeline::headers::{CipherError, HeaderCipher};
use thiserror::Error;

/// Nonce size for AES-256-GCM (96 bits / 12 bytes).
const NONCE_SIZE: usize = 12;

/// Service name used for keychain storage of the master key.
const KEYCHAIN_SERVICE: &str = "hookline";
/// Keychain user/account for the vault master key.
const KEYCHAIN_USER: &str = "vault-master-key";

/// Errors from vault encryption operations.
///
/// IMPORTANT: Display/Debug output never includes plaintext, key
/// material, or ciphertext, so these are safe to log.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("invalid ciphertext: too short")]
    CiphertextTooShort,

    #[error("invalid ciphertext: bad encoding")]
    InvalidEncoding,

    #[error("key derivation failed")]
    KeyDerivationFailed,

    #[error("keychain unavailable: {0}")]
    KeychainUnavailable(String),

    #[error("keychain error: {0}")]
    KeychainError(String),
}

/// AES-256-GCM cipher over the vault master key.
///
/// Each encryption call generates a fresh random 12-byte nonce, so
/// encrypting the same plaintext twice produces different output.
pub struct VaultCrypto {
    cipher: Aes256Gcm,
}

impl VaultCrypto {
    /// Create a `VaultCrypto` from a raw 32-byte key.
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(key.into()),
        }
    }

    /// Derive the encryption key from a password using Argon2id.
    ///
    /// OWASP parameters (19 MiB, 2 iterations, parallelism 1). The salt
    /// is deterministic so the same password always yields the same key;
    /// the password supplies the entropy and the hash is used as a KDF,
    /// never stored for verification.
    pub fn from_password(password: &str) -> Result<Self, VaultError> {
        use argon2::{Algorithm, Argon2, Params, Version};

        let params =
            Params::new(19456, 2, 1, Some(32)).map_err(|_| VaultError::KeyDerivationFailed)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let salt = b"hookline-vault-v1";
        let mut key = [0u8; 32];
        argon2
            .hash_password_into(password.as_bytes(), salt, &mut key)
            .map_err(|_| VaultError::KeyDerivationFailed)?;

        Ok(Self::new(&key))
    }

    /// Load or auto-generate the master key from the OS keychain.
    ///
    /// Looks up service="hookline" user="vault-master-key"; when no key
    /// exists yet a random one is generated and stored (hex, 64 chars).
    pub fn from_keychain() -> Result<Self, VaultError> {
        let entry = keyring::Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_USER)
            .map_err(|e| VaultError::KeychainUnavailable(e.to_string()))?;

        match entry.get_password() {
            Ok(hex_key) => {
                let key_bytes = hex_decode(&hex_key).map_err(|_| {
                    VaultError::KeychainError("corrupted key in keychain".to_string())
                })?;
                if key_bytes.len() != 32 {
                    return Err(VaultError::KeychainError(
                        "invalid key length in keychain".to_string(),
                    ));
                }
                let mut key = [0u8; 32];
                key.copy_from_slice(&key_bytes);
                Ok(Self::new(&key))
            }
            Err(keyring::Error::NoEntry) => {
                let key: [u8; 32] = rand_bytes();
                entry
                    .set_password(&hex_encode(&key))
                    .map_err(|e| VaultError::KeychainError(e.to_string()))?;
                Ok(Self::new(&key))
            }
            Err(e) => Err(VaultError::KeychainUnavailable(e.to_string())),
        }
    }

    /// Encrypt plaintext bytes; returns `nonce || ciphertext`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, VaultError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| VaultError::EncryptionFailed)?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    /// Decrypt data produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, VaultError> {
        if data.len() < NONCE_SIZE {
            return Err(VaultError::CiphertextTooShort);
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| VaultError::DecryptionFailed)
    }

    /// Encrypt a header value into the base64 form stored in
    /// `secure_headers`.
    pub fn encrypt_header(&self, plaintext: &str) -> Result<String, VaultError> {
        Ok(BASE64.encode(self.encrypt(plaintext.as_bytes())?))
    }

    /// Decrypt a base64 header ciphertext back into plaintext.
    pub fn decrypt_header(&self, ciphertext: &str) -> Result<String, VaultError> {
        let data = BASE64
            .decode(ciphertext)
            .map_err(|_| VaultError::InvalidEncoding)?;
        let plaintext = self.decrypt(&data)?;
        String::from_utf8(plaintext).map_err(|_| VaultError::DecryptionFailed)
    }
}

impl HeaderCipher for VaultCrypto {
    fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
        self.decrypt_header(ciphertext)
            .map_err(|e| CipherError(e.to_string()))
    }
}

/// Generate 32 random bytes using the OS CSPRNG.
fn rand_bytes() -> [u8; 32] {
    use aes_gcm::aead::rand_core::RngCore;
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    key
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Result<Vec<u8>, String> {
    if s.len() % 2 != 0 {
        return Err("odd length hex string".to_string());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|e| format!("invalid hex at position {i}: {e}"))
        })
        .collect()
}
