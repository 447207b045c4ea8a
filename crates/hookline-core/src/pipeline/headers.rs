//! Request header resolution.
//!
//! Stored definitions keep secure header values encrypted at rest, with
//! a masked placeholder in the plaintext map for display. At dispatch
//! time the resolver decrypts each secure value over the plaintext map,
//! so the placeholder never reaches the wire. Decryption is the only
//! fallible step and any failure aborts the whole execution before a
//! record exists for it.

use std::collections::HashMap;

use hookline_types::error::AccessError;
use thiserror::Error;

/// Decryption failure surfaced by a [`HeaderCipher`] implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CipherError(pub String);

/// Decrypts at-rest header ciphertext into plaintext values.
pub trait HeaderCipher: Send + Sync {
    fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError>;
}

/// Builds the outbound header map for a webhook call.
#[derive(Debug, Clone)]
pub struct HeaderResolver<C> {
    cipher: C,
}

impl<C: HeaderCipher> HeaderResolver<C> {
    pub fn new(cipher: C) -> Self {
        Self { cipher }
    }

    /// Merge plaintext and decrypted secure headers over the JSON baseline.
    ///
    /// Secure values win over the masked placeholders stored under the
    /// same keys in the plaintext map.
    pub fn resolve(
        &self,
        plain: &HashMap<String, String>,
        secure: &HashMap<String, String>,
    ) -> Result<HashMap<String, String>, AccessError> {
        let mut resolved = HashMap::with_capacity(plain.len() + secure.len() + 1);
        resolved.insert("Content-Type".to_string(), "application/json".to_string());

        for (key, value) in plain {
            resolved.insert(key.clone(), value.clone());
        }

        for (key, ciphertext) in secure {
            let value = self.cipher.decrypt(ciphertext).map_err(|e| {
                tracing::error!(header = %key, error = %e, "secure header decryption failed");
                AccessError::Internal(format!("failed to decrypt header '{key}'"))
            })?;
            resolved.insert(key.clone(), value);
        }

        Ok(resolved)
    }
}

/// Masked display form of a secret: all but the last four characters
/// hidden.
pub fn mask_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RotCipher;

    impl HeaderCipher for RotCipher {
        fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
            ciphertext
                .strip_prefix("enc:")
                .map(str::to_string)
                .ok_or_else(|| CipherError("bad ciphertext".to_string()))
        }
    }

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_baseline_content_type() {
        let resolver = HeaderResolver::new(RotCipher);
        let headers = resolver.resolve(&HashMap::new(), &HashMap::new()).unwrap();
        assert_eq!(headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_plain_headers_can_override_baseline() {
        let resolver = HeaderResolver::new(RotCipher);
        let headers = resolver
            .resolve(&map(&[("Content-Type", "text/plain")]), &HashMap::new())
            .unwrap();
        assert_eq!(headers["Content-Type"], "text/plain");
    }

    #[test]
    fn test_secure_value_replaces_mask_placeholder() {
        let resolver = HeaderResolver::new(RotCipher);
        let headers = resolver
            .resolve(
                &map(&[("X-Api-Key", "****cafe")]),
                &map(&[("X-Api-Key", "enc:supersecretcafe")]),
            )
            .unwrap();
        assert_eq!(headers["X-Api-Key"], "supersecretcafe");
    }

    #[test]
    fn test_decrypt_failure_is_internal() {
        let resolver = HeaderResolver::new(RotCipher);
        let err = resolver
            .resolve(&HashMap::new(), &map(&[("X-Api-Key", "garbage")]))
            .unwrap_err();
        match err {
            AccessError::Internal(msg) => assert!(msg.contains("X-Api-Key")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value("supersecretcafe"), "****cafe");
        assert_eq!(mask_value("abcd"), "****");
        assert_eq!(mask_value(""), "****");
    }
}
