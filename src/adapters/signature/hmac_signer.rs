//! HMAC-SHA256 signature provider.
//!
//! Signs prescription digests with the doctor's signing key. The key is
//! held as a [`SecretString`] and only exposed while computing the MAC.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::DigitalSignature;
use crate::ports::{SignatureError, SignatureProvider};

type HmacSha256 = Hmac<Sha256>;

/// Signature provider keyed with a shared secret.
pub struct HmacSignatureProvider {
    signing_key: Option<SecretString>,
}

impl HmacSignatureProvider {
    /// Creates a provider. `None` yields `KeyUnavailable` on every sign.
    pub fn new(signing_key: Option<SecretString>) -> Self {
        Self { signing_key }
    }

    /// Checks a signature against a digest in constant time.
    pub fn verify(&self, digest: &[u8], signature: &DigitalSignature) -> bool {
        match self.compute(digest) {
            Ok(expected) => expected.as_slice().ct_eq(&signature.to_bytes()).unwrap_u8() == 1,
            Err(_) => false,
        }
    }

    fn compute(&self, digest: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let key = self
            .signing_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.is_empty())
            .ok_or(SignatureError::KeyUnavailable)?;

        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| SignatureError::DeviceFailure(e.to_string()))?;
        mac.update(digest);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[async_trait]
impl SignatureProvider for HmacSignatureProvider {
    async fn sign(&self, digest: &[u8]) -> Result<DigitalSignature, SignatureError> {
        let bytes = self.compute(digest)?;
        tracing::debug!(digest_length = digest.len(), "Prescription digest signed");
        DigitalSignature::new(&bytes).map_err(|e| SignatureError::DeviceFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> HmacSignatureProvider {
        HmacSignatureProvider::new(Some(SecretString::new("colegiado-12345".to_string())))
    }

    #[tokio::test]
    async fn signature_verifies_against_same_digest() {
        let signer = provider();

        let signature = signer.sign(b"digest").await.unwrap();

        assert_eq!(signature.len(), 32);
        assert!(signer.verify(b"digest", &signature));
        assert!(!signer.verify(b"tampered", &signature));
    }

    #[tokio::test]
    async fn signing_is_deterministic_per_key() {
        let a = provider().sign(b"digest").await.unwrap();
        let b = provider().sign(b"digest").await.unwrap();
        let other = HmacSignatureProvider::new(Some(SecretString::new("other".to_string())))
            .sign(b"digest")
            .await
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, other);
    }

    #[tokio::test]
    async fn missing_key_is_unavailable() {
        let signer = HmacSignatureProvider::new(None);
        assert_eq!(
            signer.sign(b"digest").await.unwrap_err(),
            SignatureError::KeyUnavailable
        );
    }

    #[tokio::test]
    async fn empty_key_is_unavailable() {
        let signer = HmacSignatureProvider::new(Some(SecretString::new(String::new())));
        assert_eq!(
            signer.sign(b"digest").await.unwrap_err(),
            SignatureError::KeyUnavailable
        );
    }
}
