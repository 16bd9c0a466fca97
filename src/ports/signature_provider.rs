//! Signature Provider Port - Source of the doctor's electronic signature.

use async_trait::async_trait;

use crate::domain::foundation::{DigitalSignature, ErrorCode};

/// Port for producing the doctor's electronic signature.
#[async_trait]
pub trait SignatureProvider: Send + Sync {
    /// Sign a prescription digest.
    ///
    /// # Errors
    ///
    /// - `KeyUnavailable` if no signing material is configured
    /// - `DeviceFailure` if the signing device fails
    async fn sign(&self, digest: &[u8]) -> Result<DigitalSignature, SignatureError>;
}

/// Errors raised while producing a signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature material unavailable")]
    KeyUnavailable,

    #[error("signature device failure: {0}")]
    DeviceFailure(String),
}

impl SignatureError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::SignatureUnavailable
    }
}
