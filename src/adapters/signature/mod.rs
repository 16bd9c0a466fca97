//! Signature provider adapters.

mod hmac_signer;

pub use hmac_signer::HmacSignatureProvider;
