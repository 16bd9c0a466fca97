//! Doctor's electronic signature.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Opaque signature bytes.
///
/// The bytes are copied in on construction and copied out on read, so no
/// caller can mutate the stored signature through an aliased buffer.
/// Equality and hashing compare content.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DigitalSignature(Vec<u8>);

impl DigitalSignature {
    /// Creates a signature from a copy of `bytes`.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if no signature material is supplied
    pub fn new(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::empty_field("signature"));
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Returns a copy of the signature bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.clone()
    }

    /// Number of bytes in the signature.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; empty signatures cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<u8>> for DigitalSignature {
    type Error = ValidationError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DigitalSignature> for Vec<u8> {
    fn from(signature: DigitalSignature) -> Self {
        signature.0
    }
}

impl fmt::Debug for DigitalSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitalSignature")
            .field("signature_length", &self.0.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(sig: &DigitalSignature) -> u64 {
        let mut hasher = DefaultHasher::new();
        sig.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn mutating_input_buffer_does_not_change_signature() {
        let mut raw = vec![1, 2, 3];
        let sig = DigitalSignature::new(&raw).unwrap();
        raw[0] = 9;
        assert_eq!(sig.to_bytes(), vec![1, 2, 3]);
    }

    #[test]
    fn mutating_returned_bytes_does_not_change_signature() {
        let sig = DigitalSignature::new(&[1, 2, 3]).unwrap();
        let mut out = sig.to_bytes();
        out[0] = 9;
        assert_eq!(sig.to_bytes(), vec![1, 2, 3]);
    }

    #[test]
    fn signatures_compare_and_hash_by_content() {
        let a = DigitalSignature::new(&[4, 5, 6]).unwrap();
        let b = DigitalSignature::new(&[4, 5, 6]).unwrap();
        let c = DigitalSignature::new(&[4, 5, 7]).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn empty_signature_is_rejected() {
        assert_eq!(
            DigitalSignature::new(&[]),
            Err(ValidationError::empty_field("signature"))
        );
    }

    #[test]
    fn empty_signature_cannot_be_deserialized() {
        assert!(serde_json::from_str::<DigitalSignature>("[]").is_err());

        let sig: DigitalSignature = serde_json::from_str("[7, 8]").unwrap();
        assert_eq!(sig.to_bytes(), vec![7, 8]);
    }

    #[test]
    fn debug_does_not_leak_bytes() {
        let sig = DigitalSignature::new(&[1, 2, 3]).unwrap();
        assert_eq!(
            format!("{:?}", sig),
            "DigitalSignature { signature_length: 3 }"
        );
    }
}
