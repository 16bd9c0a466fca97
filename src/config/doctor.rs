//! Doctor configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::MembershipNumber;

use super::error::ValidationError;

/// Doctor operating the consultation terminal
#[derive(Debug, Deserialize)]
pub struct DoctorConfig {
    /// Professional membership number, used as prescriber of new prescriptions
    pub membership_number: u32,

    /// Key for the electronic signature; signing fails when absent
    pub signing_key: Option<SecretString>,
}

impl DoctorConfig {
    pub fn membership_number(&self) -> MembershipNumber {
        MembershipNumber::new(self.membership_number)
    }

    /// Check if a signing key is configured
    pub fn can_sign(&self) -> bool {
        self.signing_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate doctor configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.membership_number == 0 {
            return Err(ValidationError::InvalidMembershipNumber);
        }
        if self.signing_key.is_some() && !self.can_sign() {
            return Err(ValidationError::EmptySigningKey);
        }
        Ok(())
    }
}
