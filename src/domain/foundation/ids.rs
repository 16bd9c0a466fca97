//! Strongly-typed identifier value objects.
//!
//! Every identifier validates its format on construction, so holding one is
//! proof the format check already passed. Deserialization goes through the
//! same validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Length of a patient health card code (CIP).
pub const HEALTH_CARD_ID_LEN: usize = 16;

/// Length of a medicinal product code.
pub const PRODUCT_ID_LEN: usize = 12;

/// Length of a registry-assigned prescription code.
pub const PRESCRIPTION_CODE_LEN: usize = 10;

fn check_alphanumeric(field: &str, code: &str, len: usize) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if code.len() != len || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::invalid_format(
            field,
            format!("expected exactly {} alphanumeric characters", len),
        ));
    }
    Ok(())
}

/// Patient identifier in the national health service (CIP).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HealthCardId(String);

impl HealthCardId {
    /// Creates a HealthCardId, returning error unless it is 16 alphanumerics.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        check_alphanumeric("health_card_id", &code, HEALTH_CARD_ID_LEN)?;
        Ok(Self(code))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HealthCardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HealthCardId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for HealthCardId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HealthCardId> for String {
    fn from(id: HealthCardId) -> Self {
        id.0
    }
}

/// Universal product code of a medicinal product.
///
/// Ordering and hashing follow the canonical 12-digit string, which is what
/// prescription lines are keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Creates a ProductId, returning error unless it is exactly 12 digits.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        if code.is_empty() {
            return Err(ValidationError::empty_field("product_id"));
        }
        if code.len() != PRODUCT_ID_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "product_id",
                format!("expected exactly {} digits", PRODUCT_ID_LEN),
            ));
        }
        Ok(Self(code))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Electronic prescription code assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrescriptionCode(String);

impl PrescriptionCode {
    /// Creates a PrescriptionCode, returning error unless it is 10 alphanumerics.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        check_alphanumeric("prescription_code", &code, PRESCRIPTION_CODE_LEN)?;
        Ok(Self(code))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrescriptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PrescriptionCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PrescriptionCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrescriptionCode> for String {
    fn from(code: PrescriptionCode) -> Self {
        code.0
    }
}

/// Professional membership number of a doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipNumber(u32);

impl MembershipNumber {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MembershipNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_card_id_accepts_sixteen_alphanumerics() {
        let id = HealthCardId::new("ABCJ123456789012").unwrap();
        assert_eq!(id.as_str(), "ABCJ123456789012");
        assert_eq!(id.to_string(), "ABCJ123456789012");
    }

    #[test]
    fn health_card_id_rejects_wrong_length() {
        assert!(HealthCardId::new("ABC123").is_err());
        assert!(HealthCardId::new("ABCJ1234567890123").is_err());
    }

    #[test]
    fn health_card_id_rejects_symbols() {
        let result = HealthCardId::new("ABCJ-23456789012");
        match result {
            Err(ValidationError::InvalidFormat { field, .. }) => {
                assert_eq!(field, "health_card_id")
            }
            _ => panic!("Expected InvalidFormat error"),
        }
    }

    #[test]
    fn health_card_id_rejects_empty_string() {
        match HealthCardId::new("") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "health_card_id"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn product_id_accepts_twelve_digits() {
        let id: ProductId = "123456789012".parse().unwrap();
        assert_eq!(id.as_str(), "123456789012");
    }

    #[test]
    fn product_id_rejects_letters() {
        assert!(ProductId::new("12345678901A").is_err());
    }

    #[test]
    fn product_id_rejects_wrong_length() {
        assert!(ProductId::new("12345678901").is_err());
        assert!(ProductId::new("1234567890123").is_err());
    }

    #[test]
    fn product_ids_with_same_code_are_equal() {
        let a = ProductId::new("123456789012").unwrap();
        let b = ProductId::new(String::from("123456789012")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn prescription_code_accepts_ten_alphanumerics() {
        let code = PrescriptionCode::new("AB12CD34EF").unwrap();
        assert_eq!(code.as_str(), "AB12CD34EF");
    }

    #[test]
    fn prescription_code_rejects_wrong_length() {
        assert!(PrescriptionCode::new("AB12CD34E").is_err());
    }

    #[test]
    fn product_id_serializes_as_plain_string() {
        let id = ProductId::new("123456789012").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"123456789012\"");
    }

    #[test]
    fn product_id_deserialization_validates_format() {
        let result: Result<ProductId, _> = serde_json::from_str("\"12AB\"");
        assert!(result.is_err());
    }

    #[test]
    fn membership_number_displays_value() {
        assert_eq!(MembershipNumber::new(12345).to_string(), "12345");
    }
}
