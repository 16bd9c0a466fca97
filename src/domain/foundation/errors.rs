//! Error types shared across the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Stable error codes, organised by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    EmptyField,
    InvalidFormat,
    IncorrectTakingGuidelines,
    IncorrectEndingDate,

    // Procedural errors
    InvalidStateTransition,

    // Conflict errors
    ProductAlreadyInPrescription,
    ProductNotInPrescription,

    // Registry errors
    RegistryUnavailable,
    UnknownPatient,
    IncorrectParameters,
    NoActivePrescription,
    IncompletePrescription,

    // AI errors
    AIUnavailable,
    BadPrompt,
    MalformedAIResponse,

    // Signature errors
    SignatureUnavailable,
}

impl ErrorCode {
    /// Returns true for errors raised by an external collaborator.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            ErrorCode::RegistryUnavailable
                | ErrorCode::UnknownPatient
                | ErrorCode::IncorrectParameters
                | ErrorCode::NoActivePrescription
                | ErrorCode::IncompletePrescription
                | ErrorCode::AIUnavailable
                | ErrorCode::BadPrompt
                | ErrorCode::MalformedAIResponse
                | ErrorCode::SignatureUnavailable
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::IncorrectTakingGuidelines => "INCORRECT_TAKING_GUIDELINES",
            ErrorCode::IncorrectEndingDate => "INCORRECT_ENDING_DATE",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::ProductAlreadyInPrescription => "PRODUCT_ALREADY_IN_PRESCRIPTION",
            ErrorCode::ProductNotInPrescription => "PRODUCT_NOT_IN_PRESCRIPTION",
            ErrorCode::RegistryUnavailable => "REGISTRY_UNAVAILABLE",
            ErrorCode::UnknownPatient => "UNKNOWN_PATIENT",
            ErrorCode::IncorrectParameters => "INCORRECT_PARAMETERS",
            ErrorCode::NoActivePrescription => "NO_ACTIVE_PRESCRIPTION",
            ErrorCode::IncompletePrescription => "INCOMPLETE_PRESCRIPTION",
            ErrorCode::AIUnavailable => "AI_UNAVAILABLE",
            ErrorCode::BadPrompt => "BAD_PROMPT",
            ErrorCode::MalformedAIResponse => "MALFORMED_AI_RESPONSE",
            ErrorCode::SignatureUnavailable => "SIGNATURE_UNAVAILABLE",
        };
        write!(f, "{}", s)
    }
}
