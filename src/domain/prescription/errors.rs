//! Prescription-specific error types.

use crate::domain::foundation::{ErrorCode, ProductId};

/// Errors raised by the prescription aggregate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PrescriptionError {
    #[error("Product {0} is already in the prescription")]
    AlreadyInPrescription(ProductId),

    #[error("Product {0} is not in the prescription")]
    NotInPrescription(ProductId),

    #[error("Incorrect taking guidelines: {0}")]
    IncorrectTakingGuidelines(String),

    #[error("Treatment ending date must be set before signing")]
    MissingEndingDate,
}

impl PrescriptionError {
    pub fn incorrect_guidelines(reason: impl Into<String>) -> Self {
        PrescriptionError::IncorrectTakingGuidelines(reason.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PrescriptionError::AlreadyInPrescription(_) => ErrorCode::ProductAlreadyInPrescription,
            PrescriptionError::NotInPrescription(_) => ErrorCode::ProductNotInPrescription,
            PrescriptionError::IncorrectTakingGuidelines(_) => ErrorCode::IncorrectTakingGuidelines,
            PrescriptionError::MissingEndingDate => ErrorCode::IncorrectEndingDate,
        }
    }
}
