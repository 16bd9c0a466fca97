//! Consultation-specific error types.

use crate::domain::foundation::{ErrorCode, Timestamp, ValidationError};
use crate::domain::prescription::PrescriptionError;
use crate::ports::{AIError, RegistryError, SignatureError};

use super::{ConsultationEvent, ConsultationState};

/// Errors raised by the consultation terminal.
///
/// Collaborator failures are wrapped without modification so callers can
/// match on the original registry, AI or signature error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsultationError {
    /// Event invoked out of the required order.
    #[error("{event} requires state {expected}, but the consultation is {actual}")]
    Procedural {
        event: ConsultationEvent,
        expected: ConsultationState,
        actual: ConsultationState,
    },

    /// Treatment ending date is not strictly in the future.
    #[error("treatment ending date {ends_at:?} is not after {now:?}")]
    IncorrectEndingDate { ends_at: Timestamp, now: Timestamp },

    #[error(transparent)]
    Prescription(#[from] PrescriptionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    DecisionSupport(#[from] AIError),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl ConsultationError {
    pub fn procedural(event: ConsultationEvent, actual: ConsultationState) -> Self {
        ConsultationError::Procedural {
            event,
            expected: event.required_state(),
            actual,
        }
    }

    /// Returns true if the error is an out-of-order event.
    pub fn is_procedural(&self) -> bool {
        matches!(self, ConsultationError::Procedural { .. })
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ConsultationError::Procedural { .. } => ErrorCode::InvalidStateTransition,
            ConsultationError::IncorrectEndingDate { .. } => ErrorCode::IncorrectEndingDate,
            ConsultationError::Prescription(err) => err.code(),
            ConsultationError::Validation(ValidationError::EmptyField { .. }) => ErrorCode::EmptyField,
            ConsultationError::Validation(ValidationError::InvalidFormat { .. }) => {
                ErrorCode::InvalidFormat
            }
            ConsultationError::Registry(err) => err.code(),
            ConsultationError::DecisionSupport(err) => err.code(),
            ConsultationError::Signature(err) => err.code(),
        }
    }
}
