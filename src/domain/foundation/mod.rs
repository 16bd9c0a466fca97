//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the signature type, timestamps and
//! error types that form the vocabulary of the consultation domain.

mod errors;
mod ids;
mod signature;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{
    HealthCardId, MembershipNumber, PrescriptionCode, ProductId, HEALTH_CARD_ID_LEN,
    PRESCRIPTION_CODE_LEN, PRODUCT_ID_LEN,
};
pub use signature::DigitalSignature;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
