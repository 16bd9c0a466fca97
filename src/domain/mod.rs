//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, signature, timestamps, errors)
//! - `consultation` - Session state, medical history and consultation errors
//! - `prescription` - Prescription aggregate, medication lines and AI suggestions

pub mod consultation;
pub mod foundation;
pub mod prescription;
