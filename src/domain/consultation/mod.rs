//! Consultation domain module.
//!
//! Vocabulary of one supervise-treatment session: the state it is in, the
//! patient's medical history being reviewed and the errors the terminal
//! reports.

mod errors;
mod history;
mod state;

pub use errors::ConsultationError;
pub use history::MedicalHistory;
pub use state::{ConsultationEvent, ConsultationState};
