//! Application layer - Orchestration of the supervise-treatment use case.
//!
//! The [`ConsultationTerminal`] sequences calls to the health registry, the
//! decision AI and the signature provider, and drives the prescription
//! aggregate through one consultation at a time.

mod consultation_terminal;

pub use consultation_terminal::ConsultationTerminal;
