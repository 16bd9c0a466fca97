//! Prescription domain module.
//!
//! The prescription aggregate and its medication lines: each line is a
//! [`TakingGuideline`] holding the day moment, treatment duration, a
//! [`Posology`] and free-text instructions. [`Suggestion`]s are edits
//! proposed by the decision-support AI and replayed against the aggregate.

mod aggregate;
mod errors;
mod guideline;
mod posology;
mod suggestion;

pub use aggregate::MedicalPrescription;
pub use errors::PrescriptionError;
pub use guideline::{DayMoment, GuidelineRecord, TakingGuideline, GUIDELINE_FIELD_COUNT};
pub use posology::{FrequencyUnit, Posology};
pub use suggestion::Suggestion;
