//! Patient medical history as downloaded from the health registry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{HealthCardId, MembershipNumber};

/// Clinical history of one patient with its annotation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalHistory {
    patient_id: HealthCardId,
    doctor: MembershipNumber,
    annotations: String,
}

impl MedicalHistory {
    /// Creates a history with an empty annotation log.
    pub fn new(patient_id: HealthCardId, doctor: MembershipNumber) -> Self {
        Self {
            patient_id,
            doctor,
            annotations: String::new(),
        }
    }

    pub fn patient_id(&self) -> &HealthCardId {
        &self.patient_id
    }

    /// Doctor currently responsible for the patient.
    pub fn doctor(&self) -> MembershipNumber {
        self.doctor
    }

    /// Full annotation log, one annotation per line.
    pub fn annotations(&self) -> &str {
        &self.annotations
    }

    /// Appends an annotation on its own line.
    ///
    /// Empty annotations are ignored. Returns whether anything was appended.
    pub fn add_annotation(&mut self, annotation: &str) -> bool {
        if annotation.is_empty() {
            return false;
        }
        if !self.annotations.is_empty() {
            self.annotations.push('\n');
        }
        self.annotations.push_str(annotation);
        true
    }

    /// Hands the patient over to another doctor.
    pub fn assign_doctor(&mut self, doctor: MembershipNumber) {
        self.doctor = doctor;
    }
}
