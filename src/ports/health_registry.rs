//! Health Registry Port - Interface to the national health service.
//!
//! The registry owns patients' clinical histories and their active
//! prescriptions. The consultation terminal downloads both when a revision
//! starts and uploads them once the new prescription is signed.

use async_trait::async_trait;

use crate::domain::consultation::MedicalHistory;
use crate::domain::foundation::{ErrorCode, HealthCardId};
use crate::domain::prescription::MedicalPrescription;

/// Port for the national health registry.
#[async_trait]
pub trait HealthRegistry: Send + Sync {
    /// Download the clinical history of a patient.
    ///
    /// # Errors
    ///
    /// - `Connection` if the registry cannot be reached
    /// - `UnknownPatient` if the patient is not registered
    /// - `IncorrectParameters` if the registry rejects the request
    async fn get_medical_history(&self, patient_id: &HealthCardId) -> Result<MedicalHistory, RegistryError>;

    /// Download the active prescription of a patient for an illness.
    ///
    /// Returns `None` when the patient has no prescription for the illness yet.
    ///
    /// # Errors
    ///
    /// - `Connection`, `UnknownPatient`, `NoActivePrescription`
    async fn get_medical_prescription(
        &self,
        patient_id: &HealthCardId,
        illness: &str,
    ) -> Result<Option<MedicalPrescription>, RegistryError>;

    /// Upload the updated history together with the signed prescription.
    ///
    /// Returns the registered prescription, which carries the
    /// registry-assigned prescription code.
    ///
    /// # Errors
    ///
    /// - `Connection`, `UnknownPatient`, `NoActivePrescription`,
    ///   `IncompletePrescription`
    async fn send_history_and_prescription(
        &self,
        patient_id: &HealthCardId,
        history: &MedicalHistory,
        illness: &str,
        prescription: &MedicalPrescription,
    ) -> Result<MedicalPrescription, RegistryError>;

    /// Assign a prescription code and register the prescription.
    async fn generate_code_and_register(
        &self,
        prescription: MedicalPrescription,
    ) -> Result<MedicalPrescription, RegistryError>;
}

/// Errors reported by the health registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("health registry unreachable: {0}")]
    Connection(String),

    #[error("patient {0} is not registered")]
    UnknownPatient(HealthCardId),

    #[error("incorrect parameters: {0}")]
    IncorrectParameters(String),

    #[error("patient {patient_id} has no active prescription for '{illness}'")]
    NoActivePrescription {
        patient_id: HealthCardId,
        illness: String,
    },

    #[error("prescription is not complete: {0}")]
    IncompletePrescription(String),
}

impl RegistryError {
    pub fn connection(message: impl Into<String>) -> Self {
        RegistryError::Connection(message.into())
    }

    pub fn no_active_prescription(patient_id: &HealthCardId, illness: impl Into<String>) -> Self {
        RegistryError::NoActivePrescription {
            patient_id: patient_id.clone(),
            illness: illness.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::Connection(_) => ErrorCode::RegistryUnavailable,
            RegistryError::UnknownPatient(_) => ErrorCode::UnknownPatient,
            RegistryError::IncorrectParameters(_) => ErrorCode::IncorrectParameters,
            RegistryError::NoActivePrescription { .. } => ErrorCode::NoActivePrescription,
            RegistryError::IncompletePrescription(_) => ErrorCode::IncompletePrescription,
        }
    }
}
