//! In-memory health registry.
//!
//! Keeps patient histories and prescriptions in process memory. Used by the
//! demo binary and by tests; nothing is persisted.
//!
//! # Example
//!
//! ```ignore
//! let patient = HealthCardId::new("1111222233334444")?;
//! let registry = InMemoryHealthRegistry::new().with_patient(patient.clone(), MembershipNumber::new(12345));
//!
//! let history = registry.get_medical_history(&patient).await?;
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

use crate::domain::consultation::MedicalHistory;
use crate::domain::foundation::{HealthCardId, MembershipNumber, PrescriptionCode, PRESCRIPTION_CODE_LEN};
use crate::domain::prescription::MedicalPrescription;
use crate::ports::{HealthRegistry, RegistryError};

#[derive(Debug, Clone)]
struct PatientRecord {
    history: MedicalHistory,
    /// Active prescriptions keyed by illness.
    prescriptions: HashMap<String, MedicalPrescription>,
}

/// Health registry backed by a map of patient records.
#[derive(Debug, Default)]
pub struct InMemoryHealthRegistry {
    patients: RwLock<HashMap<HealthCardId, PatientRecord>>,
    offline: AtomicBool,
}

impl InMemoryHealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a patient with an empty history.
    pub fn with_patient(self, patient_id: HealthCardId, doctor: MembershipNumber) -> Self {
        self.write().insert(
            patient_id.clone(),
            PatientRecord {
                history: MedicalHistory::new(patient_id, doctor),
                prescriptions: HashMap::new(),
            },
        );
        self
    }

    /// Stores an active prescription, registering its patient if needed.
    pub fn with_prescription(self, prescription: MedicalPrescription) -> Self {
        let patient_id = prescription.patient_id().clone();
        let mut patients = self.write();
        let record = patients.entry(patient_id.clone()).or_insert_with(|| PatientRecord {
            history: MedicalHistory::new(patient_id, prescription.prescriber()),
            prescriptions: HashMap::new(),
        });
        record
            .prescriptions
            .insert(prescription.illness().to_string(), prescription);
        drop(patients);
        self
    }

    /// Simulates the registry becoming unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    // === Test Helpers ===

    /// Stored history of a patient.
    pub fn stored_history(&self, patient_id: &HealthCardId) -> Option<MedicalHistory> {
        self.read().get(patient_id).map(|record| record.history.clone())
    }

    /// Stored prescription of a patient for an illness.
    pub fn stored_prescription(
        &self,
        patient_id: &HealthCardId,
        illness: &str,
    ) -> Option<MedicalPrescription> {
        self.read()
            .get(patient_id)
            .and_then(|record| record.prescriptions.get(illness).cloned())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<HealthCardId, PatientRecord>> {
        self.patients.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<HealthCardId, PatientRecord>> {
        self.patients.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_online(&self) -> Result<(), RegistryError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RegistryError::connection("registry is offline"))
        } else {
            Ok(())
        }
    }

    fn ensure_registered(&self, patient_id: &HealthCardId) -> Result<(), RegistryError> {
        if self.read().contains_key(patient_id) {
            Ok(())
        } else {
            Err(RegistryError::UnknownPatient(patient_id.clone()))
        }
    }
}

fn new_prescription_code() -> Result<PrescriptionCode, RegistryError> {
    let raw: String = Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(PRESCRIPTION_CODE_LEN)
        .collect();
    PrescriptionCode::new(raw).map_err(|e| RegistryError::IncorrectParameters(e.to_string()))
}

#[async_trait]
impl HealthRegistry for InMemoryHealthRegistry {
    async fn get_medical_history(&self, patient_id: &HealthCardId) -> Result<MedicalHistory, RegistryError> {
        self.ensure_online()?;
        self.stored_history(patient_id)
            .ok_or_else(|| RegistryError::UnknownPatient(patient_id.clone()))
    }

    async fn get_medical_prescription(
        &self,
        patient_id: &HealthCardId,
        illness: &str,
    ) -> Result<Option<MedicalPrescription>, RegistryError> {
        self.ensure_online()?;
        self.ensure_registered(patient_id)?;
        Ok(self.stored_prescription(patient_id, illness))
    }

    async fn send_history_and_prescription(
        &self,
        patient_id: &HealthCardId,
        history: &MedicalHistory,
        illness: &str,
        prescription: &MedicalPrescription,
    ) -> Result<MedicalPrescription, RegistryError> {
        self.ensure_online()?;
        self.ensure_registered(patient_id)?;

        if prescription.patient_id() != patient_id
            || history.patient_id() != patient_id
            || prescription.illness() != illness
        {
            return Err(RegistryError::no_active_prescription(patient_id, illness));
        }
        if !prescription.is_complete() {
            return Err(RegistryError::IncompletePrescription(
                "ending date, signature and at least one line are required".to_string(),
            ));
        }

        let registered = self.generate_code_and_register(prescription.clone()).await?;

        let mut patients = self.write();
        if let Some(record) = patients.get_mut(patient_id) {
            record.history = history.clone();
            record
                .prescriptions
                .insert(illness.to_string(), registered.clone());
        }
        Ok(registered)
    }

    async fn generate_code_and_register(
        &self,
        mut prescription: MedicalPrescription,
    ) -> Result<MedicalPrescription, RegistryError> {
        self.ensure_online()?;
        prescription.set_prescription_code(new_prescription_code()?);
        Ok(prescription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DigitalSignature, ProductId, Timestamp};

    fn patient() -> HealthCardId {
        HealthCardId::new("1111222233334444").unwrap()
    }

    fn doctor() -> MembershipNumber {
        MembershipNumber::new(12345)
    }

    fn complete_prescription(illness: &str) -> MedicalPrescription {
        let mut prescription = MedicalPrescription::new(patient(), doctor(), illness);
        prescription
            .add_line(
                ProductId::new("123456789012").unwrap(),
                &["DURINGMEALS", "7", "500", "8", "HOUR", "Take with water"],
            )
            .unwrap();
        prescription.set_treatment_dates(Timestamp::now(), Timestamp::now().add_days(7));
        prescription
            .attach_signature(DigitalSignature::new(&[1, 2, 3]).unwrap())
            .unwrap();
        prescription
    }

    #[tokio::test]
    async fn unknown_patient_is_reported() {
        let registry = InMemoryHealthRegistry::new();

        let err = registry.get_medical_history(&patient()).await.unwrap_err();

        assert_eq!(err, RegistryError::UnknownPatient(patient()));
    }

    #[tokio::test]
    async fn missing_prescription_is_none() {
        let registry = InMemoryHealthRegistry::new().with_patient(patient(), doctor());

        let found = registry
            .get_medical_prescription(&patient(), "Gripe")
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn offline_registry_fails_with_connection_error() {
        let registry = InMemoryHealthRegistry::new().with_patient(patient(), doctor());
        registry.set_offline(true);

        let err = registry.get_medical_history(&patient()).await.unwrap_err();
        assert!(matches!(err, RegistryError::Connection(_)));

        registry.set_offline(false);
        assert!(registry.get_medical_history(&patient()).await.is_ok());
    }

    #[tokio::test]
    async fn send_assigns_code_and_stores_both_records() {
        let registry = InMemoryHealthRegistry::new().with_patient(patient(), doctor());
        let mut history = MedicalHistory::new(patient(), doctor());
        history.add_annotation("Fiebre alta");

        let registered = registry
            .send_history_and_prescription(&patient(), &history, "Infección", &complete_prescription("Infección"))
            .await
            .unwrap();

        let code = registered.prescription_code().unwrap();
        assert_eq!(code.as_str().len(), PRESCRIPTION_CODE_LEN);
        assert_eq!(registry.stored_history(&patient()).unwrap(), history);
        assert_eq!(
            registry.stored_prescription(&patient(), "Infección").unwrap(),
            registered
        );
    }

    #[tokio::test]
    async fn send_rejects_incomplete_prescription() {
        let registry = InMemoryHealthRegistry::new().with_patient(patient(), doctor());
        let history = MedicalHistory::new(patient(), doctor());
        let unsigned = MedicalPrescription::new(patient(), doctor(), "Infección");

        let err = registry
            .send_history_and_prescription(&patient(), &history, "Infección", &unsigned)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::IncompletePrescription(_)));
        assert!(registry.stored_prescription(&patient(), "Infección").is_none());
    }

    #[tokio::test]
    async fn send_rejects_illness_mismatch() {
        let registry = InMemoryHealthRegistry::new().with_patient(patient(), doctor());
        let history = MedicalHistory::new(patient(), doctor());

        let err = registry
            .send_history_and_prescription(&patient(), &history, "Gripe", &complete_prescription("Infección"))
            .await
            .unwrap_err();

        assert_eq!(err, RegistryError::no_active_prescription(&patient(), "Gripe"));
    }

    #[tokio::test]
    async fn with_prescription_registers_its_patient() {
        let prescription = MedicalPrescription::new(patient(), doctor(), "Gripe");
        let registry = InMemoryHealthRegistry::new().with_prescription(prescription.clone());

        let found = registry
            .get_medical_prescription(&patient(), "Gripe")
            .await
            .unwrap();

        assert_eq!(found, Some(prescription));
    }
}
