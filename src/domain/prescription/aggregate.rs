//! Medical prescription aggregate.
//!
//! A prescription belongs to one patient and one illness and holds the
//! medication lines the doctor is editing during a consultation.
//!
//! # Ownership
//!
//! The consultation terminal owns the prescription exclusively while a
//! session is active. It is handed to the health registry on transmission.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::domain::foundation::{
    DigitalSignature, HealthCardId, MembershipNumber, PrescriptionCode, ProductId, Timestamp,
};

use super::{PrescriptionError, TakingGuideline};

/// Prescription aggregate.
///
/// # Invariants
///
/// - each product appears in at most one line
/// - lines are only modified or removed when present
/// - a signature is only attached once an ending date is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalPrescription {
    /// Patient the prescription is for.
    patient_id: HealthCardId,

    /// Prescribing doctor.
    prescriber: MembershipNumber,

    /// Illness under treatment.
    illness: String,

    /// Assigned by the registry once transmitted.
    prescription_code: Option<PrescriptionCode>,

    /// When the prescription was (re)issued.
    prescribed_at: Timestamp,

    /// When the treatment ends.
    ends_at: Option<Timestamp>,

    /// Doctor's electronic signature.
    signature: Option<DigitalSignature>,

    /// Medication lines, keyed by the product's canonical code.
    lines: BTreeMap<ProductId, TakingGuideline>,
}

impl MedicalPrescription {
    /// Creates an empty prescription dated now.
    pub fn new(patient_id: HealthCardId, prescriber: MembershipNumber, illness: impl Into<String>) -> Self {
        Self {
            patient_id,
            prescriber,
            illness: illness.into(),
            prescription_code: None,
            prescribed_at: Timestamp::now(),
            ends_at: None,
            signature: None,
            lines: BTreeMap::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn patient_id(&self) -> &HealthCardId {
        &self.patient_id
    }

    pub fn prescriber(&self) -> MembershipNumber {
        self.prescriber
    }

    pub fn illness(&self) -> &str {
        &self.illness
    }

    pub fn prescription_code(&self) -> Option<&PrescriptionCode> {
        self.prescription_code.as_ref()
    }

    pub fn prescribed_at(&self) -> &Timestamp {
        &self.prescribed_at
    }

    pub fn ends_at(&self) -> Option<&Timestamp> {
        self.ends_at.as_ref()
    }

    pub fn signature(&self) -> Option<&DigitalSignature> {
        self.signature.as_ref()
    }

    /// Returns the line for a product, if present.
    pub fn line(&self, product_id: &ProductId) -> Option<&TakingGuideline> {
        self.lines.get(product_id)
    }

    /// Iterates lines in product code order.
    pub fn lines(&self) -> impl Iterator<Item = (&ProductId, &TakingGuideline)> {
        self.lines.iter()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.lines.contains_key(product_id)
    }

    /// True once the prescription has an ending date, a signature and at
    /// least one line.
    pub fn is_complete(&self) -> bool {
        self.ends_at.is_some() && self.signature.is_some() && !self.lines.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line management
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a line built from raw guideline fields.
    ///
    /// # Errors
    ///
    /// - `AlreadyInPrescription` if the product already has a line
    /// - `IncorrectTakingGuidelines` if the fields are short or malformed
    pub fn add_line<S: AsRef<str>>(
        &mut self,
        product_id: ProductId,
        fields: &[S],
    ) -> Result<(), PrescriptionError> {
        self.ensure_absent(&product_id)?;
        let guideline = TakingGuideline::from_fields(fields)?;
        self.lines.insert(product_id, guideline);
        Ok(())
    }

    /// Adds an already-built line.
    ///
    /// # Errors
    ///
    /// - `AlreadyInPrescription` if the product already has a line
    pub fn insert_guideline(
        &mut self,
        product_id: ProductId,
        guideline: TakingGuideline,
    ) -> Result<(), PrescriptionError> {
        self.ensure_absent(&product_id)?;
        self.lines.insert(product_id, guideline);
        Ok(())
    }

    /// Overwrites the dose of a line, leaving everything else untouched.
    ///
    /// # Errors
    ///
    /// - `NotInPrescription` if the product has no line
    /// - `IncorrectTakingGuidelines` if the dose is negative or not finite
    pub fn modify_dose_in_line(
        &mut self,
        product_id: &ProductId,
        new_dose: f32,
    ) -> Result<(), PrescriptionError> {
        let line = self
            .lines
            .get_mut(product_id)
            .ok_or_else(|| PrescriptionError::NotInPrescription(product_id.clone()))?;
        line.set_dose(new_dose)
    }

    /// Removes a line, returning it.
    ///
    /// # Errors
    ///
    /// - `NotInPrescription` if the product has no line
    pub fn remove_line(&mut self, product_id: &ProductId) -> Result<TakingGuideline, PrescriptionError> {
        self.lines
            .remove(product_id)
            .ok_or_else(|| PrescriptionError::NotInPrescription(product_id.clone()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issuing
    // ─────────────────────────────────────────────────────────────────────────

    /// Sets the issue date and the treatment ending date.
    pub fn set_treatment_dates(&mut self, prescribed_at: Timestamp, ends_at: Timestamp) {
        self.prescribed_at = prescribed_at;
        self.ends_at = Some(ends_at);
    }

    /// Attaches the doctor's signature.
    ///
    /// # Errors
    ///
    /// - `MissingEndingDate` if no ending date has been set
    pub fn attach_signature(&mut self, signature: DigitalSignature) -> Result<(), PrescriptionError> {
        if self.ends_at.is_none() {
            return Err(PrescriptionError::MissingEndingDate);
        }
        self.signature = Some(signature);
        Ok(())
    }

    pub fn set_prescription_code(&mut self, code: PrescriptionCode) {
        self.prescription_code = Some(code);
    }

    /// SHA-256 digest of the prescription content the doctor signs.
    ///
    /// Covers patient, prescriber, illness, dates and every line; excludes
    /// the signature itself and the registry code.
    pub fn digest(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(self.patient_id.as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(self.prescriber.value().to_be_bytes());
        hasher.update(b"|");
        hasher.update(self.illness.as_bytes());
        hasher.update(b"|");
        hasher.update(self.prescribed_at.as_unix_secs().to_be_bytes());
        if let Some(ends_at) = &self.ends_at {
            hasher.update(ends_at.as_unix_secs().to_be_bytes());
        }
        for (product_id, line) in &self.lines {
            hasher.update(b"|");
            hasher.update(product_id.as_str().as_bytes());
            hasher.update(line.day_moment().as_token().as_bytes());
            hasher.update(line.duration().to_be_bytes());
            hasher.update(line.posology().dose().to_be_bytes());
            hasher.update(line.posology().frequency().to_be_bytes());
            hasher.update(line.posology().frequency_unit().as_token().as_bytes());
            hasher.update(line.instructions().as_bytes());
        }
        hasher.finalize().to_vec()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_absent(&self, product_id: &ProductId) -> Result<(), PrescriptionError> {
        if self.lines.contains_key(product_id) {
            return Err(PrescriptionError::AlreadyInPrescription(product_id.clone()));
        }
        Ok(())
    }
}
