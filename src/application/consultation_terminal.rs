//! ConsultationTerminal - Orchestrator of the supervise-treatment workflow.
//!
//! The terminal is the single entry point for every consultation event.
//! Each event is accepted in exactly one [`ConsultationState`]; events that
//! arrive out of order are rejected with a procedural error before any
//! collaborator is called or any session data is touched.
//!
//! # Flow
//!
//! ```text
//! Idle --init_revision--> RevisionStarted --init_prescription_edition--> PrescriptionEdit
//!   ^                                                                        |
//!   |                                                 enter_treatment_ending_date
//!   |                                                                        v
//! Signed <--------------------stamp_signature-------------------------- PrescriptionEnd
//!   |
//!   +--send_history_and_prescription--> Idle
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::consultation::{
    ConsultationError, ConsultationEvent, ConsultationState, MedicalHistory,
};
use crate::domain::foundation::{
    HealthCardId, MembershipNumber, ProductId, StateMachine, Timestamp, ValidationError,
};
use crate::domain::prescription::{MedicalPrescription, PrescriptionError, Suggestion};
use crate::ports::{DecisionSupport, HealthRegistry, SignatureProvider};

/// Data of the consultation in progress.
#[derive(Debug, Clone, PartialEq)]
struct Session {
    patient_id: HealthCardId,
    illness: String,
    history: MedicalHistory,
    prescription: Option<MedicalPrescription>,
    last_ai_answer: Option<String>,
}

/// Consultation terminal driving one doctor's sessions, one at a time.
pub struct ConsultationTerminal {
    registry: Arc<dyn HealthRegistry>,
    decision_ai: Arc<dyn DecisionSupport>,
    signer: Arc<dyn SignatureProvider>,
    doctor: MembershipNumber,
    state: ConsultationState,
    session: Option<Session>,
}

impl ConsultationTerminal {
    pub fn new(
        registry: Arc<dyn HealthRegistry>,
        decision_ai: Arc<dyn DecisionSupport>,
        signer: Arc<dyn SignatureProvider>,
        doctor: MembershipNumber,
    ) -> Self {
        Self {
            registry,
            decision_ai,
            signer,
            doctor,
            state: ConsultationState::Idle,
            session: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> ConsultationState {
        self.state
    }

    pub fn doctor(&self) -> MembershipNumber {
        self.doctor
    }

    pub fn patient_id(&self) -> Option<&HealthCardId> {
        self.session.as_ref().map(|s| &s.patient_id)
    }

    pub fn illness(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.illness.as_str())
    }

    pub fn history(&self) -> Option<&MedicalHistory> {
        self.session.as_ref().map(|s| &s.history)
    }

    pub fn prescription(&self) -> Option<&MedicalPrescription> {
        self.session.as_ref().and_then(|s| s.prescription.as_ref())
    }

    /// Last free-text answer of the decision AI in this session.
    pub fn last_ai_answer(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.last_ai_answer.as_deref())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Revision
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts the revision of a patient's treatment for an illness.
    ///
    /// Downloads the medical history and the active prescription, if any.
    /// On failure the terminal stays `Idle` with no session data.
    ///
    /// # Errors
    ///
    /// - `Procedural` unless `Idle`
    /// - `Validation` if the illness is blank
    /// - `Registry` errors unchanged
    pub async fn init_revision(
        &mut self,
        patient_id: HealthCardId,
        illness: impl Into<String>,
    ) -> Result<(), ConsultationError> {
        self.check(ConsultationEvent::InitRevision)?;

        let illness = illness.into();
        if illness.trim().is_empty() {
            return Err(ValidationError::empty_field("illness").into());
        }

        debug!(patient_id = %patient_id, "Downloading medical history");
        let history = reported(self.registry.get_medical_history(&patient_id).await)?;
        debug!(patient_id = %patient_id, illness = %illness, "Downloading active prescription");
        let prescription =
            reported(self.registry.get_medical_prescription(&patient_id, &illness).await)?;

        info!(
            patient_id = %patient_id,
            illness = %illness,
            has_prescription = prescription.is_some(),
            "Revision started"
        );
        self.advance(ConsultationState::RevisionStarted)?;
        self.session = Some(Session {
            patient_id,
            illness,
            history,
            prescription,
            last_ai_answer: None,
        });
        Ok(())
    }

    /// Appends the doctor's assessment to the medical history.
    ///
    /// Empty assessments are ignored.
    pub fn enter_medical_assessment(&mut self, assessment: &str) -> Result<(), ConsultationError> {
        let session = self.session_mut(ConsultationEvent::EnterMedicalAssessment)?;
        if !session.history.add_annotation(assessment) {
            debug!(patient_id = %session.patient_id, "Empty assessment ignored");
        }
        Ok(())
    }

    /// Opens the prescription for edition, creating an empty one when the
    /// patient has no active prescription for the illness.
    pub fn init_prescription_edition(&mut self) -> Result<(), ConsultationError> {
        let doctor = self.doctor;
        let session = self.session_mut(ConsultationEvent::InitPrescriptionEdition)?;
        if session.prescription.is_none() {
            debug!(patient_id = %session.patient_id, "Creating new prescription");
            session.prescription = Some(MedicalPrescription::new(
                session.patient_id.clone(),
                doctor,
                session.illness.clone(),
            ));
        }
        self.advance(ConsultationState::PrescriptionEdit)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Prescription edition
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a medication line from raw guideline fields:
    /// `[day_moment, duration, dose, frequency, frequency_unit, instructions]`.
    ///
    /// # Errors
    ///
    /// - `Procedural` unless `PrescriptionEdit`
    /// - `Prescription(AlreadyInPrescription)` if the product has a line
    /// - `Prescription(IncorrectTakingGuidelines)` if the fields are malformed
    pub fn enter_medicine_with_guidelines<S: AsRef<str>>(
        &mut self,
        product_id: ProductId,
        fields: &[S],
    ) -> Result<(), ConsultationError> {
        let prescription = self.prescription_mut(ConsultationEvent::EnterMedicineWithGuidelines)?;
        prescription.add_line(product_id.clone(), fields)?;
        info!(product_id = %product_id, "Medication line added");
        Ok(())
    }

    pub fn modify_dose_in_line(
        &mut self,
        product_id: &ProductId,
        new_dose: f32,
    ) -> Result<(), ConsultationError> {
        let prescription = self.prescription_mut(ConsultationEvent::ModifyDoseInLine)?;
        prescription.modify_dose_in_line(product_id, new_dose)?;
        info!(product_id = %product_id, dose = new_dose, "Medication dose modified");
        Ok(())
    }

    pub fn remove_line(&mut self, product_id: &ProductId) -> Result<(), ConsultationError> {
        let prescription = self.prescription_mut(ConsultationEvent::RemoveLine)?;
        prescription.remove_line(product_id)?;
        info!(product_id = %product_id, "Medication line removed");
        Ok(())
    }

    /// Sets the treatment ending date; the prescription is dated now.
    ///
    /// # Errors
    ///
    /// - `Procedural` unless `PrescriptionEdit`
    /// - `IncorrectEndingDate` unless the date is strictly after now
    pub fn enter_treatment_ending_date(&mut self, ends_at: Timestamp) -> Result<(), ConsultationError> {
        self.check(ConsultationEvent::EnterTreatmentEndingDate)?;

        let now = Timestamp::now();
        if !ends_at.is_after(&now) {
            warn!(ends_at = ?ends_at, "Treatment ending date is not in the future");
            return Err(ConsultationError::IncorrectEndingDate { ends_at, now });
        }

        self.prescription_mut(ConsultationEvent::EnterTreatmentEndingDate)?
            .set_treatment_dates(now, ends_at);
        self.advance(ConsultationState::PrescriptionEnd)
    }

    /// Confirms the edition is over. The ending date must already be set.
    pub fn finish_prescription_edition(&mut self) -> Result<(), ConsultationError> {
        let prescription = self.prescription_mut(ConsultationEvent::FinishPrescriptionEdition)?;
        if prescription.ends_at().is_none() {
            return Err(PrescriptionError::MissingEndingDate.into());
        }
        debug!(lines = prescription.line_count(), "Prescription edition finished");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Signature and transmission
    // ─────────────────────────────────────────────────────────────────────────

    /// Signs the prescription digest with the doctor's signature.
    ///
    /// A signing failure leaves the prescription unsigned and the state
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - `IncorrectEndingDate` if the ending date is no longer in the future
    /// - `Signature` errors unchanged
    pub async fn stamp_signature(&mut self) -> Result<(), ConsultationError> {
        let prescription = self.prescription_mut(ConsultationEvent::StampSignature)?;
        let now = Timestamp::now();
        match prescription.ends_at().copied() {
            Some(ends_at) if !ends_at.is_after(&now) => {
                warn!(ends_at = ?ends_at, "Treatment ended before the prescription was signed");
                return Err(ConsultationError::IncorrectEndingDate { ends_at, now });
            }
            Some(_) => {}
            None => return Err(PrescriptionError::MissingEndingDate.into()),
        }
        let digest = prescription.digest();

        debug!(doctor = %self.doctor, "Requesting electronic signature");
        let signature = reported(self.signer.sign(&digest).await)?;

        self.prescription_mut(ConsultationEvent::StampSignature)?
            .attach_signature(signature)?;
        self.advance(ConsultationState::Signed)
    }

    /// Sends the history and the signed prescription to the registry.
    ///
    /// On success the session is closed and the registered prescription,
    /// carrying its prescription code, is returned. On failure the session
    /// stays `Signed` so the transmission can be retried.
    pub async fn send_history_and_prescription(&mut self) -> Result<MedicalPrescription, ConsultationError> {
        let event = ConsultationEvent::SendHistoryAndPrescription;
        let session = self.session(event)?;
        let prescription = session
            .prescription
            .as_ref()
            .ok_or_else(|| ConsultationError::procedural(event, ConsultationState::RevisionStarted))?;

        debug!(patient_id = %session.patient_id, "Transmitting history and prescription");
        let registered = reported(
            self.registry
                .send_history_and_prescription(
                    &session.patient_id,
                    &session.history,
                    &session.illness,
                    prescription,
                )
                .await,
        )?;

        info!(
            patient_id = %registered.patient_id(),
            prescription_code = ?registered.prescription_code().map(|c| c.as_str()),
            "Prescription registered"
        );
        self.advance(ConsultationState::Idle)?;
        self.session = None;
        Ok(registered)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decision support
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts the decision-making AI.
    pub async fn call_decision_making_ai(&mut self) -> Result<(), ConsultationError> {
        self.check(ConsultationEvent::CallDecisionMakingAi)?;
        reported(self.decision_ai.init().await)?;
        debug!("Decision AI started");
        Ok(())
    }

    /// Asks the AI for advice; the answer is kept for suggestion extraction.
    pub async fn ask_ai_for_suggestions(&mut self, prompt: &str) -> Result<String, ConsultationError> {
        self.check(ConsultationEvent::AskAiForSuggestions)?;

        let answer = reported(self.decision_ai.get_suggestions(prompt).await)?;
        debug!(answer_length = answer.len(), "Decision AI answered");

        self.session_mut(ConsultationEvent::AskAiForSuggestions)?
            .last_ai_answer = Some(answer.clone());
        Ok(answer)
    }

    /// Parses the last AI answer and applies its suggestions in order.
    ///
    /// Application stops at the first suggestion that fails; suggestions
    /// applied before it are kept and the failure is returned. Returns the
    /// number of suggestions applied.
    pub async fn extract_guidelines_from_suggestions(&mut self) -> Result<usize, ConsultationError> {
        let event = ConsultationEvent::ExtractGuidelinesFromSuggestions;
        let answer = self
            .session(event)?
            .last_ai_answer
            .clone()
            .unwrap_or_default();

        let suggestions = reported(self.decision_ai.parse_suggestions(&answer).await)?;
        let total = suggestions.len();
        let prescription = self.prescription_mut(event)?;

        for (applied, suggestion) in suggestions.into_iter().enumerate() {
            if let Err(err) = apply_suggestion(prescription, &suggestion) {
                warn!(
                    suggestion = %suggestion,
                    applied,
                    total,
                    error = %err,
                    "AI suggestion rejected"
                );
                return Err(err.into());
            }
            debug!(suggestion = %suggestion, "AI suggestion applied");
        }

        info!(applied = total, "AI suggestions applied");
        Ok(total)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Guards
    // ─────────────────────────────────────────────────────────────────────────

    fn check(&self, event: ConsultationEvent) -> Result<(), ConsultationError> {
        let expected = event.required_state();
        if self.state == expected {
            return Ok(());
        }
        warn!(
            event = %event,
            expected = %expected,
            actual = %self.state,
            "Consultation event out of order"
        );
        Err(ConsultationError::procedural(event, self.state))
    }

    fn session(&self, event: ConsultationEvent) -> Result<&Session, ConsultationError> {
        self.check(event)?;
        self.session
            .as_ref()
            .ok_or_else(|| ConsultationError::procedural(event, ConsultationState::Idle))
    }

    fn session_mut(&mut self, event: ConsultationEvent) -> Result<&mut Session, ConsultationError> {
        self.check(event)?;
        self.session
            .as_mut()
            .ok_or_else(|| ConsultationError::procedural(event, ConsultationState::Idle))
    }

    fn prescription_mut(
        &mut self,
        event: ConsultationEvent,
    ) -> Result<&mut MedicalPrescription, ConsultationError> {
        self.session_mut(event)?
            .prescription
            .as_mut()
            .ok_or_else(|| ConsultationError::procedural(event, ConsultationState::RevisionStarted))
    }

    fn advance(&mut self, target: ConsultationState) -> Result<(), ConsultationError> {
        let from = self.state;
        self.state = from.transition_to(target)?;
        info!(from = %from, to = %target, "Consultation state changed");
        Ok(())
    }
}

/// Converts a collaborator result, logging failures raised by the collaborator.
fn reported<T, E>(result: Result<T, E>) -> Result<T, ConsultationError>
where
    E: Into<ConsultationError>,
{
    result.map_err(|err| {
        let err = err.into();
        let code = err.code();
        if code.is_collaborator_failure() {
            warn!(code = %code, error = %err, "Collaborator failed");
        }
        err
    })
}

fn apply_suggestion(
    prescription: &mut MedicalPrescription,
    suggestion: &Suggestion,
) -> Result<(), PrescriptionError> {
    match suggestion {
        Suggestion::Addition {
            product_id,
            guideline,
        } => prescription.insert_guideline(product_id.clone(), guideline.clone()),
        Suggestion::Modification {
            product_id,
            guideline,
        } => prescription.modify_dose_in_line(product_id, guideline.posology().dose()),
        Suggestion::Elimination { product_id } => prescription.remove_line(product_id).map(|_| ()),
    }
}
