//! ConsultationState enum for the supervise-treatment workflow.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of a consultation session.
///
/// `Idle` is both the initial state and the state a transmitted session
/// returns to, ready for the next patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationState {
    #[default]
    Idle,
    /// History and any current prescription are loaded.
    RevisionStarted,
    /// Medication lines may be edited.
    PrescriptionEdit,
    /// Treatment ending date is set.
    PrescriptionEnd,
    /// Prescription carries the doctor's signature.
    Signed,
}

impl ConsultationState {
    /// Returns true while a session is in progress.
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, ConsultationState::Idle)
    }
}

impl StateMachine for ConsultationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConsultationState::*;
        matches!(
            (self, target),
            (Idle, RevisionStarted)
                | (RevisionStarted, PrescriptionEdit)
                | (PrescriptionEdit, PrescriptionEnd)
                | (PrescriptionEnd, Signed)
                | (Signed, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConsultationState::*;
        match self {
            Idle => vec![RevisionStarted],
            RevisionStarted => vec![PrescriptionEdit],
            PrescriptionEdit => vec![PrescriptionEnd],
            PrescriptionEnd => vec![Signed],
            Signed => vec![Idle],
        }
    }
}

impl fmt::Display for ConsultationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConsultationState::Idle => "Idle",
            ConsultationState::RevisionStarted => "RevisionStarted",
            ConsultationState::PrescriptionEdit => "PrescriptionEdit",
            ConsultationState::PrescriptionEnd => "PrescriptionEnd",
            ConsultationState::Signed => "Signed",
        };
        write!(f, "{}", s)
    }
}

/// Workflow events accepted by the consultation terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsultationEvent {
    InitRevision,
    EnterMedicalAssessment,
    InitPrescriptionEdition,
    EnterMedicineWithGuidelines,
    ModifyDoseInLine,
    RemoveLine,
    EnterTreatmentEndingDate,
    FinishPrescriptionEdition,
    StampSignature,
    SendHistoryAndPrescription,
    CallDecisionMakingAi,
    AskAiForSuggestions,
    ExtractGuidelinesFromSuggestions,
}

impl ConsultationEvent {
    pub const ALL: [ConsultationEvent; 13] = [
        ConsultationEvent::InitRevision,
        ConsultationEvent::EnterMedicalAssessment,
        ConsultationEvent::InitPrescriptionEdition,
        ConsultationEvent::EnterMedicineWithGuidelines,
        ConsultationEvent::ModifyDoseInLine,
        ConsultationEvent::RemoveLine,
        ConsultationEvent::EnterTreatmentEndingDate,
        ConsultationEvent::FinishPrescriptionEdition,
        ConsultationEvent::StampSignature,
        ConsultationEvent::SendHistoryAndPrescription,
        ConsultationEvent::CallDecisionMakingAi,
        ConsultationEvent::AskAiForSuggestions,
        ConsultationEvent::ExtractGuidelinesFromSuggestions,
    ];

    /// The only state in which the event is accepted.
    pub fn required_state(&self) -> ConsultationState {
        use ConsultationEvent::*;
        match self {
            InitRevision => ConsultationState::Idle,
            EnterMedicalAssessment | InitPrescriptionEdition => ConsultationState::RevisionStarted,
            EnterMedicineWithGuidelines
            | ModifyDoseInLine
            | RemoveLine
            | EnterTreatmentEndingDate
            | CallDecisionMakingAi
            | AskAiForSuggestions
            | ExtractGuidelinesFromSuggestions => ConsultationState::PrescriptionEdit,
            FinishPrescriptionEdition | StampSignature => ConsultationState::PrescriptionEnd,
            SendHistoryAndPrescription => ConsultationState::Signed,
        }
    }

    pub fn name(&self) -> &'static str {
        use ConsultationEvent::*;
        match self {
            InitRevision => "init_revision",
            EnterMedicalAssessment => "enter_medical_assessment",
            InitPrescriptionEdition => "init_prescription_edition",
            EnterMedicineWithGuidelines => "enter_medicine_with_guidelines",
            ModifyDoseInLine => "modify_dose_in_line",
            RemoveLine => "remove_line",
            EnterTreatmentEndingDate => "enter_treatment_ending_date",
            FinishPrescriptionEdition => "finish_prescription_edition",
            StampSignature => "stamp_signature",
            SendHistoryAndPrescription => "send_history_and_prescription",
            CallDecisionMakingAi => "call_decision_making_ai",
            AskAiForSuggestions => "ask_ai_for_suggestions",
            ExtractGuidelinesFromSuggestions => "extract_guidelines_from_suggestions",
        }
    }
}

impl fmt::Display for ConsultationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConsultationState::*;

    const ALL: [ConsultationState; 5] = [Idle, RevisionStarted, PrescriptionEdit, PrescriptionEnd, Signed];

    #[test]
    fn default_is_idle() {
        assert_eq!(ConsultationState::default(), Idle);
        assert!(!Idle.is_in_progress());
        assert!(Signed.is_in_progress());
    }

    #[test]
    fn workflow_is_a_single_cycle() {
        let mut state = Idle;
        for expected in [RevisionStarted, PrescriptionEdit, PrescriptionEnd, Signed, Idle] {
            state = state.transition_to(expected).unwrap();
        }
        assert_eq!(state, Idle);
    }

    #[test]
    fn skipping_a_step_is_rejected() {
        assert!(RevisionStarted.transition_to(PrescriptionEnd).is_err());
        assert!(Idle.transition_to(PrescriptionEdit).is_err());
        assert!(PrescriptionEdit.transition_to(Signed).is_err());
    }

    #[test]
    fn no_state_is_terminal() {
        for state in ALL {
            assert!(!state.is_terminal());
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&PrescriptionEdit).unwrap(),
            "\"prescription_edit\""
        );
    }

    #[test]
    fn every_state_accepts_some_event() {
        for state in ALL {
            assert!(
                ConsultationEvent::ALL.iter().any(|e| e.required_state() == state),
                "{state} accepts no event"
            );
        }
    }

    #[test]
    fn edition_events_require_prescription_edit() {
        assert_eq!(
            ConsultationEvent::ExtractGuidelinesFromSuggestions.required_state(),
            PrescriptionEdit
        );
        assert_eq!(ConsultationEvent::StampSignature.required_state(), PrescriptionEnd);
        assert_eq!(ConsultationEvent::RemoveLine.to_string(), "remove_line");
    }
}
