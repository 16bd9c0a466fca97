//! Taking guideline: one medication line of a prescription.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::posology::{check_quantity, parse_quantity};
use super::{FrequencyUnit, Posology, PrescriptionError};

/// Number of raw fields a guideline is built from:
/// `[day_moment, duration, dose, frequency, frequency_unit, instructions]`.
pub const GUIDELINE_FIELD_COUNT: usize = 6;

/// Moment of the day the medication is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayMoment {
    BeforeBreakfast,
    DuringBreakfast,
    AfterBreakfast,
    BeforeLunch,
    DuringLunch,
    AfterLunch,
    BeforeDinner,
    DuringDinner,
    AfterDinner,
    BeforeMeals,
    DuringMeals,
    AfterMeals,
}

impl DayMoment {
    pub const ALL: [DayMoment; 12] = [
        DayMoment::BeforeBreakfast,
        DayMoment::DuringBreakfast,
        DayMoment::AfterBreakfast,
        DayMoment::BeforeLunch,
        DayMoment::DuringLunch,
        DayMoment::AfterLunch,
        DayMoment::BeforeDinner,
        DayMoment::DuringDinner,
        DayMoment::AfterDinner,
        DayMoment::BeforeMeals,
        DayMoment::DuringMeals,
        DayMoment::AfterMeals,
    ];

    /// Wire token, e.g. `AFTERMEALS`.
    pub fn as_token(&self) -> &'static str {
        match self {
            DayMoment::BeforeBreakfast => "BEFOREBREAKFAST",
            DayMoment::DuringBreakfast => "DURINGBREAKFAST",
            DayMoment::AfterBreakfast => "AFTERBREAKFAST",
            DayMoment::BeforeLunch => "BEFORELUNCH",
            DayMoment::DuringLunch => "DURINGLUNCH",
            DayMoment::AfterLunch => "AFTERLUNCH",
            DayMoment::BeforeDinner => "BEFOREDINNER",
            DayMoment::DuringDinner => "DURINGDINNER",
            DayMoment::AfterDinner => "AFTERDINNER",
            DayMoment::BeforeMeals => "BEFOREMEALS",
            DayMoment::DuringMeals => "DURINGMEALS",
            DayMoment::AfterMeals => "AFTERMEALS",
        }
    }
}

impl fmt::Display for DayMoment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

impl FromStr for DayMoment {
    type Err = PrescriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayMoment::ALL
            .into_iter()
            .find(|moment| moment.as_token() == s)
            .ok_or_else(|| {
                PrescriptionError::incorrect_guidelines(format!("unknown day moment '{}'", s))
            })
    }
}

/// Timing, duration, posology and instructions for one product.
///
/// # Invariants
///
/// - `duration`, `dose` and `frequency` are finite and non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GuidelineRecord", into = "GuidelineRecord")]
pub struct TakingGuideline {
    day_moment: DayMoment,
    duration: f32,
    posology: Posology,
    instructions: String,
}

impl TakingGuideline {
    /// # Errors
    ///
    /// - `IncorrectTakingGuidelines` if any quantity is negative or not finite
    pub fn new(
        day_moment: DayMoment,
        duration: f32,
        dose: f32,
        frequency: f32,
        frequency_unit: FrequencyUnit,
        instructions: impl Into<String>,
    ) -> Result<Self, PrescriptionError> {
        Ok(Self {
            day_moment,
            duration: check_quantity("duration", duration)?,
            posology: Posology::new(dose, frequency, frequency_unit)?,
            instructions: instructions.into(),
        })
    }

    /// Builds a guideline from raw text fields, in the order
    /// `[day_moment, duration, dose, frequency, frequency_unit, instructions]`.
    ///
    /// Fields past the sixth are ignored. Nothing is built unless every field
    /// parses.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, PrescriptionError> {
        if fields.len() < GUIDELINE_FIELD_COUNT {
            return Err(PrescriptionError::incorrect_guidelines(format!(
                "expected {} fields, got {}",
                GUIDELINE_FIELD_COUNT,
                fields.len()
            )));
        }

        let day_moment: DayMoment = fields[0].as_ref().parse()?;
        let duration = parse_quantity("duration", fields[1].as_ref())?;
        let dose = parse_quantity("dose", fields[2].as_ref())?;
        let frequency = parse_quantity("frequency", fields[3].as_ref())?;
        let frequency_unit: FrequencyUnit = fields[4].as_ref().parse()?;

        Self::new(
            day_moment,
            duration,
            dose,
            frequency,
            frequency_unit,
            fields[5].as_ref(),
        )
    }

    pub fn day_moment(&self) -> DayMoment {
        self.day_moment
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn posology(&self) -> &Posology {
        &self.posology
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Overwrites the dose only.
    pub fn set_dose(&mut self, dose: f32) -> Result<(), PrescriptionError> {
        self.posology.set_dose(dose)
    }
}

/// Flat wire form of a [`TakingGuideline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidelineRecord {
    pub day_moment: DayMoment,
    pub duration: f32,
    pub dose: f32,
    pub frequency: f32,
    pub frequency_unit: FrequencyUnit,
    #[serde(default)]
    pub instructions: String,
}

impl TryFrom<GuidelineRecord> for TakingGuideline {
    type Error = PrescriptionError;

    fn try_from(record: GuidelineRecord) -> Result<Self, Self::Error> {
        TakingGuideline::new(
            record.day_moment,
            record.duration,
            record.dose,
            record.frequency,
            record.frequency_unit,
            record.instructions,
        )
    }
}

impl From<TakingGuideline> for GuidelineRecord {
    fn from(guideline: TakingGuideline) -> Self {
        Self {
            day_moment: guideline.day_moment,
            duration: guideline.duration,
            dose: guideline.posology.dose(),
            frequency: guideline.posology.frequency(),
            frequency_unit: guideline.posology.frequency_unit(),
            instructions: guideline.instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fields_reads_every_field() {
        let guideline = TakingGuideline::from_fields(&[
            "DURINGMEALS",
            "7",
            "500",
            "8",
            "HOUR",
            "Take with water",
        ])
        .unwrap();

        assert_eq!(guideline.day_moment(), DayMoment::DuringMeals);
        assert_eq!(guideline.duration(), 7.0);
        assert_eq!(guideline.posology().dose(), 500.0);
        assert_eq!(guideline.posology().frequency(), 8.0);
        assert_eq!(guideline.posology().frequency_unit(), FrequencyUnit::Hour);
        assert_eq!(guideline.instructions(), "Take with water");
    }

    #[test]
    fn from_fields_accepts_owned_strings() {
        let fields: Vec<String> = ["AFTERDINNER", "10.0", "100.0", "12.0", "HOUR", "Note"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(TakingGuideline::from_fields(&fields).is_ok());
    }

    #[test]
    fn from_fields_ignores_extra_fields() {
        let guideline = TakingGuideline::from_fields(&[
            "BEFORELUNCH", "1", "1", "1", "DAY", "Note", "extra",
        ])
        .unwrap();
        assert_eq!(guideline.instructions(), "Note");
    }

    #[test]
    fn from_fields_rejects_short_input() {
        let err = TakingGuideline::from_fields(&["DURINGLUNCH", "1.0"]).unwrap_err();
        assert!(matches!(err, PrescriptionError::IncorrectTakingGuidelines(_)));
    }

    #[test]
    fn from_fields_rejects_empty_input() {
        let fields: [&str; 0] = [];
        assert!(TakingGuideline::from_fields(&fields).is_err());
    }

    #[test]
    fn from_fields_rejects_unknown_day_moment() {
        let err = TakingGuideline::from_fields(&["AFTER_MEALS", "1.0", "1.0", "1.0", "HOUR", "Error"])
            .unwrap_err();
        assert!(matches!(err, PrescriptionError::IncorrectTakingGuidelines(_)));
    }

    #[test]
    fn from_fields_rejects_unknown_frequency_unit() {
        let err = TakingGuideline::from_fields(&["AFTERMEALS", "1.0", "1.0", "1.0", "YEAR", "Error"])
            .unwrap_err();
        assert!(matches!(err, PrescriptionError::IncorrectTakingGuidelines(_)));
    }

    #[test]
    fn from_fields_rejects_non_numeric_duration() {
        assert!(
            TakingGuideline::from_fields(&["AFTERMEALS", "ten", "1", "1", "HOUR", ""]).is_err()
        );
    }

    #[test]
    fn day_moment_tokens_round_trip_through_from_str() {
        for moment in DayMoment::ALL {
            assert_eq!(moment.as_token().parse::<DayMoment>().unwrap(), moment);
        }
    }

    #[test]
    fn day_moment_serde_matches_token() {
        for moment in DayMoment::ALL {
            let json = serde_json::to_string(&moment).unwrap();
            assert_eq!(json, format!("\"{}\"", moment.as_token()));
        }
    }

    #[test]
    fn set_dose_leaves_other_fields_untouched() {
        let mut guideline =
            TakingGuideline::new(DayMoment::AfterMeals, 10.0, 1.0, 8.0, FrequencyUnit::Hour, "IA")
                .unwrap();
        guideline.set_dose(2.0).unwrap();
        assert_eq!(guideline.posology().dose(), 2.0);
        assert_eq!(guideline.duration(), 10.0);
        assert_eq!(guideline.posology().frequency(), 8.0);
        assert_eq!(guideline.instructions(), "IA");
    }

    #[test]
    fn deserialization_validates_quantities() {
        let json = r#"{"day_moment":"AFTERMEALS","duration":-1,"dose":1,"frequency":8,"frequency_unit":"HOUR"}"#;
        let result: Result<TakingGuideline, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn deserializes_from_flat_record() {
        let json = r#"{"day_moment":"AFTERMEALS","duration":10,"dose":1,"frequency":8,"frequency_unit":"HOUR","instructions":"IA"}"#;
        let guideline: TakingGuideline = serde_json::from_str(json).unwrap();
        assert_eq!(guideline.day_moment(), DayMoment::AfterMeals);
        assert_eq!(guideline.instructions(), "IA");
    }
}
