//! Posology: how much of a product to take and how often.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::PrescriptionError;

/// Time unit the administration frequency is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FrequencyUnit {
    Hour,
    Day,
    Week,
    Month,
}

impl FrequencyUnit {
    pub const ALL: [FrequencyUnit; 4] = [
        FrequencyUnit::Hour,
        FrequencyUnit::Day,
        FrequencyUnit::Week,
        FrequencyUnit::Month,
    ];

    /// Wire token, e.g. `HOUR`.
    pub fn as_token(&self) -> &'static str {
        match self {
            FrequencyUnit::Hour => "HOUR",
            FrequencyUnit::Day => "DAY",
            FrequencyUnit::Week => "WEEK",
            FrequencyUnit::Month => "MONTH",
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

impl FromStr for FrequencyUnit {
    type Err = PrescriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrequencyUnit::ALL
            .into_iter()
            .find(|unit| unit.as_token() == s)
            .ok_or_else(|| {
                PrescriptionError::incorrect_guidelines(format!("unknown frequency unit '{}'", s))
            })
    }
}

/// Parses a non-negative, finite quantity such as a dose or duration.
pub(crate) fn parse_quantity(field: &str, raw: &str) -> Result<f32, PrescriptionError> {
    let value: f32 = raw.trim().parse().map_err(|_| {
        PrescriptionError::incorrect_guidelines(format!("{} '{}' is not a number", field, raw))
    })?;
    check_quantity(field, value)
}

/// Rejects negative and non-finite quantities.
pub(crate) fn check_quantity(field: &str, value: f32) -> Result<f32, PrescriptionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PrescriptionError::incorrect_guidelines(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(value)
}

/// Dose, frequency and frequency unit of a medication line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Posology {
    dose: f32,
    frequency: f32,
    frequency_unit: FrequencyUnit,
}

impl Posology {
    /// # Errors
    ///
    /// - `IncorrectTakingGuidelines` if dose or frequency is negative or not finite
    pub fn new(dose: f32, frequency: f32, frequency_unit: FrequencyUnit) -> Result<Self, PrescriptionError> {
        Ok(Self {
            dose: check_quantity("dose", dose)?,
            frequency: check_quantity("frequency", frequency)?,
            frequency_unit,
        })
    }

    pub fn dose(&self) -> f32 {
        self.dose
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn frequency_unit(&self) -> FrequencyUnit {
        self.frequency_unit
    }

    /// Replaces the dose, leaving frequency untouched.
    pub fn set_dose(&mut self, dose: f32) -> Result<(), PrescriptionError> {
        self.dose = check_quantity("dose", dose)?;
        Ok(())
    }
}

impl fmt::Display for Posology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} every {} {}", self.dose, self.frequency, self.frequency_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_unit_parses_known_tokens() {
        assert_eq!("HOUR".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::Hour);
        assert_eq!("MONTH".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::Month);
    }

    #[test]
    fn frequency_unit_rejects_lowercase_token() {
        let err = "hour".parse::<FrequencyUnit>().unwrap_err();
        assert!(matches!(err, PrescriptionError::IncorrectTakingGuidelines(_)));
    }

    #[test]
    fn frequency_unit_serializes_as_token() {
        assert_eq!(serde_json::to_string(&FrequencyUnit::Week).unwrap(), "\"WEEK\"");
    }

    #[test]
    fn parse_quantity_accepts_decimal_and_surrounding_whitespace() {
        assert_eq!(parse_quantity("dose", " 2.5 ").unwrap(), 2.5);
    }

    #[test]
    fn parse_quantity_rejects_text_negative_and_nan() {
        assert!(parse_quantity("dose", "two").is_err());
        assert!(parse_quantity("dose", "-1").is_err());
        assert!(parse_quantity("dose", "NaN").is_err());
        assert!(parse_quantity("dose", "inf").is_err());
    }

    #[test]
    fn set_dose_changes_only_dose() {
        let mut posology = Posology::new(1.0, 8.0, FrequencyUnit::Hour).unwrap();
        posology.set_dose(2.0).unwrap();
        assert_eq!(posology.dose(), 2.0);
        assert_eq!(posology.frequency(), 8.0);
        assert_eq!(posology.frequency_unit(), FrequencyUnit::Hour);
    }

    #[test]
    fn set_dose_rejects_negative_and_keeps_previous() {
        let mut posology = Posology::new(1.0, 8.0, FrequencyUnit::Hour).unwrap();
        assert!(posology.set_dose(-3.0).is_err());
        assert_eq!(posology.dose(), 1.0);
    }

    #[test]
    fn equal_posologies_compare_equal() {
        let a = Posology::new(1.0, 8.0, FrequencyUnit::Hour).unwrap();
        let b = Posology::new(1.0, 8.0, FrequencyUnit::Hour).unwrap();
        let c = Posology::new(1.0, 8.0, FrequencyUnit::Day).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_reads_naturally() {
        let posology = Posology::new(500.0, 8.0, FrequencyUnit::Hour).unwrap();
        assert_eq!(posology.to_string(), "500 every 8 HOUR");
    }
}
