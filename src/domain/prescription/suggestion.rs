//! Prescription edits proposed by the decision-support AI.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ProductId;

use super::TakingGuideline;

/// One proposed edit of the prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Suggestion {
    /// Add a new line for the product.
    Addition {
        product_id: ProductId,
        guideline: TakingGuideline,
    },
    /// Change the dose of an existing line to the guideline's dose.
    Modification {
        product_id: ProductId,
        guideline: TakingGuideline,
    },
    /// Remove the product's line.
    Elimination { product_id: ProductId },
}

impl Suggestion {
    pub fn product_id(&self) -> &ProductId {
        match self {
            Suggestion::Addition { product_id, .. }
            | Suggestion::Modification { product_id, .. }
            | Suggestion::Elimination { product_id } => product_id,
        }
    }

    pub fn guideline(&self) -> Option<&TakingGuideline> {
        match self {
            Suggestion::Addition { guideline, .. } | Suggestion::Modification { guideline, .. } => {
                Some(guideline)
            }
            Suggestion::Elimination { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Suggestion::Addition { .. } => "ADDITION",
            Suggestion::Modification { .. } => "MODIFICATION",
            Suggestion::Elimination { .. } => "ELIMINATION",
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.product_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prescription::{DayMoment, FrequencyUnit};

    fn guideline() -> TakingGuideline {
        TakingGuideline::new(DayMoment::AfterMeals, 10.0, 1.0, 8.0, FrequencyUnit::Hour, "IA").unwrap()
    }

    fn product() -> ProductId {
        ProductId::new("123456789012").unwrap()
    }

    #[test]
    fn elimination_has_no_guideline() {
        let suggestion = Suggestion::Elimination { product_id: product() };
        assert!(suggestion.guideline().is_none());
        assert_eq!(suggestion.product_id(), &product());
    }

    #[test]
    fn addition_exposes_guideline() {
        let suggestion = Suggestion::Addition {
            product_id: product(),
            guideline: guideline(),
        };
        assert_eq!(suggestion.guideline(), Some(&guideline()));
        assert_eq!(suggestion.to_string(), "ADDITION 123456789012");
    }

    #[test]
    fn serializes_with_type_tag() {
        let suggestion = Suggestion::Elimination { product_id: product() };
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["type"], "ELIMINATION");
        assert_eq!(json["product_id"], "123456789012");
    }
}
