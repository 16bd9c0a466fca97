//! Decision Support Port - Interface to the treatment decision AI.
//!
//! The AI answers free-text prompts with treatment advice and can turn an
//! answer into a structured list of [`Suggestion`]s the terminal replays
//! against the prescription being edited.

use async_trait::async_trait;

use crate::domain::foundation::ErrorCode;
use crate::domain::prescription::Suggestion;

/// Port for the decision-making AI.
#[async_trait]
pub trait DecisionSupport: Send + Sync {
    /// Start the AI for the current consultation.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the AI cannot be started
    async fn init(&self) -> Result<(), AIError>;

    /// Ask the AI for advice and return its free-text answer.
    ///
    /// # Errors
    ///
    /// - `BadPrompt` if the prompt is unclear or inconsistent
    async fn get_suggestions(&self, prompt: &str) -> Result<String, AIError>;

    /// Parse an answer into structured prescription edits, in answer order.
    ///
    /// # Errors
    ///
    /// - `MalformedResponse` if the answer cannot be parsed
    /// - `MissingValue` if a suggestion lacks a required value
    async fn parse_suggestions(&self, answer: &str) -> Result<Vec<Suggestion>, AIError>;
}

/// Errors reported by the decision-making AI.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AIError {
    #[error("decision AI unavailable: {0}")]
    Unavailable(String),

    #[error("bad prompt: {0}")]
    BadPrompt(String),

    #[error("malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("AI response is missing a value: {0}")]
    MissingValue(String),
}

impl AIError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        AIError::Unavailable(message.into())
    }

    pub fn bad_prompt(message: impl Into<String>) -> Self {
        AIError::BadPrompt(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        AIError::MalformedResponse(message.into())
    }

    pub fn missing_value(field: impl Into<String>) -> Self {
        AIError::MissingValue(field.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AIError::Unavailable(_) => ErrorCode::AIUnavailable,
            AIError::BadPrompt(_) => ErrorCode::BadPrompt,
            AIError::MalformedResponse(_) | AIError::MissingValue(_) => ErrorCode::MalformedAIResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_prompt_displays_reason() {
        let err = AIError::bad_prompt("prompt is empty");
        assert_eq!(err.to_string(), "bad prompt: prompt is empty");
        assert_eq!(err.code(), ErrorCode::BadPrompt);
    }

    #[test]
    fn missing_value_is_a_malformed_response() {
        assert_eq!(
            AIError::missing_value("guideline").code(),
            ErrorCode::MalformedAIResponse
        );
    }
}
