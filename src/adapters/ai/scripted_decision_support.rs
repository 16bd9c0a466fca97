//! Scripted decision-support AI.
//!
//! Stands in for the treatment decision AI during demos and tests. Answers
//! are queued in advance and handed out in order; once the queue is empty
//! every prompt receives the default answer.
//!
//! # Example
//!
//! ```ignore
//! let ai = ScriptedDecisionSupport::new()
//!     .with_answer(r#"[{"type": "ELIMINATION", "product_id": "123456789012"}]"#);
//!
//! ai.init().await?;
//! let answer = ai.get_suggestions("patient reports nausea").await?;
//! let suggestions = ai.parse_suggestions(&answer).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::prescription::Suggestion;
use crate::ports::{AIError, DecisionSupport};

use super::suggestion_parser;

/// Prompt length accepted when none is configured.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 2000;

const DEFAULT_ANSWER: &str = "[]";

/// Decision-support AI replaying pre-configured answers.
#[derive(Debug, Clone)]
pub struct ScriptedDecisionSupport {
    answers: Arc<Mutex<VecDeque<Result<String, AIError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    available: bool,
    max_prompt_chars: usize,
}

impl Default for ScriptedDecisionSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDecisionSupport {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            available: true,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
        }
    }

    /// Queues a successful answer.
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        self.push(Ok(answer.into()));
        self
    }

    /// Queues a failure for the next prompt.
    pub fn with_error(self, error: AIError) -> Self {
        self.push(Err(error));
        self
    }

    /// Makes `init` fail with `Unavailable`.
    pub fn disabled(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn with_max_prompt_chars(mut self, max: usize) -> Self {
        self.max_prompt_chars = max;
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, answer: Result<String, AIError>) {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    fn next_answer(&self) -> Result<String, AIError> {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_ANSWER.to_string()))
    }

    fn check_prompt(&self, prompt: &str) -> Result<(), AIError> {
        if prompt.trim().is_empty() {
            return Err(AIError::bad_prompt("prompt is empty"));
        }
        let length = prompt.chars().count();
        if length > self.max_prompt_chars {
            return Err(AIError::bad_prompt(format!(
                "prompt has {} characters, at most {} are accepted",
                length, self.max_prompt_chars
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DecisionSupport for ScriptedDecisionSupport {
    async fn init(&self) -> Result<(), AIError> {
        if self.available {
            Ok(())
        } else {
            Err(AIError::unavailable("decision support is disabled"))
        }
    }

    async fn get_suggestions(&self, prompt: &str) -> Result<String, AIError> {
        self.check_prompt(prompt)?;
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        self.next_answer()
    }

    async fn parse_suggestions(&self, answer: &str) -> Result<Vec<Suggestion>, AIError> {
        suggestion_parser::parse_suggestions(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_are_returned_in_order_then_default() {
        let ai = ScriptedDecisionSupport::new()
            .with_answer("first")
            .with_answer("second");

        assert_eq!(ai.get_suggestions("a").await.unwrap(), "first");
        assert_eq!(ai.get_suggestions("b").await.unwrap(), "second");
        assert_eq!(ai.get_suggestions("c").await.unwrap(), DEFAULT_ANSWER);
        assert_eq!(ai.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn queued_error_is_returned() {
        let ai = ScriptedDecisionSupport::new().with_error(AIError::bad_prompt("inconsistent"));

        let err = ai.get_suggestions("dose?").await.unwrap_err();

        assert_eq!(err, AIError::bad_prompt("inconsistent"));
    }

    #[tokio::test]
    async fn disabled_ai_fails_to_init() {
        let ai = ScriptedDecisionSupport::new().disabled();
        assert!(matches!(ai.init().await, Err(AIError::Unavailable(_))));
        assert!(ScriptedDecisionSupport::new().init().await.is_ok());
    }

    #[tokio::test]
    async fn empty_prompt_is_bad_and_not_recorded() {
        let ai = ScriptedDecisionSupport::new().with_answer("unused");

        assert!(matches!(
            ai.get_suggestions("  ").await,
            Err(AIError::BadPrompt(_))
        ));
        assert!(ai.prompts().is_empty());
        assert_eq!(ai.get_suggestions("now").await.unwrap(), "unused");
    }

    #[tokio::test]
    async fn overlong_prompt_is_bad() {
        let ai = ScriptedDecisionSupport::new().with_max_prompt_chars(5);
        assert!(matches!(
            ai.get_suggestions("too long").await,
            Err(AIError::BadPrompt(_))
        ));
        assert!(ai.get_suggestions("short").await.is_ok());
    }

    #[tokio::test]
    async fn default_answer_parses_to_no_suggestions() {
        let ai = ScriptedDecisionSupport::new();
        let answer = ai.get_suggestions("anything").await.unwrap();
        assert!(ai.parse_suggestions(&answer).await.unwrap().is_empty());
    }
}
