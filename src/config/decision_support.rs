//! Decision-support AI configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Decision-support AI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionSupportConfig {
    /// Whether the AI may be started during a consultation
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Longest prompt accepted, in characters
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
}

impl DecisionSupportConfig {
    /// Validate decision-support configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_prompt_chars == 0 {
            return Err(ValidationError::InvalidPromptLimit);
        }
        Ok(())
    }
}

impl Default for DecisionSupportConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_prompt_chars: default_max_prompt_chars(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_prompt_chars() -> usize {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecisionSupportConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_prompt_chars, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_prompt_limit_rejected() {
        let config = DecisionSupportConfig {
            max_prompt_chars: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPromptLimit));
    }
}
