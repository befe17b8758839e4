//! Quick-check: fast risk/salience scoring of a single prompt

use crate::classify::classify_risk;
use crate::error::RequestError;
use crate::types::Mode;
use serde::{Deserialize, Serialize};

/// Longest prompt accepted, in characters
pub const MAX_PROMPT_CHARS: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickCheckRequest {
    pub prompt: String,
}

impl QuickCheckRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Enforce the 1..=10000 character bound
    pub fn validate(&self) -> Result<(), RequestError> {
        let len = self.prompt.chars().count();
        if len == 0 {
            return Err(RequestError::EmptyPrompt);
        }
        if len > MAX_PROMPT_CHARS {
            return Err(RequestError::PromptTooLong {
                len,
                max: MAX_PROMPT_CHARS,
            });
        }
        Ok(())
    }

    /// Validate, then score
    pub fn evaluate(&self) -> Result<QuickCheckResponse, RequestError> {
        self.validate()?;
        Ok(analyze_prompt(&self.prompt))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickCheckResponse {
    pub salience: f64,
    pub should_emerge: bool,
    pub mode: Mode,
    #[serde(default)]
    pub emergence_reason: Option<String>,
    #[serde(default)]
    pub detected_keywords: Vec<String>,
}

/// Score a prompt without any model call
pub fn analyze_prompt(prompt: &str) -> QuickCheckResponse {
    let risk = classify_risk(prompt);

    QuickCheckResponse {
        salience: risk.salience,
        should_emerge: risk.should_emerge(),
        mode: risk.mode(),
        emergence_reason: risk.reason(),
        detected_keywords: risk.matched,
    }
}
