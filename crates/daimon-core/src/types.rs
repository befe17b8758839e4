//! Core types for intent/risk signals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Salience at or above this surfaces an active intervention
pub const EMERGE_THRESHOLD: f64 = 0.85;

/// Salience at or above this (and below emerge) is worth a subtle hint
pub const SUBTLE_THRESHOLD: f64 = 0.5;

/// What the developer is trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentTag {
    Create,
    Fix,
    Refactor,
    Understand,
    Delete,
    Test,
    Deploy,
    Unknown,
}

impl IntentTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentTag::Create => "create",
            IntentTag::Fix => "fix",
            IntentTag::Refactor => "refactor",
            IntentTag::Understand => "understand",
            IntentTag::Delete => "delete",
            IntentTag::Test => "test",
            IntentTag::Deploy => "deploy",
            IntentTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk tier classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// >= 0.85: emerge
    High,
    /// 0.5-0.85: subtle
    Medium,
    /// < 0.5: silent
    Low,
}

impl RiskTier {
    pub fn from_salience(salience: f64) -> Self {
        if salience >= EMERGE_THRESHOLD {
            RiskTier::High
        } else if salience >= SUBTLE_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            RiskTier::High => Mode::Emerge,
            RiskTier::Medium => Mode::Subtle,
            RiskTier::Low => Mode::Silent,
        }
    }
}

/// How the downstream service should respond
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Emerge,
    Subtle,
    Silent,
}

impl Mode {
    pub fn should_emerge(&self) -> bool {
        matches!(self, Mode::Emerge)
    }
}

/// One line of a monitored session log. Read once, classified, dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub role_or_kind: String,
    pub body: String,
    /// Session file stem
    pub source_id: String,
    /// Project directory the session belongs to
    pub project: String,
}

impl SourceRecord {
    /// Typed by the developer rather than produced by the assistant or a tool
    pub fn is_human(&self) -> bool {
        matches!(self.role_or_kind.as_str(), "user" | "human")
    }
}

/// Signals derived from a single source record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: IntentTag,
    pub risk_tier: RiskTier,
    pub salience: f64,
    /// First three risk keywords, in scan order
    pub matched_keywords: Vec<String>,
    pub files_touched: Vec<String>,
    pub project: String,
    pub source_id: String,
    pub observed_at: DateTime<Utc>,
}

/// The part of a classification allowed to leave the process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub event_type: IntentTag,
    pub timestamp: DateTime<Utc>,
    pub project: String,
    pub files_touched: Vec<String>,
    pub intention: IntentTag,
}

impl From<&ClassificationResult> for OutboundEvent {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            event_type: result.intent,
            timestamp: result.observed_at,
            project: result.project.clone(),
            files_touched: result.files_touched.clone(),
            intention: result.intent,
        }
    }
}
