//! Keyword heuristics for intent and risk
//!
//! Matching is plain substring search over lower-cased text, so keywords
//! also fire inside longer words ("api" in "capital"). Downstream consumers
//! rely on that looseness.

use crate::files::extract_files_touched;
use crate::keywords::{
    BASE_SALIENCE, HIGH_RISK_KEYWORDS, HIGH_RISK_SALIENCE, INTENT_PATTERNS,
    MEDIUM_RISK_KEYWORDS, MEDIUM_RISK_SALIENCE,
};
use crate::types::{ClassificationResult, IntentTag, Mode, RiskTier, SourceRecord};
use chrono::{DateTime, Utc};

/// Number of keywords surfaced in reasons and results
const REASON_KEYWORDS: usize = 3;

/// Detect the intent category of a message
pub fn classify_intent(text: &str) -> IntentTag {
    let lower = text.to_lowercase();

    for (intent, keywords) in INTENT_PATTERNS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *intent;
        }
    }

    IntentTag::Unknown
}

/// Outcome of the risk heuristic
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub salience: f64,
    /// Every matched keyword, in scan order
    pub matched: Vec<String>,
}

impl RiskAssessment {
    pub fn mode(&self) -> Mode {
        self.tier.mode()
    }

    pub fn should_emerge(&self) -> bool {
        self.mode().should_emerge()
    }

    /// The first few matches, used wherever a short list is shown
    pub fn top_keywords(&self) -> Vec<String> {
        self.matched.iter().take(REASON_KEYWORDS).cloned().collect()
    }

    /// "Detected: a, b, c", or `None` when nothing matched
    pub fn reason(&self) -> Option<String> {
        if self.matched.is_empty() {
            return None;
        }
        Some(format!("Detected: {}", self.top_keywords().join(", ")))
    }
}

/// Score a message for risk
///
/// High-risk keywords dominate: medium-risk keywords are only scanned when
/// no high-risk keyword matched.
pub fn classify_risk(text: &str) -> RiskAssessment {
    let lower = text.to_lowercase();
    let mut salience = BASE_SALIENCE;

    let mut matched = scan_keywords(&lower, HIGH_RISK_KEYWORDS);
    if !matched.is_empty() {
        salience = HIGH_RISK_SALIENCE;
    } else {
        matched = scan_keywords(&lower, MEDIUM_RISK_KEYWORDS);
        if !matched.is_empty() {
            salience = MEDIUM_RISK_SALIENCE;
        }
    }

    RiskAssessment {
        tier: RiskTier::from_salience(salience),
        salience,
        matched,
    }
}

fn scan_keywords(lower: &str, keywords: &[&str]) -> Vec<String> {
    keywords
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

/// Derive every signal for one record
pub fn classify(record: &SourceRecord, observed_at: DateTime<Utc>) -> ClassificationResult {
    let risk = classify_risk(&record.body);

    ClassificationResult {
        intent: classify_intent(&record.body),
        risk_tier: risk.tier,
        salience: risk.salience,
        matched_keywords: risk.top_keywords(),
        files_touched: extract_files_touched(&record.body),
        project: record.project.clone(),
        source_id: record.source_id.clone(),
        observed_at,
    }
}
