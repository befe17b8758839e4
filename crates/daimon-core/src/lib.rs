//! Intent and risk classification for developer activity, plus the wire
//! contract shared with the NOESIS decision service

mod classify;
mod config;
mod error;
mod files;
pub mod keywords;
pub mod quick_check;
pub mod session;
pub mod shell;
mod types;

pub use classify::{classify, classify_intent, classify_risk, RiskAssessment};
pub use config::Config;
pub use error::RequestError;
pub use files::{extract_files_touched, MAX_FILES_TOUCHED};
pub use quick_check::{analyze_prompt, QuickCheckRequest, QuickCheckResponse};
pub use types::{ClassificationResult, IntentTag, Mode, OutboundEvent, RiskTier, SourceRecord};
