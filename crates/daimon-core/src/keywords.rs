//! Keyword tables. Order matters: earlier entries win ties.

use crate::types::IntentTag;

/// Intent triggers, checked entry by entry, keyword by keyword
pub const INTENT_PATTERNS: &[(IntentTag, &[&str])] = &[
    (
        IntentTag::Create,
        &["create", "add", "implement", "build", "make", "generate", "write"],
    ),
    (
        IntentTag::Fix,
        &["fix", "bug", "error", "broken", "issue", "problem", "crash"],
    ),
    (
        IntentTag::Refactor,
        &["refactor", "clean", "reorganize", "restructure", "improve"],
    ),
    (
        IntentTag::Understand,
        &["explain", "what", "how", "why", "understand", "help me"],
    ),
    (
        IntentTag::Delete,
        &["delete", "remove", "drop", "destroy", "clean up"],
    ),
    (
        IntentTag::Test,
        &["test", "verify", "check", "validate", "coverage"],
    ),
    (
        IntentTag::Deploy,
        &["deploy", "release", "production", "publish", "ship"],
    ),
];

/// Keywords that trigger emergence
pub const HIGH_RISK_KEYWORDS: &[&str] = &[
    "delete",
    "drop",
    "rm -rf",
    "truncate",
    "production",
    "destroy",
    "wipe",
    "purge",
    "credential",
    "secret",
    "password",
];

/// Keywords for subtle mode, only consulted when nothing high-risk matched
pub const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "refactor",
    "migrate",
    "architecture",
    "auth",
    "security",
    "payment",
    "deploy",
    "database",
    "schema",
    "api",
];

pub const BASE_SALIENCE: f64 = 0.1;
pub const HIGH_RISK_SALIENCE: f64 = 0.9;
pub const MEDIUM_RISK_SALIENCE: f64 = 0.6;
