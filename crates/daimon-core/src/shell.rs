//! Shell command heartbeats and the insights derived from a batch of them

use crate::classify::classify_risk;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Consecutive failing commands that read as frustration
pub const FRUSTRATION_STREAK: u32 = 3;

/// A single executed shell command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellHeartbeat {
    /// ISO timestamp
    pub timestamp: String,
    pub command: String,
    pub pwd: String,
    pub exit_code: i32,
    /// Seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub git_branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellBatchRequest {
    pub heartbeats: Vec<ShellHeartbeat>,
    /// Patterns already detected by the shell collector, if any
    #[serde(default)]
    pub patterns: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellBatchResponse {
    pub status: String,
    pub stored: usize,
    #[serde(default)]
    pub insights: Vec<String>,
}

/// Behavioural patterns in a run of commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellPatterns {
    /// Failing commands at the end of the batch
    pub error_streak: u32,
    pub possible_frustration: bool,
}

impl ShellPatterns {
    /// Derive patterns from the heartbeats themselves
    pub fn detect(heartbeats: &[ShellHeartbeat]) -> Self {
        let failing = heartbeats
            .iter()
            .rev()
            .take_while(|hb| hb.exit_code != 0)
            .count();
        let error_streak = u32::try_from(failing).unwrap_or(u32::MAX);

        Self {
            error_streak,
            possible_frustration: error_streak >= FRUSTRATION_STREAK,
        }
    }

    /// Read patterns reported by the collector
    fn from_reported(patterns: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            error_streak: patterns
                .get("error_streak")
                .and_then(|v| v.as_u64())
                .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
                .unwrap_or(0),
            possible_frustration: patterns
                .get("possible_frustration")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        }
    }
}

/// Summarize a batch. Command text never appears in the insights.
pub fn process_shell_batch(batch: &ShellBatchRequest) -> ShellBatchResponse {
    let patterns = if batch.patterns.is_empty() {
        ShellPatterns::detect(&batch.heartbeats)
    } else {
        ShellPatterns::from_reported(&batch.patterns)
    };

    let mut insights = Vec::new();

    if patterns.possible_frustration {
        insights.push(format!(
            "Frustration detected: {} consecutive errors",
            patterns.error_streak
        ));
        info!(
            error_streak = patterns.error_streak,
            "frustration pattern detected"
        );
    }

    for hb in &batch.heartbeats {
        if hb.exit_code != 0 {
            debug!(exit_code = hb.exit_code, pwd = %hb.pwd, "command failed");
        }

        let risk = classify_risk(&hb.command);
        if risk.should_emerge() {
            insights.push(format!(
                "High-risk command: {}",
                risk.top_keywords().join(", ")
            ));
        }
    }

    ShellBatchResponse {
        status: "ok".to_string(),
        stored: batch.heartbeats.len(),
        insights,
    }
}
