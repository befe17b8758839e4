//! Session end: decides whether a finished session becomes a precedent

use serde::{Deserialize, Serialize};
use tracing::info;

/// Sessions touching at least this many files are significant
pub const PRECEDENT_MIN_FILES: u32 = 5;

/// Sessions lasting at least this long are significant
pub const PRECEDENT_MIN_MINUTES: f64 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEndRequest {
    pub session_id: String,
    pub summary: String,
    /// success, failure, partial
    #[serde(default = "default_outcome")]
    pub outcome: String,
    #[serde(default)]
    pub duration_minutes: f64,
    #[serde(default)]
    pub files_changed: u32,
}

fn default_outcome() -> String {
    "success".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEndResponse {
    pub status: String,
    #[serde(default)]
    pub precedent_id: Option<String>,
}

impl SessionEndRequest {
    pub fn is_significant(&self) -> bool {
        self.files_changed >= PRECEDENT_MIN_FILES || self.duration_minutes >= PRECEDENT_MIN_MINUTES
    }
}

/// Record the end of a session, minting a precedent id for significant ones
pub fn record_session_end(request: &SessionEndRequest) -> SessionEndResponse {
    info!(
        session_id = %request.session_id,
        outcome = %request.outcome,
        files_changed = request.files_changed,
        "session ended"
    );

    let precedent_id = request.is_significant().then(|| {
        let prefix: String = request.session_id.chars().take(8).collect();
        format!("sess_{}", prefix)
    });

    if let Some(id) = &precedent_id {
        info!(precedent_id = %id, "created precedent");
    }

    SessionEndResponse {
        status: "ok".to_string(),
        precedent_id,
    }
}
