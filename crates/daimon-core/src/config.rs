//! Configuration for the session watcher

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Watcher configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NOESIS consciousness service (receives session events)
    pub noesis_url: String,

    /// Metacognitive reflector (tribunal), only probed for health
    pub reflector_url: String,

    /// Sleep between scan passes
    pub poll_interval: Duration,

    /// Upper bound on a single event dispatch
    pub dispatch_timeout: Duration,

    /// Upper bound on a health probe
    pub health_timeout: Duration,

    /// Dispatches allowed in flight at once within a pass
    pub max_inflight_dispatches: usize,

    /// Session log root, `~/.claude/projects` when unset
    pub projects_dir: Option<PathBuf>,

    /// Checkpoint table location, `~/.claude/daimon/checkpoints.json` when unset
    pub checkpoint_file: Option<PathBuf>,

    /// Keep checkpoints across restarts
    pub persist_checkpoints: bool,
}

/// On-disk shape of `daimon.json`; every field optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    noesis_url: Option<String>,
    reflector_url: Option<String>,
    poll_interval_secs: Option<u64>,
    dispatch_timeout_ms: Option<u64>,
    health_timeout_ms: Option<u64>,
    max_inflight_dispatches: Option<usize>,
    projects_dir: Option<PathBuf>,
    checkpoint_file: Option<PathBuf>,
    persist_checkpoints: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            noesis_url: "http://localhost:8001".to_string(),
            reflector_url: "http://localhost:8002".to_string(),
            poll_interval: Duration::from_secs(5),
            dispatch_timeout: Duration::from_secs(2),
            health_timeout: Duration::from_secs(3),
            max_inflight_dispatches: 16,
            projects_dir: None,
            checkpoint_file: None,
            persist_checkpoints: true,
        }
    }

    /// Load `daimon.json`, falling back to defaults for anything missing
    /// or unreadable
    pub fn load(path: &Path) -> Self {
        let mut config = Self::new();
        if !path.exists() {
            return config;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable config, using defaults");
                return config;
            }
        };

        match serde_json::from_str::<ConfigFile>(&content) {
            Ok(file) => config.merge(file),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "invalid config, using defaults");
            }
        }
        config
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(url) = file.noesis_url {
            self.noesis_url = url;
        }
        if let Some(url) = file.reflector_url {
            self.reflector_url = url;
        }
        if let Some(secs) = file.poll_interval_secs {
            self.poll_interval = Duration::from_secs(secs);
        }
        if let Some(ms) = file.dispatch_timeout_ms {
            self.dispatch_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = file.health_timeout_ms {
            self.health_timeout = Duration::from_millis(ms);
        }
        if let Some(limit) = file.max_inflight_dispatches {
            self.max_inflight_dispatches = limit.max(1);
        }
        if file.projects_dir.is_some() {
            self.projects_dir = file.projects_dir;
        }
        if file.checkpoint_file.is_some() {
            self.checkpoint_file = file.checkpoint_file;
        }
        if let Some(persist) = file.persist_checkpoints {
            self.persist_checkpoints = persist;
        }
    }

    /// Apply `NOESIS_URL` / `NOESIS_REFLECTOR_URL` overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("NOESIS_URL") {
            if !url.is_empty() {
                self.noesis_url = url;
            }
        }
        if let Ok(url) = std::env::var("NOESIS_REFLECTOR_URL") {
            if !url.is_empty() {
                self.reflector_url = url;
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
