//! Path resolution for watcher state and Claude Code session logs

use std::path::PathBuf;

/// Resolves standard paths under `~/.claude`
#[derive(Debug, Clone)]
pub struct Paths {
    pub home_claude: PathBuf,
}

impl Paths {
    /// Create a new Paths resolver rooted at the user's `~/.claude`
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::with_home_claude(home.join(".claude")))
    }

    /// Create a resolver rooted at an explicit `.claude` directory
    pub fn with_home_claude(home_claude: impl Into<PathBuf>) -> Self {
        Self {
            home_claude: home_claude.into(),
        }
    }

    /// Root of the per-project session transcripts
    pub fn projects_dir(&self) -> PathBuf {
        self.home_claude.join("projects")
    }

    /// Directory holding the watcher's own state
    pub fn daimon_dir(&self) -> PathBuf {
        self.home_claude.join("daimon")
    }

    /// Get checkpoints.json path
    pub fn checkpoint_file(&self) -> PathBuf {
        self.daimon_dir().join("checkpoints.json")
    }

    /// Get daimon.json config path
    pub fn config_file(&self) -> PathBuf {
        self.home_claude.join("daimon.json")
    }
}
