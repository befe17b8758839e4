use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daimon")]
#[command(version)]
#[command(about = "Watches Claude Code sessions and reports developer intent to NOESIS")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tail session logs and forward classified events
    Watch(WatchArgs),

    /// Score a prompt for risk (argument or stdin, JSON out)
    Check {
        /// Prompt text; read from stdin when omitted
        prompt: Option<String>,
    },

    /// Summarize a batch of shell heartbeats (stdin/stdout JSON)
    ShellBatch,

    /// Record the end of a coding session (stdin/stdout JSON)
    SessionEnd,

    /// Probe NOESIS and the reflector
    Health {
        #[arg(long)]
        noesis_url: Option<String>,

        #[arg(long)]
        reflector_url: Option<String>,
    },

    /// Show configuration and read checkpoints
    Status,

    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Session log root (defaults to ~/.claude/projects)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// NOESIS base URL
    #[arg(long)]
    pub noesis_url: Option<String>,

    /// Seconds between scan passes
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Dispatch timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Concurrent dispatches allowed per pass
    #[arg(long)]
    pub max_inflight: Option<usize>,

    /// Start from scratch and keep checkpoints in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,
}
