mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch(args) => commands::watch::run(args),
        Commands::Check { prompt } => commands::check::run(prompt.as_deref()),
        Commands::ShellBatch => commands::shell_batch::run(),
        Commands::SessionEnd => commands::session_end::run(),
        Commands::Health { noesis_url, reflector_url } => {
            commands::health::run(noesis_url.as_deref(), reflector_url.as_deref())
        }
        Commands::Status => commands::status::run(),
        Commands::Version => commands::version::run(),
    }
}
