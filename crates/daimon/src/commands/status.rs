use daimon_core::Config;
use daimon_telemetry::Paths;
use daimon_watch::{discover_sources, OffsetTracker};

fn status(config: &Config, paths: &Paths) -> serde_json::Value {
    let root = config
        .projects_dir
        .clone()
        .unwrap_or_else(|| paths.projects_dir());
    let store = config
        .checkpoint_file
        .clone()
        .unwrap_or_else(|| paths.checkpoint_file());

    let sources = discover_sources(&root);
    let tracker = OffsetTracker::load(&store);

    // Bytes still to be read across every known source
    let pending: u64 = sources
        .iter()
        .filter_map(|s| {
            let size = std::fs::metadata(&s.path).ok()?.len();
            Some(size.saturating_sub(tracker.offset(&s.path)))
        })
        .sum();

    serde_json::json!({
        "noesis_url": config.noesis_url,
        "reflector_url": config.reflector_url,
        "poll_interval_secs": config.poll_interval.as_secs(),
        "projects_dir": root,
        "checkpoint_file": store,
        "sources": sources.len(),
        "pending_bytes": pending,
        "checkpoints": tracker.checkpoints(),
    })
}

pub fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let config = super::load_config(&paths);
    println!("{}", serde_json::to_string_pretty(&status(&config, &paths))?);
    Ok(())
}
