use crate::cli::WatchArgs;
use daimon_core::Config;
use daimon_telemetry::Paths;
use daimon_watch::{CancellationToken, EventDispatcher, LogScanner, OffsetTracker, PollLoop};
use std::time::Duration;
use tracing::info;

/// Flags win over `daimon.json` and the environment
fn apply_args(config: &mut Config, args: &WatchArgs) {
    if let Some(root) = &args.root {
        config.projects_dir = Some(root.clone());
    }
    if let Some(url) = &args.noesis_url {
        config.noesis_url = url.clone();
    }
    if let Some(secs) = args.interval_secs {
        config.poll_interval = Duration::from_secs(secs);
    }
    if let Some(ms) = args.timeout_ms {
        config.dispatch_timeout = Duration::from_millis(ms);
    }
    if let Some(limit) = args.max_inflight {
        config.max_inflight_dispatches = limit;
    }
    if args.no_persist {
        config.persist_checkpoints = false;
    }
}

fn build_loop(config: &Config, paths: &Paths) -> anyhow::Result<PollLoop> {
    let root = config
        .projects_dir
        .clone()
        .unwrap_or_else(|| paths.projects_dir());

    let tracker = if config.persist_checkpoints {
        let store = config
            .checkpoint_file
            .clone()
            .unwrap_or_else(|| paths.checkpoint_file());
        OffsetTracker::load(store)
    } else {
        OffsetTracker::new()
    };

    let dispatcher = EventDispatcher::new(&config.noesis_url, config.dispatch_timeout)?;
    Ok(PollLoop::new(
        root,
        LogScanner::new(tracker),
        dispatcher,
        config.poll_interval,
    )
    .with_max_inflight(config.max_inflight_dispatches))
}

pub fn run(args: WatchArgs) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let mut config = super::load_config(&paths);
    apply_args(&mut config, &args);

    let mut poll = build_loop(&config, &paths)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        if args.once {
            let pass = poll.run_pass().await;
            let output = serde_json::json!({
                "files_scanned": pass.scan.files_scanned,
                "files_failed": pass.scan.files_failed,
                "malformed_lines": pass.scan.malformed_lines,
                "classified": pass.classified,
                "delivered": pass.delivered,
                "dropped": pass.dropped,
                "failed": pass.failed,
            });
            println!("{output}");
            return Ok(());
        }

        let cancel = CancellationToken::new();
        tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received, stopping after current pass");
                }
                cancel.cancel();
            }
        });

        let report = poll.run(cancel).await;
        let output = serde_json::json!({
            "passes": report.passes,
            "classified": report.classified,
            "delivered": report.delivered,
            "dropped": report.dropped,
            "failed_passes": report.failed_passes,
        });
        println!("{output}");
        Ok(())
    })
}
