//! The watcher loop: scan, classify, fan out, sleep, repeat

use crate::dispatcher::EventDispatcher;
use crate::offsets::OffsetTracker;
use crate::scanner::{LogScanner, ScanBatch, ScanStats};
use daimon_core::OutboundEvent;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Dispatches allowed in flight at once within a pass
pub const DEFAULT_MAX_INFLIGHT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Scanning,
    Stopped,
}

/// Outcome of a single pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub scan: ScanStats,
    pub classified: usize,
    pub delivered: usize,
    pub dropped: usize,
    /// The scan itself failed; nothing was read or sent
    pub failed: bool,
}

impl PassReport {
    fn settle(&mut self, joined: Result<bool, JoinError>) {
        match joined {
            Ok(true) => self.delivered += 1,
            Ok(false) => self.dropped += 1,
            Err(err) => {
                self.dropped += 1;
                warn!(error = %err, "dispatch task failed");
            }
        }
    }
}

/// Totals across the loop's lifetime
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    pub passes: usize,
    pub classified: usize,
    pub delivered: usize,
    pub dropped: usize,
    pub failed_passes: usize,
}

impl PollReport {
    fn absorb(&mut self, pass: &PassReport) {
        self.passes += 1;
        self.classified += pass.classified;
        self.delivered += pass.delivered;
        self.dropped += pass.dropped;
        if pass.failed {
            self.failed_passes += 1;
        }
    }
}

/// Drives the scanner at a fixed cadence until cancelled
///
/// Passes never overlap. Cancellation is only observed between passes, so
/// an in-flight pass always finishes its reads and dispatch attempts.
pub struct PollLoop {
    root: PathBuf,
    scanner: LogScanner,
    dispatcher: EventDispatcher,
    interval: Duration,
    max_inflight: usize,
    state: PollState,
}

impl PollLoop {
    pub fn new(
        root: impl Into<PathBuf>,
        scanner: LogScanner,
        dispatcher: EventDispatcher,
        interval: Duration,
    ) -> Self {
        Self {
            root: root.into(),
            scanner,
            dispatcher,
            interval,
            max_inflight: DEFAULT_MAX_INFLIGHT,
            state: PollState::Idle,
        }
    }

    /// Cap concurrent dispatches per pass; at least one is always allowed
    pub fn with_max_inflight(mut self, limit: usize) -> Self {
        self.max_inflight = limit.max(1);
        self
    }

    pub fn max_inflight(&self) -> usize {
        self.max_inflight
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn scanner(&self) -> &LogScanner {
        &self.scanner
    }

    /// Scan once and attempt delivery of every classified record
    ///
    /// Dispatches run concurrently, at most `max_inflight` at a time, each
    /// bounded by the dispatcher timeout. The pass returns once all of them
    /// have settled.
    pub async fn run_pass(&mut self) -> PassReport {
        self.state = PollState::Scanning;

        let Some(batch) = self.scan_blocking().await else {
            self.state = PollState::Idle;
            return PassReport {
                failed: true,
                ..PassReport::default()
            };
        };

        let mut report = PassReport {
            scan: batch.stats,
            ..PassReport::default()
        };

        let mut inflight = JoinSet::new();
        for result in batch.classified() {
            debug!(
                intent = %result.intent,
                risk = ?result.risk_tier,
                project = %result.project,
                "session event"
            );
            report.classified += 1;

            while inflight.len() >= self.max_inflight {
                match inflight.join_next().await {
                    Some(joined) => report.settle(joined),
                    None => break,
                }
            }

            let event = OutboundEvent::from(&result);
            let dispatcher = self.dispatcher.clone();
            inflight.spawn(async move { dispatcher.deliver(&event).await });
        }

        while let Some(joined) = inflight.join_next().await {
            report.settle(joined);
        }

        self.state = PollState::Idle;
        report
    }

    /// Run the file scan on the blocking pool
    ///
    /// A scan that panics loses the in-memory scanner; it is rebuilt from the
    /// last persisted checkpoints and the pass is reported as failed.
    async fn scan_blocking(&mut self) -> Option<ScanBatch> {
        let mut scanner = std::mem::take(&mut self.scanner);
        let store = scanner.tracker().store().map(Path::to_path_buf);
        let root = self.root.clone();

        let joined = tokio::task::spawn_blocking(move || {
            let batch = scanner.scan(&root);
            (scanner, batch)
        })
        .await;

        match joined {
            Ok((scanner, batch)) => {
                self.scanner = scanner;
                Some(batch)
            }
            Err(err) => {
                warn!(error = %err, root = %self.root.display(), "scan pass failed");
                self.scanner = recover_scanner(store);
                None
            }
        }
    }

    /// Loop until `cancel` fires. The first pass starts immediately.
    pub async fn run(&mut self, cancel: CancellationToken) -> PollReport {
        info!(
            root = %self.root.display(),
            endpoint = %self.dispatcher.endpoint(),
            interval_ms = self.interval.as_millis() as u64,
            "watcher started"
        );

        let mut totals = PollReport::default();
        loop {
            if cancel.is_cancelled() {
                break;
            }

            let pass = self.run_pass().await;
            totals.absorb(&pass);

            if pass.failed {
                warn!("pass skipped, retrying next interval");
            } else if pass.classified > 0 || pass.scan.files_failed > 0 {
                info!(
                    classified = pass.classified,
                    delivered = pass.delivered,
                    dropped = pass.dropped,
                    files_failed = pass.scan.files_failed,
                    malformed = pass.scan.malformed_lines,
                    "pass complete"
                );
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => break,
            }
        }

        self.state = PollState::Stopped;
        info!(
            passes = totals.passes,
            delivered = totals.delivered,
            dropped = totals.dropped,
            "watcher stopped"
        );
        totals
    }
}

fn recover_scanner(store: Option<PathBuf>) -> LogScanner {
    match store {
        Some(path) => LogScanner::new(OffsetTracker::load(path)),
        None => LogScanner::default(),
    }
}
