//! Session log tailing, event fan-out, and the poll loop that drives them

mod dispatcher;
mod error;
mod health;
mod offsets;
mod poll;
mod scanner;

pub use dispatcher::{EventDispatcher, EVENT_PATH};
pub use error::{DispatchError, ScanError};
pub use health::{HealthProbe, ServiceStatus};
pub use offsets::{ByteRange, OffsetTracker, ReadCheckpoint};
pub use poll::{PassReport, PollLoop, PollReport, PollState, DEFAULT_MAX_INFLIGHT};
pub use scanner::{discover_sources, LogScanner, ScanBatch, ScanStats, SourceFile};

/// Re-exported so callers can cancel a [`PollLoop`] without naming tokio-util
pub use tokio_util::sync::CancellationToken;
