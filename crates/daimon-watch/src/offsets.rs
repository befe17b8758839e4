//! Per-file read positions for append-only session logs

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Half-open byte range `[start, end)` of a file not yet consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// How far into `source_path` has been consumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadCheckpoint {
    pub source_path: PathBuf,
    pub byte_offset: u64,
}

/// Monotonic read-position ledger, one checkpoint per source file
///
/// Offsets only move forward, except when a file shrinks below its
/// checkpoint (truncation or rotation), which resets it to 0.
#[derive(Debug, Default)]
pub struct OffsetTracker {
    offsets: HashMap<PathBuf, u64>,
    store: Option<PathBuf>,
    /// Table changed since the last persist
    dirty: bool,
}

impl OffsetTracker {
    /// In-memory tracker; checkpoints are lost on restart
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker backed by a checkpoint file
    ///
    /// A missing or unreadable file starts an empty table: sources are then
    /// re-read from the beginning, which duplicates events but loses none.
    pub fn load(store: impl Into<PathBuf>) -> Self {
        let store = store.into();
        let mut tracker = Self {
            offsets: HashMap::new(),
            store: Some(store.clone()),
            dirty: false,
        };

        if !store.exists() {
            return tracker;
        }

        let parsed = std::fs::read_to_string(&store)
            .map_err(|e| e.to_string())
            .and_then(|c| {
                serde_json::from_str::<Vec<ReadCheckpoint>>(&c).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(checkpoints) => {
                for cp in checkpoints {
                    tracker.offsets.insert(cp.source_path, cp.byte_offset);
                }
                debug!(path = %store.display(), entries = tracker.len(), "loaded checkpoints");
            }
            Err(err) => {
                warn!(path = %store.display(), error = %err, "discarding unreadable checkpoints");
            }
        }
        tracker
    }

    /// Last committed offset, 0 for unseen files
    pub fn offset(&self, path: &Path) -> u64 {
        self.offsets.get(path).copied().unwrap_or(0)
    }

    /// Unseen range for a file of `size` bytes
    pub fn observe(&mut self, path: &Path, size: u64) -> ByteRange {
        let recorded = self.offsets.entry(path.to_path_buf()).or_insert(0);

        if size < *recorded {
            warn!(
                path = %path.display(),
                checkpoint = *recorded,
                size,
                "source shrank below checkpoint, rereading from start"
            );
            *recorded = 0;
            self.dirty = true;
        }

        ByteRange {
            start: *recorded,
            end: size,
        }
    }

    /// Unseen range for a file, sized from its current metadata
    pub fn unseen_byte_range(&mut self, path: &Path) -> std::io::Result<ByteRange> {
        let size = std::fs::metadata(path)?.len();
        Ok(self.observe(path, size))
    }

    /// Record that `path` has been consumed up to `new_offset`
    ///
    /// Callers never move a checkpoint backwards; doing so is a bug, caught
    /// in debug builds. Release builds keep the larger offset.
    pub fn commit(&mut self, path: &Path, new_offset: u64) {
        let recorded = self.offsets.entry(path.to_path_buf()).or_insert(0);
        debug_assert!(
            new_offset >= *recorded,
            "checkpoint for {} moved backwards: {} -> {}",
            path.display(),
            *recorded,
            new_offset
        );
        if new_offset > *recorded {
            *recorded = new_offset;
            self.dirty = true;
        }
    }

    /// Forget checkpoints for files no longer present; returns how many
    pub fn prune(&mut self, live: &[PathBuf]) -> usize {
        let live: HashSet<&Path> = live.iter().map(PathBuf::as_path).collect();
        let before = self.offsets.len();
        self.offsets.retain(|path, _| live.contains(path.as_path()));

        let removed = before - self.offsets.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Snapshot of the table, sorted by path
    pub fn checkpoints(&self) -> Vec<ReadCheckpoint> {
        let mut checkpoints: Vec<ReadCheckpoint> = self
            .offsets
            .iter()
            .map(|(path, &offset)| ReadCheckpoint {
                source_path: path.clone(),
                byte_offset: offset,
            })
            .collect();
        checkpoints.sort_by(|a, b| a.source_path.cmp(&b.source_path));
        checkpoints
    }

    /// Store location, `None` for an in-memory tracker
    pub fn store(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    /// Whether the table changed since it was last persisted
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the table to its checkpoint file, if any and if it changed
    pub fn persist(&mut self) -> std::io::Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.checkpoints())?;
        daimon_telemetry::atomic_write(store, json.as_bytes())?;
        self.dirty = false;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
