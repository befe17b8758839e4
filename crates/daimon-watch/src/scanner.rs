//! Incremental scanning of Claude Code session logs
//!
//! Layout: `<root>/<project>/*.jsonl` and `<root>/<project>/sessions/*.jsonl`.
//! Each pass reads only bytes past the checkpoint, and commits the new
//! checkpoint before anything is classified: a crash after that point drops
//! the pending events instead of redelivering them.

use crate::error::ScanError;
use crate::offsets::OffsetTracker;
use chrono::Utc;
use daimon_core::{classify, ClassificationResult, SourceRecord};
use daimon_telemetry::{complete_lines, parse_json_line};
use serde_json::Value;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// A session log and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub project: String,
    /// File stem, the session id
    pub source_id: String,
}

/// Counters for one scan pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_failed: usize,
    pub lines_read: usize,
    pub malformed_lines: usize,
    pub records_kept: usize,
}

/// Human records read in one pass, classified on demand
#[derive(Debug)]
pub struct ScanBatch {
    records: Vec<SourceRecord>,
    pub stats: ScanStats,
}

impl ScanBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Classify records lazily, in file order. Record bodies are dropped as
    /// the iterator advances.
    pub fn classified(self) -> impl Iterator<Item = ClassificationResult> {
        self.records
            .into_iter()
            .map(|record| classify(&record, Utc::now()))
    }
}

/// Find every session log under `root`, sorted by path
pub fn discover_sources(root: &Path) -> Vec<SourceFile> {
    let project_dirs = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(root = %root.display(), error = %err, "session root not readable");
            return Vec::new();
        }
    };

    let mut sources = Vec::new();
    for entry in project_dirs.flatten() {
        let project_dir = entry.path();
        if !project_dir.is_dir() {
            continue;
        }
        let project = entry.file_name().to_string_lossy().into_owned();

        for dir in [project_dir.clone(), project_dir.join("sessions")] {
            collect_jsonl(&dir, &project, &mut sources);
        }
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    sources
}

fn collect_jsonl(dir: &Path, project: &str, sources: &mut Vec<SourceFile>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") || !path.is_file() {
            continue;
        }
        let source_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        sources.push(SourceFile {
            path,
            project: project.to_string(),
            source_id,
        });
    }
}

/// Message text: a plain string, or the first text block of a content array
fn extract_text(content: &Value) -> String {
    if let Some(s) = content.as_str() {
        return s.to_string();
    }
    if let Some(items) = content.as_array() {
        for item in items {
            if item.get("type").and_then(|t| t.as_str()) != Some("text") {
                continue;
            }
            if let Some(text) = item.get("text").and_then(|t| t.as_str()) {
                return text.to_string();
            }
        }
    }
    String::new()
}

/// Build a record from one parsed line. Accepts the flat
/// `{"role", "content"}` shape and Claude Code's
/// `{"type", "message": {"role", "content"}}` transcript shape.
fn record_from_entry(entry: &Value, source: &SourceFile) -> Option<SourceRecord> {
    let role = entry
        .get("role")
        .and_then(|v| v.as_str())
        .or_else(|| entry.get("type").and_then(|v| v.as_str()))
        .or_else(|| entry.pointer("/message/role").and_then(|v| v.as_str()))?;

    let body = entry
        .get("content")
        .or_else(|| entry.pointer("/message/content"))
        .map(extract_text)
        .unwrap_or_default();

    Some(SourceRecord {
        role_or_kind: role.to_string(),
        body,
        source_id: source.source_id.clone(),
        project: source.project.clone(),
    })
}

/// Reads unseen bytes of every session log and keeps the human records
#[derive(Debug, Default)]
pub struct LogScanner {
    tracker: OffsetTracker,
}

impl LogScanner {
    pub fn new(tracker: OffsetTracker) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &OffsetTracker {
        &self.tracker
    }

    /// Run one pass over `root`
    ///
    /// Unreadable files are skipped for this pass and retried on the next.
    /// Malformed lines and non-human records are consumed but produce no
    /// record. Checkpoints are written only when an offset moved.
    pub fn scan(&mut self, root: &Path) -> ScanBatch {
        let sources = discover_sources(root);
        if root.is_dir() {
            let live: Vec<PathBuf> = sources.iter().map(|s| s.path.clone()).collect();
            let pruned = self.tracker.prune(&live);
            if pruned > 0 {
                debug!(pruned, "dropped checkpoints for vanished sources");
            }
        }

        let mut stats = ScanStats::default();
        let mut records = Vec::new();

        for source in &sources {
            let lines = match self.read_unseen(source) {
                Ok(lines) => lines,
                Err(err) => {
                    stats.files_failed += 1;
                    warn!(error = %err, "skipping source for this pass");
                    continue;
                }
            };
            stats.files_scanned += 1;

            for line in &lines {
                if line.trim().is_empty() {
                    continue;
                }
                stats.lines_read += 1;

                let Some(entry) = parse_json_line::<Value>(line) else {
                    stats.malformed_lines += 1;
                    trace!(path = %source.path.display(), "skipping malformed line");
                    continue;
                };

                let Some(record) = record_from_entry(&entry, source) else {
                    continue;
                };
                if !record.is_human() || record.body.trim().is_empty() {
                    continue;
                }
                records.push(record);
            }
        }

        if let Err(err) = self.tracker.persist() {
            warn!(error = %err, "failed to persist checkpoints");
        }

        stats.records_kept = records.len();
        ScanBatch { records, stats }
    }

    /// Read the unseen complete lines of one source and commit past them
    fn read_unseen(&mut self, source: &SourceFile) -> Result<Vec<String>, ScanError> {
        let path = &source.path;
        let range = self
            .tracker
            .unseen_byte_range(path)
            .map_err(|e| ScanError::io(path, e))?;
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let mut file = File::open(path).map_err(|e| ScanError::io(path, e))?;
        file.seek(SeekFrom::Start(range.start))
            .map_err(|e| ScanError::io(path, e))?;

        let mut buf = Vec::with_capacity(range.len() as usize);
        file.take(range.len())
            .read_to_end(&mut buf)
            .map_err(|e| ScanError::io(path, e))?;

        let (lines, consumed) = complete_lines(&buf);
        self.tracker.commit(path, range.start + consumed as u64);

        Ok(lines)
    }
}
