//! JSON-lines framing and atomic file operations

use serde::de::DeserializeOwned;
use std::path::Path;

/// Split a chunk of a JSON-lines file into its complete lines
///
/// Returns the lines (without their `\n`) and the number of bytes they span,
/// including the newline terminators. Bytes after the last `\n` belong to a
/// line that is still being written and are not consumed.
pub fn complete_lines(buf: &[u8]) -> (Vec<String>, usize) {
    let consumed = match buf.iter().rposition(|&b| b == b'\n') {
        Some(idx) => idx + 1,
        None => return (Vec::new(), 0),
    };

    let lines = buf[..consumed - 1]
        .split(|&b| b == b'\n')
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect();

    (lines, consumed)
}

/// Parse one JSON-lines record, `None` for blank or malformed lines
pub fn parse_json_line<T: DeserializeOwned>(line: &str) -> Option<T> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    serde_json::from_str(line).ok()
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines_holds_back_partial_line() {
        let (lines, consumed) = complete_lines(b"{\"a\":1}\n{\"b\":2}\n{\"c\":");
        assert_eq!(lines, vec!["{\"a\":1}", "{\"b\":2}"]);
        assert_eq!(consumed, 16);
    }

    #[test]
    fn test_complete_lines_keeps_blank_lines() {
        let (lines, consumed) = complete_lines(b"one\n\ntwo\n");
        assert_eq!(lines, vec!["one", "", "two"]);
        assert_eq!(consumed, 9);
    }

    #[test]
    fn test_complete_lines_without_newline() {
        let (lines, consumed) = complete_lines(b"no newline yet");
        assert!(lines.is_empty());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_parse_json_line_skips_malformed() {
        let ok: Option<serde_json::Value> = parse_json_line("  {\"role\": \"user\"}  ");
        assert!(ok.is_some());

        let bad: Option<serde_json::Value> = parse_json_line("{not json");
        assert!(bad.is_none());

        let blank: Option<serde_json::Value> = parse_json_line("   ");
        assert!(blank.is_none());
    }

    #[test]
    fn test_atomic_write() {
        let temp = tempfile::TempDir::new().unwrap();
        let test_file = temp.path().join("nested").join("state.json");

        let data = b"[{\"byte_offset\": 42}]";
        atomic_write(&test_file, data).unwrap();

        let read_data = std::fs::read(&test_file).unwrap();
        assert_eq!(data, read_data.as_slice());
        assert!(!test_file.with_extension("tmp").exists());
    }
}
