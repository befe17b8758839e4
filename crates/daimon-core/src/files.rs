//! File path extraction. Only the path tokens leave the message.

use regex::Regex;
use std::sync::OnceLock;

/// Upper bound on paths reported per message
pub const MAX_FILES_TOUCHED: usize = 10;

static QUOTED_PATH_RE: OnceLock<Regex> = OnceLock::new();
static BARE_PATH_RE: OnceLock<Regex> = OnceLock::new();

/// Extract file paths mentioned in a message
///
/// Union of quoted tokens and bare whitespace-delimited tokens ending in a
/// 2-4 letter extension, deduplicated and capped at [`MAX_FILES_TOUCHED`].
/// Callers must not depend on the order.
pub fn extract_files_touched(message: &str) -> Vec<String> {
    let quoted = QUOTED_PATH_RE
        .get_or_init(|| Regex::new(r#"['"`]([^'"`]+\.[a-zA-Z]{2,4})['"`]"#).unwrap());
    let bare = BARE_PATH_RE.get_or_init(|| Regex::new(r"(\S+\.[a-zA-Z]{2,4})\b").unwrap());

    let candidates = quoted
        .captures_iter(message)
        .chain(bare.captures_iter(message))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()));

    let mut files: Vec<String> = Vec::new();
    for candidate in candidates {
        if files.len() == MAX_FILES_TOUCHED {
            break;
        }
        if !files.iter().any(|f| f == candidate) {
            files.push(candidate.to_string());
        }
    }
    files
}
