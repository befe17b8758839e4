use std::io::Write;
use std::path::{Path, PathBuf};

/// Append lines to `<root>/<project>/<session>.jsonl`, creating it if needed
pub fn append_session(root: &Path, project: &str, session: &str, lines: &[&str]) -> PathBuf {
    let dir = root.join(project);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.jsonl", session));
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

pub fn user_line(content: &str) -> String {
    serde_json::json!({"role": "user", "content": content}).to_string()
}
