//! Filesystem plumbing shared by the watcher: `~/.claude` path resolution,
//! atomic writes, and JSON-lines framing

mod io;
mod paths;

pub use io::{atomic_write, complete_lines, parse_json_line};
pub use paths::Paths;
