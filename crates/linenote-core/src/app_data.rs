//! Where linenote keeps its own state (config).
//!
//! The notes file itself lives wherever the user points it; only settings go here.

use std::path::PathBuf;

/// Returns the directory where linenote stores its config.
/// On Linux: `~/.local/share/linenote/`.
/// Creates the directory if it doesn't exist; returns `None` if we can't determine the path.
pub fn app_data_dir() -> Option<PathBuf> {
    let dir = directories::ProjectDirs::from("app", "linenote", "linenote")?
        .data_local_dir()
        .to_path_buf();
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
