//! Where log files live.
use std::path::PathBuf;

const APP_DIR: &str = "printer-migrate";

/// Base directory for per-command logs.
///
/// `$XDG_CACHE_HOME` wins when set. Otherwise Windows uses `%LOCALAPPDATA%`
/// and everything else `$HOME/.cache`.
fn cache_base() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg));
    }
    if cfg!(windows) {
        std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
    } else {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache"))
    }
}

/// Log file for `command`, creating its directory. `None` if there is no
/// usable cache location.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = cache_base()?.join(APP_DIR);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}
