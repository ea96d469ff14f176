//! Logging setup
//!
//! The terminal belongs to the dashboard, so log output goes to
//! `weatherdash.log` in the platform cache directory instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter
pub const LOG_FILTER_VAR: &str = "WEATHERDASH_LOG";

const LOG_FILE_NAME: &str = "weatherdash.log";

/// Default location of the log file, if a cache directory exists
pub fn default_log_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "weatherdash")?;
    Some(dirs.cache_dir().join(LOG_FILE_NAME))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Filter from `WEATHERDASH_LOG`, defaulting to `info`
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `path`
///
/// Returns the path actually used, or `None` when logging is disabled because
/// no file could be opened.
pub fn init(path: Option<PathBuf>) -> Option<PathBuf> {
    let path = path.or_else(default_log_path)?;
    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("weatherdash: logging disabled, cannot open {}: {}", path.display(), e);
            return None;
        }
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    if installed.is_err() {
        return None;
    }

    tracing::info!(path = %path.display(), "weatherdash logging initialized");
    Some(path)
}
