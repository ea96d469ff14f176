//! On-disk key-value store
//!
//! Provides a `PreferenceStore` that keeps one JSON file per key in the
//! platform data directory.

use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Key under which the last successfully searched city is kept
pub const LAST_SEARCHED_CITY_KEY: &str = "last_searched_city";

/// Reads and writes string values to disk
///
/// Values live in an XDG-compliant data directory (`~/.local/share/weatherdash/`
/// on Linux), one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    /// Directory where value files are stored
    dir: PathBuf,
}

impl PreferenceStore {
    /// Creates a store in the platform data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "weatherdash")?;
        Some(Self {
            dir: project_dirs.data_dir().to_path_buf(),
        })
    }

    /// Creates a store rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Writes a value, replacing any previous one
    pub fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string(value)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.path(key), json)
    }

    /// Reads a value
    ///
    /// Returns `None` if the key was never written or the file can't be parsed.
    pub fn get(&self, key: &str) -> Option<String> {
        let content = fs::read_to_string(self.path(key)).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn last_searched_city(&self) -> Option<String> {
        self.get(LAST_SEARCHED_CITY_KEY)
            .filter(|city| !city.trim().is_empty())
    }

    /// Records a city as the last one searched, logging rather than failing on I/O errors
    pub fn remember_city(&self, city: &str) {
        if let Err(e) = self.set(LAST_SEARCHED_CITY_KEY, city) {
            tracing::warn!(error = %e, "failed to persist last searched city");
        }
    }
}
