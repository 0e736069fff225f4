//! Centralized path resolution for tokenwatch
//!
//! ## Path Strategy
//!
//! The base directory is `--data-dir` when given, otherwise the platform data
//! directory:
//! - **macOS**: `~/Library/Application Support/TokenWatch/`
//! - **Windows**: `%LOCALAPPDATA%\TokenWatch\`
//! - **Linux**: `$XDG_DATA_HOME/TokenWatch/` (fallback `~/.local/share/TokenWatch/`)
//!
//! ## Directory Structure
//!
//! ```text
//! TokenWatch/
//! ├── data/
//! │ └── analyses.json
//! └── logs/
//!   └── tokenwatch_*.log
//! ```

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "TokenWatch";

static BASE_DIRECTORY: OnceCell<PathBuf> = OnceCell::new();

/// Override the base directory; must run before the first path lookup
pub fn set_base_directory(dir: PathBuf) -> Result<(), String> {
  BASE_DIRECTORY
    .set(dir)
    .map_err(|_| "Base directory already resolved".to_string())
}

fn resolve_base_directory() -> PathBuf {
  if let Some(dir) = dirs::data_local_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(dir) = dirs::data_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(home) = dirs::home_dir() {
    return home.join(APP_DIR);
  }

  PathBuf::from(APP_DIR)
}

/// Returns the base directory for all tokenwatch data
pub fn get_base_directory() -> PathBuf {
  BASE_DIRECTORY.get_or_init(resolve_base_directory).clone()
}

/// Returns the data directory path (persisted analyses)
pub fn get_data_directory() -> PathBuf {
  get_base_directory().join("data")
}

/// Returns the logs directory path
pub fn get_logs_directory() -> PathBuf {
  get_base_directory().join("logs")
}

/// Returns the analyses store path for the configured file name
pub fn get_analyses_path(file_name: &str) -> PathBuf {
  get_data_directory().join(file_name)
}

/// Create every directory the service writes to
pub fn ensure_all_directories() -> Result<(), String> {
  for (name, dir) in [("data", get_data_directory()), ("logs", get_logs_directory())] {
    ensure_directory(name, &dir)?;
  }
  Ok(())
}

fn ensure_directory(name: &str, dir: &Path) -> Result<(), String> {
  if dir.exists() {
    return Ok(());
  }
  std::fs::create_dir_all(dir).map_err(|e| {
    format!(
      "Failed to create {} directory at {}: {}",
      name,
      dir.display(),
      e
    )
  })
}
