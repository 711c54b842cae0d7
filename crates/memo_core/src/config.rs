//! Runtime configuration for the note store and shell.
//!
//! # Responsibility
//! - Resolve the backing directory pair (`<home>/.memo`, `<home>/.memo/archive`).
//! - Carry tunables shared by core and the shell (preview size, tick period,
//!   logging target).
//!
//! # Invariants
//! - The archive directory is always a direct child of the root directory.
//! - Only the home directory is resolved from the environment.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ROOT_DIR_NAME: &str = ".memo";
pub const DEFAULT_ARCHIVE_DIR_NAME: &str = "archive";
pub const DEFAULT_PREVIEW_LINE_LIMIT: usize = 128;
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Configuration shared by `FsNoteStore` and the shell event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoConfig {
    /// Directory holding Active notes directly.
    pub root_dir: PathBuf,
    /// Name of the Archive subdirectory under `root_dir`.
    pub archive_dir_name: String,
    /// Number of content lines joined into a list preview.
    pub preview_line_limit: usize,
    /// Autosave timer period.
    pub tick_period: Duration,
    /// Log level passed to `init_logging`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl MemoConfig {
    /// Default configuration rooted at `<home>/.memo`.
    ///
    /// Returns `None` when the home directory cannot be resolved.
    pub fn from_home() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_root(home.join(DEFAULT_ROOT_DIR_NAME)))
    }

    /// Default configuration rooted at an explicit directory.
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            archive_dir_name: DEFAULT_ARCHIVE_DIR_NAME.to_string(),
            preview_line_limit: DEFAULT_PREVIEW_LINE_LIMIT,
            tick_period: DEFAULT_TICK_PERIOD,
            log_level: default_log_level().to_string(),
            log_dir: default_log_dir(),
        }
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root_dir.join(&self.archive_dir_name)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}

fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("memo")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::{MemoConfig, DEFAULT_PREVIEW_LINE_LIMIT, DEFAULT_TICK_PERIOD};
    use std::path::PathBuf;

    #[test]
    fn archive_dir_is_child_of_root() {
        let config = MemoConfig::with_root("/tmp/memo-root");
        assert_eq!(config.archive_dir(), PathBuf::from("/tmp/memo-root/archive"));
    }

    #[test]
    fn defaults_match_desktop_behavior() {
        let config = MemoConfig::with_root("/tmp/memo-root");
        assert_eq!(config.preview_line_limit, DEFAULT_PREVIEW_LINE_LIMIT);
        assert_eq!(config.tick_period, DEFAULT_TICK_PERIOD);
        assert!(config.log_dir.is_absolute());
    }
}
