/// Application configuration, stored as JSON beside the executable.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "quill-pad.json";

/// User-facing settings. Unknown or missing fields fall back to their
/// defaults, so config files from older versions keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Max undo snapshots kept per document.
    pub max_history_depth: usize,
    /// Whether undo history is restored from disk on open.
    pub restore_history: bool,
    /// Dimensions pre-filled in the table-insertion prompt.
    pub default_table_rows: usize,
    pub default_table_cols: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_history_depth: 10_000,
            restore_history: true,
            default_table_rows: 2,
            default_table_cols: 2,
        }
    }
}

impl AppConfig {
    /// Loads the config from `path`, creating it with defaults if absent.
    ///
    /// A file that exists but fails to parse is left untouched on disk and
    /// defaults are used for the session, so a hand-edited config is never
    /// silently overwritten.
    pub fn load_or_create(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Self>(&raw) {
                Ok(config) => config.sanitized(),
                Err(error) => {
                    tracing::warn!(%error, path = %path.display(), "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                let config = Self::default();
                if let Err(error) = config.save(path) {
                    tracing::warn!(%error, path = %path.display(), "failed to write default config");
                }
                config
            }
        }
    }

    /// Writes the config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Clamps out-of-range values back to usable ones.
    fn sanitized(mut self) -> Self {
        if self.max_history_depth == 0 {
            self.max_history_depth = Self::default().max_history_depth;
        }
        self.default_table_rows = self.default_table_rows.max(1);
        self.default_table_cols = self.default_table_cols.max(1);
        self
    }
}

/// Path of the config file, next to the executable.
pub fn config_path() -> PathBuf {
    let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
    exe.parent().unwrap_or(Path::new(".")).join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.max_history_depth, 10_000);
        assert!(config.restore_history);
        assert_eq!(config.default_table_rows, 2);
        assert_eq!(config.default_table_cols, 2);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"max_history_depth": 50}"#).unwrap();
        assert_eq!(config.max_history_depth, 50);
        assert!(config.restore_history);
        assert_eq!(config.default_table_rows, 2);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config: AppConfig =
            serde_json::from_str(r#"{"restore_history": false, "theme": "dark"}"#).unwrap();
        assert!(!config.restore_history);
    }

    #[test]
    fn test_sanitized_clamps_zero_dimensions() {
        let config = AppConfig {
            max_history_depth: 0,
            restore_history: true,
            default_table_rows: 0,
            default_table_cols: 0,
        }
        .sanitized();
        assert_eq!(config.max_history_depth, 10_000);
        assert_eq!(config.default_table_rows, 1);
        assert_eq!(config.default_table_cols, 1);
    }
}
