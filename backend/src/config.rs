//! Runtime configuration loaded via OrthoConfig.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "recky-store.json";
const DEFAULT_LOG_FILTER: &str = "info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Configuration values for the `recky` binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECKY")]
pub struct ReckySettings {
    /// Path of the JSON document store snapshot.
    pub store_path: Option<String>,
    /// `text` or `json`.
    pub log_format: Option<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl ReckySettings {
    /// Return the configured snapshot path, falling back to the default.
    pub fn store_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.store_path.as_deref().unwrap_or(DEFAULT_STORE_PATH))
    }

    /// Return the log format; anything other than `json` means text.
    pub fn log_format(&self) -> LogFormat {
        match self.log_format.as_deref().map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    /// Return the configured log filter, falling back to the default.
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
