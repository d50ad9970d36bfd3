//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Store path value selecting an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub selectors: SelectorsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Excerpt store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path, or `:memory:`.
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl StoreConfig {
    /// Expanded database path; `None` means in-memory.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if self.path == IN_MEMORY {
            return None;
        }
        Some(PathBuf::from(shellexpand::tilde(&self.path).as_ref()))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String {
    "~/.acc/acc.db".to_string()
}

/// Anchor resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Delay between attempts of a retrying strategy.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Total attempts for stable-id lookup.
    #[serde(default = "default_id_attempts")]
    pub id_attempts: u32,

    /// Total attempts for positional-index lookup.
    #[serde(default = "default_index_attempts")]
    pub index_attempts: u32,

    /// How long a highlight stays before it reverts.
    #[serde(default = "default_highlight_duration_ms")]
    pub highlight_duration_ms: u64,
}

impl ResolverConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_duration_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: default_retry_delay_ms(),
            id_attempts: default_id_attempts(),
            index_attempts: default_index_attempts(),
            highlight_duration_ms: default_highlight_duration_ms(),
        }
    }
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_id_attempts() -> u32 {
    5
}

fn default_index_attempts() -> u32 {
    15
}

fn default_highlight_duration_ms() -> u64 {
    3000
}

/// Candidate selector configuration.
///
/// The order is load-bearing: positional indices recorded at save time are
/// only meaningful against the same ordered list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorsConfig {
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }
}

pub fn default_candidates() -> Vec<String> {
    [
        ".ds-markdown",
        "[data-message-author-role=\"assistant\"]",
        ".markdown-body",
        ".assistant-message",
        ".message.assistant",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Also write daily-rotated log files.
    #[serde(default = "default_true")]
    pub file: bool,

    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: default_true(),
            dir: default_log_dir(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    acc_home().join("logs")
}

/// `~/.acc`, or `./.acc` when no home directory is known.
pub fn acc_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".acc")
}

/// Where the binary looks for its config file by default.
pub fn default_config_path() -> PathBuf {
    acc_home().join("config.toml")
}
