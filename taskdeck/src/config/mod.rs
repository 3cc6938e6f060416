//! Configuration system for the `taskdeck` CLI.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskdeck/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use crate::api::{DEFAULT_FETCH_DELAY, DEFAULT_MUTATION_DELAY, MockTaskApi};
use crate::persist::DEFAULT_STORAGE_KEY;
use crate::storage::{StorageError, validate_key};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// No data directory was configured and none could be determined.
    #[error("could not determine data directory (set --data-dir or TASKDECK_DATA_DIR)")]
    NoDataDir,

    /// The configured storage key cannot be used as a file name.
    #[error("invalid [storage] key in config: {0}")]
    InvalidStorageKey(#[source] StorageError),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    cache: CacheFileConfig,
    api: ApiFileConfig,
    ui: UiFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
    key: Option<String>,
}

/// `[cache]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct CacheFileConfig {
    expires_in_secs: Option<u64>,
}

/// `[api]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    fetch_delay_ms: Option<u64>,
    mutation_delay_ms: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    timestamp_format: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Storage --
    /// Directory holding the stored state; `None` means the platform
    /// data directory.
    pub data_dir: Option<PathBuf>,
    /// Key the task state is stored under.
    pub storage_key: String,

    // -- Cache --
    /// How long a fetched collection is served from memory.
    pub cache_expires_in: Duration,

    // -- Mock API --
    /// Simulated latency of a full fetch.
    pub fetch_delay: Duration,
    /// Simulated latency of add / update / delete.
    pub mutation_delay: Duration,

    // -- UI --
    /// Timestamp display format string (chrono).
    pub timestamp_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            cache_expires_in: Duration::from_secs(5 * 60),
            fetch_delay: DEFAULT_FETCH_DELAY,
            mutation_delay: DEFAULT_MUTATION_DELAY,
            timestamp_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. If no `--config` is given, the default path
    /// (`~/.config/taskdeck/config.toml`) is tried and silently ignored if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or if it names a storage key the file storage would reject.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file).validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        validate_key(&self.storage_key).map_err(ConfigError::InvalidStorageKey)?;
        Ok(self)
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. Separated from `load()` to enable
    /// unit testing without CLI parsing.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone()),
            storage_key: file.storage.key.clone().unwrap_or(defaults.storage_key),
            cache_expires_in: file
                .cache
                .expires_in_secs
                .map_or(defaults.cache_expires_in, Duration::from_secs),
            fetch_delay: file
                .api
                .fetch_delay_ms
                .map_or(defaults.fetch_delay, Duration::from_millis),
            mutation_delay: file
                .api
                .mutation_delay_ms
                .map_or(defaults.mutation_delay, Duration::from_millis),
            timestamp_format: cli
                .timestamp_format
                .clone()
                .or_else(|| file.ui.timestamp_format.clone())
                .unwrap_or(defaults.timestamp_format),
        }
    }

    /// Directory the file storage writes to.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoDataDir`] when nothing was configured and
    /// the platform has no data directory.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("taskdeck"))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Cache window in milliseconds, as stored in the task state.
    #[must_use]
    pub fn cache_expires_in_ms(&self) -> u64 {
        u64::try_from(self.cache_expires_in.as_millis()).unwrap_or(u64::MAX)
    }

    /// Build the mock backend with the configured delays.
    #[must_use]
    pub const fn mock_api(&self) -> MockTaskApi {
        MockTaskApi::with_delays(self.fetch_delay, self.mutation_delay)
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Local-first task manager")]
pub struct CliArgs {
    /// Directory for stored task state (default: platform data dir).
    #[arg(long, env = "TASKDECK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to config file (default: `~/.config/taskdeck/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Timestamp display format (chrono format string).
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKDECK_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskdeck.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// What to do (default: list).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands, one per user-facing task operation.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show all tasks.
    List,
    /// Create a task.
    Add {
        /// Task title.
        #[arg(short, long)]
        title: String,
        /// Task description.
        #[arg(short, long)]
        description: String,
    },
    /// Edit a task's title and/or description.
    Edit {
        /// ID of the task to edit.
        id: String,
        /// New title (keeps the current one if omitted).
        #[arg(short, long)]
        title: Option<String>,
        /// New description (keeps the current one if omitted).
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a task.
    Delete {
        /// ID of the task to delete.
        id: String,
    },
    /// Flip a task between open and completed.
    Toggle {
        /// ID of the task to toggle.
        id: String,
    },
    /// Fetch tasks from the backend (served from cache while fresh).
    Refresh,
    /// Print the stored state record.
    Show,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskdeck").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
