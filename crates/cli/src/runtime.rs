//! Shared plumbing for commands: config loading, logging, store selection.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use attire_core::config::{
    AppConfig, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig, StorageBackend, StorageConfig,
};
use attire_core::errors::{ApplicationError, StoreError};
use attire_core::recommendations::UserContext;
use attire_core::store::{InMemoryStore, PreferenceStore};
use attire_core::weather::WeatherSnapshot;
use attire_core::OutfitAdvisor;
use attire_db::{SqlitePreferenceStore, StoreBackendError};
use clap::Args;

use crate::commands::CommandResult;

pub const EXIT_SERIALIZATION: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_STORAGE: u8 = 3;
pub const EXIT_INPUT: u8 = 4;

pub type Advisor = OutfitAdvisor<Box<dyn PreferenceStore>>;

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    #[arg(long, global = true, help = "Read configuration from this TOML file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Storage backend override (memory|sqlite)")]
    pub storage: Option<StorageBackend>,
    #[arg(long, global = true, help = "Storage URL override, e.g. sqlite://attire.db")]
    pub database_url: Option<String>,
    #[arg(long, global = true, help = "Log level written to stderr")]
    pub log_level: Option<String>,
    #[arg(long, global = true, help = "Log format (compact|pretty|json)")]
    pub log_format: Option<LogFormat>,
}

impl GlobalOptions {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                storage_backend: self.storage,
                storage_url: self.database_url.clone(),
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

pub fn load_config(command: &str, options: &GlobalOptions) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options.load_options()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })
}

/// Installs the stderr subscriber. Later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    use tracing::Level;

    let log_level = config.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder =
        tracing_subscriber::fmt().with_target(false).with_max_level(log_level).with_writer(io::stderr);

    let _ = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub fn open_store(config: &StorageConfig) -> Result<Box<dyn PreferenceStore>, StoreBackendError> {
    match config.backend {
        StorageBackend::Memory => Ok(Box::new(InMemoryStore::new())),
        StorageBackend::Sqlite => {
            let store =
                SqlitePreferenceStore::open(&config.url, config.max_connections, config.timeout_secs)?;
            Ok(Box::new(store))
        }
    }
}

pub fn storage_failure(command: &str, error: StoreBackendError) -> CommandResult {
    let interface = ApplicationError::from(StoreError::from(error)).into_interface(command);
    CommandResult::failure(
        command,
        interface.error_class(),
        format!("{} ({interface})", interface.user_message()),
        EXIT_STORAGE,
    )
}

pub fn input_failure(command: &str, message: impl Into<String>) -> CommandResult {
    let interface = ApplicationError::Input(message.into()).into_interface(command);
    CommandResult::failure(command, interface.error_class(), interface.to_string(), EXIT_INPUT)
}

/// Builds the user context from optional flags, rejecting levels outside [0, 1].
pub fn user_context(
    command: &str,
    activity_level: Option<f64>,
    style_preference: Option<f64>,
) -> Result<UserContext, CommandResult> {
    for (name, value) in [("activity level", activity_level), ("style preference", style_preference)] {
        if let Some(level) = value.filter(|level| !(0.0..=1.0).contains(level)) {
            return Err(input_failure(command, format!("{name} must be within [0, 1], got {level}")));
        }
    }
    Ok(UserContext { activity_level, style_preference })
}

/// Loads config and opens the advisor over the configured store.
pub fn open_advisor(command: &str, options: &GlobalOptions) -> Result<Advisor, CommandResult> {
    let config = load_config(command, options)?;
    let store = open_store(&config.storage).map_err(|error| storage_failure(command, error))?;
    Ok(OutfitAdvisor::open(store, &config))
}

/// Reads a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw).context("failed to read stdin")?;
        return Ok(raw);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
}

pub fn read_snapshot(command: &str, path: &Path) -> Result<WeatherSnapshot, CommandResult> {
    let raw = read_input(path).map_err(|error| input_failure(command, format!("{error:#}")))?;
    WeatherSnapshot::from_json(&raw).map_err(|error| input_failure(command, error.to_string()))
}

pub fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write `{}`", path.display()))
}
