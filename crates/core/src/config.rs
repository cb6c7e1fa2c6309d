use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::learning::{
    INSIGHT_MIN_FEEDBACK, LEARNING_RATE, NEIGHBOR_DECAY, PROFILE_HISTORY_LIMIT,
};
use crate::weather::{DEFAULT_HISTORY_LIMIT, SEASONAL_MIN_ENTRIES};

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub learning: LearningConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LearningConfig {
    pub learning_rate: f64,
    pub neighbor_decay: f64,
    pub profile_history_limit: usize,
    pub insight_min_feedback: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub history_limit: usize,
    pub seasonal_min_entries: usize,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub storage_backend: Option<StorageBackend>,
    pub storage_url: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            url: "sqlite://attire.db".to_string(),
            max_connections: 1,
            timeout_secs: 30,
        }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: LEARNING_RATE,
            neighbor_decay: NEIGHBOR_DECAY,
            profile_history_limit: PROFILE_HISTORY_LIMIT,
            insight_min_feedback: INSIGHT_MIN_FEEDBACK,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { history_limit: DEFAULT_HISTORY_LIMIT, seasonal_min_entries: SEASONAL_MIN_ENTRIES }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::Compact }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::Validation(format!(
                "unsupported storage backend `{other}` (expected memory|sqlite)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("attire.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(storage) = patch.storage {
            if let Some(backend) = storage.backend {
                self.storage.backend = backend;
            }
            if let Some(url) = storage.url {
                self.storage.url = url;
            }
            if let Some(max_connections) = storage.max_connections {
                self.storage.max_connections = max_connections;
            }
            if let Some(timeout_secs) = storage.timeout_secs {
                self.storage.timeout_secs = timeout_secs;
            }
        }

        if let Some(learning) = patch.learning {
            if let Some(learning_rate) = learning.learning_rate {
                self.learning.learning_rate = learning_rate;
            }
            if let Some(neighbor_decay) = learning.neighbor_decay {
                self.learning.neighbor_decay = neighbor_decay;
            }
            if let Some(profile_history_limit) = learning.profile_history_limit {
                self.learning.profile_history_limit = profile_history_limit;
            }
            if let Some(insight_min_feedback) = learning.insight_min_feedback {
                self.learning.insight_min_feedback = insight_min_feedback;
            }
        }

        if let Some(analysis) = patch.analysis {
            if let Some(history_limit) = analysis.history_limit {
                self.analysis.history_limit = history_limit;
            }
            if let Some(seasonal_min_entries) = analysis.seasonal_min_entries {
                self.analysis.seasonal_min_entries = seasonal_min_entries;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ATTIRE_STORAGE_BACKEND") {
            self.storage.backend = value.parse()?;
        }
        let storage_url = read_env("ATTIRE_STORAGE_URL").or_else(|| read_env("ATTIRE_DATABASE_URL"));
        if let Some(value) = storage_url {
            self.storage.url = value;
        }
        if let Some(value) = read_env("ATTIRE_STORAGE_MAX_CONNECTIONS") {
            self.storage.max_connections = parse_u32("ATTIRE_STORAGE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("ATTIRE_STORAGE_TIMEOUT_SECS") {
            self.storage.timeout_secs = parse_u64("ATTIRE_STORAGE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("ATTIRE_LEARNING_RATE") {
            self.learning.learning_rate = parse_f64("ATTIRE_LEARNING_RATE", &value)?;
        }
        if let Some(value) = read_env("ATTIRE_LEARNING_NEIGHBOR_DECAY") {
            self.learning.neighbor_decay = parse_f64("ATTIRE_LEARNING_NEIGHBOR_DECAY", &value)?;
        }
        if let Some(value) = read_env("ATTIRE_LEARNING_PROFILE_HISTORY_LIMIT") {
            self.learning.profile_history_limit =
                parse_usize("ATTIRE_LEARNING_PROFILE_HISTORY_LIMIT", &value)?;
        }
        if let Some(value) = read_env("ATTIRE_LEARNING_INSIGHT_MIN_FEEDBACK") {
            self.learning.insight_min_feedback =
                parse_usize("ATTIRE_LEARNING_INSIGHT_MIN_FEEDBACK", &value)?;
        }

        if let Some(value) = read_env("ATTIRE_ANALYSIS_HISTORY_LIMIT") {
            self.analysis.history_limit = parse_usize("ATTIRE_ANALYSIS_HISTORY_LIMIT", &value)?;
        }
        if let Some(value) = read_env("ATTIRE_ANALYSIS_SEASONAL_MIN_ENTRIES") {
            self.analysis.seasonal_min_entries =
                parse_usize("ATTIRE_ANALYSIS_SEASONAL_MIN_ENTRIES", &value)?;
        }

        let log_level = read_env("ATTIRE_LOGGING_LEVEL").or_else(|| read_env("ATTIRE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ATTIRE_LOGGING_FORMAT").or_else(|| read_env("ATTIRE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.storage_backend {
            self.storage.backend = backend;
        }
        if let Some(url) = overrides.storage_url {
            self.storage.url = url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_storage(&self.storage)?;
        validate_learning(&self.learning)?;
        validate_analysis(&self.analysis)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Config file that [`AppConfig::load`] would read when no explicit path is given.
pub fn default_config_path() -> Option<PathBuf> {
    resolve_config_path(None)
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("attire.toml"), PathBuf::from("config/attire.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.backend == StorageBackend::Memory {
        return Ok(());
    }

    let url = storage.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "storage.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if storage.max_connections == 0 {
        return Err(ConfigError::Validation(
            "storage.max_connections must be greater than zero".to_string(),
        ));
    }

    if storage.timeout_secs == 0 || storage.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "storage.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_learning(learning: &LearningConfig) -> Result<(), ConfigError> {
    if !(learning.learning_rate > 0.0 && learning.learning_rate <= 1.0) {
        return Err(ConfigError::Validation(
            "learning.learning_rate must be in range (0, 1]".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&learning.neighbor_decay) {
        return Err(ConfigError::Validation(
            "learning.neighbor_decay must be in range [0, 1]".to_string(),
        ));
    }

    if learning.profile_history_limit == 0 {
        return Err(ConfigError::Validation(
            "learning.profile_history_limit must be greater than zero".to_string(),
        ));
    }

    if learning.insight_min_feedback == 0 {
        return Err(ConfigError::Validation(
            "learning.insight_min_feedback must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_analysis(analysis: &AnalysisConfig) -> Result<(), ConfigError> {
    if analysis.history_limit == 0 {
        return Err(ConfigError::Validation(
            "analysis.history_limit must be greater than zero".to_string(),
        ));
    }

    if analysis.seasonal_min_entries == 0 {
        return Err(ConfigError::Validation(
            "analysis.seasonal_min_entries must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| invalid_override(key, value))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| invalid_override(key, value))
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| invalid_override(key, value))
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .ok_or_else(|| invalid_override(key, value))
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    learning: Option<LearningPatch>,
    analysis: Option<AnalysisPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    backend: Option<StorageBackend>,
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LearningPatch {
    learning_rate: Option<f64>,
    neighbor_decay: Option<f64>,
    profile_history_limit: Option<usize>,
    insight_min_feedback: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalysisPatch {
    history_limit: Option<usize>,
    seasonal_min_entries: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, StorageBackend};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_match_pipeline_constants() -> Result<(), String> {
        let config = AppConfig::default();

        ensure(config.learning.learning_rate == 0.1, "learning rate defaults to 0.1")?;
        ensure(config.learning.neighbor_decay == 0.5, "neighbor decay defaults to 0.5")?;
        ensure(config.learning.profile_history_limit == 200, "profile history keeps 200")?;
        ensure(config.learning.insight_min_feedback == 10, "insights need 10 entries")?;
        ensure(config.analysis.history_limit == 100, "weather log keeps 100")?;
        ensure(config.analysis.seasonal_min_entries == 5, "seasonal needs 5 entries")?;
        ensure(config.validate().is_ok(), "defaults should validate")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_ATTIRE_DB", "sqlite://interpolated.db");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("attire.toml");
            fs::write(
                &path,
                r#"
[storage]
url = "${TEST_ATTIRE_DB}"

[learning]
learning_rate = 0.2
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.storage.url == "sqlite://interpolated.db",
                "storage url should be interpolated from the environment",
            )?;
            ensure(config.learning.learning_rate == 0.2, "learning rate should come from file")?;
            Ok(())
        })();

        clear_vars(&["TEST_ATTIRE_DB"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("attire.toml");
        fs::write(&path, "[storage]\nurl = \"${ATTIRE_TEST_UNSET_VARIABLE}\"\n")
            .map_err(|err| err.to_string())?;

        let result =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() });
        ensure(
            matches!(
                result,
                Err(ConfigError::MissingEnvInterpolation { ref var })
                    if var == "ATTIRE_TEST_UNSET_VARIABLE"
            ),
            "missing interpolation variable should be named in the error",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ATTIRE_LOG_LEVEL", "debug");
        env::set_var("ATTIRE_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "debug", "debug log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "json logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["ATTIRE_LOG_LEVEL", "ATTIRE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ATTIRE_STORAGE_URL", "sqlite://from-env.db");
        env::set_var("ATTIRE_ANALYSIS_HISTORY_LIMIT", "40");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("attire.toml");
            fs::write(
                &path,
                r#"
[storage]
url = "sqlite://from-file.db"
backend = "sqlite"

[analysis]
history_limit = 20
seasonal_min_entries = 3

[logging]
level = "info"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    storage_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("trace".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.storage.url == "sqlite://from-override.db",
                "override storage url should win",
            )?;
            ensure(config.logging.level == "trace", "overridden log level should be trace")?;
            ensure(config.analysis.history_limit == 40, "env history limit should beat the file")?;
            ensure(config.analysis.seasonal_min_entries == 3, "file value should beat the default")?;
            Ok(())
        })();

        clear_vars(&["ATTIRE_STORAGE_URL", "ATTIRE_ANALYSIS_HISTORY_LIMIT"]);
        result
    }

    #[test]
    fn invalid_numeric_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ATTIRE_LEARNING_RATE", "fast");

        let result = (|| -> Result<(), String> {
            let outcome = AppConfig::load(LoadOptions::default());
            ensure(
                matches!(
                    outcome,
                    Err(ConfigError::InvalidEnvOverride { ref key, .. })
                        if key == "ATTIRE_LEARNING_RATE"
                ),
                "non-numeric learning rate should be rejected",
            )
        })();

        clear_vars(&["ATTIRE_LEARNING_RATE"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ATTIRE_LEARNING_NEIGHBOR_DECAY", "1.5");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("learning.neighbor_decay")
            );
            ensure(has_message, "validation failure should mention learning.neighbor_decay")
        })();

        clear_vars(&["ATTIRE_LEARNING_NEIGHBOR_DECAY"]);
        result
    }

    #[test]
    fn memory_backend_skips_url_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                storage_backend: Some(StorageBackend::Memory),
                storage_url: Some("not-a-url".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.storage.backend == StorageBackend::Memory, "memory backend should be set")
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let missing = dir.path().join("absent.toml");

        let outcome = AppConfig::load(LoadOptions {
            config_path: Some(missing.clone()),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(
            matches!(outcome, Err(ConfigError::MissingConfigFile(ref path)) if *path == missing),
            "missing required file should be reported",
        )
    }
}
