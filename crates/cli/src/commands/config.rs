use std::env;
use std::fs;
use std::path::Path;

use attire_core::config::{default_config_path, AppConfig};
use toml::Value;

use crate::runtime::GlobalOptions;

struct FieldSpec {
    key_path: &'static str,
    env_keys: &'static [&'static str],
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec { key_path: "storage.backend", env_keys: &["ATTIRE_STORAGE_BACKEND"] },
    FieldSpec { key_path: "storage.url", env_keys: &["ATTIRE_STORAGE_URL", "ATTIRE_DATABASE_URL"] },
    FieldSpec { key_path: "storage.max_connections", env_keys: &["ATTIRE_STORAGE_MAX_CONNECTIONS"] },
    FieldSpec { key_path: "storage.timeout_secs", env_keys: &["ATTIRE_STORAGE_TIMEOUT_SECS"] },
    FieldSpec { key_path: "learning.learning_rate", env_keys: &["ATTIRE_LEARNING_RATE"] },
    FieldSpec { key_path: "learning.neighbor_decay", env_keys: &["ATTIRE_LEARNING_NEIGHBOR_DECAY"] },
    FieldSpec {
        key_path: "learning.profile_history_limit",
        env_keys: &["ATTIRE_LEARNING_PROFILE_HISTORY_LIMIT"],
    },
    FieldSpec {
        key_path: "learning.insight_min_feedback",
        env_keys: &["ATTIRE_LEARNING_INSIGHT_MIN_FEEDBACK"],
    },
    FieldSpec { key_path: "analysis.history_limit", env_keys: &["ATTIRE_ANALYSIS_HISTORY_LIMIT"] },
    FieldSpec {
        key_path: "analysis.seasonal_min_entries",
        env_keys: &["ATTIRE_ANALYSIS_SEASONAL_MIN_ENTRIES"],
    },
    FieldSpec { key_path: "logging.level", env_keys: &["ATTIRE_LOGGING_LEVEL", "ATTIRE_LOG_LEVEL"] },
    FieldSpec { key_path: "logging.format", env_keys: &["ATTIRE_LOGGING_FORMAT", "ATTIRE_LOG_FORMAT"] },
];

pub fn run(options: &GlobalOptions) -> String {
    let config = match AppConfig::load(options.load_options()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = options.config.clone().or_else(default_config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    for field in FIELDS {
        let source = if flag_overrides(options, field.key_path) {
            "flag".to_string()
        } else {
            field_source(field, config_file_doc.as_ref(), config_file_path.as_deref())
        };
        lines.push(render_line(field.key_path, &effective_value(&config, field.key_path), source));
    }

    lines.join("\n")
}

fn effective_value(config: &AppConfig, key_path: &str) -> String {
    match key_path {
        "storage.backend" => format!("{:?}", config.storage.backend),
        "storage.url" => config.storage.url.clone(),
        "storage.max_connections" => config.storage.max_connections.to_string(),
        "storage.timeout_secs" => config.storage.timeout_secs.to_string(),
        "learning.learning_rate" => config.learning.learning_rate.to_string(),
        "learning.neighbor_decay" => config.learning.neighbor_decay.to_string(),
        "learning.profile_history_limit" => config.learning.profile_history_limit.to_string(),
        "learning.insight_min_feedback" => config.learning.insight_min_feedback.to_string(),
        "analysis.history_limit" => config.analysis.history_limit.to_string(),
        "analysis.seasonal_min_entries" => config.analysis.seasonal_min_entries.to_string(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format),
        _ => "<unknown>".to_string(),
    }
}

fn flag_overrides(options: &GlobalOptions, key_path: &str) -> bool {
    match key_path {
        "storage.backend" => options.storage.is_some(),
        "storage.url" => options.database_url.is_some(),
        "logging.level" => options.log_level.is_some(),
        "logging.format" => options.log_format.is_some(),
        _ => false,
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &FieldSpec,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use super::contains_path;

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: toml::Value = "[storage]\nurl = \"sqlite://x.db\"\n".parse().expect("parse toml");
        assert!(contains_path(&doc, "storage.url"));
        assert!(!contains_path(&doc, "storage.backend"));
        assert!(!contains_path(&doc, "logging.level"));
    }
}
