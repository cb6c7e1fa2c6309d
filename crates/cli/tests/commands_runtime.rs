use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use attire_cli::commands::{
    clear, config, doctor, export, feedback, import, insights, recommend, seasonal,
};
use attire_cli::runtime::GlobalOptions;
use serde_json::Value;
use tempfile::TempDir;

const SNOWY_SNAPSHOT: &str = r#"{
  "location": "Tromsø",
  "current": {
    "temperature": -2,
    "high": 0,
    "low": -6,
    "condition": "Snow",
    "humidity": 85,
    "windSpeed": 12
  },
  "forecast": [
    { "day": "Mon", "temperature": -2, "condition": "Snow" },
    { "day": "Tue", "temperature": -4, "condition": "Snow" },
    { "day": "Wed", "temperature": -1, "condition": "Cloudy" }
  ]
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("temp dir") }
    }

    fn database_url(&self) -> String {
        format!("sqlite://{}", self.dir.path().join("attire.db").display())
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn snapshot(&self) -> PathBuf {
        self.write("weather.json", SNOWY_SNAPSHOT)
    }
}

#[test]
fn recommend_returns_report_for_snowy_weather() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let result = recommend::run(&GlobalOptions::default(), &workspace.snapshot(), None, None);
        assert_eq!(result.exit_code, 0, "unexpected failure: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["location"], "Tromsø");
        assert_eq!(payload["data"]["outfit"]["clothing"], "hoodie");

        let items = recommended_items(&payload);
        for expected in ["Heavy winter coat", "Winter hat", "Insulated gloves", "Winter boots"] {
            assert!(items.iter().any(|item| item == expected), "{expected} missing from {items:?}");
        }
    });
}

#[test]
fn recommend_rejects_malformed_snapshots() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let weather = workspace.write("broken.json", "{\"current\": {}}");
        let result = recommend::run(&GlobalOptions::default(), &weather, None, None);

        assert_eq!(result.exit_code, 4);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_input");
    });
}

#[test]
fn recommend_rejects_out_of_range_context() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let result = recommend::run(&GlobalOptions::default(), &workspace.snapshot(), Some(1.5), None);

        assert_eq!(result.exit_code, 4);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_input");
    });
}

#[test]
fn invalid_backend_is_a_config_failure() {
    with_env(&[("ATTIRE_STORAGE_BACKEND", "postgres")], || {
        let result = insights::run(&GlobalOptions::default());

        assert_eq!(result.exit_code, 2);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "insights");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn feedback_is_persisted_between_invocations() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let options = GlobalOptions::default();
        let weather = workspace.snapshot();

        let first = feedback::run(&options, &weather, "Winter hat", "like", None, None);
        assert_eq!(first.exit_code, 0, "unexpected failure: {}", first.output);
        let second = feedback::run(&options, &weather, "winter hat", "worn", None, None);
        assert_eq!(second.exit_code, 0, "unexpected failure: {}", second.output);

        let receipt = parse_payload(&second.output);
        assert_eq!(receipt["data"]["entry"]["feedback"], "worn");
        let preference = receipt["data"]["itemPreference"].as_f64().expect("preference");
        assert!(preference > 1.1, "two positive signals should compound, got {preference}");

        let summary = parse_payload(&insights::run(&options).output);
        assert_eq!(summary["data"]["dataPoints"], 2);

        let exported = parse_payload(&export::run(&options, None).output);
        let history = exported["data"]["feedbackHistory"].as_array().expect("history array");
        assert_eq!(history.len(), 2);
    });
}

#[test]
fn feedback_rejects_unknown_kinds_and_items() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let options = GlobalOptions::default();
        let weather = workspace.snapshot();

        let bad_kind = feedback::run(&options, &weather, "Winter hat", "meh", None, None);
        assert_eq!(bad_kind.exit_code, 4);

        let bad_item = feedback::run(&options, &weather, "Flip-flops", "like", None, None);
        assert_eq!(bad_item.exit_code, 4);
        let message = parse_payload(&bad_item.output)["message"].as_str().unwrap_or_default().to_string();
        assert!(message.contains("Winter hat"), "offered items should be listed: {message}");
    });
}

#[test]
fn feedback_scores_with_the_recommend_context() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let options = GlobalOptions::default();
        let weather = workspace.snapshot();

        let out_of_range = feedback::run(&options, &weather, "Winter hat", "like", Some(1.5), None);
        assert_eq!(out_of_range.exit_code, 4);
        assert_eq!(parse_payload(&out_of_range.output)["error_class"], "invalid_input");
        assert_eq!(parse_payload(&insights::run(&options).output)["data"]["dataPoints"], 0);

        let shown = parse_payload(&recommend::run(&options, &weather, Some(0.9), Some(0.2)).output);
        let hat = shown["data"]["recommendations"]
            .as_array()
            .and_then(|items| items.iter().find(|item| item["item"] == "Winter hat"))
            .cloned()
            .expect("winter hat recommended");

        let recorded = feedback::run(&options, &weather, "Winter hat", "like", Some(0.9), Some(0.2));
        assert_eq!(recorded.exit_code, 0, "unexpected failure: {}", recorded.output);
        let entry = &parse_payload(&recorded.output)["data"]["entry"];
        assert_eq!(entry["recommendation"]["confidence"], hat["confidence"]);
        assert_eq!(entry["recommendation"]["category"], hat["category"]);
    });
}

#[test]
fn seasonal_patterns_need_enough_observations() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let options = GlobalOptions::default();
        let weather = workspace.snapshot();

        let early = parse_payload(&seasonal::run(&options).output);
        assert_eq!(early["status"], "ok");
        assert!(early.get("data").is_none());

        for _ in 0..5 {
            assert_eq!(recommend::run(&options, &weather, None, None).exit_code, 0);
        }

        let pattern = parse_payload(&seasonal::run(&options).output);
        assert_eq!(pattern["data"]["dataPoints"], 5);
        assert_eq!(pattern["data"]["rainFrequency"], 1.0);
    });
}

#[test]
fn clear_requires_confirmation_and_export_survives_import() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let options = GlobalOptions::default();
        let weather = workspace.snapshot();
        assert_eq!(feedback::run(&options, &weather, "Winter hat", "like", None, None).exit_code, 0);

        let export_path = workspace.dir.path().join("export.json");
        assert_eq!(export::run(&options, Some(&export_path)).exit_code, 0);

        assert_eq!(clear::run(&options, false).exit_code, 4);
        assert_eq!(clear::run(&options, true).exit_code, 0);
        assert_eq!(parse_payload(&insights::run(&options).output)["data"]["dataPoints"], 0);

        let restored = import::run(&options, &export_path);
        assert_eq!(restored.exit_code, 0, "unexpected failure: {}", restored.output);
        let summary = parse_payload(&restored.output);
        assert_eq!(summary["data"]["success"], true);
        assert_eq!(summary["data"]["dataPoints"], 1);
    });
}

#[test]
fn import_rejects_malformed_documents() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let input = workspace.write("import.json", "\"not an export\"");
        let result = import::run(&GlobalOptions::default(), &input);

        assert_eq!(result.exit_code, 4);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_input");
    });
}

#[test]
fn memory_backend_needs_no_database() {
    let workspace = Workspace::new();
    with_env(&[("ATTIRE_STORAGE_BACKEND", "memory")], || {
        let result = recommend::run(&GlobalOptions::default(), &workspace.snapshot(), None, None);
        assert_eq!(result.exit_code, 0, "unexpected failure: {}", result.output);
        assert!(!workspace.dir.path().join("attire.db").exists());
    });
}

#[test]
fn config_reports_env_sources() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let output = config::run(&GlobalOptions::default());

        let expected_url = format!(
            "- storage.url = {} (source: env (ATTIRE_STORAGE_URL))",
            workspace.database_url()
        );
        assert!(output.contains(&expected_url), "missing url line in:\n{output}");
        assert!(output.contains("- logging.level = warn (source: default)"));
    });
}

#[test]
fn config_reports_flag_sources() {
    with_env(&[], || {
        let options = GlobalOptions { log_level: Some("debug".to_string()), ..GlobalOptions::default() };
        let output = config::run(&options);

        assert!(output.contains("- logging.level = debug (source: flag)"), "{output}");
    });
}

#[test]
fn doctor_passes_against_fresh_sqlite_database() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        let report: Value =
            serde_json::from_str(&doctor::run(&GlobalOptions::default(), true)).expect("doctor json");

        assert_eq!(report["overall_status"], "pass");
        let names: Vec<&str> = report["checks"]
            .as_array()
            .expect("checks")
            .iter()
            .filter_map(|check| check["name"].as_str())
            .collect();
        assert_eq!(names, vec!["config_validation", "storage_connectivity", "document_integrity"]);
    });
}

#[test]
fn doctor_warns_about_corrupt_documents() {
    let workspace = Workspace::new();
    with_sqlite_env(&workspace, || {
        {
            let store = attire_db::SqlitePreferenceStore::open(&workspace.database_url(), 1, 5)
                .expect("open store");
            attire_core::PreferenceStore::set(
                &store,
                attire_core::StoreKey::ModelWeights,
                "{not json",
            )
            .expect("seed corrupt document");
        }

        let human = doctor::run(&GlobalOptions::default(), false);
        assert!(human.contains("[warn] document_integrity"), "{human}");
        assert!(human.contains("ml_model_weights"), "{human}");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn recommended_items(payload: &Value) -> Vec<String> {
    payload["data"]["recommendations"]
        .as_array()
        .map(|items| {
            items.iter().filter_map(|item| item["item"].as_str().map(str::to_string)).collect()
        })
        .unwrap_or_default()
}

fn with_sqlite_env(workspace: &Workspace, test_fn: impl FnOnce()) {
    let url = workspace.database_url();
    with_env(&[("ATTIRE_STORAGE_BACKEND", "sqlite"), ("ATTIRE_STORAGE_URL", url.as_str())], test_fn);
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "ATTIRE_STORAGE_BACKEND",
        "ATTIRE_STORAGE_URL",
        "ATTIRE_DATABASE_URL",
        "ATTIRE_STORAGE_MAX_CONNECTIONS",
        "ATTIRE_STORAGE_TIMEOUT_SECS",
        "ATTIRE_LEARNING_RATE",
        "ATTIRE_LEARNING_NEIGHBOR_DECAY",
        "ATTIRE_LEARNING_PROFILE_HISTORY_LIMIT",
        "ATTIRE_LEARNING_INSIGHT_MIN_FEEDBACK",
        "ATTIRE_ANALYSIS_HISTORY_LIMIT",
        "ATTIRE_ANALYSIS_SEASONAL_MIN_ENTRIES",
        "ATTIRE_LOGGING_LEVEL",
        "ATTIRE_LOGGING_FORMAT",
        "ATTIRE_LOG_LEVEL",
        "ATTIRE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(test_fn));

    for (key, value) in previous_values {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }

    if let Err(panic) = outcome {
        std::panic::resume_unwind(panic);
    }
}
