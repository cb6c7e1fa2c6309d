use attire_core::config::{AppConfig, StorageBackend};
use attire_core::store::{PreferenceStore, StoreKey};
use attire_db::SqlitePreferenceStore;
use serde::Serialize;

use crate::runtime::GlobalOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: &GlobalOptions, json_output: bool) -> String {
    let report = build_report(options);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
}

fn build_report(options: &GlobalOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options.load_options()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_storage(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("storage_connectivity", "configuration did not load"));
            checks.push(skipped("document_integrity", "configuration did not load"));
        }
    }

    let any_fail = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_fail { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_fail {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_storage(config: &AppConfig) -> Vec<DoctorCheck> {
    if config.storage.backend == StorageBackend::Memory {
        return vec![
            DoctorCheck {
                name: "storage_connectivity",
                status: CheckStatus::Warn,
                details: "memory backend selected; learned data is discarded on exit".to_string(),
            },
            skipped("document_integrity", "the memory backend starts empty"),
        ];
    }

    let store = match SqlitePreferenceStore::open(
        &config.storage.url,
        config.storage.max_connections,
        config.storage.timeout_secs,
    ) {
        Ok(store) => store,
        Err(error) => {
            return vec![
                DoctorCheck {
                    name: "storage_connectivity",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
                skipped("document_integrity", "storage is unreachable"),
            ];
        }
    };

    vec![
        DoctorCheck {
            name: "storage_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}` with migrations applied", config.storage.url),
        },
        check_documents(&store),
    ]
}

/// Corrupt documents are recoverable (they load as defaults), so they only warn.
fn check_documents(store: &SqlitePreferenceStore) -> DoctorCheck {
    let mut present = 0;
    let mut corrupt = Vec::new();

    for key in StoreKey::ALL {
        match store.get(key) {
            Ok(Some(raw)) => {
                present += 1;
                if serde_json::from_str::<serde_json::Value>(&raw).is_err() {
                    corrupt.push(key.as_str());
                }
            }
            Ok(None) => {}
            Err(error) => {
                return DoctorCheck {
                    name: "document_integrity",
                    status: CheckStatus::Fail,
                    details: format!("failed to read `{key}`: {error}"),
                };
            }
        }
    }

    if corrupt.is_empty() {
        DoctorCheck {
            name: "document_integrity",
            status: CheckStatus::Pass,
            details: format!("{present} of {} documents stored, all readable", StoreKey::ALL.len()),
        }
    } else {
        DoctorCheck {
            name: "document_integrity",
            status: CheckStatus::Warn,
            details: format!("unreadable documents will load as defaults: {}", corrupt.join(", ")),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
