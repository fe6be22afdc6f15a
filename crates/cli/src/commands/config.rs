use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use docdesk_core::config::{AppConfig, LoadOptions};
use serde::Serialize;
use toml::Value;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let fields = vec![
        ConfigField {
            key: "portal.school_year_window",
            value: config.portal.school_year_window.to_string(),
            source: source("portal.school_year_window", &["DOCDESK_PORTAL_SCHOOL_YEAR_WINDOW"]),
        },
        ConfigField {
            key: "portal.reviewer_name",
            value: config.portal.reviewer_name.clone(),
            source: source("portal.reviewer_name", &["DOCDESK_PORTAL_REVIEWER_NAME"]),
        },
        ConfigField {
            key: "submission.simulated_latency_ms",
            value: config.submission.simulated_latency_ms.to_string(),
            source: source(
                "submission.simulated_latency_ms",
                &["DOCDESK_SUBMISSION_SIMULATED_LATENCY_MS"],
            ),
        },
        ConfigField {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source("logging.level", &["DOCDESK_LOGGING_LEVEL", "DOCDESK_LOG_LEVEL"]),
        },
        ConfigField {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_lowercase(),
            source: source("logging.format", &["DOCDESK_LOGGING_FORMAT", "DOCDESK_LOG_FORMAT"]),
        },
    ];

    let message = std::iter::once(
        "effective config (source precedence: env > file > default):".to_string(),
    )
    .chain(fields.iter().map(render_line))
    .collect::<Vec<_>>()
    .join("\n");

    match serde_json::to_value(&fields) {
        Ok(data) => CommandResult::success("config", message, data),
        Err(error) => CommandResult::failure("config", "serialization", error.to_string(), 1),
    }
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("docdesk.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/docdesk.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // Same lookup order as the loader: the first non-blank env key wins.
    for env_key in env_keys {
        if env::var(env_key).is_ok_and(|value| !value.trim().is_empty()) {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
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

fn render_line(field: &ConfigField) -> String {
    format!("- {} = {} (source: {})", field.key, field.value, field.source)
}
