use std::env;
use std::fs;
use std::path::Path;

use tapparelle_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let entries = [
        (
            "catalog.base_url",
            config.catalog.base_url.clone(),
            source("catalog.base_url", &["TAPPARELLE_CATALOG_BASE_URL", "API_URL"]),
        ),
        (
            "catalog.read_timeout_secs",
            config.catalog.read_timeout_secs.to_string(),
            source("catalog.read_timeout_secs", &["TAPPARELLE_CATALOG_READ_TIMEOUT_SECS"]),
        ),
        (
            "catalog.write_timeout_secs",
            config.catalog.write_timeout_secs.to_string(),
            source("catalog.write_timeout_secs", &["TAPPARELLE_CATALOG_WRITE_TIMEOUT_SECS"]),
        ),
        (
            "dialogue.max_slot_retries",
            config.dialogue.max_slot_retries.to_string(),
            source("dialogue.max_slot_retries", &["TAPPARELLE_DIALOGUE_MAX_SLOT_RETRIES"]),
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            source("logging.level", &["TAPPARELLE_LOGGING_LEVEL", "TAPPARELLE_LOG_LEVEL"]),
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            source("logging.format", &["TAPPARELLE_LOGGING_FORMAT", "TAPPARELLE_LOG_FORMAT"]),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(entries.iter().map(|(key, value, source)| render_line(key, value, source)));
    lines.join("\n")
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
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
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

fn render_line(key: &str, value: &str, source: &str) -> String {
    format!("- {key} = {value} (source: {source})")
}
