use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use retailscope_core::config::{AppConfig, CONFIG_FILE_NAME};
use serde::Serialize;
use serde_json::{json, Value};
use toml::Value as TomlValue;

use crate::commands::{load_config, CommandResult, ConfigArgs};

const COMMAND: &str = "config";
const PRECEDENCE: &str = "flag > env > file > default";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EffectiveConfig {
    config_file: Option<String>,
    precedence: &'static str,
    values: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: String,
    value: Value,
    source: String,
}

pub fn run(config_args: &ConfigArgs) -> CommandResult {
    let config = match load_config(config_args, config_args.overrides()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let config_file_path = detect_config_path(config_args.config.as_deref());
    let sources = Sources {
        file_doc: load_config_file_doc(config_file_path.as_deref()),
        file_path: config_file_path.as_deref(),
    };
    let effective = EffectiveConfig {
        config_file: config_file_path.as_ref().map(|path| path.display().to_string()),
        precedence: PRECEDENCE,
        values: entries(&config, config_args, &sources),
    };

    CommandResult::success(
        COMMAND,
        format!("effective config (source precedence: {PRECEDENCE})"),
        &effective,
    )
}

fn entries(config: &AppConfig, args: &ConfigArgs, sources: &Sources<'_>) -> Vec<ConfigEntry> {
    let generator = &config.generator;
    let mut values = vec![
        sources.entry(
            "generator.seed",
            json!(generator.seed),
            &["RETAILSCOPE_GENERATOR_SEED"],
            false,
        ),
        sources.entry(
            "generator.output_dir",
            json!(generator.output_dir.display().to_string()),
            &["RETAILSCOPE_GENERATOR_OUTPUT_DIR"],
            false,
        ),
        sources.entry(
            "generator.reference_time",
            json!(generator.reference_time.to_rfc3339_opts(SecondsFormat::Secs, true)),
            &["RETAILSCOPE_GENERATOR_REFERENCE_TIME"],
            false,
        ),
        sources.entry("generator.version", json!(generator.version), &[], false),
        sources.entry(
            "generator.inventory_store_limit",
            json!(generator.inventory_store_limit),
            &[],
            false,
        ),
        sources.entry(
            "generator.inventory_items_min",
            json!(generator.inventory_items_min),
            &[],
            false,
        ),
        sources.entry(
            "generator.inventory_items_max",
            json!(generator.inventory_items_max),
            &[],
            false,
        ),
    ];

    if let Value::Object(counts) = json!(generator.counts) {
        for (name, count) in counts {
            values.push(sources.entry(&format!("generator.counts.{name}"), count, &[], false));
        }
    }

    let dashboard = &config.dashboard;
    values.extend([
        sources.entry(
            "dashboard.window_days",
            json!(dashboard.window_days),
            &["RETAILSCOPE_DASHBOARD_WINDOW_DAYS"],
            false,
        ),
        sources.entry(
            "dashboard.top_products_limit",
            json!(dashboard.top_products_limit),
            &[],
            false,
        ),
        sources.entry("dashboard.alert_limit", json!(dashboard.alert_limit), &[], false),
        sources.entry(
            "logging.level",
            json!(config.logging.level),
            &["RETAILSCOPE_LOGGING_LEVEL", "RETAILSCOPE_LOG_LEVEL"],
            args.log_level.is_some(),
        ),
        sources.entry(
            "logging.format",
            json!(config.logging.format),
            &["RETAILSCOPE_LOGGING_FORMAT", "RETAILSCOPE_LOG_FORMAT"],
            args.log_format.is_some(),
        ),
    ]);
    values
}

struct Sources<'p> {
    file_doc: Option<TomlValue>,
    file_path: Option<&'p Path>,
}

impl Sources<'_> {
    fn entry(&self, key: &str, value: Value, env_keys: &[&str], flagged: bool) -> ConfigEntry {
        ConfigEntry { key: key.to_string(), value, source: self.source(key, env_keys, flagged) }
    }

    fn source(&self, key_path: &str, env_keys: &[&str], flagged: bool) -> String {
        if flagged {
            return "flag".to_string();
        }

        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.file_doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .file_path
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from(CONFIG_FILE_NAME);
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config").join(CONFIG_FILE_NAME);
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<TomlValue> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<TomlValue>().ok()
}

fn contains_path(root: &TomlValue, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
