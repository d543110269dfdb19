use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "retailscope.toml";

/// Upper bound for any single collection size.
const MAX_COLLECTION: usize = 1_000_000;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub output_dir: PathBuf,
    /// Clock every relative date is anchored to; also stamped as
    /// `metadata.generated`.
    pub reference_time: DateTime<Utc>,
    pub version: String,
    pub counts: DatasetCounts,
    /// Only the first N stores carry inventory.
    pub inventory_store_limit: usize,
    pub inventory_items_min: usize,
    pub inventory_items_max: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCounts {
    pub suppliers: usize,
    pub stores: usize,
    pub products: usize,
    pub customers: usize,
    pub employees: usize,
    pub sales: usize,
    pub returns: usize,
    pub footfall: usize,
    pub marketing: usize,
    pub finance: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub window_days: u32,
    pub top_products_limit: usize,
    pub alert_limit: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
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
    pub seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub reference_time: Option<DateTime<Utc>>,
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

impl Default for DatasetCounts {
    fn default() -> Self {
        Self {
            suppliers: 120,
            stores: 500,
            products: 1500,
            customers: 800,
            employees: 200,
            sales: 2000,
            returns: 150,
            footfall: 300,
            marketing: 150,
            finance: 100,
        }
    }
}

/// 2025-01-01T00:00:00Z.
pub fn default_reference_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 0).single().unwrap_or_default()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            output_dir: PathBuf::from("data"),
            reference_time: default_reference_time(),
            version: "1.0.0".to_string(),
            counts: DatasetCounts::default(),
            inventory_store_limit: 20,
            inventory_items_min: 200,
            inventory_items_max: 500,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            dashboard: DashboardConfig { window_days: 90, top_products_limit: 10, alert_limit: 3 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
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

pub fn parse_reference_time(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            ConfigError::Validation(format!(
                "generator.reference_time `{value}` is not an RFC 3339 timestamp"
            ))
        })
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(generator) = patch.generator {
            if let Some(seed) = generator.seed {
                self.generator.seed = seed;
            }
            if let Some(output_dir) = generator.output_dir {
                self.generator.output_dir = output_dir;
            }
            if let Some(reference_time) = generator.reference_time {
                self.generator.reference_time = parse_reference_time(&reference_time)?;
            }
            if let Some(version) = generator.version {
                self.generator.version = version;
            }
            if let Some(limit) = generator.inventory_store_limit {
                self.generator.inventory_store_limit = limit;
            }
            if let Some(min) = generator.inventory_items_min {
                self.generator.inventory_items_min = min;
            }
            if let Some(max) = generator.inventory_items_max {
                self.generator.inventory_items_max = max;
            }
            if let Some(counts) = generator.counts {
                counts.apply(&mut self.generator.counts);
            }
        }

        if let Some(dashboard) = patch.dashboard {
            if let Some(window_days) = dashboard.window_days {
                self.dashboard.window_days = window_days;
            }
            if let Some(limit) = dashboard.top_products_limit {
                self.dashboard.top_products_limit = limit;
            }
            if let Some(limit) = dashboard.alert_limit {
                self.dashboard.alert_limit = limit;
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

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("RETAILSCOPE_GENERATOR_SEED") {
            self.generator.seed = parse_u64("RETAILSCOPE_GENERATOR_SEED", &value)?;
        }
        if let Some(value) = read_env("RETAILSCOPE_GENERATOR_OUTPUT_DIR") {
            self.generator.output_dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("RETAILSCOPE_GENERATOR_REFERENCE_TIME") {
            self.generator.reference_time = parse_reference_time(&value).map_err(|_| {
                ConfigError::InvalidEnvOverride {
                    key: "RETAILSCOPE_GENERATOR_REFERENCE_TIME".to_string(),
                    value: value.clone(),
                }
            })?;
        }

        if let Some(value) = read_env("RETAILSCOPE_DASHBOARD_WINDOW_DAYS") {
            self.dashboard.window_days = parse_u32("RETAILSCOPE_DASHBOARD_WINDOW_DAYS", &value)?;
        }

        let log_level =
            read_env("RETAILSCOPE_LOGGING_LEVEL").or_else(|| read_env("RETAILSCOPE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("RETAILSCOPE_LOGGING_FORMAT").or_else(|| read_env("RETAILSCOPE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(seed) = overrides.seed {
            self.generator.seed = seed;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.generator.output_dir = output_dir;
        }
        if let Some(reference_time) = overrides.reference_time {
            self.generator.reference_time = reference_time;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_generator(&self.generator)?;
        validate_dashboard(&self.dashboard)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(CONFIG_FILE_NAME), PathBuf::from("config").join(CONFIG_FILE_NAME)]
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

fn validate_generator(generator: &GeneratorConfig) -> Result<(), ConfigError> {
    let counts = &generator.counts;
    let sized = [
        ("suppliers", counts.suppliers),
        ("stores", counts.stores),
        ("products", counts.products),
        ("customers", counts.customers),
        ("employees", counts.employees),
        ("sales", counts.sales),
        ("returns", counts.returns),
        ("footfall", counts.footfall),
        ("marketing", counts.marketing),
        ("finance", counts.finance),
    ];
    if let Some((name, _)) = sized.iter().find(|(_, count)| *count > MAX_COLLECTION) {
        return Err(ConfigError::Validation(format!(
            "generator.counts.{name} must be at most {MAX_COLLECTION}"
        )));
    }

    let store_children = [
        ("customers", counts.customers),
        ("employees", counts.employees),
        ("sales", counts.sales),
        ("footfall", counts.footfall),
    ];
    if counts.stores == 0 {
        if let Some((name, _)) = store_children.iter().find(|(_, count)| *count > 0) {
            return Err(ConfigError::Validation(format!(
                "generator.counts.stores must be greater than zero when {name} are generated"
            )));
        }
    }
    if counts.products > 0 && counts.suppliers == 0 {
        return Err(ConfigError::Validation(
            "generator.counts.suppliers must be greater than zero when products are generated"
                .to_string(),
        ));
    }
    if counts.sales > 0 && counts.products == 0 {
        return Err(ConfigError::Validation(
            "generator.counts.products must be greater than zero when sales are generated"
                .to_string(),
        ));
    }
    if counts.returns > 0 && counts.sales == 0 {
        return Err(ConfigError::Validation(
            "generator.counts.sales must be greater than zero when returns are generated"
                .to_string(),
        ));
    }

    if generator.inventory_items_min > generator.inventory_items_max {
        return Err(ConfigError::Validation(
            "generator.inventory_items_min must not exceed generator.inventory_items_max"
                .to_string(),
        ));
    }
    if generator.inventory_items_max > MAX_COLLECTION {
        return Err(ConfigError::Validation(format!(
            "generator.inventory_items_max must be at most {MAX_COLLECTION}"
        )));
    }

    if generator.version.trim().is_empty() {
        return Err(ConfigError::Validation("generator.version must not be empty".to_string()));
    }

    Ok(())
}

fn validate_dashboard(dashboard: &DashboardConfig) -> Result<(), ConfigError> {
    if dashboard.window_days == 0 || dashboard.window_days > 3650 {
        return Err(ConfigError::Validation(
            "dashboard.window_days must be in range 1..=3650".to_string(),
        ));
    }

    if dashboard.top_products_limit == 0 {
        return Err(ConfigError::Validation(
            "dashboard.top_products_limit must be greater than zero".to_string(),
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

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    generator: Option<GeneratorPatch>,
    dashboard: Option<DashboardPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct GeneratorPatch {
    seed: Option<u64>,
    output_dir: Option<PathBuf>,
    reference_time: Option<String>,
    version: Option<String>,
    inventory_store_limit: Option<usize>,
    inventory_items_min: Option<usize>,
    inventory_items_max: Option<usize>,
    counts: Option<CountsPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CountsPatch {
    suppliers: Option<usize>,
    stores: Option<usize>,
    products: Option<usize>,
    customers: Option<usize>,
    employees: Option<usize>,
    sales: Option<usize>,
    returns: Option<usize>,
    footfall: Option<usize>,
    marketing: Option<usize>,
    finance: Option<usize>,
}

impl CountsPatch {
    fn apply(self, counts: &mut DatasetCounts) {
        let slots = [
            (self.suppliers, &mut counts.suppliers),
            (self.stores, &mut counts.stores),
            (self.products, &mut counts.products),
            (self.customers, &mut counts.customers),
            (self.employees, &mut counts.employees),
            (self.sales, &mut counts.sales),
            (self.returns, &mut counts.returns),
            (self.footfall, &mut counts.footfall),
            (self.marketing, &mut counts.marketing),
            (self.finance, &mut counts.finance),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DashboardPatch {
    window_days: Option<u32>,
    top_products_limit: Option<usize>,
    alert_limit: Option<usize>,
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
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

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
    fn defaults_match_reference_generator_volumes() -> Result<(), String> {
        let config = AppConfig::default();
        ensure(config.generator.seed == 42, "default seed should be 42")?;
        ensure(config.generator.counts.stores == 500, "default store count should be 500")?;
        ensure(config.generator.counts.sales == 2000, "default sale count should be 2000")?;
        ensure(config.generator.inventory_store_limit == 20, "inventory covers 20 stores")?;
        ensure(
            config.generator.reference_time == Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            "default reference time should be 2025-01-01",
        )?;
        ensure(config.validate().is_ok(), "defaults should validate")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_RETAILSCOPE_SEED", "7");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("retailscope.toml");
            fs::write(
                &path,
                r#"
[generator]
seed = ${TEST_RETAILSCOPE_SEED}
reference_time = "2024-06-30T12:00:00Z"

[generator.counts]
sales = 25
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.generator.seed == 7, "seed should be interpolated from environment")?;
            ensure(config.generator.counts.sales == 25, "sales count should come from file")?;
            ensure(config.generator.counts.stores == 500, "unset counts keep their defaults")?;
            ensure(
                config.generator.reference_time
                    == Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap(),
                "reference time should be parsed from file",
            )
        })();

        clear_vars(&["TEST_RETAILSCOPE_SEED"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("RETAILSCOPE_LOG_LEVEL", "warn");
        env::set_var("RETAILSCOPE_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(&["RETAILSCOPE_LOG_LEVEL", "RETAILSCOPE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("RETAILSCOPE_GENERATOR_OUTPUT_DIR", "from-env");
        env::set_var("RETAILSCOPE_GENERATOR_SEED", "99");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("retailscope.toml");
            fs::write(
                &path,
                r#"
[generator]
seed = 1
output_dir = "from-file"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    output_dir: Some(PathBuf::from("from-override")),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.generator.output_dir == PathBuf::from("from-override"),
                "override output dir should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.generator.seed == 99, "env seed should win over file and defaults")
        })();

        clear_vars(&["RETAILSCOPE_GENERATOR_OUTPUT_DIR", "RETAILSCOPE_GENERATOR_SEED"]);
        result
    }

    #[test]
    fn invalid_env_override_is_reported_with_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("RETAILSCOPE_GENERATOR_SEED", "forty-two");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("expected env override failure".to_string()),
                Err(error) => error,
            };
            ensure(
                matches!(
                    error,
                    ConfigError::InvalidEnvOverride { ref key, .. }
                        if key == "RETAILSCOPE_GENERATOR_SEED"
                ),
                "error should name the offending variable",
            )
        })();

        clear_vars(&["RETAILSCOPE_GENERATOR_SEED"]);
        result
    }

    #[test]
    fn validation_fails_fast_when_children_lack_parents() -> Result<(), String> {
        let mut config = AppConfig::default();
        config.generator.counts.stores = 0;

        let error = match config.validate() {
            Ok(()) => return Err("expected validation failure".to_string()),
            Err(error) => error,
        };
        ensure(
            matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("counts.stores")
            ),
            "validation failure should mention counts.stores",
        )
    }

    #[test]
    fn inverted_inventory_range_is_rejected() -> Result<(), String> {
        let mut config = AppConfig::default();
        config.generator.inventory_items_min = 600;

        ensure(
            matches!(
                config.validate(),
                Err(ConfigError::Validation(ref message))
                    if message.contains("inventory_items_min")
            ),
            "validation failure should mention inventory_items_min",
        )
    }

    #[test]
    fn missing_required_file_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("absent.toml");
        let result = AppConfig::load(LoadOptions {
            config_path: Some(path.clone()),
            require_file: true,
            ..LoadOptions::default()
        });
        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(ref missing)) if *missing == path),
            "missing file should be reported with its path",
        )
    }
}
