pub mod config;
pub mod generate;
pub mod report;
pub mod verify;

use std::path::PathBuf;

use clap::Args;
use retailscope_core::config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
use retailscope_core::ApplicationError;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    /// Success carrying a structured `data` payload.
    pub fn success(
        command: &str,
        message: impl Into<String>,
        data: &impl Serialize,
    ) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => {
                let payload = CommandOutcome {
                    command: command.to_string(),
                    status: "ok".to_string(),
                    error_class: None,
                    message: message.into(),
                    data: Some(data),
                };
                Self { exit_code: 0, output: serialize_payload(payload) }
            }
            Err(error) => Self::failure(
                command,
                "serialization",
                format!("failed to serialize command data: {error}"),
                1,
            ),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), error.exit_code())
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Read configuration from this TOML file (it must exist)"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override logging.level (trace|debug|info|warn|error)")]
    pub log_level: Option<String>,
    #[arg(
        long,
        global = true,
        value_parser = parse_log_format,
        help = "Override logging.format (compact|pretty|json)"
    )]
    pub log_format: Option<LogFormat>,
}

impl ConfigArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_level: self.log_level.clone(),
            log_format: self.log_format,
            ..ConfigOverrides::default()
        }
    }

    pub fn load_options(&self, overrides: ConfigOverrides) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides,
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse().map_err(|error: ConfigError| error.to_string())
}

/// Loads the effective config and installs the log subscriber from it.
pub(crate) fn load_config(
    args: &ConfigArgs,
    overrides: ConfigOverrides,
) -> Result<AppConfig, ApplicationError> {
    let config = AppConfig::load(args.load_options(overrides))?;
    if let Err(error) = crate::logging::init(&config.logging) {
        debug!(
            event_name = "cli.logging.reused",
            error = %error,
            "log subscriber already installed"
        );
    }
    Ok(config)
}
