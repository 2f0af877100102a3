pub mod catalog;
pub mod config;
pub mod plan;
pub mod recommend;
pub mod simulate;

use cosden_core::config::{AppConfig, LoadOptions};
use cosden_core::domain::effect::ToneShift;
use cosden_core::engine::catalog::Catalog;
use cosden_core::engine::CosDenEngine;
use cosden_core::errors::DomainError;
use serde::Serialize;

pub const EXIT_CONFIG_VALIDATION: u8 = 2;
pub const EXIT_CATALOG_LOAD: u8 = 3;
pub const EXIT_INPUT: u8 = 4;

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
    data: Option<serde_json::Value>,
}

impl CommandResult {
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
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

    pub fn domain_failure(command: &str, error: &DomainError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), EXIT_INPUT)
    }

    pub fn invalid_argument(command: &str, message: impl Into<String>) -> Self {
        Self::failure(command, "invalid_argument", message, EXIT_INPUT)
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

pub(crate) fn load_config(command: &str, options: &LoadOptions) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options.clone()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG_VALIDATION,
        )
    })
}

/// Engine over the configured catalog file, or the built-in catalog when none is set.
pub(crate) fn load_engine(command: &str, config: &AppConfig) -> Result<CosDenEngine, CommandResult> {
    let Some(path) = config.catalog.path.as_deref() else {
        return Ok(CosDenEngine::with_default_catalog());
    };

    match Catalog::load_file(path) {
        Ok(catalog) => {
            tracing::debug!(
                event_name = "cli.catalog.loaded",
                path = %path.display(),
                product_count = catalog.len(),
                "catalog file loaded"
            );
            Ok(CosDenEngine::new(catalog))
        }
        Err(error) => Err(CommandResult::failure(
            command,
            "catalog_load",
            format!("catalog `{}` could not be loaded: {error}", path.display()),
            EXIT_CATALOG_LOAD,
        )),
    }
}

pub(crate) fn parse_tone(command: &str, raw: Option<&str>) -> Result<Option<ToneShift>, CommandResult> {
    match raw {
        None => Ok(None),
        Some(raw) => ToneShift::parse(raw).map(Some).ok_or_else(|| {
            CommandResult::invalid_argument(
                command,
                format!("unknown tone `{raw}` (expected cool|warm|neutral)"),
            )
        }),
    }
}

pub(crate) fn to_data<T: Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}
