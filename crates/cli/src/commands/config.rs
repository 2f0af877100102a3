use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cosden_core::config::LoadOptions;
use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, to_data, CommandResult};

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match load_config("config", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &'static str, env_key: &str, overridden: bool| {
        if overridden {
            return "override".to_string();
        }
        field_source(key_path, Some(env_key), config_file_doc.as_ref(), config_file_path.as_deref())
    };
    let overrides = &options.overrides;

    let llm_api_key = match &config.llm.api_key {
        Some(_) => "<redacted>".to_string(),
        None => "<unset>".to_string(),
    };

    let entries = vec![
        ConfigEntry {
            key: "catalog.path",
            value: config
                .catalog
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<built-in>".to_string()),
            source: source("catalog.path", "COSDEN_CATALOG_PATH", overrides.catalog_path.is_some()),
        },
        ConfigEntry {
            key: "planner.default_max_steps",
            value: config.planner.default_max_steps.to_string(),
            source: source("planner.default_max_steps", "COSDEN_PLANNER_DEFAULT_MAX_STEPS", false),
        },
        ConfigEntry {
            key: "planner.sensitive_max_steps",
            value: config.planner.sensitive_max_steps.to_string(),
            source: source(
                "planner.sensitive_max_steps",
                "COSDEN_PLANNER_SENSITIVE_MAX_STEPS",
                false,
            ),
        },
        ConfigEntry {
            key: "llm.enabled",
            value: config.llm.enabled.to_string(),
            source: source("llm.enabled", "COSDEN_LLM_ENABLED", false),
        },
        ConfigEntry {
            key: "llm.provider",
            value: format!("{:?}", config.llm.provider),
            source: source("llm.provider", "COSDEN_LLM_PROVIDER", false),
        },
        ConfigEntry {
            key: "llm.model",
            value: config.llm.model.clone(),
            source: source("llm.model", "COSDEN_LLM_MODEL", false),
        },
        ConfigEntry {
            key: "llm.base_url",
            value: config.llm.base_url.clone().unwrap_or_else(|| "<unset>".to_string()),
            source: source("llm.base_url", "COSDEN_LLM_BASE_URL", false),
        },
        ConfigEntry {
            key: "llm.api_key",
            value: llm_api_key,
            source: source("llm.api_key", "COSDEN_LLM_API_KEY", false),
        },
        ConfigEntry {
            key: "llm.max_output_tokens",
            value: config.llm.max_output_tokens.to_string(),
            source: source("llm.max_output_tokens", "COSDEN_LLM_MAX_OUTPUT_TOKENS", false),
        },
        ConfigEntry {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source("logging.level", "COSDEN_LOGGING_LEVEL", overrides.log_level.is_some()),
        },
        ConfigEntry {
            key: "logging.format",
            value: format!("{:?}", config.logging.format),
            source: source("logging.format", "COSDEN_LOGGING_FORMAT", false),
        },
    ];

    CommandResult::success_with_data(
        "config",
        "effective config (source precedence: override > env > file > default)",
        to_data(&entries),
    )
}

fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("cosden.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/cosden.toml");
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
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
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
