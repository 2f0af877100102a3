use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::goal::DEFAULT_MAX_STEPS;

const SENSITIVE_MAX_STEPS: usize = 3;
const MAX_OUTPUT_TOKENS_LIMIT: usize = 4096;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub planner: PlannerConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    /// TOML catalog file. `None` selects the built-in catalog.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerConfig {
    pub default_max_steps: usize,
    pub sensitive_max_steps: usize,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub enabled: bool,
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub max_output_tokens: usize,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
    Ollama,
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
    pub catalog_path: Option<PathBuf>,
    pub log_level: Option<String>,
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            planner: PlannerConfig {
                default_max_steps: DEFAULT_MAX_STEPS,
                sensitive_max_steps: SENSITIVE_MAX_STEPS,
            },
            llm: LlmConfig {
                enabled: false,
                provider: LlmProvider::Ollama,
                api_key: None,
                base_url: None,
                model: "llama3.1".to_string(),
                max_output_tokens: 256,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        AppConfig::default().planner
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm provider `{other}` (expected openai|anthropic|ollama)"
            ))),
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

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("cosden.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
        }

        if let Some(planner) = patch.planner {
            if let Some(default_max_steps) = planner.default_max_steps {
                self.planner.default_max_steps = default_max_steps;
            }
            if let Some(sensitive_max_steps) = planner.sensitive_max_steps {
                self.planner.sensitive_max_steps = sensitive_max_steps;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(enabled) = llm.enabled {
                self.llm.enabled = enabled;
            }
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = Some(base_url);
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(max_output_tokens) = llm.max_output_tokens {
                self.llm.max_output_tokens = max_output_tokens;
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
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("COSDEN_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("COSDEN_PLANNER_DEFAULT_MAX_STEPS") {
            self.planner.default_max_steps =
                parse_usize("COSDEN_PLANNER_DEFAULT_MAX_STEPS", &value)?;
        }
        if let Some(value) = read_env("COSDEN_PLANNER_SENSITIVE_MAX_STEPS") {
            self.planner.sensitive_max_steps =
                parse_usize("COSDEN_PLANNER_SENSITIVE_MAX_STEPS", &value)?;
        }

        if let Some(value) = read_env("COSDEN_LLM_ENABLED") {
            self.llm.enabled = parse_bool("COSDEN_LLM_ENABLED", &value)?;
        }
        if let Some(value) = read_env("COSDEN_LLM_PROVIDER") {
            self.llm.provider = value.parse()?;
        }
        if let Some(value) = read_env("COSDEN_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("COSDEN_LLM_BASE_URL") {
            self.llm.base_url = Some(value);
        }
        if let Some(value) = read_env("COSDEN_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("COSDEN_LLM_MAX_OUTPUT_TOKENS") {
            self.llm.max_output_tokens = parse_usize("COSDEN_LLM_MAX_OUTPUT_TOKENS", &value)?;
        }

        let log_level = read_env("COSDEN_LOGGING_LEVEL").or_else(|| read_env("COSDEN_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("COSDEN_LOGGING_FORMAT").or_else(|| read_env("COSDEN_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_planner(&self.planner)?;
        validate_llm(&self.llm)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("cosden.toml"), PathBuf::from("config/cosden.toml")]
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

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if let Some(path) = &catalog.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.path must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_planner(planner: &PlannerConfig) -> Result<(), ConfigError> {
    if planner.default_max_steps == 0 || planner.sensitive_max_steps == 0 {
        return Err(ConfigError::Validation(
            "planner.default_max_steps and planner.sensitive_max_steps must be greater than zero"
                .to_string(),
        ));
    }

    if planner.sensitive_max_steps > planner.default_max_steps {
        return Err(ConfigError::Validation(
            "planner.sensitive_max_steps must not exceed planner.default_max_steps".to_string(),
        ));
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.max_output_tokens == 0 || llm.max_output_tokens > MAX_OUTPUT_TOKENS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "llm.max_output_tokens must be in range 1..={MAX_OUTPUT_TOKENS_LIMIT}"
        )));
    }

    if !llm.enabled {
        return Ok(());
    }

    match llm.provider {
        LlmProvider::OpenAi | LlmProvider::Anthropic => {
            let missing = llm
                .api_key
                .as_ref()
                .map(|value| value.expose_secret().trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "llm.api_key is required for openai/anthropic providers".to_string(),
                ));
            }
        }
        LlmProvider::Ollama => {
            let missing =
                llm.base_url.as_ref().map(|value| value.trim().is_empty()).unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "llm.base_url is required for ollama provider".to_string(),
                ));
            }
        }
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

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    planner: Option<PlannerPatch>,
    llm: Option<LlmPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct PlannerPatch {
    default_max_steps: Option<usize>,
    sensitive_max_steps: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    enabled: Option<bool>,
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    max_output_tokens: Option<usize>,
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

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LlmProvider, LoadOptions, LogFormat};

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
    fn defaults_validate_without_any_file_or_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.catalog.path.is_none(), "built-in catalog should be the default")?;
        ensure(config.planner.default_max_steps == 4, "default cap should be 4")?;
        ensure(config.planner.sensitive_max_steps == 3, "sensitive cap should be 3")?;
        ensure(!config.llm.enabled, "llm should be disabled by default")?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "compact logging by default")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_COSDEN_LLM_KEY", "sk-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("cosden.toml");
            fs::write(
                &path,
                r#"
[llm]
enabled = true
provider = "anthropic"
api_key = "${TEST_COSDEN_LLM_KEY}"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.llm.provider == LlmProvider::Anthropic, "provider should come from file")?;
            ensure(
                config.llm.api_key.as_ref().map(|key| key.expose_secret() == "sk-from-env")
                    == Some(true),
                "api key should be interpolated from environment",
            )
        })();

        clear_vars(&["TEST_COSDEN_LLM_KEY"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("COSDEN_PLANNER_DEFAULT_MAX_STEPS", "5");
        env::set_var("COSDEN_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("cosden.toml");
            fs::write(
                &path,
                r#"
[catalog]
path = "catalog-from-file.toml"

[planner]
default_max_steps = 2
sensitive_max_steps = 2

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    catalog_path: Some(PathBuf::from("catalog-from-override.toml")),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.catalog.path == Some(PathBuf::from("catalog-from-override.toml")),
                "override catalog path should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.planner.default_max_steps == 5, "env max steps should win over file")?;
            ensure(config.planner.sensitive_max_steps == 2, "file value should win over default")?;
            ensure(matches!(config.logging.format, LogFormat::Json), "env log format alias applies")
        })();

        clear_vars(&["COSDEN_PLANNER_DEFAULT_MAX_STEPS", "COSDEN_LOG_FORMAT"]);
        result
    }

    #[test]
    fn enabled_remote_llm_requires_api_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("COSDEN_LLM_ENABLED", "true");
        env::set_var("COSDEN_LLM_PROVIDER", "openai");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("llm.api_key")
            );
            ensure(has_message, "validation failure should mention llm.api_key")
        })();

        clear_vars(&["COSDEN_LLM_ENABLED", "COSDEN_LLM_PROVIDER"]);
        result
    }

    #[test]
    fn sensitive_cap_cannot_exceed_default_cap() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("COSDEN_PLANNER_SENSITIVE_MAX_STEPS", "6");

        let result = (|| -> Result<(), String> {
            let failed = matches!(
                AppConfig::load(LoadOptions::default()),
                Err(ConfigError::Validation(ref message)) if message.contains("sensitive_max_steps")
            );
            ensure(failed, "sensitive cap above default cap should be rejected")
        })();

        clear_vars(&["COSDEN_PLANNER_SENSITIVE_MAX_STEPS"]);
        result
    }

    #[test]
    fn malformed_numeric_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("COSDEN_LLM_MAX_OUTPUT_TOKENS", "lots");

        let result = (|| -> Result<(), String> {
            let failed = matches!(
                AppConfig::load(LoadOptions::default()),
                Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == "COSDEN_LLM_MAX_OUTPUT_TOKENS"
            );
            ensure(failed, "non-numeric token limit should be rejected")
        })();

        clear_vars(&["COSDEN_LLM_MAX_OUTPUT_TOKENS"]);
        result
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("COSDEN_LLM_API_KEY", "sk-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("sk-secret-value"), "debug output should not contain api key")
        })();

        clear_vars(&["COSDEN_LLM_API_KEY"]);
        result
    }

    #[test]
    fn missing_required_file_is_an_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let missing = dir.path().join("absent.toml");
        let failed = matches!(
            AppConfig::load(LoadOptions {
                config_path: Some(missing),
                require_file: true,
                ..LoadOptions::default()
            }),
            Err(ConfigError::MissingConfigFile(_))
        );
        ensure(failed, "absent required file should be reported")
    }
}
