//! Application configuration: TOML file plus `PRICELENS_*` environment
//! overrides. Secrets stay wrapped in `SecretString` and are only exposed
//! at the point of use.

use std::env;
use std::fs;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "pricelens.toml";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    /// Retries for the enhancement call; the engine itself never retries.
    pub max_retries: u32,
    pub retry_delay_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
    Ollama,
}

impl LlmProvider {
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAi | Self::Anthropic)
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "open_ai" | "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub llm_provider: Option<LlmProvider>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
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
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    llm: RawLlm,
    logging: RawLogging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLlm {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    retry_delay_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLogging {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let raw = load_raw_file(&options)?;
        let env_overrides = read_env_overrides()?;

        let pick = |env_value: Option<String>,
                    cli_value: Option<String>,
                    file_value: Option<String>| {
            cli_value.or(env_value).or(file_value)
        };

        let provider = options
            .overrides
            .llm_provider
            .or(env_overrides.llm_provider)
            .or(raw.llm.provider)
            .unwrap_or(LlmProvider::Ollama);

        let api_key = pick(
            env_overrides.llm_api_key,
            options.overrides.llm_api_key,
            raw.llm.api_key,
        )
        .map(SecretString::from);

        let base_url = pick(
            env_overrides.llm_base_url,
            options.overrides.llm_base_url,
            raw.llm.base_url,
        );

        let model = pick(env_overrides.llm_model, options.overrides.llm_model, raw.llm.model)
            .unwrap_or_else(|| "llama3".to_owned());

        let level = pick(
            env_overrides.log_level,
            options.overrides.log_level,
            raw.logging.level,
        )
        .unwrap_or_else(|| "info".to_owned());

        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!("unknown log level `{level}`")));
        }

        let format = options
            .overrides
            .log_format
            .or(env_overrides.log_format)
            .or(raw.logging.format)
            .unwrap_or(LogFormat::Compact);

        Ok(Self {
            llm: LlmConfig {
                provider,
                api_key,
                base_url,
                model,
                timeout_secs: raw.llm.timeout_secs.unwrap_or(30),
                max_retries: raw.llm.max_retries.unwrap_or(2),
                retry_delay_secs: raw.llm.retry_delay_secs.unwrap_or(2),
            },
            logging: LoggingConfig { level, format },
        })
    }
}

fn load_raw_file(options: &LoadOptions) -> Result<RawConfig, ConfigError> {
    let path = options
        .config_path
        .clone()
        .or_else(|| env::var("PRICELENS_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if !path.exists() {
        if options.require_file {
            return Err(ConfigError::MissingConfigFile(path));
        }
        return Ok(RawConfig::default());
    }

    let contents = fs::read_to_string(&path)
        .map_err(|source| ConfigError::ReadFile { path: path.clone(), source })?;
    toml::from_str(&contents).map_err(|source| ConfigError::ParseFile { path, source })
}

fn read_env_overrides() -> Result<ConfigOverrides, ConfigError> {
    let mut overrides = ConfigOverrides::default();

    if let Ok(value) = env::var("PRICELENS_LLM_PROVIDER") {
        overrides.llm_provider = Some(LlmProvider::parse(&value).ok_or_else(|| {
            ConfigError::InvalidEnvOverride { key: "PRICELENS_LLM_PROVIDER".to_owned(), value }
        })?);
    }
    if let Ok(value) = env::var("PRICELENS_LLM_API_KEY") {
        overrides.llm_api_key = Some(value);
    }
    if let Ok(value) = env::var("PRICELENS_LLM_BASE_URL") {
        overrides.llm_base_url = Some(value);
    }
    if let Ok(value) = env::var("PRICELENS_LLM_MODEL") {
        overrides.llm_model = Some(value);
    }
    if let Ok(value) = env::var("PRICELENS_LOG_LEVEL") {
        overrides.log_level = Some(value);
    }
    if let Ok(value) = env::var("PRICELENS_LOG_FORMAT") {
        overrides.log_format = Some(LogFormat::parse(&value).ok_or_else(|| {
            ConfigError::InvalidEnvOverride { key: "PRICELENS_LOG_FORMAT".to_owned(), value }
        })?);
    }

    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let config = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/pricelens.toml")),
            ..LoadOptions::default()
        })
        .unwrap();

        assert_eq!(config.llm.provider, LlmProvider::Ollama);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.max_retries, 2);
        assert_eq!(config.llm.retry_delay_secs, 2);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn required_missing_file_is_an_error() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/pricelens.toml")),
            require_file: true,
            ..LoadOptions::default()
        });

        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn file_values_are_read_and_cli_overrides_win() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[llm]
provider = "open_ai"
model = "gpt-4o-mini"
timeout_secs = 10

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides {
                llm_model: Some("gpt-4o".to_owned()),
                ..ConfigOverrides::default()
            },
        })
        .unwrap();

        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/pricelens.toml")),
            overrides: ConfigOverrides {
                log_level: Some("loud".to_owned()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn providers_needing_keys_are_flagged() {
        assert!(LlmProvider::OpenAi.requires_api_key());
        assert!(LlmProvider::Anthropic.requires_api_key());
        assert!(!LlmProvider::Ollama.requires_api_key());
    }
}
