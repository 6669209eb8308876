use pricelens_core::config::{AppConfig, LoadOptions};

/// Render the effective configuration with secrets redacted.
pub fn run() -> String {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            let api_key = if config.llm.api_key.is_some() { "set (redacted)" } else { "not set" };
            let base_url = config.llm.base_url.as_deref().unwrap_or("(provider default)");

            [
                format!("llm.provider = {:?}", config.llm.provider),
                format!("llm.model = {}", config.llm.model),
                format!("llm.base_url = {base_url}"),
                format!("llm.api_key = {api_key}"),
                format!("llm.timeout_secs = {}", config.llm.timeout_secs),
                format!("llm.max_retries = {}", config.llm.max_retries),
                format!("llm.retry_delay_secs = {}", config.llm.retry_delay_secs),
                format!("logging.level = {}", config.logging.level),
                format!("logging.format = {:?}", config.logging.format),
                String::new(),
                "Overrides: PRICELENS_CONFIG, PRICELENS_LLM_PROVIDER, PRICELENS_LLM_API_KEY, \
                 PRICELENS_LLM_BASE_URL, PRICELENS_LLM_MODEL, PRICELENS_LOG_LEVEL, \
                 PRICELENS_LOG_FORMAT"
                    .to_owned(),
            ]
            .join("\n")
        }
        Err(error) => format!("configuration failed to load: {error}"),
    }
}
