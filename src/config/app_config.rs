use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DomainError, PromptTemplate};

/// Environment variable read as the default provider credential
pub const API_KEY_ENV_VAR: &str = "DEEPSEEK_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
const DEFAULT_MODEL: &str = "deepseek-chat";
const PROMPT_MESSAGE_VARIABLE: &str = "message";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub provider: ProviderConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Upstream chat-completions provider settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Optional wrapper for the forwarded message, e.g. `User: ${var:message}\nAI:`
    pub prompt_template: Option<String>,
}

/// Cross-origin policy for the browser client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 500,
            timeout_secs: 30,
            connect_timeout_secs: 5,
            prompt_template: None,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Origins must be listed explicitly; `*` cannot be combined with an allow-list
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.allowed_origins.iter().any(|o| o.trim() == "*") {
            return Err(DomainError::configuration(
                "cors.allowed_origins must list explicit origins, `*` is not supported",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("prompt_template", &self.prompt_template)
            .finish()
    }
}

impl ProviderConfig {
    /// The bearer credential, rejecting a missing or blank value
    pub fn api_key(&self) -> Result<&str, DomainError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(DomainError::configuration(format!(
                "{} environment variable not set.",
                API_KEY_ENV_VAR
            ))),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Parsed prompt template, if one is configured
    pub fn prompt_template(&self) -> Result<Option<PromptTemplate>, DomainError> {
        let Some(raw) = self.prompt_template.as_deref() else {
            return Ok(None);
        };

        let template = PromptTemplate::parse(raw);

        if !template.has_variable(PROMPT_MESSAGE_VARIABLE) {
            return Err(DomainError::configuration(format!(
                "provider.prompt_template must reference ${{var:{}}}",
                PROMPT_MESSAGE_VARIABLE
            )));
        }

        Ok(Some(template))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.api_key()?;

        reqwest::Url::parse(&self.base_url).map_err(|e| {
            DomainError::configuration(format!(
                "provider.base_url '{}' is not a valid URL: {}",
                self.base_url, e
            ))
        })?;

        if self.model.trim().is_empty() {
            return Err(DomainError::configuration("provider.model must not be empty"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::configuration(format!(
                "provider.temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(DomainError::configuration(
                "provider.max_tokens must be greater than 0",
            ));
        }

        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(DomainError::configuration(
                "provider timeouts must be greater than 0",
            ));
        }

        self.prompt_template()?;

        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from defaults, optional files, and `APP__*` variables.
    ///
    /// The credential falls back to `DEEPSEEK_API_KEY` when neither a config file
    /// nor `APP__PROVIDER__API_KEY` provides one.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Ok(api_key) = std::env::var(API_KEY_ENV_VAR) {
            builder = builder.set_default("provider.api_key", api_key)?;
        }

        let config = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Fail-fast checks run once before the server starts
    pub fn validate(&self) -> Result<(), DomainError> {
        self.provider.validate()?;
        self.cors.validate()
    }
}
