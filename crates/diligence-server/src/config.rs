//! Configuration file parsing for the server.
//!
//! Loads bind settings and upstream endpoints from TOML. API keys come from
//! the environment (`PORTAL_API_KEY`, `OPENAI_API_KEY`), which overrides any
//! value in the file. The whole configuration is built once at start-up and
//! validated before the server binds.

use diligence_llm::openai as completion_defaults;
use diligence_llm::CompletionConfig;
use diligence_portal::config as portal_defaults;
use diligence_portal::PortalConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the registry API key
pub const PORTAL_API_KEY_VAR: &str = "PORTAL_API_KEY";

/// Environment variable holding the completion API key
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 3000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Sanctions registry upstream
    #[serde(default)]
    pub registry: RegistrySettings,

    /// Chat-completion upstream
    #[serde(default)]
    pub completion: CompletionSettings,

    /// API keys
    #[serde(default)]
    pub credentials: Credentials,
}

/// Registry upstream settings
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySettings {
    /// Base URL of the transparency portal
    #[serde(default = "default_registry_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_registry_timeout")]
    pub timeout_secs: u64,
}

/// Completion upstream settings
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionSettings {
    /// Base URL of the completion API
    #[serde(default = "default_completion_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Cap on generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

/// API keys for both upstreams. `Debug` redacts them.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    /// Value of the `chave-api-dados` header
    #[serde(default)]
    pub registry_api_key: Option<String>,

    /// Bearer credential for the completion API
    #[serde(default)]
    pub completion_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Credentials")
            .field("registry_api_key", &redact(&self.registry_api_key))
            .field("completion_api_key", &redact(&self.completion_api_key))
            .finish()
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    3000
}

fn default_registry_url() -> String {
    portal_defaults::DEFAULT_BASE_URL.to_string()
}

fn default_registry_timeout() -> u64 {
    portal_defaults::DEFAULT_TIMEOUT_SECS
}

fn default_completion_url() -> String {
    completion_defaults::DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    completion_defaults::DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    completion_defaults::DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    completion_defaults::DEFAULT_MAX_TOKENS
}

fn default_completion_timeout() -> u64 {
    completion_defaults::DEFAULT_TIMEOUT_SECS
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: default_registry_url(),
            timeout_secs: default_registry_timeout(),
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: default_completion_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            registry: RegistrySettings::default(),
            completion: CompletionSettings::default(),
            credentials: Credentials::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Override API keys from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Override API keys from an arbitrary variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(PORTAL_API_KEY_VAR).filter(|k| !k.trim().is_empty()) {
            self.credentials.registry_api_key = Some(key);
        }
        if let Some(key) = lookup(OPENAI_API_KEY_VAR).filter(|k| !k.trim().is_empty()) {
            self.credentials.completion_api_key = Some(key);
        }
        self
    }

    /// Check everything the server needs before it binds.
    ///
    /// Missing credentials are a start-up failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::MissingField("bind_address".to_string()));
        }
        if is_blank(&self.credentials.registry_api_key) {
            return Err(ConfigError::MissingField(format!(
                "credentials.registry_api_key (or {})",
                PORTAL_API_KEY_VAR
            )));
        }
        if is_blank(&self.credentials.completion_api_key) {
            return Err(ConfigError::MissingField(format!(
                "credentials.completion_api_key (or {})",
                OPENAI_API_KEY_VAR
            )));
        }
        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "completion.temperature".to_string(),
                reason: "must be between 0.0 and 2.0".to_string(),
            });
        }
        if self.completion.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "completion.max_tokens".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Registry client configuration
    pub fn portal_config(&self) -> PortalConfig {
        PortalConfig {
            base_url: self.registry.base_url.trim_end_matches('/').to_string(),
            api_key: self.credentials.registry_api_key.clone(),
            timeout_secs: self.registry.timeout_secs,
        }
    }

    /// Completion client configuration
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            base_url: self.completion.base_url.trim_end_matches('/').to_string(),
            api_key: self.credentials.completion_api_key.clone(),
            model: self.completion.model.clone(),
            temperature: self.completion.temperature,
            max_tokens: self.completion.max_tokens,
            timeout_secs: self.completion.timeout_secs,
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 3000);
        assert_eq!(config.completion.model, "gpt-3.5-turbo");
        assert_eq!(config.completion.max_tokens, 1000);
        assert!(config.credentials.registry_api_key.is_none());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000

            [registry]
            base_url = "http://localhost:8081/"
            timeout_secs = 10

            [completion]
            base_url = "http://localhost:8082/v1"
            model = "gpt-4o-mini"
            temperature = 0.2
            max_tokens = 500
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.registry.timeout_secs, 10);
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.completion.max_tokens, 500);
        assert_eq!(config.completion.timeout_secs, 60);

        let portal = config.portal_config();
        assert_eq!(portal.base_url, "http://localhost:8081");
    }

    #[test]
    fn test_env_overrides_file_keys() {
        let toml = r#"
            [credentials]
            registry_api_key = "from-file"
        "#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        let config = config.with_overrides_from(env(&[
            ("PORTAL_API_KEY", "from-env"),
            ("OPENAI_API_KEY", "sk-env"),
        ]));

        assert_eq!(config.credentials.registry_api_key.as_deref(), Some("from-env"));
        assert_eq!(config.credentials.completion_api_key.as_deref(), Some("sk-env"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_env_does_not_override() {
        let toml = r#"
            [credentials]
            registry_api_key = "from-file"
        "#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        let config = config.with_overrides_from(env(&[("PORTAL_API_KEY", "  ")]));
        assert_eq!(config.credentials.registry_api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_validate_requires_registry_key() {
        let config = ServerConfig::default().with_overrides_from(env(&[("OPENAI_API_KEY", "sk")]));
        match config.validate() {
            Err(ConfigError::MissingField(field)) => assert!(field.contains("PORTAL_API_KEY")),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_requires_completion_key() {
        let config = ServerConfig::default().with_overrides_from(env(&[("PORTAL_API_KEY", "k")]));
        match config.validate() {
            Err(ConfigError::MissingField(field)) => assert!(field.contains("OPENAI_API_KEY")),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = ServerConfig::default()
            .with_overrides_from(env(&[("PORTAL_API_KEY", "k"), ("OPENAI_API_KEY", "sk")]));
        config.completion.temperature = 3.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let config = ServerConfig::default().with_overrides_from(env(&[("OPENAI_API_KEY", "sk-live")]));
        assert!(!format!("{:?}", config).contains("sk-live"));
    }
}
