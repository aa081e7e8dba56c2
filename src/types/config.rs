//! Configuration structures.
//!
//! Configuration is loaded from an optional JSON file and then overridden by
//! environment variables. API keys only ever come from the environment and
//! live in [`ApiKeys`], which is not serialized.

use super::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Language-model client configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Currency-rate endpoint configuration.
    #[serde(default)]
    pub currency: CurrencyConfig,

    /// Shared HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Defaults plus process environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// JSON file plus process environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_json::from_str(&raw)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("TOOL_DISPATCH_PROVIDER") {
            self.llm.provider = provider.parse()?;
        }
        if let Some(model) = lookup("TOOL_DISPATCH_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Some(url) = lookup("AMDOREN_BASE_URL") {
            self.currency.base_url = url;
        }
        if let Some(secs) = lookup("TOOL_DISPATCH_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::config(format!(
                    "TOOL_DISPATCH_HTTP_TIMEOUT_SECS must be an integer, got '{}'",
                    secs
                ))
            })?;
            self.http.timeout = Duration::from_secs(secs);
        }
        if let Some(format) = lookup("TOOL_DISPATCH_LOG_FORMAT") {
            self.observability.json_logs = format.eq_ignore_ascii_case("json");
        }
        Ok(())
    }
}

/// Hosted model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Google,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-3.5-turbo",
            Provider::Google => "gemini-2.0-flash",
        }
    }

    /// OpenAI-compatible chat-completions base URL.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Google => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Google => "GOOGLE_API_KEY",
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "google" | "gemini" => Ok(Provider::Google),
            other => Err(Error::config(format!(
                "unknown provider '{}', expected openai or google",
                other
            ))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAi => f.write_str("openai"),
            Provider::Google => f.write_str("google"),
        }
    }
}

/// Language-model client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,

    /// Model name; provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Chat-completions base URL; provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    pub temperature: f32,
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            model: None,
            base_url: None,
            temperature: 0.0,
        }
    }
}

/// Currency-rate endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub base_url: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.amdoren.com/api".to_string(),
        }
    }
}

/// Shared HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// API keys read from the environment.
#[derive(Clone, Default)]
pub struct ApiKeys {
    pub openai: Option<String>,
    pub google: Option<String>,
    pub amdoren: Option<String>,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            openai: read("OPENAI_API_KEY"),
            google: read("GOOGLE_API_KEY"),
            amdoren: read("AMDOREN_API_KEY"),
        }
    }

    /// Key for the given model provider.
    pub fn for_provider(&self, provider: Provider) -> Result<&str> {
        let key = match provider {
            Provider::OpenAi => self.openai.as_deref(),
            Provider::Google => self.google.as_deref(),
        };
        key.ok_or_else(|| Error::config(format!("{} is not set", provider.api_key_var())))
    }

    pub fn amdoren(&self) -> Result<&str> {
        self.amdoren
            .as_deref()
            .ok_or_else(|| Error::config("AMDOREN_API_KEY is not set"))
    }
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |k: &Option<String>| if k.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("ApiKeys")
            .field("openai", &mask(&self.openai))
            .field("google", &mask(&self.google))
            .field("amdoren", &mask(&self.amdoren))
            .finish()
    }
}
