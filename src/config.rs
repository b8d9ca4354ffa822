//! Application settings.
//!
//! Loaded from YAML, then overridden from the process environment so the
//! service can run from a bare `.env` file.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const SERPER_API_KEY_ENV: &str = "SERPER_API_KEY";
pub const PORT_ENV: &str = "PORT";
pub const LLM_PROVIDER_ENV: &str = "LEARNPATH_LLM_PROVIDER";
pub const LLM_MODEL_ENV: &str = "LEARNPATH_LLM_MODEL";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

impl LlmProviderKind {
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash-latest",
            Self::OpenAi => "gpt-4o-mini",
        }
    }

    pub const fn default_api_base(self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub const fn api_key_env(self) -> &'static str {
        match self {
            Self::Gemini => GOOGLE_API_KEY_ENV,
            Self::OpenAi => OPENAI_API_KEY_ENV,
        }
    }
}

impl FromStr for LlmProviderKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("unknown llm provider: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    /// Falls back to the provider default when unset.
    pub model: Option<String>,
    pub api_base: Option<String>,
    /// Keys are tried in order; later keys are used when earlier ones are rate limited.
    pub api_keys: Vec<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::Gemini,
            model: None,
            api_base: None,
            api_keys: Vec::new(),
            temperature: 0.7,
            timeout_secs: 180,
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> String {
        self.model
            .clone()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    pub fn api_base(&self) -> String {
        self.api_base
            .clone()
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_api_base().to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub book_qualifier: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: "https://google.serper.dev".to_string(),
            api_key: None,
            timeout_secs: 5,
            book_qualifier: path_core::DEFAULT_BOOK_QUALIFIER.to_string(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = lookup(LLM_PROVIDER_ENV) {
            match raw.parse() {
                Ok(provider) => self.llm.provider = provider,
                Err(err) => warn!(%err, "ignoring {LLM_PROVIDER_ENV}"),
            }
        }
        if let Some(model) = lookup(LLM_MODEL_ENV) {
            self.llm.model = Some(model.trim().to_string());
        }
        if let Some(keys) = lookup(self.llm.provider.api_key_env()) {
            self.llm.api_keys = keys
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(key) = lookup(SERPER_API_KEY_ENV) {
            self.search.api_key = Some(key.trim().to_string());
        }
        if let Some(raw) = lookup(PORT_ENV) {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(err) => warn!(%err, value = %raw, "ignoring invalid {PORT_ENV}"),
            }
        }
    }

    /// Both backends need credentials before the service can do anything useful.
    pub fn validate_credentials(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.llm.api_keys.iter().all(|key| key.trim().is_empty()) {
            missing.push(self.llm.provider.api_key_env());
        }
        if self
            .search
            .api_key
            .as_deref()
            .map_or(true, |key| key.trim().is_empty())
        {
            missing.push(SERPER_API_KEY_ENV);
        }
        if !missing.is_empty() {
            bail!("missing API keys: {}", missing.join(", "));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_reference_service() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.llm.provider, LlmProviderKind::Gemini);
        assert_eq!(config.llm.model(), "gemini-1.5-flash-latest");
        assert_eq!(config.llm.timeout(), Duration::from_secs(180));
        assert_eq!(config.search.timeout(), Duration::from_secs(5));
        assert_eq!(config.search.book_qualifier, "libro");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            "llm:\n  provider: openai\n  api_keys: [a, b]\nsearch:\n  book_qualifier: book\n",
        )
        .expect("yaml");
        assert_eq!(config.llm.provider, LlmProviderKind::OpenAi);
        assert_eq!(config.llm.model(), "gpt-4o-mini");
        assert_eq!(config.llm.api_base(), "https://api.openai.com/v1");
        assert_eq!(config.llm.api_keys, vec!["a", "b"]);
        assert_eq!(config.search.book_qualifier, "book");
        assert_eq!(config.search.api_base, "https://google.serper.dev");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn env_overrides_follow_selected_provider() {
        let mut config = Config::default();
        config.apply_overrides_from(lookup(&[
            (LLM_PROVIDER_ENV, "openai"),
            (GOOGLE_API_KEY_ENV, "google"),
            (OPENAI_API_KEY_ENV, "k1, k2,"),
            (SERPER_API_KEY_ENV, "serper"),
            (PORT_ENV, "8080"),
        ]));
        assert_eq!(config.llm.provider, LlmProviderKind::OpenAi);
        assert_eq!(config.llm.api_keys, vec!["k1", "k2"]);
        assert_eq!(config.search.api_key.as_deref(), Some("serper"));
        assert_eq!(config.server.port, 8080);
        assert!(config.validate_credentials().is_ok());
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides_from(lookup(&[
            (LLM_PROVIDER_ENV, "mystery"),
            (PORT_ENV, "not-a-port"),
            (SERPER_API_KEY_ENV, "  "),
        ]));
        assert_eq!(config.llm.provider, LlmProviderKind::Gemini);
        assert_eq!(config.server.port, 5000);
        assert!(config.search.api_key.is_none());
    }

    #[test]
    fn missing_keys_are_reported_together() {
        let err = Config::default().validate_credentials().unwrap_err();
        let message = err.to_string();
        assert!(message.contains(GOOGLE_API_KEY_ENV));
        assert!(message.contains(SERPER_API_KEY_ENV));
    }
}
