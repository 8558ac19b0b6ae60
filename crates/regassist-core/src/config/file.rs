//! YAML configuration file and environment overrides

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::secrets::{EnvSecretStore, SecretStore};

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DATA_FILE: &str = "data/registration.csv";

/// Language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Provider id (`gemini`, `openai`, ..., or `mock`)
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
        }
    }
}

/// Registration server settings, shared by the server and the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationSettings {
    /// Where the assistant sends tool calls
    pub base_url: String,
    /// Where the server listens
    pub bind: String,
    /// CSV file backing the record store
    pub data_file: PathBuf,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bind: DEFAULT_BIND.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

/// Configuration file structure
///
/// ```yaml
/// assistant:
///   provider: gemini
///   model: gemini-1.5-flash
/// registration:
///   base_url: http://127.0.0.1:5000
///   data_file: data/registration.csv
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub assistant: AssistantSettings,
    pub registration: RegistrationSettings,
}

impl AppConfig {
    /// User-level config path (`<config dir>/regassist/config.yaml`)
    pub fn default_path() -> PathBuf {
        // XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("regassist").join("config.yaml")
    }

    /// Load config from a YAML file; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: AppConfig = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or the default path when none is given, then apply
    /// environment overrides
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::load(Self::default_path())?,
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `REGASSIST_*` environment variables
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = get("REGASSIST_PROVIDER") {
            self.assistant.provider = provider;
        }
        if let Some(model) = get("REGASSIST_MODEL") {
            self.assistant.model = model;
        }
        if let Some(url) = get("REGASSIST_SERVER_URL") {
            self.registration.base_url = url;
        }
        if let Some(bind) = get("REGASSIST_BIND") {
            self.registration.bind = bind;
        }
        if let Some(file) = get("REGASSIST_DATA_FILE") {
            self.registration.data_file = PathBuf::from(file);
        }
        self.validate()
    }

    /// Check values that can't be expressed in the YAML types
    pub fn validate(&self) -> ConfigResult<()> {
        if self.assistant.provider.trim().is_empty() {
            return Err(ConfigError::invalid("assistant.provider", "must not be empty"));
        }
        if self.assistant.model.trim().is_empty() {
            return Err(ConfigError::invalid("assistant.model", "must not be empty"));
        }
        if let Some(t) = self.assistant.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::invalid(
                    "assistant.temperature",
                    format!("{t} is outside 0.0..=2.0"),
                ));
            }
        }
        if !self.registration.base_url.starts_with("http://")
            && !self.registration.base_url.starts_with("https://")
        {
            return Err(ConfigError::invalid(
                "registration.base_url",
                format!("'{}' is not an http(s) URL", self.registration.base_url),
            ));
        }
        Ok(())
    }
}

/// Resolve the API key for a provider
///
/// Returns `Ok(None)` for providers that run without a key (`mock`,
/// `ollama`) and `ConfigError::MissingCredential` when a key is needed but
/// none is stored.
pub fn resolve_api_key(store: &dyn SecretStore, provider: &str) -> ConfigResult<Option<String>> {
    let provider = provider.to_lowercase();
    if provider == "mock" || provider == "ollama" {
        return Ok(None);
    }

    match store.get(&provider) {
        Some(key) => Ok(Some(key)),
        None => {
            let hint = match EnvSecretStore::get_env_vars_for_provider(&provider) {
                Some(vars) if !vars.is_empty() => vars.join(" or "),
                _ => format!("{}_API_KEY", provider.to_uppercase()),
            };
            Err(ConfigError::MissingCredential { provider, hint })
        }
    }
}
