//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::SecretStore;

/// Mapping from provider names to environment variable names
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("gemini", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("google", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("mistral", vec!["MISTRAL_API_KEY"]);
    m.insert("openrouter", vec!["OPENROUTER_API_KEY"]);
    m.insert("ollama", vec![]); // Ollama doesn't need an API key
    m
});

/// Secret store that reads from environment variables
///
/// Provider names map to their usual variables:
/// - `gemini` → `GEMINI_API_KEY` or `GOOGLE_API_KEY`
/// - `openai` → `OPENAI_API_KEY`
/// - anything else → `<NAME>_API_KEY`
///
/// Variables can also be read directly by their full name.
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    /// Create a new environment variable secret store
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Get the environment variable names for a provider
    pub fn get_env_vars_for_provider(provider: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP.get(provider.to_lowercase().as_str()).map(|v| v.as_slice())
    }

    fn read_non_empty(name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.is_empty())
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        // The key as-is, for direct env var access
        if let Some(value) = Self::read_non_empty(key) {
            return Some(value);
        }

        if let Some(env_vars) = Self::get_env_vars_for_provider(key) {
            if let Some(value) = env_vars.iter().find_map(|var| Self::read_non_empty(var)) {
                return Some(value);
            }
        }

        Self::read_non_empty(&format!("{}_API_KEY", key.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_store_name() {
        assert_eq!(EnvSecretStore::new().name(), "env");
    }

    #[test]
    fn test_env_store_get_direct() {
        env::set_var("REGASSIST_TEST_SECRET_12345", "test_value");

        let store = EnvSecretStore::new();
        assert_eq!(
            store.get("REGASSIST_TEST_SECRET_12345"),
            Some("test_value".to_string())
        );

        env::remove_var("REGASSIST_TEST_SECRET_12345");
    }

    #[test]
    fn test_env_store_suffix_fallback() {
        env::set_var("REGASSISTPROBE_API_KEY", "probe-key");

        let store = EnvSecretStore::new();
        assert_eq!(store.get("regassistprobe"), Some("probe-key".to_string()));

        env::remove_var("REGASSISTPROBE_API_KEY");
    }

    #[test]
    fn test_provider_mapping() {
        assert_eq!(
            EnvSecretStore::get_env_vars_for_provider("Gemini"),
            Some(&["GEMINI_API_KEY", "GOOGLE_API_KEY"][..])
        );
        assert_eq!(EnvSecretStore::get_env_vars_for_provider("ollama"), Some(&[][..]));
        assert_eq!(EnvSecretStore::get_env_vars_for_provider("unknown"), None);
    }

    #[test]
    fn test_env_store_get_not_found() {
        let store = EnvSecretStore::new();
        assert_eq!(store.get("nonexistent_provider_xyz"), None);
        assert!(!store.has("nonexistent_provider_xyz"));
    }
}
