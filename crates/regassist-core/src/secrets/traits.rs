//! Secret store trait

/// Read access to API credentials
///
/// Implementations:
/// - `EnvSecretStore`: process environment (used by the binaries)
/// - `MemorySecretStore`: fixed values for tests
///
/// # Example
///
/// ```
/// use regassist_core::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::new();
/// // checks GEMINI_API_KEY, then GOOGLE_API_KEY
/// let _key = store.get("gemini");
/// ```
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store, for log messages
    fn name(&self) -> &str;

    /// Look up a secret by provider name (e.g. "gemini") or exact key
    fn get(&self, key: &str) -> Option<String>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
