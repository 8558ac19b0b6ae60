//! Application configuration
//!
//! Settings come from a YAML file (`~/.config/regassist/config.yaml` by
//! default), then `REGASSIST_*` environment variables, then command-line
//! flags applied by the binaries.

mod error;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use file::{
    resolve_api_key, AppConfig, AssistantSettings, RegistrationSettings, DEFAULT_BASE_URL,
    DEFAULT_BIND, DEFAULT_DATA_FILE, DEFAULT_MODEL, DEFAULT_PROVIDER,
};
