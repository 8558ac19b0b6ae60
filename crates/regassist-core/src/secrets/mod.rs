//! Credential lookup
//!
//! - `SecretStore` trait consulted when resolving API keys
//! - `EnvSecretStore` reads API keys from the environment
//! - `MemorySecretStore` keeps secrets in memory, for tests

mod env_store;
mod memory_store;
mod traits;

pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
pub use traits::SecretStore;
