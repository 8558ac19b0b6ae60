//! Registration operations

use std::sync::Arc;

use crate::logging::Logger;
use crate::store::RecordStore;
use crate::types::UserRecord;

use super::error::{RegistrationError, RegistrationResult};

/// Registers users and lists them, on top of a record store
///
/// No uniqueness check is made: registering the same name or email twice
/// stores two rows.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn RecordStore>,
    logger: Arc<dyn Logger>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn RecordStore>, logger: Arc<dyn Logger>) -> Self {
        Self { store, logger }
    }

    /// Validate and store one registration, returning a confirmation message
    pub fn register(&self, name: &str, email: &str, dob: &str) -> RegistrationResult<String> {
        if [name, email, dob].iter().any(|field| field.is_empty()) {
            self.logger
                .warn("[RegistrationService] Rejected registration with missing fields");
            return Err(RegistrationError::validation("Missing name, email, or dob"));
        }

        self.store.append(&UserRecord::new(name, email, dob))?;
        self.logger
            .info(&format!("[RegistrationService] Registered user '{}'", name));

        Ok(format!("User '{}' registered successfully.", name))
    }

    /// All registered users in registration order
    pub fn list(&self) -> RegistrationResult<Vec<UserRecord>> {
        let users = self.store.read_all()?;
        self.logger.debug(&format!(
            "[RegistrationService] Listing {} users",
            users.len()
        ));
        Ok(users)
    }
}

impl std::fmt::Debug for RegistrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationService").finish_non_exhaustive()
    }
}
