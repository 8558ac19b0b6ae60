//! Registration service
//!
//! Validates registration requests, delegates storage to a
//! [`RecordStore`](crate::store::RecordStore) and exposes both operations over
//! HTTP:
//!
//! ```text
//! POST /store_user_data   {name, email, dob} -> {status, message}
//! POST /fetch_all_users   {}                 -> {status, users: [...]}
//! ```

mod error;
mod routes;
mod service;

pub use error::{RegistrationError, RegistrationResult};
pub use routes::{router, serve, StoreUserRequest};
pub use service::RegistrationService;
