//! Registration records

use serde::{Deserialize, Serialize};

/// A registered user, one row of the record store
///
/// The field set is fixed. `Name` keeps its capital letter because it is the
/// column header of the store file and the key in `fetch_all_users` payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "Name")]
    pub name: String,
    pub email: String,
    /// Date of birth, expected as YYYY-MM-DD but not validated
    pub dob: String,
}

impl UserRecord {
    /// Column headers of the store file, in order
    pub const HEADERS: [&'static str; 3] = ["Name", "email", "dob"];

    pub fn new(name: impl Into<String>, email: impl Into<String>, dob: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            dob: dob.into(),
        }
    }
}
