//! Append-only record store
//!
//! Registration records live in a flat CSV file with the header
//! `Name,email,dob`. Rows are only ever appended; there is no update or
//! delete. The store takes no lock, so two processes appending at the same
//! time may interleave rows.

mod csv_store;
mod error;

pub use csv_store::CsvRecordStore;
pub use error::{StoreError, StoreResult};

use crate::types::UserRecord;

/// Storage backend for registration records
pub trait RecordStore: Send + Sync {
    /// Append one record at the end of the store
    fn append(&self, record: &UserRecord) -> StoreResult<()>;

    /// All records in insertion order
    ///
    /// A store that does not exist yet is empty, not an error.
    fn read_all(&self) -> StoreResult<Vec<UserRecord>>;
}
