//! CSV file implementation of the record store

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::types::UserRecord;

use super::error::{StoreError, StoreResult};
use super::RecordStore;

/// Record store backed by a CSV file
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the header row still has to be written
    ///
    /// A missing or zero-length file needs it. Any other file must already
    /// start with `Name,email,dob`.
    fn needs_header(&self) -> StoreResult<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() == 0 => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        self.check_headers(reader.headers()?)?;
        Ok(false)
    }

    fn check_headers(&self, headers: &csv::StringRecord) -> StoreResult<()> {
        if headers.iter().ne(UserRecord::HEADERS) {
            return Err(StoreError::HeaderMismatch {
                path: self.path.display().to_string(),
                found: headers.iter().collect::<Vec<_>>().join(","),
            });
        }
        Ok(())
    }
}

impl RecordStore for CsvRecordStore {
    fn append(&self, record: &UserRecord) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let write_header = self.needs_header()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        if write_header {
            writer.write_record(UserRecord::HEADERS)?;
        }
        writer.write_record([&record.name, &record.email, &record.dob])?;
        writer.flush()?;

        Ok(())
    }

    fn read_all(&self) -> StoreResult<Vec<UserRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        self.check_headers(&headers)?;

        reader
            .deserialize::<UserRecord>()
            .map(|row| row.map_err(StoreError::from))
            .collect()
    }
}
