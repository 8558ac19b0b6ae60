//! Shared helpers for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regassist_core::logging::{Logger, NoOpLogger};
use regassist_core::registration::{self, RegistrationService};
use regassist_core::store::CsvRecordStore;
use tokio::net::TcpListener;

pub fn logger() -> Arc<dyn Logger> {
    Arc::new(NoOpLogger::new())
}

/// A registration server on an ephemeral local port
pub struct TestServer {
    pub base_url: String,
    pub data_file: PathBuf,
}

impl TestServer {
    /// Start the real router over a CSV file in `dir`
    pub async fn start(dir: &Path) -> Self {
        let data_file = dir.join("data").join("registration.csv");
        let store = Arc::new(CsvRecordStore::new(&data_file));
        let service = RegistrationService::new(store, logger());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = registration::serve(listener, service).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            data_file,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}
