//! Mock file downloader for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::searcher::{DownloadError, FetchError, FileDownloader};

/// Mock implementation of the FileDownloader trait.
///
/// Pretends every URL was stored at `<dir>/<n>.torrent` without touching the
/// filesystem, unless told to fail.
#[derive(Debug, Clone)]
pub struct MockDownloader {
    dir: PathBuf,
    downloads: Arc<RwLock<Vec<String>>>,
    fail_with_status: Arc<RwLock<Option<u16>>>,
}

impl Default for MockDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDownloader {
    pub fn new() -> Self {
        Self {
            dir: PathBuf::from("/tmp/mock-downloads"),
            downloads: Arc::new(RwLock::new(Vec::new())),
            fail_with_status: Arc::new(RwLock::new(None)),
        }
    }

    /// Make subsequent downloads fail with an HTTP status.
    pub async fn set_failure(&self, status: u16) {
        *self.fail_with_status.write().await = Some(status);
    }

    /// Get recorded download URLs.
    pub async fn recorded_downloads(&self) -> Vec<String> {
        self.downloads.read().await.clone()
    }
}

#[async_trait]
impl FileDownloader for MockDownloader {
    async fn download(&self, url: &str) -> Result<PathBuf, DownloadError> {
        if let Some(status) = *self.fail_with_status.read().await {
            return Err(FetchError::Status(status).into());
        }

        let mut downloads = self.downloads.write().await;
        downloads.push(url.to_string());
        Ok(self.dir.join(format!("{}.torrent", downloads.len())))
    }
}
