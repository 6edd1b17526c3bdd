//! Downloading `.torrent` files to local storage.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::fetcher::FetchError;

/// Errors that can occur when downloading a file.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to store download: {0}")]
    Io(#[from] std::io::Error),
}

/// Saves the content behind a URL to a local file.
#[async_trait]
pub trait FileDownloader: Send + Sync {
    /// Download `url` and return the path of the stored file.
    async fn download(&self, url: &str) -> Result<PathBuf, DownloadError>;
}

/// Downloads into kept temporary files with a `.torrent` suffix.
pub struct TempFileDownloader {
    client: Client,
    dir: Option<PathBuf>,
}

impl TempFileDownloader {
    /// Download into the system temp directory.
    pub fn new(client: Client) -> Self {
        Self { client, dir: None }
    }

    /// Download into `dir` instead of the system temp directory.
    pub fn in_dir(client: Client, dir: impl AsRef<Path>) -> Self {
        Self {
            client,
            dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    fn store(&self, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("prowlarr-").suffix(".torrent");
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(path)
    }
}

#[async_trait]
impl FileDownloader for TempFileDownloader {
    async fn download(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let response = self.client.get(url).send().await.map_err(FetchError::from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()).into());
        }

        let bytes = response.bytes().await.map_err(FetchError::from)?;
        let path = self.store(&bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Stored download");
        Ok(path)
    }
}
