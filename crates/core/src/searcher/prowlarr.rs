//! Prowlarr search engine implementation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{validate_config, LoadedConfig};
use crate::nova::ResultSink;

use super::download::{DownloadError, FileDownloader, TempFileDownloader};
use super::fetcher::{build_client, FetchError, Fetched, Fetcher, HttpFetcher};
use super::query::{build_search_url, decode_search_text};
use super::{Category, ProwlarrRelease, ResultRow, SearchError};

/// Engine identifier used in the host's capability listing.
pub const ENGINE_NAME: &str = "prowlarr";

/// Human-readable engine name.
pub const DISPLAY_NAME: &str = "Prowlarr";

/// Description page of error rows.
pub const HELP_URL: &str = "https://github.com/qbittorrent/search-plugins/wiki";

/// Link used for releases that carry neither a download URL nor a magnet.
pub const NO_LINK: &str = "no link to download";

const MAGNET_PREFIX: &str = "magnet:?";

/// Prowlarr search engine: runs searches and resolves downloads for the host.
pub struct ProwlarrEngine {
    config: LoadedConfig,
    fetcher: Arc<dyn Fetcher>,
    downloader: Arc<dyn FileDownloader>,
}

impl ProwlarrEngine {
    pub fn new(
        config: LoadedConfig,
        fetcher: Arc<dyn Fetcher>,
        downloader: Arc<dyn FileDownloader>,
    ) -> Self {
        Self {
            config,
            fetcher,
            downloader,
        }
    }

    /// Create an engine talking HTTP, with one client shared by searching
    /// and downloading.
    pub fn from_config(config: LoadedConfig) -> Result<Self, FetchError> {
        let timeout = config
            .config
            .timeout_secs
            .map(|secs| Duration::from_secs(secs as u64));
        let client = build_client(timeout)?;

        Ok(Self::new(
            config,
            Arc::new(HttpFetcher::with_client(client.clone())),
            Arc::new(TempFileDownloader::new(client)),
        ))
    }

    /// Engine URL reported with every row (no trailing slash).
    pub fn url(&self) -> &str {
        self.config.config.base_url()
    }

    /// Search Prowlarr and report each release to `sink` as it is converted.
    ///
    /// Configuration, connection and response problems are reported to the
    /// sink as a single error row and then returned. Only a failing sink
    /// produces an error without a row.
    pub async fn search(
        &self,
        what: &str,
        category: Category,
        sink: &mut dyn ResultSink,
    ) -> Result<usize, SearchError> {
        let what = decode_search_text(what);

        match self.run_search(&what, category, sink).await {
            Ok(count) => {
                debug!(results = count, "Search complete");
                Ok(count)
            }
            Err(e) if e.is_reportable() => {
                warn!(error = %e, detail = ?e, "Search failed");
                sink.result(&self.error_row(&e, &what))?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn run_search(
        &self,
        what: &str,
        category: Category,
        sink: &mut dyn ResultSink,
    ) -> Result<usize, SearchError> {
        validate_config(&self.config)?;

        let url = build_search_url(self.url(), &self.config.config.api_key, what, category);
        debug!(query = %what, category = %category, "Searching Prowlarr");

        let body = match self.fetcher.fetch(&url).await {
            Ok(Fetched::Body(body)) => body,
            Ok(Fetched::MagnetRedirect(_)) => {
                return Err(SearchError::InvalidResponse(
                    "search endpoint redirected to a magnet link".to_string(),
                ))
            }
            Err(e) => return Err(SearchError::Connection(e)),
        };

        let records: Vec<Value> = serde_json::from_str(&body)
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let mut count = 0;
        for record in records {
            let release: ProwlarrRelease = match serde_json::from_value(record) {
                Ok(release) => release,
                Err(e) => {
                    warn!(error = %e, "Skipping release with unexpected shape");
                    continue;
                }
            };
            sink.result(&self.result_row(&release))?;
            count += 1;
        }

        Ok(count)
    }

    /// Convert a Prowlarr release into a host row (pipes escaped).
    pub fn result_row(&self, release: &ProwlarrRelease) -> ResultRow {
        let title = release.title.as_deref().unwrap_or_default();
        let tracker = release.indexer.as_deref().unwrap_or_default();
        let name = if self.config.config.tracker_first {
            format!("[{}] {}", tracker, title)
        } else {
            format!("{} [{}]", title, tracker)
        };

        let link = release
            .download_url
            .as_deref()
            .or(release.magnet_url.as_deref())
            .unwrap_or(NO_LINK)
            .to_string();

        let desc_link = release
            .info_url
            .as_deref()
            .or(release.guid.as_deref())
            .unwrap_or_default()
            .to_string();

        ResultRow {
            name,
            link,
            size: release.size.unwrap_or(-1).to_string(),
            seeds: release.seeders.unwrap_or(-1),
            leech: release.leechers.unwrap_or(-1),
            desc_link,
            engine_url: self.url().to_string(),
        }
        .escape_pipes()
    }

    /// The row shown in place of results when a search fails.
    pub fn error_row(&self, error: &SearchError, what: &str) -> ResultRow {
        // The search text must be in the name: with "Torrent names only"
        // filtering the host hides rows that don't contain it.
        let name = format!(
            "{}: {}! Right-click this row and select 'Open description page' to open help. Configuration file: '{}' Search: '{}'",
            DISPLAY_NAME,
            error,
            self.config.path.display(),
            what
        );

        ResultRow {
            name,
            link: self.url().to_string(),
            size: "-1".to_string(),
            seeds: -1,
            leech: -1,
            desc_link: HELP_URL.to_string(),
            engine_url: self.url().to_string(),
        }
        .escape_pipes()
    }

    /// Resolve a result link into something the host can add.
    ///
    /// Magnet links are reported as-is. Other URLs are fetched first, since
    /// some indexers answer the download URL with a redirect to a magnet
    /// link; anything else is downloaded to a local `.torrent` file.
    pub async fn download_torrent(
        &self,
        url: &str,
        sink: &mut dyn ResultSink,
    ) -> Result<(), DownloadError> {
        if url.starts_with(MAGNET_PREFIX) {
            sink.download(url, url)?;
            return Ok(());
        }

        match self.fetcher.fetch(url).await {
            Ok(Fetched::MagnetRedirect(magnet)) => {
                debug!("Download URL redirected to magnet link");
                sink.download(&magnet, url)?;
                return Ok(());
            }
            Ok(Fetched::Body(body)) if body.starts_with(MAGNET_PREFIX) => {
                sink.download(body.trim_end(), url)?;
                return Ok(());
            }
            Ok(Fetched::Body(_)) => {}
            Err(e) => debug!(error = %e, "Probe fetch failed, downloading file"),
        }

        let path = self.downloader.download(url).await?;
        sink.download(&path.display().to_string(), url)?;
        Ok(())
    }
}
