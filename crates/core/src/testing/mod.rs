//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the engine's collaborators
//! (HTTP fetching, file downloads, host output), allowing the search and
//! download flows to be tested without a running Prowlarr.
//!
//! # Example
//!
//! ```rust,ignore
//! use prowlarr_engine_core::testing::{fixtures, MockDownloader, MockFetcher, RecordingSink};
//!
//! let fetcher = MockFetcher::new();
//! fetcher.respond_with_body("http://prowlarr", "[]").await;
//!
//! let engine = fixtures::engine(fixtures::config("key", false), &fetcher, &MockDownloader::new());
//! let mut sink = RecordingSink::new();
//! engine.search("ubuntu", Category::All, &mut sink).await?;
//! ```

mod mock_downloader;
mod mock_fetcher;
mod recording_sink;

pub use mock_downloader::MockDownloader;
pub use mock_fetcher::{MockFetcher, MockResponse};
pub use recording_sink::RecordingSink;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::config::{EngineConfig, LoadedConfig};
    use crate::searcher::ProwlarrEngine;

    use super::{MockDownloader, MockFetcher};

    /// Base URL used by fixture configs.
    pub const BASE_URL: &str = "http://prowlarr.test:9696";

    /// A well-formed config pointing at [`BASE_URL`].
    pub fn config(api_key: &str, tracker_first: bool) -> LoadedConfig {
        LoadedConfig::from_config(
            EngineConfig {
                api_key: api_key.to_string(),
                timeout_secs: None,
                tracker_first,
                url: BASE_URL.to_string(),
            },
            "/etc/prowlarr/prowlarr.json",
        )
    }

    /// A config flagged as malformed.
    pub fn malformed_config() -> LoadedConfig {
        LoadedConfig {
            malformed: true,
            ..config("YOUR_API_KEY_HERE", false)
        }
    }

    /// Engine wired to the given mocks.
    pub fn engine(
        config: LoadedConfig,
        fetcher: &MockFetcher,
        downloader: &MockDownloader,
    ) -> ProwlarrEngine {
        ProwlarrEngine::new(config, Arc::new(fetcher.clone()), Arc::new(downloader.clone()))
    }

    /// A complete release record as Prowlarr returns it.
    pub fn release(title: &str, indexer: &str, id: u32) -> Value {
        json!({
            "guid": format!("{}/release/{}", indexer.to_lowercase(), id),
            "title": title,
            "indexer": indexer,
            "size": 1024 * 1024 * 700,
            "seeders": 42,
            "leechers": 7,
            "downloadUrl": format!("{}/{}/download?link=abc{}", BASE_URL, id, id),
            "magnetUrl": format!("magnet:?xt=urn:btih:{:040}", id),
            "infoUrl": format!("https://{}.example/torrent/{}", indexer.to_lowercase(), id),
        })
    }

    /// Serialize records into a search response body.
    pub fn search_body(releases: &[Value]) -> String {
        Value::Array(releases.to_vec()).to_string()
    }
}
