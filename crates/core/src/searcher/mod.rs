//! Prowlarr search adapter.
//!
//! This module turns host searches into Prowlarr API queries, converts the
//! returned releases into host result rows, and resolves download links
//! (including indexers that redirect a download URL to a magnet link).

mod download;
mod fetcher;
mod prowlarr;
mod query;
mod types;

pub use download::{DownloadError, FileDownloader, TempFileDownloader};
pub use fetcher::{build_client, FetchError, Fetched, Fetcher, HttpFetcher};
pub use prowlarr::{ProwlarrEngine, DISPLAY_NAME, ENGINE_NAME, HELP_URL, NO_LINK};
pub use query::{build_search_url, decode_search_text, ALL_INDEXERS};
pub use types::*;
