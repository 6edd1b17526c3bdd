pub mod config;
pub mod nova;
pub mod searcher;
pub mod testing;

pub use config::{
    default_config_path, load_config_from_str, load_engine_config, validate_config,
    ConfigError, ConfigLoader, EngineConfig, LoadedConfig, SanitizedConfig,
};
pub use nova::{capabilities_xml, NovaPrinter, ResultSink};
pub use searcher::{
    Category, DownloadError, FetchError, Fetched, Fetcher, FileDownloader, HttpFetcher,
    ProwlarrEngine, ResultRow, SearchError, TempFileDownloader,
};
