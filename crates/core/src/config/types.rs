use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// API key value written into a freshly created config file.
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Prowlarr URL used when no config file exists yet.
pub const DEFAULT_URL: &str = "http://127.0.0.1:9696";

/// File name of the config file, looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "prowlarr.json";

/// Engine configuration, as stored in `prowlarr.json`.
///
/// Fields are declared in alphabetical order so the auto-created file comes
/// out with sorted keys.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Prowlarr API key
    pub api_key: String,
    /// Request timeout in seconds (unset: HTTP client default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u32>,
    /// Put the tracker name before the title in result names
    pub tracker_first: bool,
    /// Prowlarr server URL (e.g., "http://127.0.0.1:9696")
    pub url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            timeout_secs: None,
            tracker_first: false,
            url: DEFAULT_URL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Whether the API key was changed from the template value.
    pub fn has_api_key(&self) -> bool {
        self.api_key != API_KEY_PLACEHOLDER
    }
}

/// Result of the one-time config load.
///
/// `malformed` is set when the file existed but could not be turned into an
/// [`EngineConfig`]; `config` then holds the defaults.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: EngineConfig,
    pub path: PathBuf,
    pub malformed: bool,
}

impl LoadedConfig {
    /// A well-formed config not backed by any particular file.
    pub fn from_config(config: EngineConfig, path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            path: path.into(),
            malformed: false,
        }
    }
}

/// Sanitized config for display (API key redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub path: String,
    pub malformed: bool,
    pub url: String,
    pub api_key_configured: bool,
    pub tracker_first: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u32>,
}

impl From<&LoadedConfig> for SanitizedConfig {
    fn from(loaded: &LoadedConfig) -> Self {
        Self {
            path: loaded.path.display().to_string(),
            malformed: loaded.malformed,
            url: loaded.config.base_url().to_string(),
            api_key_configured: loaded.config.has_api_key(),
            tracker_first: loaded.config.tracker_first,
            timeout_secs: loaded.config.timeout_secs,
        }
    }
}
