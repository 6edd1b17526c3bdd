use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{
    types::{EngineConfig, LoadedConfig, CONFIG_FILE_NAME},
    ConfigError,
};

/// Prefix of the environment variables layered over the config file.
pub const ENV_PREFIX: &str = "PROWLARR_";

const ENV_KEYS: &[&str] = &["api_key", "tracker_first", "url", "timeout_secs"];

/// Default config location: `prowlarr.json` next to the running executable.
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.canonicalize().ok())
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Loads [`EngineConfig`] from a JSON file with environment overrides.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::with_env_prefix(ENV_PREFIX)
    }

    /// Use a different prefix for the override variables.
    pub fn with_env_prefix(prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: prefix.into(),
        }
    }

    fn env_overrides(&self) -> Env {
        Env::prefixed(&self.env_prefix).only(ENV_KEYS)
    }

    /// Load the engine configuration, creating the template file if needed.
    ///
    /// Never fails: an unreadable file gets the template written in its place,
    /// an invalid one leaves the defaults in memory with `malformed` set.
    pub fn load(&self, path: &Path) -> LoadedConfig {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                info!(
                    path = %path.display(),
                    error = %e,
                    "Config file not readable, writing template"
                );
                if let Err(e) = write_default_config(path) {
                    warn!(path = %path.display(), error = %e, "Could not write config template");
                }

                return match self.default_with_env() {
                    Ok(config) => LoadedConfig::from_config(config, path),
                    Err(e) => {
                        warn!(error = %e, "Invalid environment override");
                        malformed(path)
                    }
                };
            }
        };

        match self.parse(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "Configuration loaded");
                LoadedConfig::from_config(config, path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Configuration file is malformed");
                malformed(path)
            }
        }
    }

    /// Parse a JSON config document with environment variable overrides.
    ///
    /// All of `api_key`, `tracker_first` and `url` must be present in the
    /// document itself; the environment only overrides a complete file.
    pub fn parse(&self, json: &str) -> Result<EngineConfig, ConfigError> {
        let file = Figment::from(Json::string(json));
        file.extract::<EngineConfig>()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        file.merge(self.env_overrides())
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn default_with_env(&self) -> Result<EngineConfig, ConfigError> {
        Figment::from(Serialized::defaults(EngineConfig::default()))
            .merge(self.env_overrides())
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

fn malformed(path: &Path) -> LoadedConfig {
    LoadedConfig {
        config: EngineConfig::default(),
        path: path.to_path_buf(),
        malformed: true,
    }
}

/// Load the configuration at `path` with the default `PROWLARR_` overrides.
pub fn load_engine_config(path: &Path) -> LoadedConfig {
    ConfigLoader::new().load(path)
}

/// Load configuration from a JSON string (useful for testing)
pub fn load_config_from_str(json: &str) -> Result<EngineConfig, ConfigError> {
    ConfigLoader::new().parse(json)
}

/// Render the template document: 4-space indentation, sorted keys.
pub fn render_default_config() -> Result<String, ConfigError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    EngineConfig::default()
        .serialize(&mut serializer)
        .map_err(|e| ConfigError::WriteError(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ConfigError::WriteError(e.to_string()))
}

/// Write the template document to `path`, replacing whatever is there.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let document = render_default_config()?;
    std::fs::write(path, document)
        .map_err(|e| ConfigError::WriteError(format!("{}: {}", path.display(), e)))
}
