use super::{types::LoadedConfig, ConfigError};

/// Validate configuration before a search.
/// Currently validates:
/// - The file could be loaded (not malformed)
/// - The API key was changed from the template placeholder
pub fn validate_config(loaded: &LoadedConfig) -> Result<(), ConfigError> {
    if loaded.malformed {
        return Err(ConfigError::Malformed(loaded.path.display().to_string()));
    }

    if !loaded.config.has_api_key() {
        return Err(ConfigError::PlaceholderApiKey);
    }

    Ok(())
}
