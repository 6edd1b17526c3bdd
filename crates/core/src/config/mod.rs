mod loader;
mod types;
mod validate;

pub use loader::*;
pub use types::*;
pub use validate::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to write configuration template: {0}")]
    WriteError(String),

    #[error("Configuration file is malformed: {0}")]
    Malformed(String),

    #[error("API key is still the template placeholder")]
    PlaceholderApiKey,
}
