//! Errors
//!
//! Configuration defects are fatal and detected once at setup. Malformed
//! stylesheet text is reported by the parser. The rewrite pass itself has no
//! error path.

use thiserror::Error;

/// Raised while assembling or validating a scoping configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "isolationStrategy option must be provided - a custom transformer or one of \
         insideOfContainer, outsideOfContainer, forComponents"
    )]
    MissingIsolationStrategy,

    #[error("{strategy}: a non-empty selector is required")]
    EmptySelector { strategy: &'static str },

    #[error("corePlugins.preflight must be set to false, otherwise the reset is applied twice")]
    PreflightNotDisabled,

    #[error("invalid configuration: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Malformed stylesheet text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        ParseError {
            message: message.into(),
            offset,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("stylesheet parse error: {0}")]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
