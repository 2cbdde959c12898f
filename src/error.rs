//! Error type for the fallible edges of the crate (config, WAV decoding, I/O).
//!
//! The analysis and reactor hot paths are total functions and never return
//! these errors.

use thiserror::Error;

/// Errors raised while loading configuration or audio
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV decode error: {0}")]
    Wav(#[from] hound::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown band '{0}'")]
    UnknownBand(String),
}

pub type Result<T> = std::result::Result<T, Error>;
