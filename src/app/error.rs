use thiserror::Error;

use crate::caption::CaptionError;
use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum MemeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),
}

pub type Result<T> = std::result::Result<T, MemeError>;
