//! Error types for Mintline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The interface description could not be fetched or parsed
    #[error("Failed to load API description: {0}")]
    Descriptor(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The upstream response body was not JSON
    #[error("request failed ({status} {status_text})")]
    Transport { status: u16, status_text: String },

    /// The upstream envelope reported `success: false`
    #[error("{0}")]
    Api(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
