use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DocketError>;
