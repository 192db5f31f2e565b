use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Connection or timeout failure on the request. The only retryable kind.
    #[error("Network error: {0}")]
    Network(String),

    /// The response was accepted but its body could not be read.
    #[error("Body read error: {0}")]
    BodyRead(String),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Expected markup is missing; the site layout probably changed.
    #[error("Structure error: {0}")]
    Structure(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}
