use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Got {0} response code from server")]
    HttpStatus(u16),

    #[error("Response from server does not contain valid rss xml: {0}")]
    Parse(String),

    #[error("Cannot parse publish date: {0}")]
    DateParse(String),

    #[error("Failed to send e-mail: {0}")]
    Send(String),

    #[error("Cannot connect to smtp server: {0}")]
    Connection(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid e-mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckerError {
    /// Whether the error must stop the whole process rather than a single cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CheckerError::Connection(_)
                | CheckerError::Config(_)
                | CheckerError::Pattern(_)
                | CheckerError::Address(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CheckerError>;
