use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::{CheckerError, Result};
use crate::fetcher::Fetcher;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("rss-checker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CheckerError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CheckerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckerError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CheckerError::Transport(e.to_string()))?;

        Ok(body.to_vec())
    }
}
