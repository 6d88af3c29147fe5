pub mod http_fetcher;

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::app::Result;
use crate::domain::FeedItems;
use crate::parser;

/// Path appended to bare host names.
pub const DEFAULT_FEED_PATH: &str = "/feed";

#[async_trait]
pub trait Fetcher {
    /// Download the document at `url`, failing on transport errors and
    /// non-success status codes.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Turn a site reference such as `fly4free.pl` into a fetchable feed URL.
///
/// A missing scheme becomes `http://`; a reference with nothing after the
/// host gets [`DEFAULT_FEED_PATH`].
pub fn normalize_url(site: &str) -> Result<Url> {
    let site = site.trim();
    let mut address = if site.contains("://") {
        site.to_string()
    } else {
        format!("http://{}", site)
    };

    let authority_start = address.find("://").map(|i| i + 3).unwrap_or(0);
    let authority_end = address[authority_start..]
        .find(['?', '#'])
        .map(|i| authority_start + i)
        .unwrap_or(address.len());

    let rest = &address[authority_start..authority_end];
    if rest.is_empty() || rest.starts_with('/') {
        return Err(url::ParseError::EmptyHost.into());
    }
    if !rest.contains('/') {
        address.insert_str(authority_end, DEFAULT_FEED_PATH);
    }

    Ok(Url::parse(&address)?)
}

/// Fetches a site's feed and hands the body to the parser.
#[derive(Clone)]
pub struct FeedClient {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
}

impl FeedClient {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self { fetcher }
    }

    /// Download the raw feed document of `site`.
    pub async fn fetch_document(&self, site: &str) -> Result<Vec<u8>> {
        let url = normalize_url(site)?;
        tracing::info!("Getting feed from {}...", url);
        self.fetcher.fetch(url.as_str()).await
    }

    /// Download and parse in one call, for callers that don't track phases.
    /// [`FeedSchedule`](crate::scheduler::FeedSchedule) calls
    /// [`fetch_document`](Self::fetch_document) and [`parser::parse`]
    /// separately so a failure is attributed to the right phase.
    pub async fn fetch(&self, site: &str) -> Result<FeedItems> {
        let body = self.fetch_document(site).await?;
        parser::parse(&body)
    }
}
