//! Test doubles for the fetcher and mailer seams.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use lettre::Message;

use crate::app::{CheckerError, Result};
use crate::fetcher::Fetcher;
use crate::notifier::Mailer;

pub fn sample_feed() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Cheap flights</title>
    <item>
      <title>Flights to Wroclaw</title>
      <link>L1</link>
      <pubDate>2024-01-02</pubDate>
      <category>Poland</category>
    </item>
    <item>
      <title>News</title>
      <link>L2</link>
      <pubDate>2024-01-01</pubDate>
      <category>Other</category>
    </item>
  </channel>
</rss>"#
        .to_string()
}

#[derive(Debug, Clone)]
pub enum MockResponse {
    Body(String),
    Status(u16),
    Transport(String),
}

impl MockResponse {
    fn into_result(self) -> Result<Vec<u8>> {
        match self {
            MockResponse::Body(body) => Ok(body.into_bytes()),
            MockResponse::Status(code) => Err(CheckerError::HttpStatus(code)),
            MockResponse::Transport(cause) => Err(CheckerError::Transport(cause)),
        }
    }
}

/// Serves queued responses in order, then repeats `fallback`.
pub struct MockFetcher {
    queued: Mutex<VecDeque<MockResponse>>,
    fallback: MockResponse,
    urls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new(queued: Vec<MockResponse>, fallback: MockResponse) -> Self {
        Self {
            queued: Mutex::new(queued.into()),
            fallback,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_body(body: impl Into<String>) -> Self {
        Self::new(Vec::new(), MockResponse::Body(body.into()))
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.urls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.urls.lock().unwrap().push(url.to_string());
        let response = self
            .queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        response.into_result()
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: Vec<String>,
    pub raw: String,
}

/// Records delivered messages instead of talking to a relay.
#[derive(Default)]
pub struct RecordingMailer {
    refuse_connection: bool,
    reject_sends: bool,
    connected: AtomicBool,
    connects: AtomicUsize,
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A relay that cannot be reached.
    pub fn unreachable() -> Self {
        Self {
            refuse_connection: true,
            ..Self::default()
        }
    }

    /// A relay that accepts the connection but refuses every message.
    pub fn rejecting() -> Self {
        Self {
            reject_sends: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of connection attempts that actually dialed the relay.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn connect(&self) -> Result<()> {
        if self.refuse_connection {
            self.connects.fetch_add(1, Ordering::SeqCst);
            return Err(CheckerError::Connection("connection refused".into()));
        }
        if !self.connected.swap(true, Ordering::SeqCst) {
            self.connects.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn send(&self, message: Message) -> Result<()> {
        self.connect().await?;
        if self.reject_sends {
            return Err(CheckerError::Send("550 relay not permitted".into()));
        }
        let to = message
            .envelope()
            .to()
            .iter()
            .map(|a| a.to_string())
            .collect();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
        self.sent.lock().unwrap().push(SentMail { to, raw });
        Ok(())
    }
}
