use std::time::Duration;

use chrono::{DateTime, Utc};
use lettre::message::Mailbox;

/// Everything a schedule needs to know about one monitored feed.
#[derive(Debug, Clone)]
pub struct CheckState {
    pub site: String,
    pub patterns: Vec<String>,
    pub email: Option<Mailbox>,
    /// Zero means a single check.
    pub interval: Duration,
    /// Items published before this instant are ignored.
    pub cursor: DateTime<Utc>,
}

impl CheckState {
    pub fn new(site: impl Into<String>, patterns: Vec<String>, cursor: DateTime<Utc>) -> Self {
        Self {
            site: site.into(),
            patterns,
            email: None,
            interval: Duration::ZERO,
            cursor,
        }
    }

    pub fn with_email(mut self, email: Option<Mailbox>) -> Self {
        self.email = email;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn is_looping(&self) -> bool {
        !self.interval.is_zero()
    }
}

/// Where a schedule currently is within its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Parsing,
    Matching,
    Reporting,
    Stopped,
}
