//! # rss-checker
//!
//! Watches RSS feeds for items whose title or categories match a set of
//! patterns, and reports them on the console and by e-mail.
//!
//! ## Architecture
//!
//! Every check cycle is a one-way pipeline:
//!
//! ```text
//! Fetcher → Parser → Matcher → Notifier
//! ```
//!
//! A [`scheduler::FeedSchedule`] runs the pipeline for one feed, once or on a
//! fixed interval. The [`daemon`] runs one schedule per configured host, all
//! sharing a single SMTP connection.
//!
//! ## Quick Start
//!
//! ```bash
//! # Check once for items from the last day
//! rss-checker check fly4free.pl -p 'wroclaw\w*' -p 'katowic\w*'
//!
//! # Check every ten minutes and mail the matches
//! rss-checker check fly4free.pl -p 'wroclaw\w*' --email me@example.com -i 10m
//!
//! # Watch every host from ~/.config/rss-checker/config.toml
//! rss-checker daemon
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires the feed client and
/// the shared notifier together.
pub mod app;

/// Command-line interface using clap.
///
/// - `check <site> -p <pattern>...` - Check one feed
/// - `daemon [-c <config>]` - Check every configured host
pub mod cli;

/// TOML configuration for the daemon.
pub mod config;

/// Supervision of many feeds at once.
pub mod daemon;

/// Publish date and `--from-date` parsing.
pub mod dates;

/// Core domain models.
///
/// - [`FeedItem`](domain::FeedItem): one parsed `<item>`
/// - [`MatchSet`](domain::MatchSet): matches grouped by pattern
/// - [`CheckState`](domain::CheckState): per-feed schedule state
pub mod domain;

/// HTTP fetching and site reference normalization.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for document retrieval
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Case-insensitive pattern matching over parsed items.
pub mod matcher;

/// Console and e-mail reporting.
pub mod notifier;

/// RSS document parsing.
pub mod parser;

/// The per-feed check loop.
pub mod scheduler;

#[cfg(test)]
mod testing;
