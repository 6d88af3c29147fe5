//! Drives one feed through fetch, parse, match and report.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::app::Result;
use crate::dates;
use crate::domain::{CheckState, MatchSet, Phase};
use crate::fetcher::FeedClient;
use crate::matcher::PatternSet;
use crate::notifier::{self, Notifier};
use crate::parser;

/// Outcome of one successful cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub matches: MatchSet,
    /// Whether an e-mail went out for this cycle.
    pub notified: bool,
}

pub struct FeedSchedule {
    state: CheckState,
    patterns: PatternSet,
    client: FeedClient,
    notifier: Arc<Notifier>,
    quiet: bool,
    phase: Phase,
}

impl FeedSchedule {
    /// Fails when a pattern of `state` does not compile.
    pub fn new(state: CheckState, client: FeedClient, notifier: Arc<Notifier>) -> Result<Self> {
        let patterns = PatternSet::compile(&state.patterns)?;
        Ok(Self {
            state,
            patterns,
            client,
            notifier,
            quiet: false,
            phase: Phase::Idle,
        })
    }

    /// Suppress the console report.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn state(&self) -> &CheckState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run one cycle. On success the cursor moves to `nominal_start`; on
    /// failure it stays where it was.
    pub async fn run_cycle(&mut self, nominal_start: DateTime<Utc>) -> Result<CycleReport> {
        let result = self.cycle().await;
        if result.is_ok() {
            self.state.cursor = nominal_start;
        }
        self.phase = Phase::Idle;
        result
    }

    async fn cycle(&mut self) -> Result<CycleReport> {
        self.phase = Phase::Fetching;
        let body = self.client.fetch_document(&self.state.site).await?;

        self.phase = Phase::Parsing;
        let items = parser::parse(&body)?;

        self.phase = Phase::Matching;
        let matches = self.patterns.find(&items, self.state.cursor);
        tracing::debug!(
            site = %self.state.site,
            items = items.len(),
            matched = matches.total(),
            "Matched since {}",
            self.state.cursor
        );

        self.phase = Phase::Reporting;
        let notified = self.report(&matches).await?;

        Ok(CycleReport { matches, notified })
    }

    /// Print and mail the matches. Only a lost relay connection fails the
    /// cycle; a rejected message is logged.
    async fn report(&self, matches: &MatchSet) -> Result<bool> {
        if matches.is_empty() {
            tracing::info!("Nothing found on {}", self.state.site);
            return Ok(false);
        }

        if !self.quiet {
            print!("{}", notifier::render(matches));
        }

        let Some(recipient) = &self.state.email else {
            return Ok(false);
        };

        match self.notifier.notify(matches, recipient).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::error!("{}", e);
                Ok(false)
            }
        }
    }

    /// Run a single cycle, or loop forever when an interval is set.
    ///
    /// A one-shot failure is returned. While looping, only fatal errors end
    /// the loop; anything else is logged and retried on the next tick.
    pub async fn run(&mut self) -> Result<()> {
        if !self.state.is_looping() {
            let result = self.run_cycle(Utc::now()).await.map(|_| ());
            self.phase = Phase::Stopped;
            return result;
        }

        tracing::info!(
            "Checking {} every {}",
            self.state.site,
            dates::format_interval(self.state.interval.as_secs())
        );

        let origin = Instant::now();
        let origin_wall = Utc::now();
        let mut ticker = interval_at(origin, self.state.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let tick = ticker.tick().await;
            let nominal_start = wall_clock(origin_wall, tick.duration_since(origin));

            match self.run_cycle(nominal_start).await {
                Ok(_) => {}
                Err(e) if e.is_fatal() => {
                    self.phase = Phase::Stopped;
                    return Err(e);
                }
                Err(e) => tracing::warn!("{}: {}", self.state.site, e),
            }
        }
    }
}

/// Wall-clock time of a tick `elapsed` after the schedule started.
fn wall_clock(origin: DateTime<Utc>, elapsed: std::time::Duration) -> DateTime<Utc> {
    TimeDelta::from_std(elapsed)
        .ok()
        .and_then(|delta| origin.checked_add_signed(delta))
        .unwrap_or_else(Utc::now)
}
