//! Supervises one schedule per configured host.
//!
//! Every schedule runs in its own task with the global interval and
//! receiver; all of them share the notifier of the [`AppContext`].

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use lettre::message::Mailbox;
use tokio::task::JoinSet;

use crate::app::{AppContext, Result};
use crate::config::{ConfigError, DaemonConfig};
use crate::dates;
use crate::domain::CheckState;
use crate::scheduler::FeedSchedule;

/// Daemon runner
pub struct Daemon {
    ctx: AppContext,
    config: DaemonConfig,
}

impl Daemon {
    pub fn new(ctx: AppContext, config: DaemonConfig) -> Self {
        Self { ctx, config }
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.config.interval)
    }

    /// Build one schedule per host, all starting one interval back from `now`.
    pub fn schedules(&self, now: DateTime<Utc>) -> Result<Vec<FeedSchedule>> {
        let receiver: Mailbox = self
            .config
            .receiver
            .as_deref()
            .ok_or(ConfigError::NoReceiver)?
            .parse()?;
        let hosts = self
            .config
            .hosts
            .as_ref()
            .filter(|hosts| !hosts.is_empty())
            .ok_or(ConfigError::NoHosts)?;

        let cursor = lookback(now, self.interval());

        hosts
            .iter()
            .map(|(site, patterns)| {
                let state = CheckState::new(site.as_str(), patterns.clone(), cursor)
                    .with_email(Some(receiver.clone()))
                    .with_interval(self.interval());
                self.ctx.schedule(state)
            })
            .collect()
    }

    /// Run until Ctrl-C, a fatal error, or every schedule has stopped.
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let schedules = self.schedules(Utc::now())?;

        // Every schedule reuses this connection
        self.ctx.notifier.connect().await?;

        tracing::info!(
            "rss-checker daemon started (interval: {}, hosts: {})",
            dates::format_interval(self.config.interval),
            schedules.len()
        );

        let mut tasks = JoinSet::new();
        for mut schedule in schedules {
            tasks.spawn(async move {
                let result = schedule.run().await;
                (schedule.state().site.clone(), result)
            });
        }

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    None => {
                        tracing::info!("All schedules stopped");
                        return Ok(());
                    }
                    Some(Ok((site, Ok(())))) => tracing::info!("Stopped checking {}", site),
                    Some(Ok((site, Err(e)))) => {
                        tracing::error!("Checking {} failed: {}", site, e);
                        tasks.abort_all();
                        return Err(e);
                    }
                    Some(Err(e)) => tracing::error!("Schedule task failed: {}", e),
                },
                _ = &mut shutdown => {
                    tracing::info!("Daemon shutting down...");
                    tasks.abort_all();
                    return Ok(());
                }
            }
        }
    }
}

fn lookback(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(interval)
        .ok()
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
