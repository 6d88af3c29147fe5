use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use lettre::message::Mailbox;

use crate::app::{AppContext, Result};
use crate::cli::CheckArgs;
use crate::config::{DaemonConfig, SmtpConfig};
use crate::daemon::Daemon;
use crate::dates;
use crate::domain::CheckState;

/// SMTP settings for `check`, which only takes host and port.
pub fn smtp_config(args: &CheckArgs) -> SmtpConfig {
    SmtpConfig {
        host: args.smtp_host.clone(),
        port: args.smtp_port,
        ..SmtpConfig::default()
    }
}

pub async fn check(ctx: &AppContext, args: CheckArgs) -> Result<()> {
    let cursor = dates::parse_from_date(&args.from_date, Utc::now())?;
    let email = args
        .email
        .as_deref()
        .map(str::parse::<Mailbox>)
        .transpose()?;

    tracing::debug!("Looking for items published since {}", cursor);

    let state = CheckState::new(args.site, args.patterns, cursor)
        .with_email(email)
        .with_interval(Duration::from_secs(args.interval));

    ctx.schedule(state)?.quiet(args.quiet).run().await
}

pub async fn daemon(config_path: Option<&Path>) -> Result<()> {
    let config = DaemonConfig::load(config_path)?;
    let ctx = AppContext::new(config.smtp.clone())?;

    Daemon::new(ctx, config).run().await
}
