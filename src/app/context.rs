use std::sync::Arc;

use crate::app::error::Result;
use crate::config::SmtpConfig;
use crate::domain::CheckState;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::{FeedClient, Fetcher};
use crate::notifier::{Mailer, Notifier, SmtpMailer};
use crate::scheduler::FeedSchedule;

/// Resources shared by every schedule of the process.
pub struct AppContext {
    pub client: FeedClient,
    pub notifier: Arc<Notifier>,
}

impl AppContext {
    pub fn new(smtp: SmtpConfig) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new()?);
        let mailer: Arc<dyn Mailer + Send + Sync> = Arc::new(SmtpMailer::new(smtp));
        Ok(Self::with_parts(fetcher, mailer))
    }

    pub fn with_parts(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        mailer: Arc<dyn Mailer + Send + Sync>,
    ) -> Self {
        Self {
            client: FeedClient::new(fetcher),
            notifier: Arc::new(Notifier::new(mailer)),
        }
    }

    /// A schedule for `state` wired to the shared client and notifier.
    pub fn schedule(&self, state: CheckState) -> Result<FeedSchedule> {
        FeedSchedule::new(state, self.client.clone(), self.notifier.clone())
    }
}
