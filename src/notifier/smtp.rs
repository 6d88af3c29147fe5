use std::time::Duration;

use async_trait::async_trait;
use lettre::transport::smtp::authentication::{Credentials, DEFAULT_MECHANISMS};
use lettre::transport::smtp::client::{AsyncSmtpConnection, TlsParameters};
use lettre::transport::smtp::commands::{Data, Mail, Rcpt, Rset};
use lettre::transport::smtp::extension::ClientId;
use lettre::transport::smtp::response::Response;
use lettre::Message;
use tokio::sync::Mutex;

use crate::app::{CheckerError, Result};
use crate::config::{SmtpConfig, TlsMode};
use crate::notifier::Mailer;

type SmtpResult<T> = std::result::Result<T, lettre::transport::smtp::Error>;

#[derive(Default)]
struct Relay {
    conn: Option<AsyncSmtpConnection>,
    /// Set once the first dial succeeded.
    established: bool,
}

/// SMTP relay client holding one connection for the life of the process.
///
/// The connection is opened on first use. Sends are serialized on it; a
/// rejected message is followed by `RSET` and the connection is kept. It is
/// redialed only after it broke or stopped answering `NOOP`.
pub struct SmtpMailer {
    config: SmtpConfig,
    hello: ClientId,
    relay: Mutex<Relay>,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            config,
            hello: ClientId::default(),
            relay: Mutex::new(Relay::default()),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    fn tls_parameters(&self) -> SmtpResult<TlsParameters> {
        TlsParameters::new(self.config.host.clone())
    }

    async fn dial(&self) -> SmtpResult<AsyncSmtpConnection> {
        tracing::info!("Connecting to smtp server {}...", self.endpoint());

        let mut conn = AsyncSmtpConnection::connect_tokio1(
            (self.config.host.as_str(), self.config.port),
            Some(Duration::from_secs(self.config.timeout_secs)),
            &self.hello,
            None,
            None,
        )
        .await?;

        match self.config.tls {
            TlsMode::None => {}
            TlsMode::Opportunistic if !conn.can_starttls() => {}
            TlsMode::Opportunistic | TlsMode::Required => {
                conn.starttls(self.tls_parameters()?, &self.hello).await?;
            }
        }

        if let (Some(username), Some(password)) = (&self.config.username, &self.config.password) {
            let credentials = Credentials::new(username.clone(), password.clone());
            conn.auth(DEFAULT_MECHANISMS, &credentials).await?;
        }

        Ok(conn)
    }

    /// Hand out the live connection, dialing a new one when needed.
    ///
    /// A failed first dial is a `Connection` error. Once the relay has been
    /// reached, a failed redial only fails the current send.
    async fn ensure<'a>(&self, relay: &'a mut Relay) -> Result<&'a mut AsyncSmtpConnection> {
        let reusable = match relay.conn.as_mut() {
            Some(conn) => !conn.has_broken() && conn.test_connected().await,
            None => false,
        };

        if !reusable {
            if relay.conn.take().is_some() {
                tracing::warn!("Connection to {} lost, reconnecting", self.endpoint());
            }
            match self.dial().await {
                Ok(conn) => {
                    relay.conn = Some(conn);
                    relay.established = true;
                }
                Err(e) if relay.established => {
                    return Err(CheckerError::Send(format!("{}: {}", self.endpoint(), e)));
                }
                Err(e) => {
                    return Err(CheckerError::Connection(format!("{}: {}", self.endpoint(), e)));
                }
            }
        }

        relay
            .conn
            .as_mut()
            .ok_or_else(|| CheckerError::Connection(self.endpoint()))
    }
}

async fn transmit(conn: &mut AsyncSmtpConnection, message: &Message) -> SmtpResult<Response> {
    let envelope = message.envelope();

    conn.command(Mail::new(envelope.from().cloned(), vec![])).await?;
    for recipient in envelope.to() {
        conn.command(Rcpt::new(recipient.clone(), vec![])).await?;
    }
    conn.command(Data).await?;
    conn.message(&message.formatted()).await
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn connect(&self) -> Result<()> {
        let mut relay = self.relay.lock().await;
        self.ensure(&mut relay).await.map(|_| ())
    }

    async fn send(&self, message: Message) -> Result<()> {
        let mut relay = self.relay.lock().await;
        let conn = self.ensure(&mut relay).await?;

        match transmit(conn, &message).await {
            Ok(response) => {
                tracing::debug!(code = %response.code(), "Message accepted");
                Ok(())
            }
            Err(e) => {
                // The relay answered, so the session is still in sync
                let rejected = e.is_permanent() || e.is_transient();
                if !(rejected && conn.command(Rset).await.is_ok()) {
                    relay.conn = None;
                }
                Err(CheckerError::Send(e.to_string()))
            }
        }
    }
}
